use bibliotech::form::{FieldLens, FormModel};

#[derive(Clone, bibliotech::form::FormModel)]
struct DemoForm {
    email: String,
}

fn main() {
    let fields = DemoForm::fields();
    let lens = fields.email();
    let mut model = DemoForm {
        email: "a@bibliotech.dev".to_string(),
    };
    lens.set(&mut model, "b@bibliotech.dev".to_string());
    assert_eq!(lens.key().as_str(), "email");
    assert_eq!(lens.get(&model), "b@bibliotech.dev");
    assert_eq!(DemoForm::KEYS.len(), 1);
}
