use bibliotech::form::{FieldLens, FormModel};

#[derive(Clone, bibliotech::form::FormModel)]
struct PasswordForm {
    password: String,
    #[form(key = "confirmPassword")]
    confirm_password: String,
}

fn main() {
    let fields = PasswordForm::fields();
    assert_eq!(fields.password().key().as_str(), "password");
    assert_eq!(fields.confirm_password().key().as_str(), "confirmPassword");
    assert_eq!(
        PasswordForm::KEYS
            .iter()
            .map(|key| key.as_str())
            .collect::<Vec<_>>(),
        vec!["password", "confirmPassword"]
    );
}
