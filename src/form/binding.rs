use super::controller::{FieldKey, FormController, FormResult, SubmitState, read_lock};
use super::validation::{FieldLens, FormModel, validate};

/// Per-field contract handed to the presentation layer: value in, change and
/// blur events out, plus the error to render next to the input.
#[derive(Clone)]
pub struct FieldBinding<T, L>
where
    T: FormModel,
{
    controller: FormController<T>,
    lens: L,
}

impl<T, L> FieldBinding<T, L>
where
    T: FormModel,
    L: FieldLens<T, Value = String>,
{
    pub fn key(&self) -> FieldKey {
        self.lens.key()
    }

    pub fn value(&self) -> FormResult<String> {
        let state = read_lock(&self.controller.state, "reading bound field value")?;
        Ok(self.lens.get(&state.model).clone())
    }

    pub fn error(&self) -> FormResult<Option<String>> {
        self.controller.field_error_for_display(self.lens)
    }

    pub fn on_change(&self, value: impl Into<String>) -> FormResult<()> {
        self.controller.set(self.lens, value.into())
    }

    pub fn on_blur(&self) -> FormResult<()> {
        self.controller.touch(self.lens)
    }
}

/// Form-level state for the presentation layer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormView {
    pub submit_state: SubmitState,
    pub is_submitting: bool,
    pub submit_count: u32,
    /// Whether the current values pass the schema, whether or not a
    /// validation pass has stored errors yet.
    pub is_valid: bool,
}

impl<T> FormController<T>
where
    T: FormModel,
{
    pub fn register_field<L>(&self, lens: L) -> FieldBinding<T, L>
    where
        L: FieldLens<T, Value = String>,
    {
        FieldBinding {
            controller: self.clone(),
            lens,
        }
    }

    /// Error shown for a field; hidden until it is touched or the form is submitted.
    pub fn field_error_for_display<L>(&self, lens: L) -> FormResult<Option<String>>
    where
        L: FieldLens<T>,
    {
        let key = lens.key();
        let state = read_lock(&self.state, "reading display error message")?;
        let touched = state.field_meta.get(&key).is_some_and(|meta| meta.touched);
        if !touched && state.submit_count == 0 {
            return Ok(None);
        }
        Ok(state.errors.get(key).map(str::to_string))
    }

    pub fn view(&self) -> FormResult<FormView> {
        let state = read_lock(&self.state, "reading form view")?;
        Ok(FormView {
            submit_state: state.submit_state,
            is_submitting: state.submit_state == SubmitState::Submitting,
            submit_count: state.submit_count,
            is_valid: validate(self.schema(), &state.model).is_empty(),
        })
    }
}
