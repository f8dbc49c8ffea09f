mod binding;
mod controller;
mod submit;
mod validation;

#[cfg(test)]
mod tests;

pub use bibliotech_form_derive::FormModel;
pub use binding::{FieldBinding, FormView};
pub use controller::{
    FieldKey, FieldMeta, FormController, FormError, FormId, FormOptions, FormResult, FormSnapshot,
    RevalidateMode, SubmitState, ValidationMode,
};
pub use submit::{SubmitEvent, SubmitHandler, SubmitOutcome, SubmitRejection};
pub use validation::{
    Constraint, FieldLens, FieldRule, FieldSchema, FormErrors, FormModel, FormValues, RuleStage,
    ValueType, validate, validate_field,
};
