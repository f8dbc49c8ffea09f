pub use crate::application::{AppError, BibliotechApp};
pub use crate::auth::{
    AuthClient, AuthError, Authenticator, LoginForm, LoginScreen, RegisterForm, RegisterScreen,
    SimulatedAuthenticator,
};
pub use crate::config::{AuthConfig, LoginMode};
pub use crate::feedback::{FailureNotice, SubmitNotices, ToastEntry, ToastKind, ToastManager};
pub use crate::form::{
    FieldBinding, FieldLens, FieldRule, FieldSchema, FormController, FormErrors, FormModel,
    FormOptions, FormView, RevalidateMode, SubmitEvent, SubmitOutcome, SubmitState,
    ValidationMode,
};
pub use crate::i18n::{I18nManager, Locale};
