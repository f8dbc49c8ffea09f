use std::fmt::{Debug, Formatter};

use serde::Serialize;

use crate::feedback::{FailureNotice, SubmitNotices};
use crate::form::{FieldRule, FieldSchema, FormModel};
use crate::i18n::I18nManager;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Credentials typed into the login screen; also the login request body.
#[derive(Clone, Default, Eq, PartialEq, Serialize, FormModel)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl Debug for LoginForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Registration screen values; serialized as `{name, email, password, confirmPassword}`.
#[derive(Clone, Default, Eq, PartialEq, Serialize, FormModel)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    #[form(key = "confirmPassword")]
    pub confirm_password: String,
}

impl Debug for RegisterForm {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("confirm_password", &"[REDACTED]")
            .finish()
    }
}

pub fn login_schema(i18n: &I18nManager) -> FieldSchema<LoginForm> {
    let fields = LoginForm::fields();
    let min = MIN_PASSWORD_LEN.to_string();
    FieldSchema::new()
        .field(
            FieldRule::new(fields.email())
                .required(i18n.t("login.email_required"))
                .email(i18n.t("login.email_invalid")),
        )
        .field(
            FieldRule::new(fields.password())
                .required(i18n.t("login.password_required"))
                .min_len(
                    MIN_PASSWORD_LEN,
                    i18n.t_with("login.password_min_length", &[("min", &min)]),
                ),
        )
}

pub fn register_schema(i18n: &I18nManager) -> FieldSchema<RegisterForm> {
    let fields = RegisterForm::fields();
    let min = MIN_PASSWORD_LEN.to_string();
    FieldSchema::new()
        .field(FieldRule::new(fields.name()).required(i18n.t("register.name_required")))
        .field(
            FieldRule::new(fields.email())
                .required(i18n.t("register.email_required"))
                .email(i18n.t("register.email_invalid")),
        )
        .field(
            FieldRule::new(fields.password())
                .required(i18n.t("register.password_required"))
                .min_len(
                    MIN_PASSWORD_LEN,
                    i18n.t_with("register.password_min_length", &[("min", &min)]),
                ),
        )
        .field(
            FieldRule::new(fields.confirm_password())
                .required(i18n.t("register.confirm_password_required"))
                .matches_field(fields.password(), i18n.t("register.password_mismatch")),
        )
}

pub fn login_notices(i18n: &I18nManager) -> SubmitNotices {
    SubmitNotices::new(
        i18n.t("login.success"),
        FailureNotice::Fixed(i18n.t("login.failure")),
    )
    .pending(i18n.t("login.pending"))
}

pub fn register_notices(i18n: &I18nManager) -> SubmitNotices {
    SubmitNotices::new(
        i18n.t("register.success"),
        FailureNotice::ErrorOrFallback(i18n.t("register.failure")),
    )
    .pending(i18n.t("register.pending"))
}
