//! The two authentication screens. Each owns its own form state and shares
//! the notification channel it was given.

use std::sync::Arc;

use serde_json::Value;

use super::client::AuthClient;
use super::error::AuthError;
use super::forms::{
    LoginForm, LoginFormEmailLens, LoginFormPasswordLens, RegisterForm,
    RegisterFormConfirmPasswordLens, RegisterFormEmailLens, RegisterFormNameLens,
    RegisterFormPasswordLens, login_notices, login_schema, register_notices, register_schema,
};
use super::login::{Authenticator, authenticator_for};
use crate::config::AuthConfig;
use crate::feedback::{SubmitNotices, ToastManager};
use crate::form::{
    FieldBinding, FormController, FormModel, FormOptions, FormResult, FormView, SubmitEvent,
    SubmitOutcome,
};
use crate::i18n::I18nManager;

pub struct LoginScreen {
    controller: FormController<LoginForm>,
    toasts: ToastManager,
    notices: SubmitNotices,
    authenticator: Arc<dyn Authenticator>,
}

impl LoginScreen {
    pub fn new(
        i18n: &I18nManager,
        toasts: ToastManager,
        authenticator: Arc<dyn Authenticator>,
    ) -> Self {
        Self::with_options(i18n, toasts, authenticator, FormOptions::default())
    }

    pub fn with_options(
        i18n: &I18nManager,
        toasts: ToastManager,
        authenticator: Arc<dyn Authenticator>,
        options: FormOptions,
    ) -> Self {
        Self {
            controller: FormController::new(LoginForm::default(), login_schema(i18n), options),
            toasts,
            notices: login_notices(i18n),
            authenticator,
        }
    }

    pub fn from_config(
        config: &AuthConfig,
        i18n: &I18nManager,
        toasts: ToastManager,
    ) -> Result<Self, AuthError> {
        Ok(Self::new(i18n, toasts, authenticator_for(config)?))
    }

    pub fn controller(&self) -> &FormController<LoginForm> {
        &self.controller
    }

    pub fn email(&self) -> FieldBinding<LoginForm, LoginFormEmailLens> {
        self.controller.register_field(LoginForm::fields().email())
    }

    pub fn password(&self) -> FieldBinding<LoginForm, LoginFormPasswordLens> {
        self.controller
            .register_field(LoginForm::fields().password())
    }

    pub fn view(&self) -> FormResult<FormView> {
        self.controller.view()
    }

    pub async fn submit(&self, event: &mut SubmitEvent) -> FormResult<SubmitOutcome<()>> {
        let authenticator = &self.authenticator;
        self.controller
            .handle_submit(
                self.notices.clone(),
                self.toasts.clone(),
                move |credentials: LoginForm| async move {
                    authenticator.authenticate(&credentials).await
                },
            )
            .submit(event)
            .await
    }
}

pub struct RegisterScreen {
    controller: FormController<RegisterForm>,
    toasts: ToastManager,
    notices: SubmitNotices,
    rejected_message: String,
    client: AuthClient,
}

impl RegisterScreen {
    pub fn new(i18n: &I18nManager, toasts: ToastManager, client: AuthClient) -> Self {
        Self::with_options(i18n, toasts, client, FormOptions::default())
    }

    pub fn with_options(
        i18n: &I18nManager,
        toasts: ToastManager,
        client: AuthClient,
        options: FormOptions,
    ) -> Self {
        Self {
            controller: FormController::new(
                RegisterForm::default(),
                register_schema(i18n),
                options,
            ),
            toasts,
            notices: register_notices(i18n),
            rejected_message: i18n.t("register.rejected"),
            client,
        }
    }

    pub fn from_config(
        config: &AuthConfig,
        i18n: &I18nManager,
        toasts: ToastManager,
    ) -> Result<Self, AuthError> {
        Ok(Self::new(i18n, toasts, AuthClient::new(config)?))
    }

    pub fn controller(&self) -> &FormController<RegisterForm> {
        &self.controller
    }

    pub fn name(&self) -> FieldBinding<RegisterForm, RegisterFormNameLens> {
        self.controller.register_field(RegisterForm::fields().name())
    }

    pub fn email(&self) -> FieldBinding<RegisterForm, RegisterFormEmailLens> {
        self.controller
            .register_field(RegisterForm::fields().email())
    }

    pub fn password(&self) -> FieldBinding<RegisterForm, RegisterFormPasswordLens> {
        self.controller
            .register_field(RegisterForm::fields().password())
    }

    pub fn confirm_password(&self) -> FieldBinding<RegisterForm, RegisterFormConfirmPasswordLens> {
        self.controller
            .register_field(RegisterForm::fields().confirm_password())
    }

    pub fn view(&self) -> FormResult<FormView> {
        self.controller.view()
    }

    /// Submits the form; a success carries the server's JSON response.
    ///
    /// A rejection without a server message reads "Erro ao cadastrar"; a
    /// transport or decode failure falls back to the screen's failure notice.
    pub async fn submit(&self, event: &mut SubmitEvent) -> FormResult<SubmitOutcome<Value>> {
        let client = &self.client;
        let rejected_message = self.rejected_message.as_str();
        self.controller
            .handle_submit(
                self.notices.clone(),
                self.toasts.clone(),
                move |form: RegisterForm| async move {
                    client
                        .register(&form)
                        .await
                        .map_err(|error| error.or_rejection_message(rejected_message))
                },
            )
            .submit(event)
            .await
    }
}
