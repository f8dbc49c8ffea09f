use crate::auth::{AuthClient, AuthError, LoginScreen, RegisterScreen, authenticator_for};
use crate::config::{AuthConfig, ConfigError};
use crate::feedback::ToastManager;
use crate::i18n::I18nManager;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Both authentication screens wired to one configuration, one message
/// catalog and one notification channel.
pub struct BibliotechApp {
    config: AuthConfig,
    i18n: I18nManager,
    toasts: ToastManager,
    login: LoginScreen,
    register: RegisterScreen,
}

impl BibliotechApp {
    pub fn new(config: AuthConfig) -> Result<Self, AppError> {
        let i18n = I18nManager::with_locale(config.locale.clone());
        Self::with_parts(config, i18n, ToastManager::new())
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(AuthConfig::from_env()?)
    }

    pub fn with_parts(
        config: AuthConfig,
        i18n: I18nManager,
        toasts: ToastManager,
    ) -> Result<Self, AppError> {
        let login = LoginScreen::new(&i18n, toasts.clone(), authenticator_for(&config)?);
        let register = RegisterScreen::new(&i18n, toasts.clone(), AuthClient::new(&config)?);
        tracing::info!(
            api_url = %config.api_url,
            login_mode = ?config.login_mode,
            locale = i18n.resolved_locale(),
            "bibliotech auth screens ready"
        );
        Ok(Self {
            config,
            i18n,
            toasts,
            login,
            register,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn i18n(&self) -> &I18nManager {
        &self.i18n
    }

    pub fn toasts(&self) -> &ToastManager {
        &self.toasts
    }

    pub fn login(&self) -> &LoginScreen {
        &self.login
    }

    pub fn register(&self) -> &RegisterScreen {
        &self.register
    }
}
