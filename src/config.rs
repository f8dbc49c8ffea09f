//! Runtime configuration for the authentication screens.
//!
//! Defaults target a local development server. Override via environment
//! variables or explicit construction for tests.

use std::time::Duration;

use url::Url;

use crate::i18n::Locale;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_LOGIN_DELAY_MS: u64 = 1_000;

/// Which login boundary the login screen talks to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoginMode {
    /// Placeholder that succeeds after a fixed delay.
    Simulated { delay: Duration },
    /// `POST {api_url}/api/auth/login`.
    Remote,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AuthConfig {
    /// Base URL of the authentication API.
    pub api_url: Url,
    /// HTTP client timeout. `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
    pub login_mode: LoginMode,
    pub locale: Locale,
}

impl AuthConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `BIBLIOTECH_API_URL` (default: `http://localhost:3000`)
    /// - `BIBLIOTECH_TIMEOUT_SECS` (optional)
    /// - `BIBLIOTECH_LOGIN_MODE` (`simulated` or `remote`, default: `simulated`)
    /// - `BIBLIOTECH_LOGIN_DELAY_MS` (default: 1000)
    /// - `BIBLIOTECH_LOCALE` (default: `system`)
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = env_url("BIBLIOTECH_API_URL", DEFAULT_API_URL)?;
        let timeout = env_u64("BIBLIOTECH_TIMEOUT_SECS")?.map(Duration::from_secs);
        let delay = Duration::from_millis(
            env_u64("BIBLIOTECH_LOGIN_DELAY_MS")?.unwrap_or(DEFAULT_LOGIN_DELAY_MS),
        );
        let login_mode = match std::env::var("BIBLIOTECH_LOGIN_MODE") {
            Ok(raw) => parse_login_mode(&raw, delay)?,
            Err(_) => LoginMode::Simulated { delay },
        };
        let locale = std::env::var("BIBLIOTECH_LOCALE")
            .map(Locale::from)
            .unwrap_or_default();

        Ok(Self {
            api_url,
            timeout,
            login_mode,
            locale,
        })
    }

    /// Configuration pointing at a local server, with remote login and no delay.
    pub fn local(api_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: Url::parse(api_url)
                .map_err(|e| ConfigError::InvalidUrl("api_url".to_string(), e.to_string()))?,
            timeout: Some(Duration::from_secs(5)),
            login_mode: LoginMode::Remote,
            locale: Locale::Tag("pt-BR".to_string()),
        })
    }
}

fn parse_login_mode(raw: &str, delay: Duration) -> Result<LoginMode, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "simulated" | "stub" => Ok(LoginMode::Simulated { delay }),
        "remote" => Ok(LoginMode::Remote),
        _ => Err(ConfigError::InvalidLoginMode(raw.to_string())),
    }
}

fn env_url(var: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(var).unwrap_or_else(|_| default.to_string());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(var.to_string(), e.to_string()))
}

fn env_u64(var: &str) -> Result<Option<u64>, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber(var.to_string(), raw)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("invalid number for {0}: {1:?}")]
    InvalidNumber(String, String),
    #[error("unknown login mode {0:?}, expected `simulated` or `remote`")]
    InvalidLoginMode(String),
}
