//! Typed HTTP client for the Bibliotech authentication API.
//!
//! Both calls POST a JSON body and treat any non-2xx status as a rejection,
//! lifting the server's `{message}` out of the error body when there is one.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use super::error::AuthError;
use super::forms::{LoginForm, RegisterForm};
use crate::config::AuthConfig;

pub const REGISTER_PATH: &str = "/api/auth/register";
pub const LOGIN_PATH: &str = "/api/auth/login";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Client for the authentication endpoints.
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: Url,
}

impl AuthClient {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| AuthError::Http {
            endpoint: "client_init",
            source,
        })?;
        Ok(Self {
            http,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Create an account.
    ///
    /// Calls `POST {base_url}/api/auth/register` with
    /// `{name, email, password, confirmPassword}`.
    pub async fn register(&self, form: &RegisterForm) -> Result<Value, AuthError> {
        self.post_json("POST /api/auth/register", REGISTER_PATH, form).await
    }

    /// Verify credentials.
    ///
    /// Calls `POST {base_url}/api/auth/login` with `{email, password}`.
    pub async fn login(&self, form: &LoginForm) -> Result<Value, AuthError> {
        self.post_json("POST /api/auth/login", LOGIN_PATH, form).await
    }

    async fn post_json<B>(
        &self,
        endpoint: &'static str,
        path: &str,
        body: &B,
    ) -> Result<Value, AuthError>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);

        let resp = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|source| AuthError::Http { endpoint, source })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = server_message(&body);
            tracing::warn!(
                endpoint,
                status = status.as_u16(),
                has_message = message.is_some(),
                "authentication request rejected"
            );
            return Err(AuthError::Rejected {
                endpoint,
                status: status.as_u16(),
                message,
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|source| AuthError::Http { endpoint, source })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|source| AuthError::Decode { endpoint, source })
    }
}

fn server_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|error| error.message)
        .filter(|message| !message.trim().is_empty())
}
