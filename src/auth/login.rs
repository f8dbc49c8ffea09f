use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures_timer::Delay;

use super::client::AuthClient;
use super::error::AuthError;
use super::forms::LoginForm;
use crate::config::{AuthConfig, LoginMode};

pub type AuthFuture<'a> = Pin<Box<dyn Future<Output = Result<(), AuthError>> + Send + 'a>>;

/// Login boundary: resolves when the credentials are accepted.
pub trait Authenticator: Send + Sync {
    fn authenticate<'a>(&'a self, credentials: &'a LoginForm) -> AuthFuture<'a>;
}

/// Stand-in until the login endpoint is available: accepts any credentials
/// after a fixed delay.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SimulatedAuthenticator {
    delay: Duration,
}

impl SimulatedAuthenticator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedAuthenticator {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Authenticator for SimulatedAuthenticator {
    fn authenticate<'a>(&'a self, _credentials: &'a LoginForm) -> AuthFuture<'a> {
        Box::pin(async move {
            if !self.delay.is_zero() {
                Delay::new(self.delay).await;
            }
            Ok(())
        })
    }
}

impl Authenticator for AuthClient {
    fn authenticate<'a>(&'a self, credentials: &'a LoginForm) -> AuthFuture<'a> {
        Box::pin(async move { self.login(credentials).await.map(|_| ()) })
    }
}

pub fn authenticator_for(config: &AuthConfig) -> Result<Arc<dyn Authenticator>, AuthError> {
    Ok(match config.login_mode {
        LoginMode::Simulated { delay } => Arc::new(SimulatedAuthenticator::new(delay)),
        LoginMode::Remote => Arc::new(AuthClient::new(config)?),
    })
}
