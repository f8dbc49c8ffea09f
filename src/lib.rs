pub mod application;
pub mod auth;
pub mod config;
pub mod feedback;
pub mod form;
pub mod i18n;
pub mod prelude;

#[cfg(test)]
mod test_public_api;

pub use application::{AppError, BibliotechApp};
pub use config::{AuthConfig, ConfigError, LoginMode};
pub use i18n::{I18nManager, Locale};
