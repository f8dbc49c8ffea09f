//! Login and registration: their forms, schemas, network boundary and the
//! screens that tie them to the form controller.

pub mod client;
pub mod error;
pub mod forms;
pub mod login;
pub mod screens;

pub use client::AuthClient;
pub use error::AuthError;
pub use forms::{
    LoginForm, MIN_PASSWORD_LEN, RegisterForm, login_notices, login_schema, register_notices,
    register_schema,
};
pub use login::{AuthFuture, Authenticator, SimulatedAuthenticator, authenticator_for};
pub use screens::{LoginScreen, RegisterScreen};
