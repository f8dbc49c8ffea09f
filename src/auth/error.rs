//! Authentication boundary error types.

use crate::form::SubmitRejection;

/// Errors from the authentication API.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// HTTP transport error, or the client could not be built.
    #[error("HTTP error calling {endpoint}: {source}")]
    Http {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    /// The server answered with a non-2xx status.
    #[error("{endpoint} returned {status}")]
    Rejected {
        endpoint: &'static str,
        status: u16,
        /// `message` field of the JSON error body, when present.
        message: Option<String>,
    },
    /// A 2xx response body was not valid JSON.
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: &'static str,
        source: serde_json::Error,
    },
}

impl AuthError {
    /// Gives a rejection without a server message the text `fallback`.
    /// Transport and decode errors are returned unchanged.
    pub fn or_rejection_message(self, fallback: impl Into<String>) -> Self {
        match self {
            Self::Rejected {
                endpoint,
                status,
                message: None,
            } => Self::Rejected {
                endpoint,
                status,
                message: Some(fallback.into()),
            },
            other => other,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            Self::Http { source, .. } => source.status().map(|status| status.as_u16()),
            Self::Decode { .. } => None,
        }
    }
}

impl SubmitRejection for AuthError {
    fn message(&self) -> Option<String> {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            Self::Http { .. } | Self::Decode { .. } => None,
        }
    }
}
