//! Error types for route-picker
//!
//! Network-facing failures are split the same way the backend can fail us:
//! the request never completed, the server answered with a failing HTTP
//! status, the payload could not be decoded, or the payload decoded fine
//! but reported a non-success status.

use thiserror::Error;

use crate::core::session::TransitionError;

/// Main error type for route-picker operations
#[derive(Debug, Error)]
pub enum Error {
    /// Transport failure: connect, timeout or body read
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with a non-success HTTP status
    #[error("HTTP error: {status}")]
    Http { status: u16 },

    /// Response body did not match the expected shape
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Response decoded but carried a status other than "success"
    #[error("Backend reported status '{status}'")]
    Unsuccessful { status: String },

    /// Confirmation not offered in the current session state
    #[error(transparent)]
    Transition(#[from] TransitionError),

    /// Invalid configuration or parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures that come from talking to the backend
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Http { .. } | Error::Decode(_) | Error::Unsuccessful { .. }
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Error::Http {
                status: status.as_u16(),
            }
        } else if err.is_decode() {
            Error::Decode(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Decode(err.to_string())
    }
}

/// Convenience result type for route-picker operations
pub type Result<T> = std::result::Result<T, Error>;
