//! Error types for backend calls.

use thiserror::Error;

/// Failure of a call to the document backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The request could not be sent or the response not read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid backend URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The backend answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message from the error body, or a generic fallback.
        message: String,
    },

    /// Any other failure, used by non-HTTP backends.
    #[error("Backend error: {0}")]
    Other(String),
}

impl BackendError {
    /// HTTP status when the backend answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, BackendError>;
