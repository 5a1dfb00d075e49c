//! Error types for the service layer.

use thiserror::Error;

/// Errors that can occur while talking to storage or analysis services.
#[derive(Error, Debug)]
pub enum CloudError {
    /// The requested object does not exist.
    #[error("object not found: {0}")]
    NotFound(String),

    /// A service request failed (unavailable, throttled, rejected input, unauthorized).
    #[error("{operation} failed: {message}")]
    Request {
        operation: &'static str,
        message: String,
    },

    /// The service answered with something we could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// I/O error when reading or writing local files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CloudError {
    /// Wrap any displayable service error as a failed request.
    pub fn request(operation: &'static str, err: impl std::fmt::Display) -> Self {
        CloudError::Request {
            operation,
            message: err.to_string(),
        }
    }
}
