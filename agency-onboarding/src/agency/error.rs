//! Agency input error types.

use thiserror::Error;

/// Errors that can occur while reading or validating agency input.
#[derive(Debug, Error)]
pub enum AgencyError {
    /// Failed to read the event payload.
    #[error("Failed to read event payload '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse the event payload.
    #[error("Failed to parse event payload: {0}")]
    PayloadError(#[from] serde_json::Error),

    /// An input field is missing or malformed.
    #[error("Invalid '{field}': {message}")]
    ValidationError {
        field: &'static str,
        message: String,
    },
}
