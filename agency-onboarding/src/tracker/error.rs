//! Issue tracker error types.

use thiserror::Error;

/// Errors returned by [`Tracker`](super::Tracker) implementations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// GitHub answered with an error response.
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Client-side failure talking to GitHub (transport, decoding, setup).
    #[error("GitHub client error: {0}")]
    GitHubError(octocrab::Error),

    /// The GraphQL endpoint answered with an `errors` array.
    #[error("GraphQL error: {message}")]
    GraphQlError { message: String },

    /// The branch to create already exists.
    #[error("Branch '{branch}' already exists")]
    BranchAlreadyExists { branch: String },

    /// The tracker answered, but not with what the operation needs.
    #[error("Unexpected response from {operation}: {message}")]
    UnexpectedResponse {
        operation: &'static str,
        message: String,
    },
}

impl TrackerError {
    /// Returns true for a 422 saying the created object already exists.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Self::Api { status: 422, message } if message.to_lowercase().contains("already exists")
        )
    }
}

impl From<octocrab::Error> for TrackerError {
    fn from(error: octocrab::Error) -> Self {
        match error {
            octocrab::Error::GitHub { source, .. } => {
                let status = source.status_code.as_u16();
                // Validation failures carry the useful text in `errors`.
                let details: Vec<String> = source
                    .errors
                    .iter()
                    .flatten()
                    .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
                    .map(str::to_string)
                    .collect();
                let message = if details.is_empty() {
                    source.message
                } else {
                    format!("{}: {}", source.message, details.join("; "))
                };

                Self::Api { status, message }
            }
            other => Self::GitHubError(other),
        }
    }
}
