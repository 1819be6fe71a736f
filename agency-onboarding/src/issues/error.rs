//! Issue creation error types.

use crate::tracker::TrackerError;
use thiserror::Error;

/// Errors that can occur during issue operations.
#[derive(Debug, Error)]
pub enum IssueError {
    /// Tracker API error.
    #[error(transparent)]
    Tracker(#[from] TrackerError),

    /// An issue must carry at least one label.
    #[error("Issue '{title}' has no labels")]
    EmptyLabels { title: String },
}
