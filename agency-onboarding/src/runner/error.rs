//! Runner error types.

use crate::summary::RunSummary;

/// Errors that stop an onboarding run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Workflow configuration errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// Invalid agency input.
    #[error(transparent)]
    Agency(#[from] crate::agency::AgencyError),

    /// Tracker client errors outside the epic and publication steps.
    #[error(transparent)]
    Tracker(#[from] crate::tracker::TrackerError),

    /// The epic issue could not be created.
    #[error(transparent)]
    Epic(#[from] crate::epic::EpicError),

    /// The adoption table change could not be published.
    #[error(transparent)]
    Publication(#[from] crate::publication::PublicationError),

    /// The issues exist but the adoption table step failed.
    #[error("Epic #{epic} created, adoption table update failed: {source}")]
    AdoptionFailed {
        epic: u64,
        /// Everything recorded before the failure.
        summary: Box<RunSummary>,
        #[source]
        source: Box<RunnerError>,
    },
}

impl RunnerError {
    /// Returns what the run had done before failing, if it got past the epic.
    #[must_use]
    pub fn partial_summary(&self) -> Option<&RunSummary> {
        match self {
            Self::AdoptionFailed { summary, .. } => Some(&**summary),
            _ => None,
        }
    }
}
