//! Publication error types.

use crate::tracker::TrackerError;
use std::fmt;
use thiserror::Error;

/// The pipeline step that was running when publication failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationStep {
    /// Reading the base branch head commit.
    ReadBaseHead,
    /// Creating the working branch.
    CreateBranch,
    /// Reading the document's content hash on the new branch.
    ReadFile,
    /// Committing the updated document.
    CommitFile,
    /// Opening the draft pull request.
    OpenPullRequest,
}

impl PublicationStep {
    /// Returns the step as a string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReadBaseHead => "read base branch head",
            Self::CreateBranch => "create branch",
            Self::ReadFile => "read file",
            Self::CommitFile => "commit file",
            Self::OpenPullRequest => "open pull request",
        }
    }
}

impl fmt::Display for PublicationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication stopped at `step`; later steps did not run.
#[derive(Debug, Error)]
#[error("Publication failed at step '{step}': {source}")]
pub struct PublicationError {
    /// Step that failed.
    pub step: PublicationStep,

    /// Tracker failure.
    #[source]
    pub source: TrackerError,
}

impl PublicationError {
    pub(crate) fn at(step: PublicationStep) -> impl FnOnce(TrackerError) -> Self {
        move |source| Self { step, source }
    }
}
