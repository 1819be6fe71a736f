//! Epic creation error types.

use crate::issues::IssueError;
use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that stop the epic from being created.
///
/// Child failures are not errors; they are reported in [`EpicOutcome`](super::EpicOutcome).
#[derive(Debug, Error)]
pub enum EpicError {
    /// The epic body could not be rendered.
    #[error("Failed to render epic body: {0}")]
    Template(#[from] TemplateError),

    /// The epic issue could not be created.
    #[error("Failed to create epic issue: {0}")]
    Issue(#[from] IssueError),
}
