//! Run summary types.

use crate::epic::{ChildResult, EpicOutcome};
use crate::issues::LinkWarning;
use crate::publication::AdoptionStatus;
use serde::Serialize;

/// A child definition that produced no issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildFailure {
    /// Title the child would have had.
    pub title: String,

    /// Error message.
    pub error: String,
}

/// Summary of a complete run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Whether this was a dry run.
    pub dry_run: bool,

    /// Number of the epic issue, once created.
    pub epic_number: Option<u64>,

    /// Numbers of every created issue, epic first.
    pub issue_numbers: Vec<u64>,

    /// Number of child issues created.
    pub children_created: usize,

    /// Child definitions that failed.
    pub children_failed: Vec<ChildFailure>,

    /// Links that could not be recorded.
    pub link_warnings: Vec<LinkWarning>,

    /// What happened to the adoption table.
    pub adoption: AdoptionStatus,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            epic_number: None,
            issue_numbers: Vec::new(),
            children_created: 0,
            children_failed: Vec::new(),
            link_warnings: Vec::new(),
            adoption: AdoptionStatus::skipped("not attempted"),
        }
    }

    /// Records what the epic orchestrator created.
    pub fn record_epic(&mut self, outcome: &EpicOutcome) {
        self.epic_number = Some(outcome.epic.number);
        self.issue_numbers = outcome.issue_numbers();
        self.link_warnings = outcome.warnings().into_iter().cloned().collect();

        for child in &outcome.children {
            match &child.result {
                ChildResult::Created { .. } => self.children_created += 1,
                ChildResult::Failed { error } => self.children_failed.push(ChildFailure {
                    title: child.title.clone(),
                    error: error.clone(),
                }),
            }
        }
    }

    /// Returns true if any child issue failed.
    ///
    /// Link warnings are not failures.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.children_failed.is_empty()
    }
}
