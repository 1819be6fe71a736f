//! Epic orchestration results.

use crate::issues::{LinkOutcome, LinkWarning};
use crate::tracker::CreatedIssue;
use serde::Serialize;

/// What happened to one child definition.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChildResult {
    /// The issue exists; the link may or may not.
    Created {
        /// The created issue.
        issue: CreatedIssue,
        /// Outcome of linking it under the epic.
        link: LinkOutcome,
    },

    /// Rendering or creation failed; nothing exists for this child.
    Failed {
        /// Error message.
        error: String,
    },
}

/// A child definition with its result.
#[derive(Debug, Clone, Serialize)]
pub struct ChildOutcome {
    /// Title the child was (or would have been) created with.
    pub title: String,

    /// What happened.
    pub result: ChildResult,
}

/// Everything the epic orchestrator created.
#[derive(Debug, Clone, Serialize)]
pub struct EpicOutcome {
    /// The epic issue.
    pub epic: CreatedIssue,

    /// Outcome of attaching the epic under the initiative, if one was given.
    pub initiative_link: Option<LinkOutcome>,

    /// One entry per child definition, in input order.
    pub children: Vec<ChildOutcome>,
}

impl EpicOutcome {
    /// Numbers of every created issue, epic first.
    #[must_use]
    pub fn issue_numbers(&self) -> Vec<u64> {
        std::iter::once(self.epic.number)
            .chain(self.created_children().map(|issue| issue.number))
            .collect()
    }

    /// The child issues that were created.
    pub fn created_children(&self) -> impl Iterator<Item = &CreatedIssue> {
        self.children.iter().filter_map(|child| match &child.result {
            ChildResult::Created { issue, .. } => Some(issue),
            ChildResult::Failed { .. } => None,
        })
    }

    /// Every link that could not be recorded, initiative first.
    #[must_use]
    pub fn warnings(&self) -> Vec<&LinkWarning> {
        let initiative = self.initiative_link.iter().filter_map(LinkOutcome::warning);
        let children = self.children.iter().filter_map(|child| match &child.result {
            ChildResult::Created { link, .. } => link.warning(),
            ChildResult::Failed { .. } => None,
        });
        initiative.chain(children).collect()
    }

    /// Number of child definitions that produced no issue.
    #[must_use]
    pub fn failed_children(&self) -> usize {
        self.children
            .iter()
            .filter(|child| matches!(child.result, ChildResult::Failed { .. }))
            .count()
    }
}
