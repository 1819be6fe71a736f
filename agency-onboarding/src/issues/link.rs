//! Outcome of a best-effort sub-issue link.

use serde::Serialize;
use std::fmt;

/// A link that could not be recorded.
///
/// The child issue exists regardless; only the relation is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkWarning {
    /// The intended parent, as a node id or `#number`.
    pub parent: String,

    /// The intended child, as a node id or `#number`.
    pub child: String,

    /// Why the link failed.
    pub message: String,
}

impl fmt::Display for LinkWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to link {} under {}: {}",
            self.child, self.parent, self.message
        )
    }
}

/// Result of linking a child issue under a parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LinkOutcome {
    /// The relation was recorded.
    Linked,

    /// The relation could not be recorded.
    Failed(LinkWarning),
}

impl LinkOutcome {
    /// Returns the warning if linking failed.
    #[must_use]
    pub fn warning(&self) -> Option<&LinkWarning> {
        match self {
            Self::Linked => None,
            Self::Failed(warning) => Some(warning),
        }
    }

    /// Returns true if the relation was recorded.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        matches!(self, Self::Linked)
    }
}
