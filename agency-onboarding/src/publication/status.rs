//! Adoption table update status.

use serde::Serialize;

/// What happened to the adoption table during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdoptionStatus {
    /// The draft pull request was opened.
    Published {
        /// PR number.
        number: u64,
        /// PR URL.
        url: String,
        /// Branch holding the change.
        branch: String,
    },

    /// Nothing was published.
    Skipped {
        /// Reason for skipping.
        reason: String,
    },

    /// Publishing was attempted and failed after the issues were created.
    Failed {
        /// Error message.
        error: String,
    },

    /// A dry run computed the row without publishing it.
    Previewed {
        /// Row that would be inserted.
        row: String,
    },
}

impl AdoptionStatus {
    /// Creates a skipped status.
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Returns the status as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Published { .. } => "published",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
            Self::Previewed { .. } => "previewed",
        }
    }

    /// Returns the PR URL if published.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Published { url, .. } => Some(url),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_adoption_status_to_string() {
        let published = AdoptionStatus::Published {
            number: 7,
            url: "https://github.com/cal-itp/benefits/pull/7".to_string(),
            branch: "docs/update-adoption-table-mst".to_string(),
        };
        assert_eq!(published.as_str(), "published");
        assert_eq!(published.url(), Some("https://github.com/cal-itp/benefits/pull/7"));

        let skipped = AdoptionStatus::skipped("already listed");
        assert_eq!(skipped.as_str(), "skipped");
        assert_eq!(skipped.url(), None);

        let failed = AdoptionStatus::Failed {
            error: "Branch 'docs/update-adoption-table-mst' already exists".to_string(),
        };
        assert_eq!(failed.as_str(), "failed");
        assert_eq!(failed.url(), None);

        assert_eq!(
            AdoptionStatus::Previewed {
                row: String::new()
            }
            .as_str(),
            "previewed"
        );
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(AdoptionStatus::skipped("table not found")).unwrap();
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["reason"], "table not found");
    }
}
