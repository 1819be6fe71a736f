//! What the epic and its sub-issues are built from.

use serde::Deserialize;

/// One sub-issue to create under the epic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChildIssueDefinition {
    /// Template file name in the asset directory.
    pub template: String,

    /// Title, prefixed with the agency short name at creation.
    pub title: String,
}

impl ChildIssueDefinition {
    /// Creates a definition.
    pub fn new(template: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            title: title.into(),
        }
    }
}

/// Templates, labels and children for one epic.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EpicPlan {
    /// Template file name for the epic body.
    #[serde(default = "default_parent_template")]
    pub parent_template: String,

    /// Labels applied to the epic.
    #[serde(default = "default_epic_labels")]
    pub labels: Vec<String>,

    /// Labels applied to every child.
    #[serde(default = "default_child_labels")]
    pub child_labels: Vec<String>,

    /// Children, created in this order.
    #[serde(default)]
    pub children: Vec<ChildIssueDefinition>,
}

impl Default for EpicPlan {
    fn default() -> Self {
        Self {
            parent_template: default_parent_template(),
            labels: default_epic_labels(),
            child_labels: default_child_labels(),
            children: Vec::new(),
        }
    }
}

impl EpicPlan {
    /// Replaces the child definitions.
    #[must_use]
    pub fn with_children(mut self, children: Vec<ChildIssueDefinition>) -> Self {
        self.children = children;
        self
    }
}

fn default_parent_template() -> String {
    "parent.md".to_string()
}

fn default_epic_labels() -> Vec<String> {
    vec!["epic".to_string(), "agency-onboarding".to_string()]
}

fn default_child_labels() -> Vec<String> {
    vec!["agency-onboarding".to_string()]
}
