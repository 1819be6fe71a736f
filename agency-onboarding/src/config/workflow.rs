//! Workflow configuration deserialization and validation.

use crate::adoption::DEFAULT_TABLE_MARKER;
use crate::config::ConfigError;
use crate::epic::EpicPlan;
use crate::templates::is_plain_file_name;
use serde::Deserialize;
use std::path::Path;

/// Where the adoption table lives and how its change is published.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AdoptionSettings {
    /// Path of the adoption document in the repository.
    #[serde(default = "default_document_path")]
    pub document_path: String,

    /// Text identifying the heading above the table.
    #[serde(default = "default_table_marker")]
    pub table_marker: String,

    /// Branch the document is read from and the PR targets.
    #[serde(default = "default_base_branch")]
    pub base_branch: String,
}

impl Default for AdoptionSettings {
    fn default() -> Self {
        Self {
            document_path: default_document_path(),
            table_marker: default_table_marker(),
            base_branch: default_base_branch(),
        }
    }
}

fn default_document_path() -> String {
    "docs/index.md".to_string()
}

fn default_table_marker() -> String {
    DEFAULT_TABLE_MARKER.to_string()
}

fn default_base_branch() -> String {
    "main".to_string()
}

/// Parsed `onboarding.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WorkflowConfig {
    /// Epic templates, labels and children.
    #[serde(default)]
    pub epic: EpicPlan,

    /// Adoption table settings.
    #[serde(default)]
    pub adoption: AdoptionSettings,
}

impl WorkflowConfig {
    /// Checks values the type system cannot.
    ///
    /// `path` is only used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKey`] naming the first invalid key.
    pub fn validate(&self, path: &Path) -> Result<(), ConfigError> {
        let invalid = |key: String, message: String| ConfigError::InvalidKey {
            path: path.to_path_buf(),
            key,
            message,
        };

        if !is_plain_file_name(&self.epic.parent_template) {
            return Err(invalid(
                "epic.parent-template".to_string(),
                format!("must be a file name, got '{}'", self.epic.parent_template),
            ));
        }

        for (key, labels) in [
            ("epic.labels", &self.epic.labels),
            ("epic.child-labels", &self.epic.child_labels),
        ] {
            if labels.is_empty() || labels.iter().any(|l| l.trim().is_empty()) {
                return Err(invalid(
                    key.to_string(),
                    "must be a non-empty list of labels".to_string(),
                ));
            }
        }

        for (index, child) in self.epic.children.iter().enumerate() {
            if !is_plain_file_name(&child.template) {
                return Err(invalid(
                    format!("epic.children[{index}].template"),
                    format!("must be a file name, got '{}'", child.template),
                ));
            }
            if child.title.trim().is_empty() {
                return Err(invalid(
                    format!("epic.children[{index}].title"),
                    "must not be empty".to_string(),
                ));
            }
        }

        for (key, value) in [
            ("adoption.document-path", &self.adoption.document_path),
            ("adoption.table-marker", &self.adoption.table_marker),
            ("adoption.base-branch", &self.adoption.base_branch),
        ] {
            if value.trim().is_empty() {
                return Err(invalid(key.to_string(), "must not be empty".to_string()));
            }
        }

        Ok(())
    }
}
