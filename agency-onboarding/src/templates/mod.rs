//! Template rendering using Handlebars.
//!
//! Issue bodies are read from the asset directory and filled with the agency's
//! fields. The titles, branch name, commit message and PR text are fixed
//! formats and are generated here as well.

mod error;
mod renderer;

pub use error::TemplateError;
pub(crate) use renderer::is_plain_file_name;
pub use renderer::{
    create_handlebars_registry, TemplateRenderer, LAUNCH_DATE_FALLBACK, WEBSITE_FALLBACK,
};

use crate::agency::AgencyInput;

/// Generates the epic issue title.
///
/// Format: "Agency onboarding: {long_name}"
#[must_use]
pub fn generate_epic_title(agency: &AgencyInput) -> String {
    format!("Agency onboarding: {}", agency.long_name())
}

/// Generates a child issue title.
///
/// Format: "{short_name}: {title}"
#[must_use]
pub fn generate_child_title(agency: &AgencyInput, title: &str) -> String {
    format!("{}: {}", agency.short_name(), title)
}

/// Generates the branch name for the adoption table PR.
///
/// Format: "docs/update-adoption-table-{short_name}", lower-cased.
#[must_use]
pub fn generate_branch_name(agency: &AgencyInput) -> String {
    format!(
        "docs/update-adoption-table-{}",
        agency.short_name().to_lowercase()
    )
}

/// Generates the commit message for the adoption table update.
#[must_use]
pub fn generate_commit_message(agency: &AgencyInput) -> String {
    format!(
        "docs(onboarding): add {} to adoption table",
        agency.long_name()
    )
}

/// Generates the adoption table PR title.
#[must_use]
pub fn generate_pr_title(agency: &AgencyInput) -> String {
    format!("Docs: Add {} to adoption table", agency.long_name())
}

/// Generates the adoption table PR body, linking back to the epic.
#[must_use]
pub fn generate_pr_body(agency: &AgencyInput, epic_number: u64) -> String {
    format!(
        "Adds **{}** to the adoption table in the docs.\n\nPart of onboarding epic #{}.",
        agency.long_name(),
        epic_number
    )
}
