//! Template renderer.

use crate::agency::AgencyInput;
use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Substituted for `{{WEBSITE}}` when the agency has no website.
pub const WEBSITE_FALLBACK: &str = "N/A";

/// Substituted for `{{LAUNCH_DATE}}` when no launch date was given.
pub const LAUNCH_DATE_FALLBACK: &str = "TBD";

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (an unknown placeholder is an error, never left in the output)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Disable HTML escaping for markdown output
    hbs.register_escape_fn(no_escape);

    // Enable strict mode to catch missing variables
    hbs.set_strict_mode(true);

    hbs
}

/// Renders issue body templates stored in the asset directory.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
    templates_dir: PathBuf,
}

impl TemplateRenderer {
    /// Creates a renderer resolving template names against `templates_dir`.
    #[must_use]
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            handlebars: create_handlebars_registry(),
            templates_dir: templates_dir.into(),
        }
    }

    /// Returns the directory template names are resolved against.
    #[must_use]
    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Loads the named template and fills it with the agency's fields.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::NotFound`](super::TemplateError::NotFound) if
    /// the template does not exist, or a render error if it references an
    /// unknown placeholder.
    pub fn render(
        &self,
        template_name: &str,
        agency: &AgencyInput,
    ) -> Result<String, super::TemplateError> {
        let template = self.load(template_name)?;
        self.render_template(&template, agency)
    }

    /// Fills template text with the agency's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is malformed or references an
    /// unknown placeholder.
    pub fn render_template(
        &self,
        template: &str,
        agency: &AgencyInput,
    ) -> Result<String, super::TemplateError> {
        let data = placeholder_values(agency);
        Ok(self.handlebars.render_template(template, &data)?)
    }

    /// Reads a template by file name.
    fn load(&self, template_name: &str) -> Result<String, super::TemplateError> {
        if !is_plain_file_name(template_name) {
            return Err(super::TemplateError::InvalidName {
                name: template_name.to_string(),
            });
        }

        let path = self.templates_dir.join(template_name);
        debug!(path = %path.display(), "Loading template");

        if !path.is_file() {
            return Err(super::TemplateError::NotFound {
                name: template_name.to_string(),
                path: path.display().to_string(),
            });
        }

        std::fs::read_to_string(&path).map_err(|e| super::TemplateError::IoError {
            path: path.display().to_string(),
            source: e,
        })
    }
}

/// Values for every recognized placeholder, fallbacks applied.
fn placeholder_values(agency: &AgencyInput) -> Value {
    json!({
        "LONG_NAME": agency.long_name(),
        "SHORT_NAME": agency.short_name(),
        "TRANSIT_PROCESSOR": agency.transit_processor(),
        "WEBSITE": agency.website().unwrap_or(WEBSITE_FALLBACK),
        "LAUNCH_DATE": agency.launch_date().unwrap_or(LAUNCH_DATE_FALLBACK),
    })
}

/// Returns true for names that stay inside the templates directory.
pub(crate) fn is_plain_file_name(name: &str) -> bool {
    !name.trim().is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
}
