//! The agency record an onboarding run is driven by.

use super::AgencyError;
use bstr::ByteSlice;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::debug;
use url::Url;

/// Fields describing the agency being onboarded.
///
/// Built once per run and never mutated; optional fields that arrive blank are
/// stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgencyInput {
    long_name: String,
    short_name: String,
    transit_processor: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    website: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    launch_date: Option<String>,
    #[serde(default, deserialize_with = "issue_reference")]
    initiative_issue: Option<u64>,
}

/// The `workflow_dispatch` event shape; only `inputs` is consumed.
#[derive(Debug, Deserialize)]
struct DispatchEvent {
    inputs: AgencyInput,
}

impl AgencyInput {
    /// Creates an input from the required fields.
    pub fn new(
        long_name: impl Into<String>,
        short_name: impl Into<String>,
        transit_processor: impl Into<String>,
    ) -> Self {
        Self {
            long_name: long_name.into(),
            short_name: short_name.into(),
            transit_processor: transit_processor.into(),
            website: None,
            launch_date: None,
            initiative_issue: None,
        }
    }

    /// Sets the agency website. Blank values are ignored.
    #[must_use]
    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = non_blank(website.into());
        self
    }

    /// Sets the free-text launch date. Blank values are ignored.
    #[must_use]
    pub fn with_launch_date(mut self, launch_date: impl Into<String>) -> Self {
        self.launch_date = non_blank(launch_date.into());
        self
    }

    /// Sets the initiative issue the epic is attached under.
    #[must_use]
    pub fn with_initiative_issue(mut self, number: u64) -> Self {
        self.initiative_issue = Some(number);
        self
    }

    /// Parses the `inputs` object of a `workflow_dispatch` event.
    ///
    /// # Errors
    ///
    /// Returns [`AgencyError::PayloadError`] if the JSON is malformed or a
    /// required input is absent.
    pub fn from_event_json(json: &str) -> Result<Self, AgencyError> {
        let event: DispatchEvent = serde_json::from_str(json)?;
        Ok(event.inputs)
    }

    /// Reads the event payload file GitHub Actions points `GITHUB_EVENT_PATH` at.
    ///
    /// # Errors
    ///
    /// Returns [`AgencyError`] if the file cannot be read or parsed.
    pub fn from_event_file(path: &Path) -> Result<Self, AgencyError> {
        debug!(path = %path.display(), "Reading event payload");
        let json = std::fs::read_to_string(path).map_err(|e| AgencyError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_event_json(&json)
    }

    /// Checks the input before anything is created.
    ///
    /// # Errors
    ///
    /// Returns [`AgencyError::ValidationError`] naming the offending field.
    pub fn validate(&self) -> Result<(), AgencyError> {
        require("long_name", &self.long_name)?;
        require("short_name", &self.short_name)?;
        require("transit_processor", &self.transit_processor)?;
        single_line("website", self.website.as_deref())?;
        single_line("launch_date", self.launch_date.as_deref())?;

        if let Some(website) = &self.website {
            if Url::parse(website).is_err() {
                return Err(AgencyError::ValidationError {
                    field: "website",
                    message: format!("not a valid URL: {website}"),
                });
            }
        }

        // The short name ends up in a branch name.
        let branch = crate::templates::generate_branch_name(self);
        let full_ref = format!("refs/heads/{branch}");
        if let Err(e) = gix_validate::reference::name(full_ref.as_bytes().as_bstr()) {
            return Err(AgencyError::ValidationError {
                field: "short_name",
                message: format!("'{branch}' is not a valid branch name: {e}"),
            });
        }

        Ok(())
    }

    /// Full agency name, e.g. "Monterey-Salinas Transit".
    #[must_use]
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    /// Short agency name, e.g. "MST".
    #[must_use]
    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    /// Name of the agency's transit processor.
    #[must_use]
    pub fn transit_processor(&self) -> &str {
        &self.transit_processor
    }

    /// Agency website, if supplied.
    #[must_use]
    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    /// Free-text launch date, if supplied.
    #[must_use]
    pub fn launch_date(&self) -> Option<&str> {
        self.launch_date.as_deref()
    }

    /// Initiative issue number, if supplied.
    #[must_use]
    pub fn initiative_issue(&self) -> Option<u64> {
        self.initiative_issue
    }
}

fn require(field: &'static str, value: &str) -> Result<(), AgencyError> {
    if value.trim().is_empty() {
        return Err(AgencyError::ValidationError {
            field,
            message: "must not be empty".to_string(),
        });
    }
    single_line(field, Some(value))
}

/// Values land in titles and a single table row, so no line breaks or other controls.
fn single_line(field: &'static str, value: Option<&str>) -> Result<(), AgencyError> {
    match value {
        Some(value) if value.chars().any(char::is_control) => Err(AgencyError::ValidationError {
            field,
            message: "must not contain line breaks or control characters".to_string(),
        }),
        _ => Ok(()),
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.and_then(non_blank))
}

/// Accepts `12`, `"12"`, `"#12"`, `""` or `null`.
fn issue_reference<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Reference {
        Number(u64),
        Text(String),
    }

    match Option::<Reference>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Reference::Number(n)) => Ok(Some(n)),
        Some(Reference::Text(text)) => {
            let trimmed = text.trim().trim_start_matches('#');
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed.parse().map(Some).map_err(|_| {
                serde::de::Error::custom(format!("invalid issue reference '{text}'"))
            })
        }
    }
}
