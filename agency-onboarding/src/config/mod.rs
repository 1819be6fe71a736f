//! Workflow configuration loading.
//!
//! The asset directory holds `onboarding.toml` next to the issue templates.
//! Every key is optional; the defaults describe the standard onboarding epic
//! without children.

mod error;
mod workflow;

pub use error::ConfigError;
pub use workflow::{AdoptionSettings, WorkflowConfig};

use std::path::Path;
use tracing::{debug, info};

/// Name of the configuration file inside the asset directory.
pub const CONFIG_FILE_NAME: &str = "onboarding.toml";

/// Loads and validates `onboarding.toml` from the asset directory.
///
/// # Arguments
///
/// * `assets_path` - Directory holding the configuration and templates
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if the file does not exist, or another
/// [`ConfigError`] if it cannot be read, parsed or validated.
pub fn load_workflow_config(assets_path: &Path) -> Result<WorkflowConfig, ConfigError> {
    let path = assets_path.join(CONFIG_FILE_NAME);
    debug!(path = %path.display(), "Loading workflow configuration");

    if !path.is_file() {
        return Err(ConfigError::NotFound {
            assets_path: assets_path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Unreadable {
        path: path.clone(),
        source: e,
    })?;

    let config: WorkflowConfig = toml::from_str(&content).map_err(|e| ConfigError::Malformed {
        path: path.clone(),
        source: Box::new(e),
    })?;

    config.validate(&path)?;

    info!(
        children = config.epic.children.len(),
        document = %config.adoption.document_path,
        "Loaded workflow configuration"
    );
    Ok(config)
}
