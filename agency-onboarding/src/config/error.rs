//! Errors raised while loading `onboarding.toml`.

use std::path::PathBuf;
use thiserror::Error;

/// Why the workflow configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The asset directory has no `onboarding.toml`.
    #[error("No onboarding.toml in asset directory '{}'", assets_path.display())]
    NotFound { assets_path: PathBuf },

    /// `onboarding.toml` exists but could not be read.
    #[error("Cannot read '{}': {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `onboarding.toml` is not valid TOML or has keys of the wrong type.
    #[error("Cannot parse '{}': {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    /// A key parsed but holds an unusable value.
    #[error("Invalid `{key}` in '{}': {message}", path.display())]
    InvalidKey {
        path: PathBuf,
        key: String,
        message: String,
    },
}
