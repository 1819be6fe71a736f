//! Runner configuration.

use crate::tracker::RepoContext;
use std::path::{Path, PathBuf};

/// Configuration for one onboarding run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Directory holding `onboarding.toml` and the issue templates.
    assets_path: PathBuf,
    /// GitHub token used for API calls.
    token: String,
    /// Repository receiving the issues and the PR.
    repository: RepoContext,
    /// Whether to preview without calling the tracker.
    dry_run: bool,
    /// Whether to leave the adoption table alone.
    skip_adoption_table: bool,
}

impl RunnerConfig {
    /// Creates a new configuration for a run.
    pub fn new(assets_path: PathBuf, token: String, repository: RepoContext, dry_run: bool) -> Self {
        Self {
            assets_path,
            token,
            repository,
            dry_run,
            skip_adoption_table: false,
        }
    }

    /// Skips the adoption table update.
    #[must_use]
    pub fn with_skip_adoption_table(mut self, skip: bool) -> Self {
        self.skip_adoption_table = skip;
        self
    }

    /// Returns the asset directory path.
    pub fn assets_path(&self) -> &Path {
        &self.assets_path
    }

    /// Returns the configured GitHub token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Returns the target repository.
    pub fn repository(&self) -> &RepoContext {
        &self.repository
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns whether the adoption table update is skipped.
    pub fn skip_adoption_table(&self) -> bool {
        self.skip_adoption_table
    }
}
