//! Issue tracker port.
//!
//! Every external call the onboarding workflow makes goes through the
//! [`Tracker`] trait. [`OctocrabTracker`] talks to GitHub; [`InMemoryTracker`]
//! keeps state in memory, records each call and can be told to fail specific
//! operations.

mod error;
pub mod memory;
mod github;
mod types;

pub use github::OctocrabTracker;
pub use error::TrackerError;
pub use memory::{InMemoryTracker, Operation, TrackerCall};
pub use types::{
    CreatedIssue, CreatedPullRequest, FileContent, FileUpdate, InvalidRepository, NewIssue,
    NewPullRequest, RepoContext,
};

use async_trait::async_trait;

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// The issue tracker surface consumed by the onboarding workflow.
#[async_trait]
pub trait Tracker: Send + Sync {
    /// Creates an issue and returns its identifiers.
    async fn create_issue(&self, repo: &RepoContext, issue: &NewIssue)
        -> TrackerResult<CreatedIssue>;

    /// Looks up an existing issue by number.
    async fn get_issue(&self, repo: &RepoContext, number: u64) -> TrackerResult<CreatedIssue>;

    /// Records `child_node_id` as a sub-issue of `parent_node_id`.
    ///
    /// Returns the parent node id echoed back by the tracker.
    async fn add_sub_issue(&self, parent_node_id: &str, child_node_id: &str)
        -> TrackerResult<String>;

    /// Returns the commit id the branch currently points at.
    async fn get_branch_head(&self, repo: &RepoContext, branch: &str) -> TrackerResult<String>;

    /// Creates `branch` pointing at commit `sha`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::BranchAlreadyExists`] when the branch exists.
    async fn create_branch(&self, repo: &RepoContext, branch: &str, sha: &str)
        -> TrackerResult<()>;

    /// Reads a file as stored on `reference`.
    async fn get_file(
        &self,
        repo: &RepoContext,
        path: &str,
        reference: &str,
    ) -> TrackerResult<FileContent>;

    /// Commits new content for a file, guarded by its current blob hash.
    async fn update_file(&self, repo: &RepoContext, update: &FileUpdate) -> TrackerResult<()>;

    /// Opens a pull request.
    async fn create_pull_request(
        &self,
        repo: &RepoContext,
        pull_request: &NewPullRequest,
    ) -> TrackerResult<CreatedPullRequest>;
}
