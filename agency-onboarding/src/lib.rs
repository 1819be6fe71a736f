#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod adoption;
pub mod agency;
pub mod config;
pub mod epic;
pub mod issues;
pub mod publication;
pub mod runner;
pub mod summary;
pub mod templates;
pub mod tracker;

pub use adoption::{
    contains_agency, insert_adoption_row, normalize_launch_date, AdoptionRow, AdoptionUpdate,
    TableMutation,
};
pub use agency::{AgencyError, AgencyInput};
pub use config::{load_workflow_config, AdoptionSettings, ConfigError, WorkflowConfig};
pub use epic::{create_epic, ChildIssueDefinition, EpicError, EpicOutcome, EpicPlan};
pub use issues::{create_issue, link_sub_issue, IssueError, LinkOutcome, LinkWarning};
pub use publication::{
    publish, AdoptionStatus, PublicationError, PublicationRequest, PublicationStep,
    PublishedChange,
};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{ChildFailure, RunSummary};
pub use templates::{
    create_handlebars_registry, generate_branch_name, generate_child_title,
    generate_commit_message, generate_epic_title, generate_pr_body, generate_pr_title,
    TemplateError, TemplateRenderer,
};
pub use tracker::{InMemoryTracker, OctocrabTracker, RepoContext, Tracker, TrackerError};
