//! CLI for agency onboarding.
//!
//! Runs inside a GitHub Actions job triggered by `workflow_dispatch`: creates
//! the onboarding epic with its sub-issues and opens a draft PR adding the
//! agency to the adoption table.

use agency_onboarding::{
    AdoptionStatus, AgencyError, AgencyInput, RepoContext, RunSummary, Runner, RunnerConfig,
    RunnerError,
};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Agency Onboarding - Create the onboarding epic and adoption table PR for a transit agency.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding onboarding.toml and the issue templates.
    #[arg(long, default_value = ".github/workflows/agency-onboarding")]
    assets_path: PathBuf,

    /// Repository to create the issues and PR in, as owner/name.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: RepoContext,

    /// GitHub token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: String,

    /// workflow_dispatch event payload; read when an agency field is not given explicitly.
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Agency full name.
    #[arg(long)]
    long_name: Option<String>,

    /// Agency short name, used in titles and the branch name.
    #[arg(long)]
    short_name: Option<String>,

    /// Transit processor.
    #[arg(long)]
    transit_processor: Option<String>,

    /// Agency website.
    #[arg(long)]
    website: Option<String>,

    /// Target launch date, e.g. "March 2026".
    #[arg(long)]
    launch_date: Option<String>,

    /// Initiative issue number to attach the epic under.
    #[arg(long)]
    initiative_issue: Option<u64>,

    /// Preview without creating issues or PRs.
    #[arg(long)]
    dry_run: bool,

    /// Do not update the adoption table.
    #[arg(long)]
    skip_adoption_table: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            if let Some(summary) = e.partial_summary() {
                print_summary(summary);
            }
            println!("::error::{e}");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Uses compact single-line output. The level is taken from `RUST_LOG`,
/// defaulting to "info".
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let agency = agency_input(&args)?;
    let config = RunnerConfig::new(args.assets_path, args.token, args.repository, args.dry_run)
        .with_skip_adoption_table(args.skip_adoption_table);
    let runner = Runner::new(config)?;
    runner.run(&agency).await
}

/// Builds the agency from explicit flags, falling back to the event payload.
///
/// The payload is only read when one of the required fields is missing.
fn agency_input(args: &Args) -> Result<AgencyInput, AgencyError> {
    let explicit_only =
        args.long_name.is_some() && args.short_name.is_some() && args.transit_processor.is_some();
    let event = match (&args.event_path, explicit_only) {
        (Some(path), false) => Some(AgencyInput::from_event_file(path)?),
        _ => None,
    };
    let event = event.as_ref();

    let pick = |explicit: &Option<String>, from_event: Option<&str>| {
        explicit
            .clone()
            .or_else(|| from_event.map(str::to_string))
            .unwrap_or_default()
    };

    let mut agency = AgencyInput::new(
        pick(&args.long_name, event.map(AgencyInput::long_name)),
        pick(&args.short_name, event.map(AgencyInput::short_name)),
        pick(&args.transit_processor, event.map(AgencyInput::transit_processor)),
    );
    agency = agency
        .with_website(pick(&args.website, event.and_then(AgencyInput::website)))
        .with_launch_date(pick(&args.launch_date, event.and_then(AgencyInput::launch_date)));
    if let Some(number) = args
        .initiative_issue
        .or_else(|| event.and_then(AgencyInput::initiative_issue))
    {
        agency = agency.with_initiative_issue(number);
    }

    Ok(agency)
}

/// Prints the final run summary.
///
/// Link failures and child failures are also emitted as workflow annotations.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );

    if !summary.dry_run {
        if let Some(epic) = summary.epic_number {
            println!("  Epic: #{epic}");
        }
        println!("  Issues created: {}", summary.issue_numbers.len());
        println!("  Child issues created: {}", summary.children_created);
        println!("  Child issues failed: {}", summary.children_failed.len());
        println!("  Link warnings: {}", summary.link_warnings.len());
    }

    match &summary.adoption {
        AdoptionStatus::Published { number, url, .. } => {
            println!("  Adoption table PR: #{number} ({url})");
        }
        AdoptionStatus::Skipped { reason } => println!("  Adoption table: skipped ({reason})"),
        AdoptionStatus::Failed { .. } => println!("  Adoption table: failed"),
        AdoptionStatus::Previewed { .. } => println!("  Adoption table: previewed"),
    }

    for warning in &summary.link_warnings {
        println!("::warning::{warning}");
    }
    for failure in &summary.children_failed {
        println!("::error::Failed to create '{}': {}", failure.title, failure.error);
    }
}
