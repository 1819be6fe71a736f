use std::path::PathBuf;

use agency_onboarding::tracker::{Operation, TrackerCall};
use agency_onboarding::{
    load_workflow_config, AdoptionStatus, AgencyInput, InMemoryTracker, RepoContext, Runner,
    RunnerConfig, RunnerError, TemplateRenderer,
};

const DOCUMENT_PATH: &str = "docs/index.md";

fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn document() -> String {
    std::fs::read_to_string(fixtures_root().join("docs/index.md")).unwrap()
}

fn runner(tracker: InMemoryTracker) -> Runner<InMemoryTracker> {
    let config = RunnerConfig::new(
        fixtures_root().join("assets"),
        "token".to_string(),
        RepoContext::new("cal-itp", "benefits"),
        false,
    );
    Runner::with_tracker(config, tracker)
}

fn event_agency() -> AgencyInput {
    AgencyInput::from_event_file(&fixtures_root().join("event.json")).unwrap()
}

#[test]
fn reads_agency_from_event_fixture() {
    let agency = event_agency();

    assert_eq!(agency.long_name(), "Santa Barbara Metropolitan Transit District");
    assert_eq!(agency.short_name(), "SBMTD");
    assert_eq!(agency.transit_processor(), "Littlepay");
    assert_eq!(agency.website(), Some("https://sbmtd.gov"));
    assert_eq!(agency.launch_date(), Some("March 2026"));
    assert_eq!(agency.initiative_issue(), None);
    assert!(agency.validate().is_ok());
}

#[tokio::test]
async fn onboards_agency_end_to_end() {
    let runner = runner(InMemoryTracker::new().with_file(DOCUMENT_PATH, document()));

    let summary = runner.run(&event_agency()).await.unwrap();

    assert_eq!(summary.issue_numbers, vec![1, 2, 3]);
    assert_eq!(summary.children_created, 2);
    assert!(summary.link_warnings.is_empty());
    assert!(!summary.has_failures());

    let tracker = runner.tracker();
    let issues = tracker.issues();
    assert_eq!(
        issues[0].1.title,
        "Agency onboarding: Santa Barbara Metropolitan Transit District"
    );
    assert_eq!(
        issues[0].1.body.trim(),
        "Onboarding Santa Barbara Metropolitan Transit District (SBMTD) with Littlepay.\nWebsite: https://sbmtd.gov\nLaunch: March 2026"
    );
    assert_eq!(issues[1].1.title, "SBMTD: Configure transit processor");
    assert_eq!(issues[2].1.title, "SBMTD: Launch");
    assert_eq!(
        tracker.sub_issues(),
        vec![
            ("I_1".to_string(), "I_2".to_string()),
            ("I_1".to_string(), "I_3".to_string()),
        ]
    );

    let prs = tracker.pull_requests();
    assert_eq!(prs.len(), 1);
    assert!(prs[0].draft);
    assert_eq!(prs[0].head, "docs/update-adoption-table-sbmtd");
    assert_eq!(prs[0].base, "main");
    assert_eq!(
        prs[0].title,
        "Docs: Add Santa Barbara Metropolitan Transit District to adoption table"
    );
    assert!(prs[0].body.ends_with("Part of onboarding epic #1."));

    match &summary.adoption {
        AdoptionStatus::Published { number, branch, .. } => {
            assert_eq!(*number, 4);
            assert_eq!(branch, "docs/update-adoption-table-sbmtd");
        }
        other => panic!("unexpected adoption status: {other:?}"),
    }

    let original = document();
    let updated = tracker.file(DOCUMENT_PATH).unwrap();
    let original_lines: Vec<&str> = original.lines().collect();
    let updated_lines: Vec<&str> = updated.lines().collect();
    assert_eq!(updated_lines.len(), original_lines.len() + 1);
    assert_eq!(updated_lines[..10], original_lines[..10]);
    assert_eq!(updated_lines[11..], original_lines[10..]);
    assert_eq!(
        updated_lines[10],
        "| **Santa Barbara Metropolitan Transit District**     | 3/2026 (target)   | \\*           | \\*                   | \\*            | \\*          | \\*         |"
    );
}

#[tokio::test]
async fn rerun_for_listed_agency_skips_publication() {
    let agency = AgencyInput::new("Monterey-Salinas Transit", "MST", "Littlepay");
    let runner = runner(InMemoryTracker::new().with_file(DOCUMENT_PATH, document()));

    let summary = runner.run(&agency).await.unwrap();

    assert_eq!(summary.adoption, AdoptionStatus::skipped("already listed"));
    assert_eq!(runner.tracker().count(Operation::CreateBranch), 0);
    assert_eq!(runner.tracker().file(DOCUMENT_PATH), Some(document()));
}

#[tokio::test]
async fn link_failures_are_warnings() {
    let tracker = InMemoryTracker::new().with_file(DOCUMENT_PATH, document());
    tracker.fail_on(Operation::AddSubIssue);
    let runner = runner(tracker);

    let summary = runner.run(&event_agency()).await.unwrap();

    assert_eq!(summary.issue_numbers.len(), 3);
    assert_eq!(summary.link_warnings.len(), 2);
    assert!(!summary.has_failures());
    assert_eq!(summary.adoption.as_str(), "published");
}

#[tokio::test]
async fn initiative_is_linked_as_parent_of_epic() {
    let tracker = InMemoryTracker::new().with_file(DOCUMENT_PATH, document());
    let initiative = tracker.seed_issue("Agency onboarding initiative");
    let runner = runner(tracker);
    let agency = event_agency().with_initiative_issue(initiative.number);

    let summary = runner.run(&agency).await.unwrap();

    let epic = summary.epic_number.unwrap();
    assert_eq!(
        runner.tracker().calls()[1],
        TrackerCall::GetIssue {
            number: initiative.number
        }
    );
    assert_eq!(
        runner.tracker().sub_issues()[0],
        (initiative.node_id, format!("I_{epic}"))
    );
}

#[tokio::test]
async fn existing_branch_is_fatal() {
    let tracker = InMemoryTracker::new().with_file(DOCUMENT_PATH, document());
    tracker.seed_branch("docs/update-adoption-table-sbmtd");
    let runner = runner(tracker);

    let result = runner.run(&event_agency()).await;

    let err = result.unwrap_err();
    match &err {
        RunnerError::AdoptionFailed { source, .. } => {
            assert!(matches!(**source, RunnerError::Publication(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
    let summary = err.partial_summary().unwrap();
    assert_eq!(summary.epic_number, Some(1));
    assert_eq!(summary.issue_numbers.len(), 3);
    assert_eq!(summary.adoption.as_str(), "failed");
    assert_eq!(runner.tracker().count(Operation::CreateIssue), 3);
    assert!(runner.tracker().pull_requests().is_empty());
}

#[tokio::test]
async fn missing_table_skips_publication() {
    let tracker = InMemoryTracker::new().with_file(DOCUMENT_PATH, "# Benefits\n\nNo table yet.\n");
    let runner = runner(tracker);

    let summary = runner.run(&event_agency()).await.unwrap();

    assert_eq!(summary.adoption, AdoptionStatus::skipped("table not found"));
    assert_eq!(runner.tracker().count(Operation::CreateBranch), 0);
}

#[test]
fn shipped_assets_render() {
    let assets = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets");
    let config = load_workflow_config(&assets).unwrap();
    let renderer = TemplateRenderer::new(&assets);
    let agency = event_agency();

    assert!(!config.epic.children.is_empty());
    let parent = renderer.render(&config.epic.parent_template, &agency).unwrap();
    assert!(parent.contains("| Website           | https://sbmtd.gov"));
    for child in &config.epic.children {
        let body = renderer.render(&child.template, &agency).unwrap();
        assert!(!body.contains("{{"), "{} left a placeholder", child.template);
    }
}
