mod common;

use common::{
    issue, pr, release, repository, workflow_state, FakeIssueTracker, FakeReleaseSource,
};
use linear_release_sync::{
    DiscoveryError, LinearLabel, Runner, RunnerConfig, RunnerError, SyncMode,
};

const RELEASE_URL: &str = "https://github.com/acme/widgets/releases/tag/v2.0.0";

/// First release on main: body names #45 and #47, history holds both.
fn v2_source() -> FakeReleaseSource {
    FakeReleaseSource::new()
        .with_release(release(
            "v2.0.0",
            1,
            "main",
            Some("Fixes #45 and https://github.com/acme/widgets/pull/47"),
        ))
        .with_ancestry("v2.0.0", &["c47", "c45"])
        .with_commit("c45", &[pr(45)])
        .with_commit("c47", &[pr(47)])
}

fn config() -> RunnerConfig {
    RunnerConfig::new(repository(), "v2.0.0", "gh-token", "lin-token")
}

#[tokio::test]
async fn release_updates_only_linked_issues() {
    let tracker = FakeIssueTracker::new().with_link(&pr(47), issue("issue-47", "ENG-47"));
    let runner = Runner::with_clients(config(), v2_source(), tracker).unwrap();

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.pull_requests_discovered, 2);
    assert_eq!(summary.pull_requests_without_issue, 1);
    assert_eq!(summary.issues_updated, 1);
    assert_eq!(summary.updated_issues, vec!["ENG-47"]);
    assert!(summary.all_success());

    let tracker = runner.tracker();
    assert_eq!(tracker.label_names("issue-47"), vec!["v2.0.0"]);
    assert!(tracker.attachments("issue-47").contains(RELEASE_URL));
}

#[tokio::test]
async fn updated_issues_are_sorted_by_identifier() {
    let tracker = FakeIssueTracker::new()
        .with_link(&pr(45), issue("issue-9", "ENG-9"))
        .with_link(&pr(47), issue("issue-12", "ENG-12"));
    let runner = Runner::with_clients(config(), v2_source(), tracker).unwrap();

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.issues_updated, 2);
    assert_eq!(summary.updated_issues, vec!["ENG-12", "ENG-9"]);
}

#[tokio::test]
async fn rerunning_a_release_changes_nothing() {
    let tracker = FakeIssueTracker::new()
        .with_link(&pr(47), issue("issue-47", "ENG-47"))
        .with_done_state("team", workflow_state("done", "Done", "completed"));
    let runner = Runner::with_clients(
        config().with_mode(SyncMode::Complete),
        v2_source(),
        tracker,
    )
    .unwrap();

    let first = runner.run().await.unwrap();
    let second = runner.run().await.unwrap();

    assert_eq!(first.updated_issues, second.updated_issues);

    let tracker = runner.tracker();
    let state = tracker.state.lock().unwrap();
    assert_eq!(state.label_updates, 1);
    assert_eq!(state.transitions, 1);
    assert_eq!(state.attachments["issue-47"].len(), 1);
    assert_eq!(state.issue_states["issue-47"].id, "done");
}

#[tokio::test]
async fn issue_linked_twice_is_treated_once() {
    let tracker = FakeIssueTracker::new()
        .with_link(&pr(45), issue("issue-1", "ENG-1"))
        .with_link(&pr(47), issue("issue-1", "ENG-1"));
    let runner = Runner::with_clients(config(), v2_source(), tracker).unwrap();

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.issues_updated, 1);
    assert_eq!(summary.issues_duplicated, 1);
    assert_eq!(runner.tracker().state.lock().unwrap().label_updates, 1);
}

#[tokio::test]
async fn one_failing_issue_does_not_stop_the_others() {
    let source = v2_source()
        .with_ancestry("v2.0.0", &["c47", "c46", "c45"])
        .with_commit("c46", &[pr(46)]);
    let tracker = FakeIssueTracker::new()
        .with_link(&pr(45), issue("issue-45", "ENG-45"))
        .with_link(&pr(47), issue("issue-47", "ENG-47"))
        .with_failing_issue("issue-45")
        .with_failing_lookup(&pr(46));
    let runner = Runner::with_clients(config(), source, tracker).unwrap();

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.issues_updated, 1);
    assert_eq!(summary.issues_failed, 2);
    assert_eq!(summary.updated_issues, vec!["ENG-47"]);
    assert!(summary.has_failures());
    assert_eq!(runner.tracker().label_names("issue-47"), vec!["v2.0.0"]);
}

#[tokio::test]
async fn previous_version_label_is_replaced() {
    let mut linked = issue("issue-47", "ENG-47");
    linked.labels = vec![
        LinearLabel {
            id: "label-bug".to_string(),
            name: "bug".to_string(),
            parent_id: None,
        },
        LinearLabel {
            id: "label-v1.9.0".to_string(),
            name: "v1.9.0".to_string(),
            parent_id: Some("label-Releases".to_string()),
        },
    ];
    let tracker = FakeIssueTracker::new().with_link(&pr(47), linked);
    let runner = Runner::with_clients(config(), v2_source(), tracker).unwrap();

    runner.run().await.unwrap();

    assert_eq!(
        runner.tracker().label_names("issue-47"),
        vec!["bug", "v2.0.0"]
    );
}

#[tokio::test]
async fn closed_issues_are_not_transitioned() {
    let mut linked = issue("issue-47", "ENG-47");
    linked.state = Some(workflow_state("canceled", "Canceled", "canceled"));
    let tracker = FakeIssueTracker::new()
        .with_link(&pr(47), linked)
        .with_done_state("team", workflow_state("done", "Done", "completed"));
    let runner = Runner::with_clients(
        config().with_mode(SyncMode::Complete),
        v2_source(),
        tracker,
    )
    .unwrap();

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.issues_updated, 1);
    let tracker = runner.tracker();
    assert_eq!(tracker.state.lock().unwrap().transitions, 0);
    assert_eq!(tracker.issue_state("issue-47").unwrap().id, "canceled");
}

#[tokio::test]
async fn dry_run_changes_nothing() {
    let tracker = FakeIssueTracker::new().with_link(&pr(47), issue("issue-47", "ENG-47"));
    let runner =
        Runner::with_clients(config().with_dry_run(true), v2_source(), tracker).unwrap();

    let summary = runner.run().await.unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.issues_previewed, 1);
    assert_eq!(summary.issues_updated, 0);
    assert_eq!(summary.updated_issues, vec!["ENG-47"]);

    let state = runner.tracker().state.lock().unwrap();
    assert_eq!(state.label_updates, 0);
    assert!(state.attachments.is_empty());
    assert!(!state.labels.contains_key("label-v2.0.0"));
}

#[tokio::test]
async fn release_without_pull_requests_succeeds_empty() {
    let source = FakeReleaseSource::new()
        .with_release(release("v0.1.0", 1, "main", Some("Initial import.")))
        .with_ancestry("v0.1.0", &["c1"]);
    let config = RunnerConfig::new(repository(), "v0.1.0", "gh-token", "lin-token");
    let runner = Runner::with_clients(config, source, FakeIssueTracker::new()).unwrap();

    let summary = runner.run().await.unwrap();

    assert_eq!(summary.pull_requests_discovered, 0);
    assert!(summary.all_success());
    assert!(runner.tracker().state.lock().unwrap().labels.is_empty());
}

#[tokio::test]
async fn missing_release_aborts_the_run() {
    let config = RunnerConfig::new(repository(), "v9.0.0", "gh-token", "lin-token");
    let runner = Runner::with_clients(config, v2_source(), FakeIssueTracker::new()).unwrap();

    let result = runner.run().await;

    assert!(matches!(
        result,
        Err(RunnerError::Discovery(DiscoveryError::ReleaseNotFound { .. }))
    ));
}

#[test]
fn invalid_configuration_is_rejected_before_running() {
    let config = config().with_concurrency(0);
    let result = Runner::with_clients(config, v2_source(), FakeIssueTracker::new());

    assert!(matches!(result, Err(RunnerError::Config(_))));
}
