//! Orchestrates release discovery and issue treatment.

mod config;
mod error;

pub use config::RunnerConfig;
pub use error::RunnerError;

use crate::discovery::{discover_pull_requests, DiscoveryOptions, DiscoveryReport};
use crate::github::{GitHubClient, ReleaseSource};
use crate::linear::{IssueTracker, LinearClient, LinearLabel};
use crate::summary::{ProcessingResult, RunSummary};
use crate::templates::{ReleaseContext, TemplateRenderer};
use crate::treatment::{apply_treatment, prepare_label, TreatmentPlan};
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, info_span, warn, Instrument};

/// Ids of issues already claimed during this run.
type ClaimedIssues = Arc<Mutex<HashSet<String>>>;

/// Orchestrates a full release sync run.
pub struct Runner<S = GitHubClient, T = LinearClient> {
    config: RunnerConfig,
    source: S,
    tracker: T,
    renderer: TemplateRenderer,
}

impl Runner {
    /// Builds a runner with live GitHub and Linear clients.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the configuration is invalid or the GitHub
    /// client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        config.validate()?;
        let source = GitHubClient::new(config.github_token(), config.repository().clone())?;
        let tracker = LinearClient::new(config.linear_token());
        Ok(Self {
            config,
            source,
            tracker,
            renderer: TemplateRenderer::new(),
        })
    }
}

impl<S, T> Runner<S, T>
where
    S: ReleaseSource,
    T: IssueTracker,
{
    /// Builds a runner over the given collaborators.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] if the configuration is invalid.
    pub fn with_clients(config: RunnerConfig, source: S, tracker: T) -> Result<Self, RunnerError> {
        config.validate()?;
        Ok(Self {
            config,
            source,
            tracker,
            renderer: TemplateRenderer::new(),
        })
    }

    /// Returns the release source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns the issue tracker.
    pub fn tracker(&self) -> &T {
        &self.tracker
    }

    /// Executes the full flow: discover pull requests, then treat each
    /// linked issue once.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] for failures that affect the whole release.
    /// Failures on individual pull requests are recorded in the summary.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let config = &self.config;
        let mut summary = RunSummary::new(config.tag(), config.dry_run());

        let options = DiscoveryOptions {
            comparison: config.settings().comparison,
            concurrency: config.concurrency(),
        };
        let report =
            discover_pull_requests(&self.source, config.repository(), config.tag(), &options)
                .await?;
        summary.record_discovery(&report);

        if report.pull_requests.is_empty() {
            warn!(tag = %config.tag(), "Release contains no pull requests");
            return Ok(summary);
        }

        let context = ReleaseContext::new(config.repository(), &report.release);
        let plan = TreatmentPlan::render(
            config.settings(),
            config.mode(),
            &context,
            &self.renderer,
        )?;

        let label = if config.dry_run() {
            None
        } else {
            Some(prepare_label(&self.tracker, &plan).await?)
        };

        info!(
            count = report.pull_requests.len(),
            mode = %config.mode(),
            "Processing pull requests"
        );

        let claimed: ClaimedIssues = Arc::new(Mutex::new(HashSet::new()));
        let results: Vec<ProcessingResult> = stream::iter(report.pull_requests.iter())
            .map(|pull_request| {
                let claimed = Arc::clone(&claimed);
                let tracker = &self.tracker;
                let plan = &plan;
                let label = label.as_ref();

                async move {
                    process_pull_request(tracker, pull_request, plan, label, claimed).await
                }
            })
            .buffer_unordered(config.concurrency())
            .collect()
            .await;

        for result in &results {
            summary.record_result(result);
        }
        summary.updated_issues.sort();

        if config.dry_run() {
            print_dry_run_preview(&report, &plan, &results);
        }

        Ok(summary)
    }
}

/// Resolves one pull request to its issue and treats it.
///
/// With no `label` the issue is only previewed.
async fn process_pull_request<T>(
    tracker: &T,
    pull_request: &str,
    plan: &TreatmentPlan,
    label: Option<&LinearLabel>,
    claimed: ClaimedIssues,
) -> ProcessingResult
where
    T: IssueTracker + ?Sized,
{
    let span = info_span!("pull_request", pr = %pull_request);

    async move {
        let issue = match tracker.find_issue_by_pull_request_url(pull_request).await {
            Ok(Some(issue)) => issue,
            Ok(None) => {
                info!("No linked Linear issue");
                return ProcessingResult::NoLinkedIssue {
                    pull_request: pull_request.to_string(),
                };
            }
            Err(e) => {
                error!(error = %e, "Failed to look up linked issue");
                return ProcessingResult::Failed {
                    pull_request: pull_request.to_string(),
                    error: e.to_string(),
                };
            }
        };

        // Check and insert under one lock so concurrent lookups of the same
        // issue cannot both proceed.
        if !claimed.lock().await.insert(issue.id.clone()) {
            info!(issue = %issue.identifier, "Issue already handled in this run");
            return ProcessingResult::DuplicateIssue {
                pull_request: pull_request.to_string(),
                identifier: issue.identifier,
            };
        }

        let Some(label) = label else {
            return ProcessingResult::Previewed {
                pull_request: pull_request.to_string(),
                identifier: issue.identifier,
            };
        };

        match apply_treatment(tracker, &issue, plan, label).await {
            Ok(treatment) => ProcessingResult::Updated {
                pull_request: pull_request.to_string(),
                treatment,
            },
            Err(e) => {
                error!(issue = %issue.identifier, error = %e, "Failed to treat issue");
                ProcessingResult::Failed {
                    pull_request: pull_request.to_string(),
                    error: e.to_string(),
                }
            }
        }
    }
    .instrument(span)
    .await
}

fn print_dry_run_preview(
    report: &DiscoveryReport,
    plan: &TreatmentPlan,
    results: &[ProcessingResult],
) {
    println!("\n[DRY RUN] Release: {}", report.release.tag_name);
    match &report.previous_tag {
        Some(previous) => println!("  Compared against: {previous}"),
        None => println!("  Walked full history ({} commits)", report.commits_examined),
    }
    match &plan.label_group {
        Some(group) => println!("  Would apply label: {group} / {}", plan.label_name),
        None => println!("  Would apply label: {}", plan.label_name),
    }
    if let Some(attachment) = &plan.attachment {
        println!(
            "  Would attach: \"{}\" -> {}",
            attachment.title, attachment.url
        );
    }
    if plan.mode.transitions_state() {
        println!(
            "  Would move issues to: {}",
            plan.done_state_name.as_deref().unwrap_or("first completed state")
        );
    }
    println!("  Found {} pull requests:\n", report.pull_requests.len());

    let mut sorted: Vec<&ProcessingResult> = results.iter().collect();
    sorted.sort_by(|a, b| a.pull_request().cmp(b.pull_request()));

    for (i, result) in sorted.iter().enumerate() {
        println!("  [{}/{}] {}", i + 1, sorted.len(), result.pull_request());
        match result {
            ProcessingResult::Previewed { identifier, .. } => {
                println!("    Would update issue {identifier}");
            }
            ProcessingResult::DuplicateIssue { identifier, .. } => {
                println!("    Issue {identifier} already listed");
            }
            ProcessingResult::NoLinkedIssue { .. } => println!("    No linked issue"),
            ProcessingResult::Failed { error, .. } => println!("    Lookup failed: {error}"),
            ProcessingResult::Updated { .. } => {}
        }
    }

    println!();
}
