//! Run summary types.

use super::result::ProcessingResult;
use crate::discovery::{DiscoveryReport, DiscoveryStrategy};

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Release tag.
    pub tag: String,

    /// Discovery strategy used, once discovery has run.
    pub strategy: Option<DiscoveryStrategy>,

    /// Previous comparable release, for bounded diffs.
    pub previous_tag: Option<String>,

    /// Number of commits whose pull requests were looked up.
    pub commits_examined: usize,

    /// Number of pull requests in the release.
    pub pull_requests_discovered: usize,

    /// Number of pull requests with no linked Linear issue.
    pub pull_requests_without_issue: usize,

    /// Number of issues treated.
    pub issues_updated: usize,

    /// Number of issues that would be treated (dry run).
    pub issues_previewed: usize,

    /// Number of pull requests whose issue was already handled.
    pub issues_duplicated: usize,

    /// Number of pull requests whose lookup or treatment failed.
    pub issues_failed: usize,

    /// Identifiers of treated (or previewed) issues, sorted by identifier.
    pub updated_issues: Vec<String>,

    /// Whether this was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Creates a new empty summary.
    #[must_use]
    pub fn new(tag: impl Into<String>, dry_run: bool) -> Self {
        Self {
            tag: tag.into(),
            dry_run,
            ..Default::default()
        }
    }

    /// Records the outcome of discovery.
    pub fn record_discovery(&mut self, report: &DiscoveryReport) {
        self.strategy = Some(report.strategy);
        self.previous_tag.clone_from(&report.previous_tag);
        self.commits_examined = report.commits_examined;
        self.pull_requests_discovered = report.pull_requests.len();
    }

    /// Updates the summary with a processing result.
    pub fn record_result(&mut self, result: &ProcessingResult) {
        match result {
            ProcessingResult::Updated { treatment, .. } => {
                self.issues_updated += 1;
                self.updated_issues.push(treatment.identifier.clone());
            }
            ProcessingResult::Previewed { identifier, .. } => {
                self.issues_previewed += 1;
                self.updated_issues.push(identifier.clone());
            }
            ProcessingResult::NoLinkedIssue { .. } => self.pull_requests_without_issue += 1,
            ProcessingResult::DuplicateIssue { .. } => self.issues_duplicated += 1,
            ProcessingResult::Failed { .. } => self.issues_failed += 1,
        }
    }

    /// Returns true if any failures occurred.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.issues_failed > 0
    }

    /// Returns true if all operations were successful.
    #[must_use]
    pub fn all_success(&self) -> bool {
        self.issues_failed == 0
    }
}
