//! Pull request discovery for a release.
//!
//! Given a release tag, determines the set of pull requests that shipped in
//! it:
//!
//! 1. Resolve the release (a missing release is fatal).
//! 2. Extract references from the release body; if the body names none,
//!    extract from GitHub-generated release notes instead.
//! 3. Find the previous comparable release. If there is one, query the pull
//!    requests of each commit in the bounded diff between the two tags;
//!    otherwise walk the tag's full commit ancestry.
//! 4. Return the deduplicated [`PullRequestSet`] found by the commit scan.
//!
//! Text references are a cross-check only. A reference the commit scan does
//! not confirm is logged and counted, never added: a release body may mention
//! earlier or unrelated pull requests.
//!
//! Bounding by diff keeps the work proportional to the release and keeps pull
//! requests merged before the previous release from being attributed to this
//! one. The result depends only on GitHub state at call time, so re-running
//! for the same tag yields the same set.

mod error;
mod history;
mod previous;

pub use error::DiscoveryError;
pub use previous::{find_previous_comparable, ComparisonPolicy};

use crate::github::{Release, ReleaseSource, Repository};
use crate::pull_requests::PullRequestSet;
use crate::references::extract_pull_request_urls;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info, info_span, Instrument};

/// Default number of concurrent per-commit lookups.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// How the commit-based part of discovery was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStrategy {
    /// Commits between the previous comparable release and this one.
    BoundedDiff,

    /// Every commit reachable from the tag.
    FullHistory,
}

impl DiscoveryStrategy {
    /// Returns the strategy as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BoundedDiff => "bounded_diff",
            Self::FullHistory => "full_history",
        }
    }
}

impl fmt::Display for DiscoveryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tuning for [`discover_pull_requests`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Which earlier releases count as comparable.
    pub comparison: ComparisonPolicy,

    /// Maximum concurrent per-commit association lookups.
    pub concurrency: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            comparison: ComparisonPolicy::default(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Outcome of discovery for one release.
#[derive(Debug, Clone)]
pub struct DiscoveryReport {
    /// The release that was resolved.
    pub release: Release,

    /// Strategy used for the commit-based scan.
    pub strategy: DiscoveryStrategy,

    /// Tag of the previous comparable release, for bounded diffs.
    pub previous_tag: Option<String>,

    /// Number of commits whose pull requests were looked up.
    pub commits_examined: usize,

    /// Pull requests referenced in the body or generated notes.
    pub text_references: usize,

    /// Text references that no scanned commit belongs to.
    pub unconfirmed_references: usize,

    /// Whether the body named nothing and generated notes were used.
    pub used_generated_notes: bool,

    /// Every pull request in the release.
    pub pull_requests: PullRequestSet,
}

/// Pull requests found by scanning commits.
#[derive(Debug, Default)]
struct CommitScan {
    commits_examined: usize,
    pull_requests: PullRequestSet,
}

/// Determines the pull requests included in the release tagged `tag`.
///
/// # Errors
///
/// Returns [`DiscoveryError::ReleaseNotFound`] if the tag has no release, and
/// any other [`DiscoveryError`] when GitHub data cannot be fully read. A
/// legitimately empty release returns `Ok` with an empty set.
pub async fn discover_pull_requests<S>(
    source: &S,
    repository: &Repository,
    tag: &str,
    options: &DiscoveryOptions,
) -> Result<DiscoveryReport, DiscoveryError>
where
    S: ReleaseSource + ?Sized,
{
    let span = info_span!("discover", repo = %repository, tag = %tag);

    async {
        info!("Resolving release");
        let release = source.get_release_by_tag(tag).await?;

        let releases = source.list_releases().await?;
        let previous = find_previous_comparable(&releases, &release, options.comparison);
        let previous_tag = previous.map(|p| p.tag_name.as_str());

        let (referenced, used_generated_notes) =
            text_references(source, repository, &release, previous_tag).await?;

        let (strategy, scan) = match previous {
            Some(previous) => {
                info!(previous = %previous.tag_name, "Scanning bounded diff");
                let scan = previous::bounded_diff(
                    source,
                    repository,
                    &previous.tag_name,
                    &release.tag_name,
                    options.concurrency,
                )
                .await?;
                (DiscoveryStrategy::BoundedDiff, scan)
            }
            None => {
                info!("No comparable previous release, walking full history");
                let scan = history::full_history(source, repository, &release.tag_name).await?;
                (DiscoveryStrategy::FullHistory, scan)
            }
        };

        let pull_requests = scan.pull_requests;
        let mut unconfirmed_references = 0;
        for url in referenced.iter().filter(|url| !pull_requests.contains(url)) {
            debug!(pr = %url, "Referenced pull request is not in the release commits");
            unconfirmed_references += 1;
        }
        let text_references = referenced.len();

        info!(
            strategy = %strategy,
            commits = scan.commits_examined,
            text_references,
            unconfirmed_references,
            count = pull_requests.len(),
            "Discovery complete"
        );

        Ok(DiscoveryReport {
            previous_tag: previous_tag.map(str::to_string),
            release,
            strategy,
            commits_examined: scan.commits_examined,
            text_references,
            unconfirmed_references,
            used_generated_notes,
            pull_requests,
        })
    }
    .instrument(span)
    .await
}

/// Extracts references from the release body, falling back to generated notes.
///
/// A body that names no pull requests is inconclusive rather than proof of an
/// empty release, so notes since `previous_tag` are generated and scanned
/// before giving up.
async fn text_references<S>(
    source: &S,
    repository: &Repository,
    release: &Release,
    previous_tag: Option<&str>,
) -> Result<(PullRequestSet, bool), DiscoveryError>
where
    S: ReleaseSource + ?Sized,
{
    let from_body =
        extract_pull_request_urls(release.body.as_deref(), &repository.owner, &repository.name);
    if !from_body.is_empty() {
        return Ok((from_body, false));
    }

    info!("Release body names no pull requests, generating release notes");
    let notes = source
        .generate_release_notes(&release.tag_name, previous_tag)
        .await?;
    let from_notes = extract_pull_request_urls(Some(&notes), &repository.owner, &repository.name);
    Ok((from_notes, true))
}
