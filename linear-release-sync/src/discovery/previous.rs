//! Previous comparable release and the bounded commit range since it.

use super::{CommitScan, DiscoveryError};
use crate::github::{Release, ReleaseSource, Repository};
use crate::pull_requests::normalize_pull_request_url;
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which earlier releases may serve as the baseline for a release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonPolicy {
    /// Only releases cut from the same target commitish.
    ///
    /// Pairing a `main` release with a hotfix-branch release would produce a
    /// diff full of unrelated commits.
    #[default]
    SameTarget,

    /// Any earlier release regardless of target.
    AnyTarget,
}

impl ComparisonPolicy {
    fn accepts(self, candidate: &Release, current: &Release) -> bool {
        match self {
            Self::SameTarget => candidate.target_commitish == current.target_commitish,
            Self::AnyTarget => true,
        }
    }
}

/// Finds the latest release created strictly before `current`.
///
/// The current tag itself, drafts and releases without a creation timestamp
/// are never candidates, nor (under [`ComparisonPolicy::SameTarget`]) are
/// releases from another target. Returns `None` for a first release or when `current` has no
/// timestamp to order against. Releases created in the same instant are
/// tied and either may be returned.
#[must_use]
pub fn find_previous_comparable<'a>(
    releases: &'a [Release],
    current: &Release,
    policy: ComparisonPolicy,
) -> Option<&'a Release> {
    let current_created = current.created_at?;

    releases
        .iter()
        .filter(|candidate| candidate.tag_name != current.tag_name && !candidate.draft)
        .filter(|candidate| policy.accepts(candidate, current))
        .filter_map(|candidate| {
            candidate
                .created_at
                .filter(|created| *created < current_created)
                .map(|created| (created, candidate))
        })
        .max_by_key(|(created, _)| *created)
        .map(|(_, candidate)| candidate)
}

/// Collects the pull requests of every commit in `base...head`.
///
/// Association lookups run `concurrency` at a time; the first failure aborts
/// the scan.
pub(super) async fn bounded_diff<S>(
    source: &S,
    repository: &Repository,
    base: &str,
    head: &str,
    concurrency: usize,
) -> Result<CommitScan, DiscoveryError>
where
    S: ReleaseSource + ?Sized,
{
    let commits = source.compare_commits(base, head).await?;
    debug!(base, head, count = commits.len(), "Resolved commit range");

    let associations: Vec<Vec<String>> = stream::iter(commits.iter())
        .map(|sha| source.commit_associated_pull_requests(sha))
        .buffer_unordered(concurrency.max(1))
        .try_collect()
        .await?;

    let pull_requests = associations
        .into_iter()
        .flatten()
        .filter_map(|url| normalize_pull_request_url(&url, &repository.owner, &repository.name))
        .collect();

    Ok(CommitScan {
        commits_examined: commits.len(),
        pull_requests,
    })
}
