//! Full-history fallback traversal.
//!
//! Used when a release has no comparable predecessor. Walks every commit
//! reachable from the tag, so it cannot miss a pull request, at the cost of
//! work proportional to the repository's history.

use super::{CommitScan, DiscoveryError};
use crate::github::{ReleaseSource, Repository};
use crate::pull_requests::{normalize_pull_request_url, PullRequestSet};
use tracing::debug;

/// Collects the pull requests of every commit in the ancestry of `tag`.
///
/// Any failure, including a page that claims a successor but gives no usable
/// cursor, aborts the walk instead of returning a truncated set.
pub(super) async fn full_history<S>(
    source: &S,
    repository: &Repository,
    tag: &str,
) -> Result<CommitScan, DiscoveryError>
where
    S: ReleaseSource + ?Sized,
{
    let mut pull_requests = PullRequestSet::new();
    let mut commits_examined = 0;
    let mut cursor: Option<String> = None;
    let mut page_number = 0;

    loop {
        let page = source.release_ancestry_page(tag, cursor.as_deref()).await?;
        page_number += 1;
        commits_examined += page.commits.len();

        let before = pull_requests.len();
        pull_requests.extend(page.commits.into_iter().flat_map(|commit| {
            commit.pull_requests.into_iter().filter_map(|url| {
                normalize_pull_request_url(&url, &repository.owner, &repository.name)
            })
        }));
        debug!(
            page = page_number,
            commits = commits_examined,
            new_pull_requests = pull_requests.len() - before,
            "Walked history page"
        );

        if !page.has_next_page {
            break;
        }

        match page.next_cursor {
            Some(next) if cursor.as_deref() != Some(next.as_str()) => cursor = Some(next),
            Some(_) => {
                return Err(incomplete(tag, page_number, "cursor did not advance"));
            }
            None => {
                return Err(incomplete(tag, page_number, "no cursor for next page"));
            }
        }
    }

    Ok(CommitScan {
        commits_examined,
        pull_requests,
    })
}

fn incomplete(tag: &str, page: usize, reason: &str) -> DiscoveryError {
    DiscoveryError::IncompleteHistory {
        tag: tag.to_string(),
        page,
        reason: reason.to_string(),
    }
}
