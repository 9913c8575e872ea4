//! Pull request identity.
//!
//! A pull request is only ever identified by its canonical URL
//! (`https://github.com/{org}/{repo}/pull/{number}`). Numbers, short
//! references and API-provided URLs are normalized into that form before they
//! enter a [`PullRequestSet`], so deduplication is plain string set membership.

mod pull_request_set;

pub use pull_request_set::PullRequestSet;

use url::Url;

/// Builds the canonical URL for a pull request.
#[must_use]
pub fn canonical_pull_request_url(owner: &str, repo: &str, number: u64) -> String {
    format!("https://github.com/{owner}/{repo}/pull/{number}")
}

/// Components of a pull request URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Repository owner as written in the URL.
    pub owner: String,

    /// Repository name as written in the URL.
    pub repo: String,

    /// Pull request number.
    pub number: u64,
}

/// Parses a `github.com` pull request URL.
///
/// Trailing segments (`/files`, `/commits`), query strings and fragments are
/// ignored. Returns `None` for anything that is not a pull request URL.
#[must_use]
pub fn parse_pull_request_url(url: &str) -> Option<PullRequestRef> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "https" | "http") {
        return None;
    }
    if !parsed
        .host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case("github.com"))
    {
        return None;
    }

    let mut segments = parsed.path_segments()?;
    let owner = segments.next().filter(|s| !s.is_empty())?;
    let repo = segments.next().filter(|s| !s.is_empty())?;
    if segments.next()? != "pull" {
        return None;
    }
    let number = segments.next()?.parse::<u64>().ok().filter(|n| *n > 0)?;

    Some(PullRequestRef {
        owner: owner.to_string(),
        repo: repo.to_string(),
        number,
    })
}

/// Normalizes a pull request URL into canonical form for the given repository.
///
/// URLs pointing at another repository (for example a fork that happens to
/// contain the same commit) yield `None`.
#[must_use]
pub fn normalize_pull_request_url(url: &str, owner: &str, repo: &str) -> Option<String> {
    let reference = parse_pull_request_url(url)?;
    if reference.owner.eq_ignore_ascii_case(owner) && reference.repo.eq_ignore_ascii_case(repo) {
        Some(canonical_pull_request_url(owner, repo, reference.number))
    } else {
        None
    }
}
