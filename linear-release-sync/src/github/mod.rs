//! GitHub release and commit history access.
//!
//! The discovery algorithm only talks to GitHub through the [`ReleaseSource`]
//! trait. [`GitHubClient`] implements it on top of octocrab for a single
//! repository; tests substitute in-memory fixtures.

mod client;
mod error;
mod models;
mod repository;

pub use client::GitHubClient;
pub use error::GitHubError;
pub use repository::Repository;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A GitHub release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    /// Tag name (e.g. `v4.9.2`).
    pub tag_name: String,

    /// Release description, if any.
    pub body: Option<String>,

    /// When the release was created. Drafts may lack one.
    pub created_at: Option<DateTime<Utc>>,

    /// Branch or ref the release was cut from.
    pub target_commitish: String,

    /// Link to the release page.
    pub html_url: Option<String>,

    /// Whether the release is an unpublished draft.
    pub draft: bool,
}

/// A commit in a tag's ancestry together with its associated pull request URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestryCommit {
    /// Commit SHA.
    pub sha: String,

    /// URLs of pull requests associated with the commit, as reported by GitHub.
    pub pull_requests: Vec<String>,
}

/// One page of a tag's commit ancestry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AncestryPage {
    /// Commits on this page, newest first.
    pub commits: Vec<AncestryCommit>,

    /// Whether another page follows.
    pub has_next_page: bool,

    /// Cursor for the next page.
    pub next_cursor: Option<String>,
}

/// Read access to the releases and history of one repository.
#[async_trait]
pub trait ReleaseSource: Send + Sync {
    /// Fetches the release for a tag.
    ///
    /// Fails with [`GitHubError::NotFound`] when the tag has no release.
    async fn get_release_by_tag(&self, tag: &str) -> Result<Release, GitHubError>;

    /// Lists the most recent releases (at least the latest 100).
    async fn list_releases(&self) -> Result<Vec<Release>, GitHubError>;

    /// Returns the commits reachable from `head` but not from `base`.
    async fn compare_commits(&self, base: &str, head: &str) -> Result<Vec<String>, GitHubError>;

    /// Returns the URLs of pull requests associated with a commit.
    async fn commit_associated_pull_requests(&self, sha: &str)
        -> Result<Vec<String>, GitHubError>;

    /// Fetches one page of the commit ancestry of `tag`, starting after `cursor`.
    async fn release_ancestry_page(
        &self,
        tag: &str,
        cursor: Option<&str>,
    ) -> Result<AncestryPage, GitHubError>;

    /// Asks GitHub to generate release notes for `tag`, covering changes since
    /// `previous_tag` when given.
    async fn generate_release_notes(
        &self,
        tag: &str,
        previous_tag: Option<&str>,
    ) -> Result<String, GitHubError>;
}
