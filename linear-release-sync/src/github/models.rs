//! Wire shapes for the GitHub endpoints octocrab has no typed builder for.

use super::{AncestryCommit, AncestryPage, Release};
use serde::Deserialize;

impl From<octocrab::models::repos::Release> for Release {
    fn from(release: octocrab::models::repos::Release) -> Self {
        Self {
            tag_name: release.tag_name,
            body: release.body,
            created_at: release.created_at,
            target_commitish: release.target_commitish,
            html_url: Some(release.html_url.to_string()),
            draft: release.draft,
        }
    }
}

/// `GET /repos/{owner}/{repo}/compare/{base}...{head}`
#[derive(Debug, Deserialize)]
pub(super) struct CommitComparison {
    pub total_commits: usize,
    #[serde(default)]
    pub commits: Vec<CommitRef>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CommitRef {
    pub sha: String,
}

/// `GET /repos/{owner}/{repo}/commits/{sha}/pulls`
#[derive(Debug, Deserialize)]
pub(super) struct AssociatedPullRequest {
    pub html_url: String,
}

/// `POST /repos/{owner}/{repo}/releases/generate-notes`
#[derive(Debug, Deserialize)]
pub(super) struct GeneratedNotes {
    #[serde(default)]
    pub body: String,
}

/// `data` of the ancestry query; octocrab strips the envelope.
#[derive(Debug, Deserialize)]
pub(super) struct AncestryData {
    pub repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RepositoryNode {
    #[serde(rename = "ref")]
    pub git_ref: Option<RefNode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RefNode {
    pub target: Option<TargetNode>,
}

/// A ref target: a commit carries `history`, an annotated tag carries `target`.
#[derive(Debug, Deserialize)]
pub(super) struct TargetNode {
    pub history: Option<HistoryConnection>,
    pub target: Option<Box<TargetNode>>,
}

impl TargetNode {
    /// Follows annotated tags down to the commit history.
    pub fn into_history(self) -> Option<HistoryConnection> {
        match self.history {
            Some(history) => Some(history),
            None => self.target.and_then(|inner| inner.into_history()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct HistoryConnection {
    pub page_info: PageInfo,
    #[serde(default)]
    pub nodes: Vec<CommitNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct PageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct CommitNode {
    pub oid: String,
    pub associated_pull_requests: Option<PullRequestConnection>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PullRequestConnection {
    #[serde(default)]
    pub nodes: Vec<PullRequestNode>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PullRequestNode {
    pub url: String,
}

impl From<HistoryConnection> for AncestryPage {
    fn from(history: HistoryConnection) -> Self {
        let commits = history
            .nodes
            .into_iter()
            .map(|node| AncestryCommit {
                sha: node.oid,
                pull_requests: node
                    .associated_pull_requests
                    .map(|prs| prs.nodes.into_iter().map(|pr| pr.url).collect())
                    .unwrap_or_default(),
            })
            .collect();

        Self {
            commits,
            has_next_page: history.page_info.has_next_page,
            next_cursor: history.page_info.end_cursor,
        }
    }
}
