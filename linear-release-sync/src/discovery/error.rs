//! Pull request discovery error types.

use crate::github::GitHubError;
use thiserror::Error;

/// Errors that abort pull request discovery for a release.
///
/// None of these are turned into an empty result: a run that cannot tell
/// which pull requests shipped must fail rather than silently skip issues.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The release tag has no release.
    #[error("Release '{tag}' not found")]
    ReleaseNotFound { tag: String },

    /// GitHub API error.
    #[error(transparent)]
    GitHub(GitHubError),

    /// The history walk could not continue to the next page.
    #[error("History of '{tag}' is incomplete after page {page}: {reason}")]
    IncompleteHistory {
        tag: String,
        page: usize,
        reason: String,
    },
}

impl From<GitHubError> for DiscoveryError {
    fn from(error: GitHubError) -> Self {
        match error {
            GitHubError::NotFound { tag } => Self::ReleaseNotFound { tag },
            other => Self::GitHub(other),
        }
    }
}
