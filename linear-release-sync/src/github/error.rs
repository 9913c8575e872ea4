//! GitHub access error types.

use thiserror::Error;

/// Errors that can occur while reading releases and history from GitHub.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// The requested release tag has no release.
    #[error("Release '{tag}' not found")]
    NotFound { tag: String },

    /// GitHub API error.
    #[error("GitHub API error: {0}")]
    Api(#[from] octocrab::Error),

    /// GraphQL query returned errors.
    #[error("GitHub GraphQL error: {0}")]
    GraphQl(String),

    /// The tag ref does not point at a commit.
    #[error("Tag '{tag}' does not resolve to a commit")]
    MissingRef { tag: String },
}

impl GitHubError {
    /// Maps a release lookup failure, turning HTTP 404 into [`GitHubError::NotFound`].
    pub(crate) fn from_release_lookup(error: octocrab::Error, tag: &str) -> Self {
        if is_not_found(&error) {
            Self::NotFound {
                tag: tag.to_string(),
            }
        } else {
            Self::Api(error)
        }
    }

    /// Maps a GraphQL call failure, keeping the messages of query errors.
    pub(crate) fn from_graphql(error: octocrab::Error) -> Self {
        match error {
            octocrab::Error::Graphql { source, .. } => Self::GraphQl(
                source
                    .0
                    .iter()
                    .map(|e| e.message.as_str())
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            other => Self::Api(other),
        }
    }
}

/// Checks if an error is an HTTP 404 from the GitHub API.
fn is_not_found(error: &octocrab::Error) -> bool {
    match error {
        octocrab::Error::GitHub { source, .. } => source.status_code.as_u16() == 404,
        _ => false,
    }
}
