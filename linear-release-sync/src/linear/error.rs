//! Linear API error types.

use thiserror::Error;

/// Errors that can occur while talking to the Linear GraphQL API.
#[derive(Debug, Error)]
pub enum LinearError {
    /// Transport failure.
    #[error("Linear API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("Linear API error {status}: {body}")]
    Status { status: u16, body: String },

    /// GraphQL-level errors in an otherwise successful response.
    #[error("Linear GraphQL errors: {0}")]
    GraphQl(String),

    /// Response carried neither data nor errors.
    #[error("Missing 'data' in Linear response")]
    MissingData,

    /// Response data did not have the expected shape.
    #[error("Failed to deserialize Linear data: {0}")]
    Decode(#[from] serde_json::Error),

    /// A mutation reported `success: false`.
    #[error("Linear mutation '{operation}' was not successful")]
    Unsuccessful { operation: &'static str },
}
