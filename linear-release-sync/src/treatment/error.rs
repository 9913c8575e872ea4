//! Treatment error types.

use crate::linear::LinearError;
use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that can occur while treating an issue.
#[derive(Debug, Error)]
pub enum TreatmentError {
    /// Linear API error.
    #[error("Linear API error: {0}")]
    Linear(#[from] LinearError),

    /// Label name or attachment title could not be rendered.
    #[error(transparent)]
    Template(#[from] TemplateError),
}
