//! Processing result types.

use crate::treatment::AppliedTreatment;

/// Result of processing a single pull request.
#[derive(Debug, Clone)]
pub enum ProcessingResult {
    /// The linked issue was treated.
    Updated {
        /// Pull request URL.
        pull_request: String,
        /// Changes made to the issue.
        treatment: AppliedTreatment,
    },

    /// Dry run: the linked issue would have been treated.
    Previewed {
        /// Pull request URL.
        pull_request: String,
        /// Issue identifier.
        identifier: String,
    },

    /// No Linear issue is linked to the pull request.
    NoLinkedIssue {
        /// Pull request URL.
        pull_request: String,
    },

    /// The linked issue was already handled through another pull request.
    DuplicateIssue {
        /// Pull request URL.
        pull_request: String,
        /// Issue identifier.
        identifier: String,
    },

    /// Lookup or treatment failed.
    Failed {
        /// Pull request URL.
        pull_request: String,
        /// Error message.
        error: String,
    },
}

impl ProcessingResult {
    /// Returns the pull request this result is for.
    #[must_use]
    pub fn pull_request(&self) -> &str {
        match self {
            Self::Updated { pull_request, .. }
            | Self::Previewed { pull_request, .. }
            | Self::NoLinkedIssue { pull_request }
            | Self::DuplicateIssue { pull_request, .. }
            | Self::Failed { pull_request, .. } => pull_request,
        }
    }
}
