//! Linear issue tracker integration.
//!
//! Treatment only talks to Linear through the [`IssueTracker`] trait.
//! [`LinearClient`] implements it against the GraphQL API.

mod client;
mod error;
mod queries;

pub use client::LinearClient;
pub use error::LinearError;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An issue label. Labels with a parent belong to an exclusive group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinearLabel {
    /// Linear id.
    pub id: String,

    /// Display name, unique within its group.
    pub name: String,

    /// Id of the group label this label belongs to.
    pub parent_id: Option<String>,
}

/// A team workflow state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Linear id.
    pub id: String,

    /// Display name, e.g. `Done` or `Released`.
    pub name: String,

    /// One of `triage`, `backlog`, `unstarted`, `started`, `completed`, `canceled`.
    pub state_type: String,

    /// Order within the team's workflow; lower comes first.
    pub position: f64,
}

impl WorkflowState {
    /// Returns true for completed and canceled states.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        matches!(self.state_type.as_str(), "completed" | "canceled")
    }
}

/// A Linear issue linked to a pull request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearIssue {
    /// Linear id, used for mutations.
    pub id: String,

    /// Human-readable key such as `ENG-123`.
    pub identifier: String,

    /// Issue title.
    pub title: String,

    /// Link to the issue in Linear.
    pub url: Option<String>,

    /// Owning team, whose workflow supplies the done state.
    pub team_id: Option<String>,

    /// Current workflow state.
    pub state: Option<WorkflowState>,

    /// Labels currently on the issue.
    pub labels: Vec<LinearLabel>,
}

/// Operations the treatment step needs from the issue tracker.
///
/// Every mutation is idempotent and keyed by stable Linear ids, so re-running
/// a release leaves issues unchanged.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Finds the issue a pull request is attached to, if any.
    async fn find_issue_by_pull_request_url(
        &self,
        url: &str,
    ) -> Result<Option<LinearIssue>, LinearError>;

    /// Finds or creates a label, inside `group` when given.
    async fn ensure_label(
        &self,
        name: &str,
        group: Option<&str>,
        color: Option<&str>,
    ) -> Result<LinearLabel, LinearError>;

    /// Attaches a link to an issue. Linear dedupes attachments by URL.
    async fn attach_link(&self, issue_id: &str, url: &str, title: &str)
        -> Result<(), LinearError>;

    /// Replaces the label set of an issue.
    async fn update_issue_labels(
        &self,
        issue_id: &str,
        label_ids: &[String],
    ) -> Result<(), LinearError>;

    /// Picks the completed state to move a team's issues into.
    async fn find_done_state(
        &self,
        team_id: &str,
        preferred_name: Option<&str>,
    ) -> Result<Option<WorkflowState>, LinearError>;

    /// Moves an issue to a workflow state.
    async fn transition_issue_state(
        &self,
        issue_id: &str,
        state_id: &str,
    ) -> Result<(), LinearError>;
}
