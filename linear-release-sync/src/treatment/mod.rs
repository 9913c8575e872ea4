//! Applying a release to Linear issues.
//!
//! Every issue linked to a released pull request receives the release link
//! as an attachment and the version label. In
//! [`SyncMode::Complete`](crate::config::SyncMode::Complete) it is
//! also moved to a completed workflow state. Labels and state are compared
//! against the issue before any mutation and Linear dedupes attachments by
//! URL, so treating the same issue twice changes nothing.

mod error;
mod labels;
mod plan;

pub use error::TreatmentError;
pub use labels::merge_exclusive;
pub use plan::{ReleaseAttachment, TreatmentPlan};

use crate::linear::{IssueTracker, LinearIssue, LinearLabel};
use serde::Serialize;
use tracing::{debug, info, info_span, warn, Instrument};

/// Changes made to one issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppliedTreatment {
    /// Issue identifier such as `ENG-123`.
    pub identifier: String,

    /// Whether the release link was attached.
    pub attached: bool,

    /// Whether the label set was changed.
    pub labeled: bool,

    /// Whether the issue was moved to a completed state.
    pub transitioned: bool,
}

/// Finds or creates the version label for a release.
///
/// Called once per run; the resulting label is shared by every issue.
///
/// # Errors
///
/// Returns [`TreatmentError::Linear`] if the label cannot be found or created.
pub async fn prepare_label<T>(
    tracker: &T,
    plan: &TreatmentPlan,
) -> Result<LinearLabel, TreatmentError>
where
    T: IssueTracker + ?Sized,
{
    let label = tracker
        .ensure_label(
            &plan.label_name,
            plan.label_group.as_deref(),
            plan.label_color.as_deref(),
        )
        .await?;
    info!(label = %label.name, id = %label.id, "Version label ready");
    Ok(label)
}

/// Applies the release treatment to a single issue.
///
/// # Errors
///
/// Returns [`TreatmentError`] if any Linear mutation fails. Earlier steps
/// are not rolled back; re-running completes the rest.
pub async fn apply_treatment<T>(
    tracker: &T,
    issue: &LinearIssue,
    plan: &TreatmentPlan,
    label: &LinearLabel,
) -> Result<AppliedTreatment, TreatmentError>
where
    T: IssueTracker + ?Sized,
{
    let span = info_span!("treat", issue = %issue.identifier);

    async {
        let mut applied = AppliedTreatment {
            identifier: issue.identifier.clone(),
            ..AppliedTreatment::default()
        };

        if let Some(attachment) = &plan.attachment {
            tracker
                .attach_link(&issue.id, &attachment.url, &attachment.title)
                .await?;
            applied.attached = true;
        }

        match merge_exclusive(&issue.labels, label) {
            Some(label_ids) => {
                tracker.update_issue_labels(&issue.id, &label_ids).await?;
                applied.labeled = true;
            }
            None => debug!("Label already applied"),
        }

        if plan.mode.transitions_state() {
            applied.transitioned = complete_issue(tracker, issue, plan).await?;
        }

        info!(
            attached = applied.attached,
            labeled = applied.labeled,
            transitioned = applied.transitioned,
            "Issue treated"
        );
        Ok(applied)
    }
    .instrument(span)
    .await
}

/// Moves an issue to its team's completed state unless it is already closed.
async fn complete_issue<T>(
    tracker: &T,
    issue: &LinearIssue,
    plan: &TreatmentPlan,
) -> Result<bool, TreatmentError>
where
    T: IssueTracker + ?Sized,
{
    if issue.state.as_ref().is_some_and(|state| state.is_closed()) {
        debug!("Issue already closed");
        return Ok(false);
    }

    let Some(team_id) = issue.team_id.as_deref() else {
        warn!("Issue has no team, cannot pick a completed state");
        return Ok(false);
    };

    let Some(state) = tracker
        .find_done_state(team_id, plan.done_state_name.as_deref())
        .await?
    else {
        warn!(team = %team_id, "Team has no completed workflow state");
        return Ok(false);
    };

    tracker.transition_issue_state(&issue.id, &state.id).await?;
    info!(state = %state.name, "Issue moved to completed state");
    Ok(true)
}
