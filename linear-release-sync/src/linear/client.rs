//! GraphQL client for the Linear API.
//!
//! Uses reqwest with the API key in the `Authorization` header. All queries
//! target `https://api.linear.app/graphql` unless overridden.

use super::queries;
use super::{IssueTracker, LinearError, LinearIssue, LinearLabel, WorkflowState};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

const LINEAR_API_URL: &str = "https://api.linear.app/graphql";

/// Linear API client.
#[derive(Debug, Clone)]
pub struct LinearClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl LinearClient {
    /// Creates a client authenticated with a Linear API key.
    pub fn new(api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            endpoint: LINEAR_API_URL.to_string(),
        }
    }

    /// Points the client at another GraphQL endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn graphql<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
    ) -> Result<T, LinearError> {
        let body = json!({ "query": query, "variables": variables });
        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(LinearError::Status { status, body });
        }

        let json: Value = resp.json().await?;

        if let Some(errors) = json.get("errors") {
            return Err(LinearError::GraphQl(errors.to_string()));
        }

        let data = json.get("data").ok_or(LinearError::MissingData)?;
        Ok(serde_json::from_value(data.clone())?)
    }

    async fn labels_named(&self, name: &str) -> Result<Vec<LabelNode>, LinearError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct LabelsResponse {
            issue_labels: Connection<LabelNode>,
        }

        let resp: LabelsResponse = self
            .graphql(queries::LABELS_BY_NAME, json!({ "name": name }))
            .await?;
        Ok(resp.issue_labels.nodes)
    }

    async fn create_label(
        &self,
        name: &str,
        parent_id: Option<&str>,
        is_group: bool,
        color: Option<&str>,
    ) -> Result<LinearLabel, LinearError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct CreateResponse {
            issue_label_create: CreatePayload,
        }
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct CreatePayload {
            success: bool,
            issue_label: Option<LabelNode>,
        }

        let mut input = json!({ "name": name });
        if is_group {
            input["isGroup"] = json!(true);
        }
        if let Some(parent_id) = parent_id {
            input["parentId"] = json!(parent_id);
        }
        if let Some(color) = color {
            input["color"] = json!(color);
        }

        let resp: CreateResponse = self
            .graphql(queries::CREATE_LABEL, json!({ "input": input }))
            .await?;
        match resp.issue_label_create {
            CreatePayload {
                success: true,
                issue_label: Some(label),
            } => {
                info!(label = %name, group = is_group, "Created label");
                Ok(label.into())
            }
            _ => Err(LinearError::Unsuccessful {
                operation: "issueLabelCreate",
            }),
        }
    }

    async fn find_or_create_label(
        &self,
        name: &str,
        parent_id: Option<&str>,
        is_group: bool,
        color: Option<&str>,
    ) -> Result<LinearLabel, LinearError> {
        let candidates = self.labels_named(name).await?;
        if let Some(existing) = select_label(candidates, name, parent_id, is_group) {
            debug!(label = %name, id = %existing.id, "Label exists");
            return Ok(existing);
        }
        self.create_label(name, parent_id, is_group, color).await
    }

    async fn update_issue(
        &self,
        issue_id: &str,
        input: Value,
        operation: &'static str,
    ) -> Result<(), LinearError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct UpdateResponse {
            issue_update: SuccessPayload,
        }

        let resp: UpdateResponse = self
            .graphql(
                queries::UPDATE_ISSUE,
                json!({ "id": issue_id, "input": input }),
            )
            .await?;
        resp.issue_update.into_result(operation)
    }
}

#[async_trait]
impl IssueTracker for LinearClient {
    async fn find_issue_by_pull_request_url(
        &self,
        url: &str,
    ) -> Result<Option<LinearIssue>, LinearError> {
        #[derive(Deserialize)]
        struct AttachmentsResponse {
            #[serde(rename = "attachmentsForURL")]
            attachments_for_url: Connection<AttachmentNode>,
        }
        #[derive(Deserialize)]
        struct AttachmentNode {
            issue: Option<IssueNode>,
        }

        let resp: AttachmentsResponse = self
            .graphql(queries::ISSUE_FOR_URL, json!({ "url": url }))
            .await?;

        Ok(resp
            .attachments_for_url
            .nodes
            .into_iter()
            .find_map(|node| node.issue)
            .map(LinearIssue::from))
    }

    async fn ensure_label(
        &self,
        name: &str,
        group: Option<&str>,
        color: Option<&str>,
    ) -> Result<LinearLabel, LinearError> {
        let parent = match group {
            Some(group) => Some(self.find_or_create_label(group, None, true, None).await?),
            None => None,
        };
        self.find_or_create_label(name, parent.as_ref().map(|p| p.id.as_str()), false, color)
            .await
    }

    async fn attach_link(
        &self,
        issue_id: &str,
        url: &str,
        title: &str,
    ) -> Result<(), LinearError> {
        #[derive(Deserialize)]
        struct AttachResponse {
            #[serde(rename = "attachmentLinkURL")]
            attachment_link_url: SuccessPayload,
        }

        let resp: AttachResponse = self
            .graphql(
                queries::ATTACH_LINK,
                json!({ "issueId": issue_id, "url": url, "title": title }),
            )
            .await?;
        resp.attachment_link_url.into_result("attachmentLinkURL")
    }

    async fn update_issue_labels(
        &self,
        issue_id: &str,
        label_ids: &[String],
    ) -> Result<(), LinearError> {
        self.update_issue(issue_id, json!({ "labelIds": label_ids }), "issueUpdate(labels)")
            .await
    }

    async fn find_done_state(
        &self,
        team_id: &str,
        preferred_name: Option<&str>,
    ) -> Result<Option<WorkflowState>, LinearError> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct StatesResponse {
            workflow_states: Connection<StateNode>,
        }

        let resp: StatesResponse = self
            .graphql(queries::COMPLETED_STATES, json!({ "teamId": team_id }))
            .await?;
        let states = resp
            .workflow_states
            .nodes
            .into_iter()
            .map(WorkflowState::from)
            .collect();
        Ok(select_done_state(states, preferred_name))
    }

    async fn transition_issue_state(
        &self,
        issue_id: &str,
        state_id: &str,
    ) -> Result<(), LinearError> {
        self.update_issue(issue_id, json!({ "stateId": state_id }), "issueUpdate(state)")
            .await
    }
}

/// Picks an existing label matching `name` at the requested place in the hierarchy.
///
/// Group labels must be top-level groups; other labels must sit under
/// `parent_id` (or at top level when `None`).
#[must_use]
pub(crate) fn select_label(
    candidates: Vec<LabelNode>,
    name: &str,
    parent_id: Option<&str>,
    is_group: bool,
) -> Option<LinearLabel> {
    candidates
        .into_iter()
        .filter(|node| node.name.eq_ignore_ascii_case(name))
        .filter(|node| node.is_group == is_group)
        .find(|node| node.parent.as_ref().map(|p| p.id.as_str()) == parent_id)
        .map(LinearLabel::from)
}

/// Picks the completed state to transition into.
///
/// A state named `preferred_name` (case-insensitive) wins; otherwise the
/// first completed state in workflow order.
#[must_use]
pub(crate) fn select_done_state(
    mut states: Vec<WorkflowState>,
    preferred_name: Option<&str>,
) -> Option<WorkflowState> {
    states.retain(|state| state.state_type == "completed");

    if let Some(preferred) = preferred_name {
        if let Some(index) = states
            .iter()
            .position(|state| state.name.eq_ignore_ascii_case(preferred))
        {
            return Some(states.swap_remove(index));
        }
    }

    states
        .into_iter()
        .min_by(|a, b| a.position.total_cmp(&b.position))
}

#[derive(Deserialize)]
struct Connection<T> {
    nodes: Vec<T>,
}

#[derive(Deserialize)]
struct IdRef {
    id: String,
}

#[derive(Deserialize)]
struct SuccessPayload {
    success: bool,
}

impl SuccessPayload {
    fn into_result(self, operation: &'static str) -> Result<(), LinearError> {
        if self.success {
            Ok(())
        } else {
            Err(LinearError::Unsuccessful { operation })
        }
    }
}

/// Label as returned by label queries.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LabelNode {
    id: String,
    name: String,
    #[serde(default)]
    is_group: bool,
    parent: Option<LabelParent>,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelParent {
    id: String,
}

impl From<LabelNode> for LinearLabel {
    fn from(node: LabelNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
            parent_id: node.parent.map(|p| p.id),
        }
    }
}

#[derive(Deserialize)]
struct StateNode {
    id: String,
    name: String,
    #[serde(rename = "type")]
    state_type: String,
    #[serde(default)]
    position: f64,
}

impl From<StateNode> for WorkflowState {
    fn from(node: StateNode) -> Self {
        Self {
            id: node.id,
            name: node.name,
            state_type: node.state_type,
            position: node.position,
        }
    }
}

#[derive(Deserialize)]
struct IssueNode {
    id: String,
    identifier: String,
    title: String,
    url: Option<String>,
    team: Option<IdRef>,
    state: Option<StateNode>,
    labels: Option<Connection<LabelNode>>,
}

impl From<IssueNode> for LinearIssue {
    fn from(node: IssueNode) -> Self {
        Self {
            id: node.id,
            identifier: node.identifier,
            title: node.title,
            url: node.url,
            team_id: node.team.map(|t| t.id),
            state: node.state.map(WorkflowState::from),
            labels: node
                .labels
                .map(|labels| labels.nodes.into_iter().map(LinearLabel::from).collect())
                .unwrap_or_default(),
        }
    }
}
