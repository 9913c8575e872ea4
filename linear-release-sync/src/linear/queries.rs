//! GraphQL documents sent to Linear.

pub(super) const ISSUE_FOR_URL: &str = r#"
query IssueForPullRequest($url: String!) {
  attachmentsForURL(url: $url) {
    nodes {
      issue {
        id
        identifier
        title
        url
        team { id }
        state { id name type position }
        labels { nodes { id name parent { id } } }
      }
    }
  }
}
"#;

pub(super) const LABELS_BY_NAME: &str = r#"
query LabelsByName($name: String!) {
  issueLabels(filter: { name: { eqIgnoreCase: $name } }, first: 50) {
    nodes { id name isGroup parent { id } }
  }
}
"#;

pub(super) const CREATE_LABEL: &str = r#"
mutation CreateLabel($input: IssueLabelCreateInput!) {
  issueLabelCreate(input: $input) {
    success
    issueLabel { id name isGroup parent { id } }
  }
}
"#;

pub(super) const ATTACH_LINK: &str = r#"
mutation AttachLink($issueId: String!, $url: String!, $title: String) {
  attachmentLinkURL(issueId: $issueId, url: $url, title: $title) { success }
}
"#;

pub(super) const UPDATE_ISSUE: &str = r#"
mutation UpdateIssue($id: String!, $input: IssueUpdateInput!) {
  issueUpdate(id: $id, input: $input) { success }
}
"#;

pub(super) const COMPLETED_STATES: &str = r#"
query CompletedStates($teamId: ID!) {
  workflowStates(filter: { team: { id: { eq: $teamId } }, type: { eq: "completed" } }) {
    nodes { id name type position }
  }
}
"#;
