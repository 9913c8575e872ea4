//! octocrab-backed [`ReleaseSource`].

use super::models::{
    AncestryData, AssociatedPullRequest, CommitComparison, GeneratedNotes,
};
use super::{AncestryPage, GitHubError, Release, ReleaseSource, Repository};
use crate::rate_limit::ensure_core_rate_limit;
use async_trait::async_trait;
use octocrab::Octocrab;
use serde_json::json;
use tracing::debug;

/// Page size for REST listings and the GraphQL history walk.
const PAGE_SIZE: u8 = 100;

/// Upper bound on associated pull requests fetched per commit in the history walk.
const ASSOCIATED_PRS_PER_COMMIT: u8 = 10;

const ANCESTRY_QUERY: &str = r#"
query($owner: String!, $name: String!, $qualifiedName: String!, $first: Int!, $perCommit: Int!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    ref(qualifiedName: $qualifiedName) {
      target {
        ... on Commit { ...History }
        ... on Tag { target { ... on Commit { ...History } } }
      }
    }
  }
}

fragment History on Commit {
  history(first: $first, after: $cursor) {
    pageInfo { hasNextPage endCursor }
    nodes {
      oid
      associatedPullRequests(first: $perCommit) { nodes { url } }
    }
  }
}
"#;

/// GitHub client bound to a single repository.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    repository: Repository,
}

impl GitHubClient {
    /// Builds a client authenticated with a personal or installation token.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Api`] if the HTTP client cannot be built.
    pub fn new(token: &str, repository: Repository) -> Result<Self, GitHubError> {
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .build()?;
        Ok(Self::with_octocrab(octocrab, repository))
    }

    /// Wraps an already configured octocrab instance.
    #[must_use]
    pub fn with_octocrab(octocrab: Octocrab, repository: Repository) -> Self {
        Self {
            octocrab,
            repository,
        }
    }

    /// The repository this client reads from.
    #[must_use]
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    fn route(&self, suffix: &str) -> String {
        format!(
            "/repos/{}/{}/{suffix}",
            self.repository.owner, self.repository.name
        )
    }
}

#[async_trait]
impl ReleaseSource for GitHubClient {
    async fn get_release_by_tag(&self, tag: &str) -> Result<Release, GitHubError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let release = self
            .octocrab
            .repos(&self.repository.owner, &self.repository.name)
            .releases()
            .get_by_tag(tag)
            .await
            .map_err(|e| GitHubError::from_release_lookup(e, tag))?;
        Ok(release.into())
    }

    async fn list_releases(&self) -> Result<Vec<Release>, GitHubError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let page = self
            .octocrab
            .repos(&self.repository.owner, &self.repository.name)
            .releases()
            .list()
            .per_page(PAGE_SIZE)
            .send()
            .await?;

        debug!(count = page.items.len(), "Listed releases");
        Ok(page.items.into_iter().map(Release::from).collect())
    }

    async fn compare_commits(&self, base: &str, head: &str) -> Result<Vec<String>, GitHubError> {
        let route = self.route(&format!("compare/{base}...{head}"));
        let mut commits = Vec::new();
        let mut page: u32 = 1;

        loop {
            ensure_core_rate_limit(&self.octocrab).await?;
            let params = [
                ("per_page", PAGE_SIZE.to_string()),
                ("page", page.to_string()),
            ];
            let comparison: CommitComparison = self.octocrab.get(&route, Some(&params)).await?;
            let received = comparison.commits.len();
            commits.extend(comparison.commits.into_iter().map(|c| c.sha));

            debug!(
                page,
                received,
                total = comparison.total_commits,
                "Fetched comparison page"
            );

            if received == 0 || commits.len() >= comparison.total_commits {
                break;
            }
            page += 1;
        }

        Ok(commits)
    }

    async fn commit_associated_pull_requests(
        &self,
        sha: &str,
    ) -> Result<Vec<String>, GitHubError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let route = self.route(&format!("commits/{sha}/pulls"));
        let params = [("per_page", PAGE_SIZE.to_string())];
        let pulls: Vec<AssociatedPullRequest> = self.octocrab.get(&route, Some(&params)).await?;
        Ok(pulls.into_iter().map(|pr| pr.html_url).collect())
    }

    async fn release_ancestry_page(
        &self,
        tag: &str,
        cursor: Option<&str>,
    ) -> Result<AncestryPage, GitHubError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let payload = json!({
            "query": ANCESTRY_QUERY,
            "variables": {
                "owner": self.repository.owner,
                "name": self.repository.name,
                "qualifiedName": format!("refs/tags/{tag}"),
                "first": PAGE_SIZE,
                "perCommit": ASSOCIATED_PRS_PER_COMMIT,
                "cursor": cursor,
            }
        });

        let data: AncestryData = self
            .octocrab
            .graphql(&payload)
            .await
            .map_err(GitHubError::from_graphql)?;

        data.repository
            .and_then(|repo| repo.git_ref)
            .and_then(|git_ref| git_ref.target)
            .and_then(|target| target.into_history())
            .map(AncestryPage::from)
            .ok_or_else(|| GitHubError::MissingRef {
                tag: tag.to_string(),
            })
    }

    async fn generate_release_notes(
        &self,
        tag: &str,
        previous_tag: Option<&str>,
    ) -> Result<String, GitHubError> {
        ensure_core_rate_limit(&self.octocrab).await?;
        let route = self.route("releases/generate-notes");
        let mut request = json!({ "tag_name": tag });
        if let Some(previous_tag) = previous_tag {
            request["previous_tag_name"] = json!(previous_tag);
        }
        let notes: GeneratedNotes = self.octocrab.post(route, Some(&request)).await?;
        Ok(notes.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    fn rate(remaining: u32) -> Value {
        json!({ "limit": 5000, "used": 5000 - remaining, "remaining": remaining, "reset": 0 })
    }

    fn rate_limit_body() -> Value {
        json!({
            "resources": { "core": rate(4000), "search": rate(30) },
            "rate": rate(4000)
        })
    }

    fn history_body(has_next_page: bool, cursor: Option<&str>) -> Value {
        json!({ "data": { "repository": { "ref": { "target": { "history": {
            "pageInfo": { "hasNextPage": has_next_page, "endCursor": cursor },
            "nodes": [{ "oid": "c1", "associatedPullRequests": { "nodes": [
                { "url": "https://github.com/acme/widgets/pull/1" }
            ] } }]
        } } } } } })
    }

    /// Reads one HTTP/1.1 request, including its body.
    async fn read_request(stream: &mut TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let read = stream.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);

            let text = String::from_utf8_lossy(&buffer);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buffer.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }

    /// A loopback GitHub answering `/rate_limit` and `/graphql`, recording
    /// every requested path. GraphQL replies are served in order.
    async fn fake_github(graphql: Vec<Value>) -> (GitHubClient, Arc<Mutex<Vec<String>>>) {
        let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let paths = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&paths);

        tokio::spawn(async move {
            let mut graphql = graphql.into_iter();
            while let Ok((mut stream, _)) = listener.accept().await {
                let request = read_request(&mut stream).await;
                let path = request
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or_default()
                    .to_string();
                recorded.lock().unwrap().push(path.clone());

                let body = match path.as_str() {
                    "/rate_limit" => Some(rate_limit_body()),
                    "/graphql" => graphql.next(),
                    _ => None,
                };
                let (status, body) = match body {
                    Some(body) => ("200 OK", body.to_string()),
                    None => ("404 Not Found", json!({ "message": "Not Found" }).to_string()),
                };
                let response = format!(
                    "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
        });

        let octocrab = Octocrab::builder()
            .base_uri(format!("http://{address}"))
            .unwrap()
            .build()
            .unwrap();
        let client = GitHubClient::with_octocrab(octocrab, Repository::new("acme", "widgets"));
        (client, paths)
    }

    #[tokio::test]
    async fn every_history_page_checks_the_rate_limit() {
        let (client, paths) = fake_github(vec![
            history_body(true, Some("c1 0")),
            history_body(false, None),
        ])
        .await;

        let first = client.release_ancestry_page("v1.0.0", None).await.unwrap();
        let second = client
            .release_ancestry_page("v1.0.0", first.next_cursor.as_deref())
            .await
            .unwrap();

        assert!(first.has_next_page);
        assert!(!second.has_next_page);
        assert_eq!(
            first.commits[0].pull_requests,
            vec!["https://github.com/acme/widgets/pull/1"]
        );
        assert_eq!(
            *paths.lock().unwrap(),
            vec!["/rate_limit", "/graphql", "/rate_limit", "/graphql"]
        );
    }

    #[tokio::test]
    async fn graphql_errors_keep_their_messages() {
        let (client, _) = fake_github(vec![json!({
            "data": null,
            "errors": [{ "message": "Something went wrong" }]
        })])
        .await;

        let result = client.release_ancestry_page("v1.0.0", None).await;

        assert!(matches!(
            result,
            Err(GitHubError::GraphQl(message)) if message == "Something went wrong"
        ));
    }

    #[tokio::test]
    async fn missing_tag_is_reported() {
        let (client, _) = fake_github(vec![json!({ "data": { "repository": { "ref": null } } })]).await;

        let result = client.release_ancestry_page("v9.9.9", None).await;

        assert!(matches!(
            result,
            Err(GitHubError::MissingRef { tag }) if tag == "v9.9.9"
        ));
    }
}
