//! In-memory GitHub and Linear fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use linear_release_sync::{
    canonical_pull_request_url, AncestryCommit, AncestryPage, GitHubError, IssueTracker,
    LinearError, LinearIssue, LinearLabel, Release, ReleaseSource, Repository, WorkflowState,
};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Mutex;

pub const OWNER: &str = "acme";
pub const REPO: &str = "widgets";

pub fn repository() -> Repository {
    Repository::new(OWNER, REPO)
}

/// Canonical URL of pull request `number` in the fixture repository.
pub fn pr(number: u64) -> String {
    canonical_pull_request_url(OWNER, REPO, number)
}

/// A release created at noon on the given day of March 2024.
pub fn release(tag: &str, day: u32, target: &str, body: Option<&str>) -> Release {
    Release {
        tag_name: tag.to_string(),
        body: body.map(str::to_string),
        created_at: Some(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()),
        target_commitish: target.to_string(),
        html_url: Some(format!(
            "https://github.com/{OWNER}/{REPO}/releases/tag/{tag}"
        )),
        draft: false,
    }
}

/// A fake repository: releases, a commit graph expressed as per-tag
/// ancestries, and pull request associations per commit.
#[derive(Default)]
pub struct FakeReleaseSource {
    releases: Vec<Release>,
    /// Commits reachable from each tag, newest first.
    ancestry: HashMap<String, Vec<String>>,
    associations: HashMap<String, Vec<String>>,
    notes: HashMap<String, String>,
    page_size: usize,
    cursorless_page: Option<usize>,
    failing_commits: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeReleaseSource {
    pub fn new() -> Self {
        Self {
            page_size: 100,
            ..Self::default()
        }
    }

    pub fn with_release(mut self, release: Release) -> Self {
        self.releases.push(release);
        self
    }

    /// Sets the commits reachable from `tag`, newest first.
    pub fn with_ancestry(mut self, tag: &str, commits: &[&str]) -> Self {
        self.ancestry.insert(
            tag.to_string(),
            commits.iter().map(|sha| sha.to_string()).collect(),
        );
        self
    }

    pub fn with_commit(mut self, sha: &str, pull_requests: &[String]) -> Self {
        self.associations
            .insert(sha.to_string(), pull_requests.to_vec());
        self
    }

    pub fn with_notes(mut self, tag: &str, notes: &str) -> Self {
        self.notes.insert(tag.to_string(), notes.to_string());
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Makes history page `page` (1-based) claim a successor without a cursor.
    pub fn with_cursorless_page(mut self, page: usize) -> Self {
        self.cursorless_page = Some(page);
        self
    }

    pub fn with_failing_commit(mut self, sha: &str) -> Self {
        self.failing_commits.insert(sha.to_string());
        self
    }

    /// Every pull request associated with a commit reachable from `tag`.
    pub fn ancestry_pull_requests(&self, tag: &str) -> BTreeSet<String> {
        self.ancestry
            .get(tag)
            .into_iter()
            .flatten()
            .flat_map(|sha| self.associations.get(sha).into_iter().flatten().cloned())
            .collect()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn commit(&self, sha: &str) -> AncestryCommit {
        AncestryCommit {
            sha: sha.to_string(),
            pull_requests: self.associations.get(sha).cloned().unwrap_or_default(),
        }
    }
}

#[async_trait]
impl ReleaseSource for FakeReleaseSource {
    async fn get_release_by_tag(&self, tag: &str) -> Result<Release, GitHubError> {
        self.record(format!("release:{tag}"));
        self.releases
            .iter()
            .find(|release| release.tag_name == tag)
            .cloned()
            .ok_or_else(|| GitHubError::NotFound {
                tag: tag.to_string(),
            })
    }

    async fn list_releases(&self) -> Result<Vec<Release>, GitHubError> {
        self.record("list".to_string());
        let mut releases = self.releases.clone();
        releases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(releases)
    }

    async fn compare_commits(&self, base: &str, head: &str) -> Result<Vec<String>, GitHubError> {
        self.record(format!("compare:{base}...{head}"));
        let reachable_from_base: HashSet<&String> =
            self.ancestry.get(base).into_iter().flatten().collect();
        let head_commits = self
            .ancestry
            .get(head)
            .ok_or_else(|| GitHubError::MissingRef {
                tag: head.to_string(),
            })?;

        Ok(head_commits
            .iter()
            .filter(|sha| !reachable_from_base.contains(sha))
            .cloned()
            .collect())
    }

    async fn commit_associated_pull_requests(
        &self,
        sha: &str,
    ) -> Result<Vec<String>, GitHubError> {
        self.record(format!("pulls:{sha}"));
        if self.failing_commits.contains(sha) {
            return Err(GitHubError::GraphQl(format!("lookup of {sha} failed")));
        }
        Ok(self.associations.get(sha).cloned().unwrap_or_default())
    }

    async fn release_ancestry_page(
        &self,
        tag: &str,
        cursor: Option<&str>,
    ) -> Result<AncestryPage, GitHubError> {
        self.record(format!("history:{tag}:{}", cursor.unwrap_or("-")));
        let commits = self.ancestry.get(tag).ok_or_else(|| GitHubError::MissingRef {
            tag: tag.to_string(),
        })?;

        let page = match cursor {
            None => 0,
            Some(cursor) => cursor
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| GitHubError::GraphQl(format!("bad cursor {cursor}")))?,
        };
        let start = page * self.page_size;
        let end = (start + self.page_size).min(commits.len());
        let has_next_page = end < commits.len();

        let next_cursor = if self.cursorless_page == Some(page + 1) {
            None
        } else {
            has_next_page.then(|| format!("page-{}", page + 1))
        };

        Ok(AncestryPage {
            commits: commits[start.min(end)..end]
                .iter()
                .map(|sha| self.commit(sha))
                .collect(),
            has_next_page,
            next_cursor,
        })
    }

    async fn generate_release_notes(
        &self,
        tag: &str,
        previous_tag: Option<&str>,
    ) -> Result<String, GitHubError> {
        self.record(format!("notes:{tag}:{}", previous_tag.unwrap_or("-")));
        Ok(self.notes.get(tag).cloned().unwrap_or_default())
    }
}

/// Mutable Linear state shared by the fake tracker.
#[derive(Default)]
pub struct TrackerState {
    pub labels: HashMap<String, LinearLabel>,
    pub issue_labels: HashMap<String, Vec<String>>,
    pub issue_states: HashMap<String, WorkflowState>,
    pub attachments: HashMap<String, BTreeSet<String>>,
    pub label_updates: usize,
    pub transitions: usize,
}

/// A fake Linear workspace.
#[derive(Default)]
pub struct FakeIssueTracker {
    issues: HashMap<String, LinearIssue>,
    done_states: HashMap<String, WorkflowState>,
    failing_lookups: HashSet<String>,
    failing_issues: HashSet<String>,
    pub state: Mutex<TrackerState>,
}

pub fn workflow_state(id: &str, name: &str, state_type: &str) -> WorkflowState {
    WorkflowState {
        id: id.to_string(),
        name: name.to_string(),
        state_type: state_type.to_string(),
        position: 0.0,
    }
}

pub fn issue(id: &str, identifier: &str) -> LinearIssue {
    LinearIssue {
        id: id.to_string(),
        identifier: identifier.to_string(),
        title: format!("Issue {identifier}"),
        url: None,
        team_id: Some("team".to_string()),
        state: Some(workflow_state("in-progress", "In Progress", "started")),
        labels: Vec::new(),
    }
}

impl FakeIssueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Links `pull_request` to `issue`.
    pub fn with_link(mut self, pull_request: &str, issue: LinearIssue) -> Self {
        {
            let state = self.state.get_mut().unwrap();
            for label in &issue.labels {
                state.labels.insert(label.id.clone(), label.clone());
            }
            state
                .issue_labels
                .entry(issue.id.clone())
                .or_insert_with(|| issue.labels.iter().map(|l| l.id.clone()).collect());
            if let Some(workflow) = &issue.state {
                state
                    .issue_states
                    .entry(issue.id.clone())
                    .or_insert_with(|| workflow.clone());
            }
        }
        self.issues.insert(pull_request.to_string(), issue);
        self
    }

    pub fn with_done_state(mut self, team_id: &str, state: WorkflowState) -> Self {
        self.done_states.insert(team_id.to_string(), state);
        self
    }

    pub fn with_failing_lookup(mut self, pull_request: &str) -> Self {
        self.failing_lookups.insert(pull_request.to_string());
        self
    }

    /// Makes every mutation of the issue with this id fail.
    pub fn with_failing_issue(mut self, issue_id: &str) -> Self {
        self.failing_issues.insert(issue_id.to_string());
        self
    }

    pub fn label_names(&self, issue_id: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state
            .issue_labels
            .get(issue_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.labels.get(id).map(|label| label.name.clone()))
            .collect()
    }

    pub fn attachments(&self, issue_id: &str) -> BTreeSet<String> {
        let state = self.state.lock().unwrap();
        state.attachments.get(issue_id).cloned().unwrap_or_default()
    }

    pub fn issue_state(&self, issue_id: &str) -> Option<WorkflowState> {
        self.state.lock().unwrap().issue_states.get(issue_id).cloned()
    }

    fn check_mutable(&self, issue_id: &str) -> Result<(), LinearError> {
        if self.failing_issues.contains(issue_id) {
            return Err(LinearError::GraphQl(format!("issue {issue_id} is locked")));
        }
        Ok(())
    }

    fn label_named(state: &mut TrackerState, name: &str, parent_id: Option<String>) -> LinearLabel {
        if let Some(existing) = state
            .labels
            .values()
            .find(|label| label.name == name && label.parent_id == parent_id)
        {
            return existing.clone();
        }

        let label = LinearLabel {
            id: format!("label-{name}"),
            name: name.to_string(),
            parent_id,
        };
        state.labels.insert(label.id.clone(), label.clone());
        label
    }
}

#[async_trait]
impl IssueTracker for FakeIssueTracker {
    async fn find_issue_by_pull_request_url(
        &self,
        url: &str,
    ) -> Result<Option<LinearIssue>, LinearError> {
        if self.failing_lookups.contains(url) {
            return Err(LinearError::GraphQl(format!("lookup of {url} failed")));
        }

        let Some(issue) = self.issues.get(url) else {
            return Ok(None);
        };

        // Reflect mutations made so far, as Linear would.
        let state = self.state.lock().unwrap();
        let mut issue = issue.clone();
        issue.labels = state
            .issue_labels
            .get(&issue.id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.labels.get(id).cloned())
            .collect();
        issue.state = state.issue_states.get(&issue.id).cloned();
        Ok(Some(issue))
    }

    async fn ensure_label(
        &self,
        name: &str,
        group: Option<&str>,
        _color: Option<&str>,
    ) -> Result<LinearLabel, LinearError> {
        let mut state = self.state.lock().unwrap();
        let parent_id = group.map(|group| Self::label_named(&mut state, group, None).id);
        Ok(Self::label_named(&mut state, name, parent_id))
    }

    async fn attach_link(
        &self,
        issue_id: &str,
        url: &str,
        _title: &str,
    ) -> Result<(), LinearError> {
        self.check_mutable(issue_id)?;
        self.state
            .lock()
            .unwrap()
            .attachments
            .entry(issue_id.to_string())
            .or_default()
            .insert(url.to_string());
        Ok(())
    }

    async fn update_issue_labels(
        &self,
        issue_id: &str,
        label_ids: &[String],
    ) -> Result<(), LinearError> {
        self.check_mutable(issue_id)?;
        let mut state = self.state.lock().unwrap();
        state
            .issue_labels
            .insert(issue_id.to_string(), label_ids.to_vec());
        state.label_updates += 1;
        Ok(())
    }

    async fn find_done_state(
        &self,
        team_id: &str,
        _preferred_name: Option<&str>,
    ) -> Result<Option<WorkflowState>, LinearError> {
        Ok(self.done_states.get(team_id).cloned())
    }

    async fn transition_issue_state(
        &self,
        issue_id: &str,
        state_id: &str,
    ) -> Result<(), LinearError> {
        self.check_mutable(issue_id)?;
        let target = self
            .done_states
            .values()
            .find(|state| state.id == state_id)
            .cloned()
            .ok_or(LinearError::MissingData)?;
        let mut state = self.state.lock().unwrap();
        state.issue_states.insert(issue_id.to_string(), target);
        state.transitions += 1;
        Ok(())
    }
}
