#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod config;
pub mod discovery;
pub mod github;
pub mod linear;
pub mod pull_requests;
pub mod rate_limit;
pub mod references;
pub mod runner;
pub mod summary;
pub mod templates;
pub mod treatment;

pub use config::{load_settings, validate_tag_name, ConfigError, SyncMode, TreatmentSettings};
pub use discovery::{
    discover_pull_requests, find_previous_comparable, ComparisonPolicy, DiscoveryError,
    DiscoveryOptions, DiscoveryReport, DiscoveryStrategy,
};
pub use github::{
    AncestryCommit, AncestryPage, GitHubClient, GitHubError, Release, ReleaseSource, Repository,
};
pub use linear::{IssueTracker, LinearClient, LinearError, LinearIssue, LinearLabel, WorkflowState};
pub use pull_requests::{
    canonical_pull_request_url, normalize_pull_request_url, parse_pull_request_url,
    PullRequestRef, PullRequestSet,
};
pub use rate_limit::{check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo};
pub use references::extract_pull_request_urls;
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{ProcessingResult, RunSummary};
pub use templates::{create_handlebars_registry, ReleaseContext, TemplateError, TemplateRenderer};
pub use treatment::{
    apply_treatment, merge_exclusive, prepare_label, AppliedTreatment, ReleaseAttachment,
    TreatmentError, TreatmentPlan,
};
