//! Label name and attachment title rendering using Handlebars.
//!
//! Formats come from the treatment settings and may use `{{tag}}`,
//! `{{repository}}`, `{{owner}}`, `{{repo}}` and `{{release_url}}`.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TemplateRenderer};

use crate::github::{Release, Repository};
use serde::Serialize;

/// Values available to label and attachment templates.
#[derive(Debug, Clone, Serialize)]
pub struct ReleaseContext {
    /// Release tag name.
    pub tag: String,

    /// Full repository name in "owner/name" format.
    pub repository: String,

    /// Repository owner.
    pub owner: String,

    /// Repository name.
    pub repo: String,

    /// Link to the release page; empty when unknown.
    pub release_url: String,
}

impl ReleaseContext {
    /// Builds the context for a release of a repository.
    #[must_use]
    pub fn new(repository: &Repository, release: &Release) -> Self {
        Self {
            tag: release.tag_name.clone(),
            repository: repository.full_name(),
            owner: repository.owner.clone(),
            repo: repository.name.clone(),
            release_url: release_url(repository, release),
        }
    }
}

/// Returns the release page URL, deriving it from the tag when GitHub gave none.
#[must_use]
pub fn release_url(repository: &Repository, release: &Release) -> String {
    release.html_url.clone().unwrap_or_else(|| {
        format!(
            "https://github.com/{}/releases/tag/{}",
            repository.full_name(),
            release.tag_name
        )
    })
}
