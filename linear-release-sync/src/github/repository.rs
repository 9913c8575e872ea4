//! Target repository identity.

use crate::config::ConfigError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The GitHub repository whose releases are being processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Repository owner (user or organization).
    pub owner: String,

    /// Repository name.
    pub name: String,
}

impl Repository {
    /// Creates a repository reference from its owner and name.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Full repository name in "owner/name" format.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for Repository {
    type Err = ConfigError;

    /// Parses the `owner/name` form used by `GITHUB_REPOSITORY`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: &str| ConfigError::ValidationError {
            field: "repository".to_string(),
            message: format!("'{s}' {message}"),
        };

        let (owner, name) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| invalid("is not in owner/name format"))?;
        if owner.is_empty() || name.is_empty() {
            return Err(invalid("has an empty owner or name"));
        }
        if name.contains('/') {
            return Err(invalid("has more than one '/'"));
        }

        Ok(Self::new(owner, name))
    }
}
