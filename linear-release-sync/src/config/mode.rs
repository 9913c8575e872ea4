//! Treatment mode.

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happens to each Linear issue linked to a released pull request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncMode {
    /// Attach the release link and apply the version label.
    #[default]
    Label,

    /// As [`SyncMode::Label`], then move the issue to a completed state.
    Complete,
}

impl SyncMode {
    /// Returns the mode as used on the command line.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Label => "label",
            Self::Complete => "complete",
        }
    }

    /// Returns true if issues should be transitioned to a completed state.
    #[must_use]
    pub fn transitions_state(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "label" => Ok(Self::Label),
            "complete" | "done" => Ok(Self::Complete),
            other => Err(ConfigError::ValidationError {
                field: "mode".to_string(),
                message: format!("unknown mode '{other}', expected 'label' or 'complete'"),
            }),
        }
    }
}
