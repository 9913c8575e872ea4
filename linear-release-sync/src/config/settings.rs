//! Treatment settings deserialization.

use super::ConfigError;
use crate::discovery::ComparisonPolicy;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Parsed settings from a `linear-release.toml` file.
///
/// Every key is optional; an absent file behaves like an empty one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TreatmentSettings {
    /// Handlebars format for the version label name.
    #[serde(default = "default_label_name_format")]
    pub label_name_format: String,

    /// Parent label group for version labels. Empty disables grouping.
    #[serde(default = "default_label_group")]
    pub label_group: String,

    /// Hex color (`#rrggbb`) for newly created labels.
    #[serde(default)]
    pub label_color: Option<String>,

    /// Handlebars format for the release attachment title.
    #[serde(default = "default_attachment_title_format")]
    pub attachment_title_format: String,

    /// Whether to attach the release link to each issue.
    #[serde(default = "default_true")]
    pub attach_release_link: bool,

    /// Preferred completed workflow state name (e.g. "Released").
    #[serde(default)]
    pub done_state_name: Option<String>,

    /// Which prior releases count as comparable.
    #[serde(default)]
    pub comparison: ComparisonPolicy,
}

pub(crate) fn default_label_name_format() -> String {
    "{{tag}}".to_string()
}

pub(crate) fn default_label_group() -> String {
    "Releases".to_string()
}

pub(crate) fn default_attachment_title_format() -> String {
    "Released in {{tag}}".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for TreatmentSettings {
    fn default() -> Self {
        Self {
            label_name_format: default_label_name_format(),
            label_group: default_label_group(),
            label_color: None,
            attachment_title_format: default_attachment_title_format(),
            attach_release_link: true,
            done_state_name: None,
            comparison: ComparisonPolicy::default(),
        }
    }
}

impl TreatmentSettings {
    /// Loads and validates settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, parsed or validated.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading treatment settings");

        if !path.exists() {
            return Err(ConfigError::MissingFile {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        let settings: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validates setting values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label_name_format.trim().is_empty() {
            return Err(invalid("label-name-format", "must not be empty"));
        }

        if self.attach_release_link && self.attachment_title_format.trim().is_empty() {
            return Err(invalid("attachment-title-format", "must not be empty"));
        }

        if let Some(color) = &self.label_color {
            if !is_hex_color(color) {
                return Err(invalid(
                    "label-color",
                    &format!("'{color}' is not a #rrggbb color"),
                ));
            }
        }

        if let Some(name) = &self.done_state_name {
            if name.trim().is_empty() {
                return Err(invalid("done-state-name", "must not be empty when set"));
            }
        }

        Ok(())
    }

    /// Returns the label group name, or `None` if grouping is disabled.
    #[must_use]
    pub fn label_group(&self) -> Option<&str> {
        let group = self.label_group.trim();
        (!group.is_empty()).then_some(group)
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn is_hex_color(value: &str) -> bool {
    value
        .strip_prefix('#')
        .is_some_and(|hex| hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()))
}
