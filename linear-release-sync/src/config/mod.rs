//! Configuration loading and validation.
//!
//! Run configuration arrives from the command line; treatment settings come
//! from an optional `linear-release.toml`.

mod error;
mod mode;
mod settings;

pub use error::ConfigError;
pub use mode::SyncMode;
pub use settings::TreatmentSettings;

use bstr::ByteSlice;
use std::path::Path;
use tracing::info;

/// Loads treatment settings, falling back to defaults when no path is given.
///
/// # Errors
///
/// Returns [`ConfigError`] if an explicitly given file is missing or invalid.
pub fn load_settings(path: Option<&Path>) -> Result<TreatmentSettings, ConfigError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "Loading settings");
            TreatmentSettings::load(path)
        }
        None => Ok(TreatmentSettings::default()),
    }
}

/// Checks that a release tag is a valid git tag name.
///
/// # Errors
///
/// Returns [`ConfigError::ValidationError`] for names git would refuse.
pub fn validate_tag_name(tag: &str) -> Result<(), ConfigError> {
    gix_validate::tag::name(tag.as_bytes().as_bstr())
        .map(|_| ())
        .map_err(|e| ConfigError::ValidationError {
            field: "tag".to_string(),
            message: format!("'{tag}' is not a valid tag name: {e}"),
        })
}
