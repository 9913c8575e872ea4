//! Runner configuration.

use crate::config::{validate_tag_name, ConfigError, SyncMode, TreatmentSettings};
use crate::discovery::DEFAULT_CONCURRENCY;
use crate::github::Repository;

/// Configuration for one release sync run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Repository the release belongs to.
    repository: Repository,
    /// Release tag to process.
    tag: String,
    /// GitHub token used for API calls.
    github_token: String,
    /// Linear API key.
    linear_token: String,
    /// What to do with each linked issue.
    mode: SyncMode,
    /// Whether to preview changes without touching Linear.
    dry_run: bool,
    /// Maximum concurrent API requests.
    concurrency: usize,
    /// Label and attachment settings.
    settings: TreatmentSettings,
}

impl RunnerConfig {
    /// Creates a configuration with default mode, settings and concurrency.
    pub fn new(
        repository: Repository,
        tag: impl Into<String>,
        github_token: impl Into<String>,
        linear_token: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            tag: tag.into(),
            github_token: github_token.into(),
            linear_token: linear_token.into(),
            mode: SyncMode::default(),
            dry_run: false,
            concurrency: DEFAULT_CONCURRENCY,
            settings: TreatmentSettings::default(),
        }
    }

    /// Sets the treatment mode.
    #[must_use]
    pub fn with_mode(mut self, mode: SyncMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Sets the maximum concurrent API requests.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the treatment settings.
    #[must_use]
    pub fn with_settings(mut self, settings: TreatmentSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Checks every value before any API call is made.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for the first invalid value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repository.owner.is_empty()
            || self.repository.name.is_empty()
            || self.repository.owner.contains('/')
            || self.repository.name.contains('/')
        {
            return Err(ConfigError::ValidationError {
                field: "repository".to_string(),
                message: format!("'{}' is not in owner/name format", self.repository),
            });
        }

        validate_tag_name(&self.tag)?;

        if self.concurrency == 0 {
            return Err(ConfigError::ValidationError {
                field: "concurrency".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        self.settings.validate()
    }

    /// Returns the repository.
    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    /// Returns the release tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the configured GitHub token.
    pub fn github_token(&self) -> &str {
        &self.github_token
    }

    /// Returns the configured Linear API key.
    pub fn linear_token(&self) -> &str {
        &self.linear_token
    }

    /// Returns the treatment mode.
    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    /// Returns whether dry-run mode is enabled.
    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Returns the max concurrent API requests.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the treatment settings.
    pub fn settings(&self) -> &TreatmentSettings {
        &self.settings
    }
}
