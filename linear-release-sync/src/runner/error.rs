//! Runner error types.

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Invalid arguments or settings.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// GitHub client initialization errors.
    #[error(transparent)]
    GitHub(#[from] crate::github::GitHubError),

    /// The release or its pull requests could not be determined.
    #[error(transparent)]
    Discovery(#[from] crate::discovery::DiscoveryError),

    /// Label name or attachment title could not be rendered.
    #[error(transparent)]
    Template(#[from] crate::templates::TemplateError),

    /// The version label could not be prepared.
    #[error(transparent)]
    Treatment(#[from] crate::treatment::TreatmentError),
}
