//! CLI for Linear Release Sync.
//!
//! Resolves the pull requests shipped in a GitHub release and marks their
//! linked Linear issues with the release.

use clap::Parser;
use linear_release_sync::{
    load_settings, Repository, RunSummary, Runner, RunnerConfig, RunnerError, SyncMode,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Linear Release Sync - Mark Linear issues with the GitHub release that shipped them.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Repository in owner/name format.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Repository,

    /// Release tag to process.
    #[arg(long, env = "RELEASE_TAG")]
    tag: String,

    /// GitHub token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,

    /// Linear API key.
    #[arg(long, env = "LINEAR_API_KEY", hide_env_values = true)]
    linear_token: String,

    /// What to do with each linked issue: `label` or `complete`.
    #[arg(long, default_value = "label")]
    mode: SyncMode,

    /// Look up everything without changing Linear.
    #[arg(long)]
    dry_run: bool,

    /// Maximum concurrent API requests.
    #[arg(long, default_value_t = 5)]
    concurrency: usize,

    /// Path to a linear-release.toml settings file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    init_tracing();

    // octocrab and reqwest share rustls; pick one provider for both.
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Parse arguments
    let args = Args::parse();

    // Run the main logic
    match run(args).await {
        Ok(summary) => {
            print_summary(&summary);

            if summary.has_failures() {
                ExitCode::from(1)
            } else {
                ExitCode::from(0)
            }
        }
        Err(e) => {
            error!(error = %e, "Critical failure");
            ExitCode::from(2)
        }
    }
}

/// Initializes tracing with environment filter support.
///
/// Sets up the global tracing subscriber with:
/// - Compact log formatting (single-line output)
/// - Log level filtering via `RUST_LOG` env var (defaults to "info")
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Main execution logic.
async fn run(args: Args) -> Result<RunSummary, RunnerError> {
    let settings = load_settings(args.config.as_deref())?;
    let config = RunnerConfig::new(args.repository, args.tag, args.github_token, args.linear_token)
        .with_mode(args.mode)
        .with_dry_run(args.dry_run)
        .with_concurrency(args.concurrency)
        .with_settings(settings);

    let runner = Runner::new(config)?;
    runner.run().await
}

/// Prints the final run summary.
fn print_summary(summary: &RunSummary) {
    println!("\nSummary:");
    println!(
        "  Mode: {}",
        if summary.dry_run { "Dry Run" } else { "Live" }
    );
    println!("  Release: {}", summary.tag);
    if let Some(strategy) = summary.strategy {
        println!("  Strategy: {strategy}");
    }
    if let Some(previous) = &summary.previous_tag {
        println!("  Previous release: {previous}");
    }
    println!("  Commits examined: {}", summary.commits_examined);
    println!(
        "  Pull requests discovered: {}",
        summary.pull_requests_discovered
    );
    println!(
        "  Pull requests without issue: {}",
        summary.pull_requests_without_issue
    );

    if summary.dry_run {
        println!("  Issues that would be updated: {}", summary.issues_previewed);
    } else {
        println!("  Issues updated: {}", summary.issues_updated);
    }
    println!("  Duplicate issues skipped: {}", summary.issues_duplicated);
    println!("  Failures: {}", summary.issues_failed);

    if !summary.updated_issues.is_empty() {
        println!("  Issues: {}", summary.updated_issues.join(", "));
    }
}
