use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use gh_pr::config::Config;
use gh_pr::formatter::{batch_summary_json, batch_summary_markdown, permission_markdown};
use gh_pr::github::GraphQLClient;
use gh_pr::services::{
    BatchConfig, BatchEngine, MutationOrchestrator, ProgressCallback,
    batch::{DEFAULT_MAX_CONCURRENCY, DEFAULT_RATE_LIMIT},
};
use gh_pr::types::{BatchSummary, PermissionLevel, RepositoryId};

#[derive(Parser)]
#[command(name = "gh-pr")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Review GitHub pull request comments in bulk - resolve outdated review threads and accept code suggestions across many PRs with rate-limited, permission-checked batch operations"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// GitHub personal access token (can also be set via GH_PR_GITHUB_TOKEN or GITHUB_TOKEN, or the config file)
    #[arg(long, global = true)]
    github_token: Option<String>,
    /// Path to a config file (default: <config dir>/gh-pr/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Minimum seconds between API operations, enforced globally across all workers
    #[arg(long, global = true)]
    rate_limit: Option<f64>,
    /// Maximum concurrent per-PR operations
    #[arg(long, global = true)]
    concurrency: Option<usize>,
    /// Output format for results - markdown for display, json for programmatic use
    #[arg(long, global = true, default_value = "markdown")]
    format: OutputFormat,
    /// Suppress the progress bar
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Markdown,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve outdated review threads across pull requests
    ResolveOutdated {
        /// PR identifiers in owner/repo#number form or GitHub PR URLs
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
    /// Accept code suggestions across pull requests
    AcceptSuggestions {
        /// PR identifiers in owner/repo#number form or GitHub PR URLs
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
    /// Fetch review thread and suggestion data across pull requests (read-only)
    GetPrData {
        /// PR identifiers in owner/repo#number form or GitHub PR URLs
        #[arg(required = true)]
        identifiers: Vec<String>,
    },
    /// Show the viewer's permission level on a repository
    CheckPermissions {
        /// Repository in owner/repo form
        repository: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize rustls crypto provider early to prevent "no process-level CryptoProvider available" panics
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("gh_pr=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;
    let Some(token) = config.resolve_token(cli.github_token.clone()) else {
        bail!(
            "GitHub token is required (set --github-token, GH_PR_GITHUB_TOKEN, GITHUB_TOKEN, or the config file)"
        );
    };

    let client = GraphQLClient::new(&token)?;

    match &cli.command {
        Commands::CheckPermissions { repository } => {
            let repository_id = RepositoryId::parse(repository)
                .map_err(|e| anyhow::anyhow!("Invalid repository: {}", e))?;
            check_permissions(&client, &repository_id, cli.format).await
        }
        Commands::ResolveOutdated { identifiers }
        | Commands::AcceptSuggestions { identifiers }
        | Commands::GetPrData { identifiers } => {
            let batch_config = BatchConfig {
                rate_limit: cli
                    .rate_limit
                    .or(config.batch.rate_limit)
                    .unwrap_or(DEFAULT_RATE_LIMIT),
                max_concurrency: cli
                    .concurrency
                    .or(config.batch.max_concurrency)
                    .unwrap_or(DEFAULT_MAX_CONCURRENCY),
            };

            let mut engine =
                BatchEngine::new(MutationOrchestrator::new(client), batch_config)?;

            let progress_bar = if cli.quiet {
                None
            } else {
                Some(make_progress_bar(identifiers.len() as u64))
            };
            if let Some(bar) = &progress_bar {
                let bar = bar.clone();
                let callback: ProgressCallback = Arc::new(move |_| bar.inc(1));
                engine = engine.with_progress(callback);
            }

            let (operation_name, batch): (&str, Pin<Box<dyn Future<Output = BatchSummary> + '_>>) =
                match &cli.command {
                    Commands::ResolveOutdated { .. } => (
                        "Resolve Outdated Comments",
                        Box::pin(engine.resolve_outdated_comments_batch(identifiers)),
                    ),
                    Commands::AcceptSuggestions { .. } => (
                        "Accept Suggestions",
                        Box::pin(engine.accept_suggestions_batch(identifiers)),
                    ),
                    Commands::GetPrData { .. } => (
                        "Collect PR Data",
                        Box::pin(engine.get_pr_data_batch(identifiers)),
                    ),
                    Commands::CheckPermissions { .. } => unreachable!(),
                };

            let summary = tokio::select! {
                summary = batch => summary,
                _ = tokio::signal::ctrl_c() => {
                    eprintln!("Interrupted, stopping batch");
                    std::process::exit(130);
                }
            };

            if let Some(bar) = &progress_bar {
                bar.finish_and_clear();
            }

            match cli.format {
                OutputFormat::Markdown => {
                    println!("{}", batch_summary_markdown(&summary, operation_name))
                }
                OutputFormat::Json => println!("{}", batch_summary_json(&summary)?),
            }

            if summary.failed > 0 {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}

fn make_progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} ({elapsed})")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

async fn check_permissions(
    client: &GraphQLClient,
    repository_id: &RepositoryId,
    format: OutputFormat,
) -> Result<()> {
    let result = client.check_permissions(repository_id).await;
    if !result.is_success() {
        for message in result.error_messages() {
            eprintln!("{}", message);
        }
        std::process::exit(1);
    }

    let Some(data) = result.data else {
        eprintln!("No data returned from GitHub API");
        std::process::exit(1);
    };

    let raw = data.raw_permission();
    let level = PermissionLevel::parse_or_none(&raw);
    match format {
        OutputFormat::Markdown => {
            println!(
                "{}",
                permission_markdown(repository_id, data.viewer_login(), level)
            );
        }
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "repository": repository_id.full_name(),
                    "viewer": data.viewer_login(),
                    "permission": level,
                    "can_mutate": level.can_mutate(),
                }))?
            );
        }
    }
    Ok(())
}
