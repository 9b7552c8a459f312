//! Hostcrawl main entry point
//!
//! This is the command-line interface for the Hostcrawl single-host crawler.

use anyhow::Context;
use clap::Parser;
use hostcrawl::config::{load_config_with_hash, validate_directory_name, Config, CrawlMode};
use hostcrawl::crawler::{Crawler, ReqwestClient};
use hostcrawl::output::print_report;
use hostcrawl::storage::prepare_downloads_dir;
use hostcrawl::url::trim_slashes;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Hostcrawl: a minimalistic single-host web crawler
///
/// Crawls every same-host link reachable from the source URL and stores each
/// page it retrieves beneath the storage root.
#[derive(Parser, Debug)]
#[command(name = "hostcrawl")]
#[command(version)]
#[command(about = "A minimalistic single-host web crawler", long_about = None)]
struct Cli {
    /// URL to crawl data from
    #[arg(short, long, value_name = "URL")]
    source: String,

    /// Directory beneath the storage root to store downloaded pages in
    #[arg(short = 'd', long, value_name = "NAME")]
    directory: Option<String>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Expand links depth-first on a single task
    #[arg(long)]
    sequential: bool,

    /// Maximum number of pages fetched at the same time
    #[arg(long, value_name = "N")]
    max_concurrency: Option<usize>,

    /// Skip TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    let downloads_dir = prepare_downloads_dir(
        Path::new(&config.storage.root),
        &config.storage.directory,
    )
    .with_context(|| {
        format!(
            "crawler: create downloads dir {}/{}",
            config.storage.root, config.storage.directory
        )
    })?;

    let client = ReqwestClient::from_config(&config.http).context("Failed to build HTTP client")?;
    let mut crawler = Crawler::with_client(client, downloads_dir);
    if let Some(limit) = config.crawler.max_concurrency {
        crawler = crawler.with_max_concurrency(limit);
    }
    let crawler = Arc::new(crawler);

    let source = trim_slashes(&cli.source).to_string();
    tracing::info!("Starting {:?} crawl of {}", config.crawler.mode, source);

    let report = tokio::select! {
        report = run_crawl(&crawler, &source, config.crawler.mode) => report,
        _ = shutdown_signal() => {
            eprintln!("Signal interrupt - exiting");
            std::process::exit(1);
        }
    };

    if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}

async fn run_crawl(
    crawler: &Arc<Crawler>,
    source: &str,
    mode: CrawlMode,
) -> hostcrawl::output::CrawlReport {
    match mode {
        CrawlMode::Concurrent => crawler.crawl(source).await,
        CrawlMode::Sequential => crawler.crawl_sequential(source).await,
    }
}

/// Loads the configuration file, if any, and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(directory) = &cli.directory {
        validate_directory_name(directory)?;
        config.storage.directory = directory.clone();
    }
    if cli.sequential {
        config.crawler.mode = CrawlMode::Sequential;
    }
    if let Some(limit) = cli.max_concurrency {
        anyhow::ensure!(limit >= 1, "--max-concurrency must be at least 1");
        config.crawler.max_concurrency = Some(limit);
    }
    if cli.insecure {
        config.http.accept_invalid_certs = true;
    }

    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hostcrawl=info,warn"),
            1 => EnvFilter::new("hostcrawl=debug,info"),
            2 => EnvFilter::new("hostcrawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Resolves when the process receives an interrupt or termination signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for interrupt: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
