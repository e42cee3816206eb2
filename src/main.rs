//! Ripple-Walker main entry point
//!
//! This is the command-line interface for the Ripple-Walker site crawler.

use anyhow::{Context, Result};
use clap::Parser;
use ripple_walker::config::{load_config_with_hash, validate, Config};
use ripple_walker::output::print_summary;
use ripple_walker::{Crawler, FetchResponse};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Ripple-Walker: a bounded, polite, single-site crawler
///
/// Ripple-Walker starts from one URL and follows links on the same host,
/// fetching each distinct page once. It stops when the request budget is
/// spent, when there is nothing left to fetch, or when the deadline expires.
/// Every fetched URL is printed to stdout as it is visited.
#[derive(Parser, Debug)]
#[command(name = "ripple-walker")]
#[command(version)]
#[command(about = "A bounded, polite, single-site crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// URL to start crawling from (overrides the config file)
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,

    /// Upper bound on fetch attempts
    #[arg(long, value_name = "N")]
    max_requests: Option<u64>,

    /// Milliseconds between two dispatches
    #[arg(long, value_name = "MS")]
    politeness_delay: Option<u64>,

    /// Wall-clock deadline for the crawl, in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Workers per pipeline stage
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Per-request HTTP timeout, in milliseconds
    #[arg(long, value_name = "MS")]
    request_timeout: Option<u64>,

    /// User-Agent header to send
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and print it without crawling
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(start_url) = &self.start_url {
            config.start_url = start_url.clone();
        }
        if let Some(max_requests) = self.max_requests {
            config.crawler.max_requests = max_requests;
        }
        if let Some(politeness_delay) = self.politeness_delay {
            config.crawler.politeness_delay = politeness_delay;
        }
        if let Some(timeout) = self.timeout {
            config.crawler.timeout = timeout;
        }
        if let Some(workers) = self.workers {
            config.crawler.workers = workers;
        }
        if let Some(request_timeout) = self.request_timeout {
            config.crawler.request_timeout = request_timeout;
        }
        if let Some(user_agent) = &self.user_agent {
            config.crawler.user_agent = user_agent.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);

    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_walker=info,warn"),
            1 => EnvFilter::new("ripple_walker=debug,info"),
            2 => EnvFilter::new("ripple_walker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr; stdout carries the visited URLs
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    let crawler = &config.crawler;

    println!("=== Ripple-Walker Dry Run ===\n");
    println!("Start URL: {}", config.start_url);

    println!("\nCrawler Configuration:");
    println!("  Max requests: {}", crawler.max_requests);
    println!("  Politeness delay: {}ms", crawler.politeness_delay);
    println!("  Timeout: {}ms", crawler.timeout);
    println!("  Workers per stage: {}", crawler.workers);
    println!("  Request timeout: {}ms", crawler.request_timeout);
    println!("  User agent: {}", crawler.user_agent);
    println!("  Frontier high-water mark: {}", crawler.high_water_mark());

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> Result<()> {
    let mut crawler = Crawler::new(config.crawler).context("Failed to set up crawler")?;
    crawler.on_visited(|response: &FetchResponse| {
        println!("{}", response.url);
    });

    let summary = crawler
        .crawl(&config.start_url)
        .await
        .context("Crawl failed")?;

    println!();
    print_summary(&summary);

    Ok(())
}
