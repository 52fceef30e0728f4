//! Jobharvest main entry point
//!
//! Command-line interface for the job-listing harvester.

use anyhow::Context;
use clap::Parser;
use jobharvest::browser::ChromeSession;
use jobharvest::config::{load_config, Config, OutputFormat};
use jobharvest::harvest::{build_search_url, ListingWalker, Pipeline};
use jobharvest::sink::{JsonlSink, SqliteSink};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Jobharvest: harvest job postings from the LinkedIn search listing
///
/// Walks the public job search listing for a location, optionally enriches
/// every job with its detail page, and writes the records to a JSONL
/// directory or a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "jobharvest")]
#[command(version)]
#[command(about = "Harvest job postings from the LinkedIn search listing", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested, without starting
    /// a browser
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config).context("failed to load configuration")?;

    if cli.dry_run {
        print_plan(&config);
        return Ok(());
    }

    run(config).await
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("jobharvest=info,warn"),
            1 => EnvFilter::new("jobharvest=debug,info"),
            2 => EnvFilter::new("jobharvest=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the plan
fn print_plan(config: &Config) {
    println!("=== Jobharvest Dry Run ===\n");

    let url = build_search_url(
        &config.search.location,
        &config.search.keywords,
        config.search.posted_within,
    );
    println!("Search URL: {url}");

    println!("\nFetcher:");
    println!(
        "  Requests per second: {}",
        config.fetcher.requests_per_second
    );
    println!("  Max retries on 429: {}", config.fetcher.max_retries);
    println!("  Detail enrichment: {}", config.fetcher.enrich);
    println!(
        "  Max in-flight enrichments: {}",
        config.fetcher.max_inflight
    );

    println!("\nBrowser:");
    println!("  Headless: {}", config.browser.headless);

    println!("\nOutput:");
    match config.output.format {
        OutputFormat::Jsonl => println!("  JSONL directory: {}", config.output.directory),
        OutputFormat::Sqlite => println!("  SQLite database: {}", config.output.database_path),
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest operation
async fn run(config: Config) -> anyhow::Result<()> {
    let url = build_search_url(
        &config.search.location,
        &config.search.keywords,
        config.search.posted_within,
    );

    let session =
        ChromeSession::launch(config.browser.headless).context("failed to launch browser")?;
    let walker = ListingWalker::new(session, url);
    let pipeline = Pipeline::new(&config.fetcher)?;

    let stats = match config.output.format {
        OutputFormat::Jsonl => {
            // one subdirectory per searched location, like the batches it holds
            let directory =
                Path::new(&config.output.directory).join(config.search.location.to_lowercase());
            let mut sink = JsonlSink::new(directory)?;
            pipeline.run(walker, &mut sink).await?
        }
        OutputFormat::Sqlite => {
            let mut sink = SqliteSink::new(Path::new(&config.output.database_path))?;
            pipeline.run(walker, &mut sink).await?
        }
    };

    println!(
        "Harvested {} jobs ({} enriched, {} enrichment failures)",
        stats.harvested, stats.enriched, stats.failed_enrichments
    );
    Ok(())
}
