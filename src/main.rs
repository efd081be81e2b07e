//! # Newsletter Feed
//!
//! Scrapes AI newsletter sites into per-source JSON files and merges them
//! into one aggregated feed with per-source status metadata.
//!
//! ## Usage
//!
//! ```sh
//! newsletter_feed scrape      # refresh .tmp/scraped_data/*.json
//! newsletter_feed             # merge into .tmp/aggregated_articles.json
//! newsletter_feed run         # both, in that order
//! ```
//!
//! ## Architecture
//!
//! Scrapers and the aggregator share nothing but the filesystem:
//! 1. **Scraping**: each source writes its own `scraped_data/<source>.json`
//! 2. **Aggregation**: every source file that exists is loaded, merged,
//!    sorted newest first and written as `aggregated_articles.json`
//!
//! The process exits non-zero only when the aggregated feed cannot be written.

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod aggregator;
mod cli;
mod error;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::{Cli, Command};
use models::{RunStatus, SourceId};
use outputs::summary::render_summary;
use scrapers::ScrapeOptions;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let options = ScrapeOptions {
        fetch_images: !args.no_images,
    };

    match args.command() {
        Command::Aggregate => run_aggregation(&args.data_dir).await?,
        Command::Scrape { source } => {
            scrape_sources(&source.sources(), &args.data_dir, options).await?;
        }
        Command::Run => {
            scrape_sources(&SourceId::ALL, &args.data_dir, options).await?;
            run_aggregation(&args.data_dir).await?;
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, "Execution complete");
    Ok(())
}

/// Scrape each source in turn and print its report.
///
/// A failed scrape is reported, not propagated.
#[instrument(level = "info", skip_all)]
async fn scrape_sources(
    sources: &[SourceId],
    data_dir: &Path,
    options: ScrapeOptions,
) -> Result<(), Box<dyn Error>> {
    for source in sources {
        let report: RunStatus = scrapers::run(*source, data_dir, options).await;
        println!("{}: {}", source, serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

/// Aggregate and print the run summary. Fails only if the feed was not written.
async fn run_aggregation(data_dir: &Path) -> Result<(), Box<dyn Error>> {
    let payload = aggregator::aggregate(data_dir).await?;
    print!("{}", render_summary(&payload));
    Ok(())
}
