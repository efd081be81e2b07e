//! Command-line interface definitions for the newsletter feed tool.
//!
//! All options can be provided via command-line flags or environment
//! variables. Running the binary with no subcommand aggregates whatever
//! per-source files exist.

use crate::models::SourceId;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for the newsletter feed tool.
///
/// # Examples
///
/// ```sh
/// # Merge the per-source files under ./.tmp into .tmp/aggregated_articles.json
/// newsletter_feed
///
/// # Scrape one source without the per-article image requests
/// newsletter_feed --no-images scrape ben-bites
///
/// # Scrape everything, then aggregate, using another data directory
/// NEWSLETTER_DATA_DIR=/var/lib/feed newsletter_feed run
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Root directory holding `scraped_data/` and the aggregated feed
    #[arg(short, long, env = "NEWSLETTER_DATA_DIR", default_value = ".tmp", global = true)]
    pub data_dir: PathBuf,

    /// Skip fetching each article page to discover a preview image
    #[arg(long, env = "NEWSLETTER_NO_IMAGES", global = true)]
    pub no_images: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Merge the per-source files into the aggregated feed (default)
    Aggregate,
    /// Scrape one or all sources into their per-source files
    Scrape {
        #[arg(value_enum, default_value_t = SourceArg::All)]
        source: SourceArg,
    },
    /// Scrape every source, then aggregate
    Run,
}

/// Source selector accepted by `scrape`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceArg {
    BenBites,
    AiRundown,
    All,
}

impl SourceArg {
    pub fn sources(self) -> Vec<SourceId> {
        match self {
            SourceArg::BenBites => vec![SourceId::BenBites],
            SourceArg::AiRundown => vec![SourceId::AiRundown],
            SourceArg::All => SourceId::ALL.to_vec(),
        }
    }
}

impl Cli {
    /// The subcommand to run, defaulting to aggregation.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Aggregate)
    }
}
