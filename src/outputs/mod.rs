//! Output generation: JSON files on disk and the console run summary.
//!
//! # Submodules
//!
//! - [`json`]: Atomic JSON writes for per-source files and the aggregated feed
//! - [`summary`]: Plain-text summary of an aggregation run
//!
//! # Output Structure
//!
//! ```text
//! data_dir/
//! ├── scraped_data/
//! │   ├── bens_bites.json       # written by the Ben's Bites scraper
//! │   └── ai_rundown.json       # written by The AI Rundown scraper
//! └── aggregated_articles.json  # written by the aggregator
//! ```

pub mod json;
pub mod summary;
