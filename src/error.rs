//! Error types shared by the scrapers, the aggregator and the JSON writers.
//!
//! Only [`FeedError::OutputWrite`] and [`FeedError::Serialize`] ever escape
//! from an aggregation run. Read and parse failures on a per-source file are
//! carried inside [`crate::aggregator::SourceLoad::Corrupt`] and turned into
//! status metadata instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    /// A per-source file exists but could not be read.
    #[error("failed to read source file {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A per-source file was read but is not a JSON array of articles.
    #[error("failed to parse source file {}: {source}", path.display())]
    SourceParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The destination file could not be persisted.
    #[error("failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
