//! Merge the per-source article files into one feed document.
//!
//! An aggregation run is a full recomputation: every known source file is
//! loaded independently, all articles are concatenated in source order,
//! ordered newest first and written as a single [`AggregatedPayload`].
//!
//! # Failure isolation
//!
//! Loading a source never fails the run. The outcome of each load is a
//! [`SourceLoad`] value that is folded into the `sources` status map:
//!
//! | File condition | `SourceLoad` | Status in feed |
//! |----------------|--------------|----------------|
//! | absent | `Missing` | `not_run`, count 0, no timestamp |
//! | JSON array of articles | `Loaded` | `success`, count = length, timestamp = run time |
//! | unreadable or malformed | `Corrupt` | `error`, count 0, no timestamp |
//!
//! Only writing the final document can fail [`aggregate`].
//!
//! Articles are not deduplicated across sources. The same URL appearing in
//! two source files yields two entries in the feed.

use crate::error::FeedError;
use crate::models::{AggregatedPayload, Article, SourceId, SourceState, SourceStatus};
use crate::outputs::json::write_payload;
use crate::utils::{aggregated_path, source_path, timestamp_now};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};

/// Result of loading one per-source file.
#[derive(Debug)]
pub enum SourceLoad {
    /// No file on disk; the source has never produced output.
    Missing,
    /// The file parsed as a JSON array of articles.
    Loaded(Vec<Article>),
    /// The file exists but could not be read or parsed.
    Corrupt(FeedError),
}

/// Load the article file of a single source.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_source(path: &Path) -> SourceLoad {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("Source file absent");
            return SourceLoad::Missing;
        }
        Err(source) => {
            return SourceLoad::Corrupt(FeedError::SourceRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    match serde_json::from_slice::<Vec<Article>>(&bytes) {
        Ok(articles) => SourceLoad::Loaded(articles),
        Err(source) => SourceLoad::Corrupt(FeedError::SourceParse {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Fold per-source loads into a feed document stamped with `now`.
///
/// Every [`SourceId`] gets a status entry, defaulting to `not_run` when no
/// load is supplied for it. Articles keep their per-source order and are then
/// stably sorted by `published_date` descending, a missing date sorting last.
pub fn build_payload<I>(loads: I, now: &str) -> AggregatedPayload
where
    I: IntoIterator<Item = (SourceId, SourceLoad)>,
{
    let mut sources: BTreeMap<SourceId, SourceStatus> = SourceId::ALL
        .iter()
        .map(|source| (*source, SourceStatus::default()))
        .collect();
    let mut articles = Vec::new();

    for (source, load) in loads {
        let status = match load {
            SourceLoad::Missing => {
                info!(%source, "No data file for source; marking not_run");
                SourceStatus::default()
            }
            SourceLoad::Loaded(loaded) => {
                info!(
                    %source,
                    count = loaded.len(),
                    "Loaded articles from {}",
                    source.display_name()
                );
                let status = SourceStatus::success(loaded.len(), now);
                articles.extend(loaded);
                status
            }
            SourceLoad::Corrupt(e) => {
                error!(%source, error = %e, "Error loading {} data", source.display_name());
                SourceStatus::error()
            }
        };
        sources.insert(source, status);
    }

    sort_newest_first(&mut articles);

    AggregatedPayload {
        last_updated: now.to_string(),
        total_articles: articles.len(),
        articles,
        sources,
    }
}

/// Order by `published_date` descending. The sort is stable, so articles with
/// equal dates keep their load order and repeated runs produce the same
/// sequence.
fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by(|a, b| b.published_key().cmp(a.published_key()));
}

/// Run one aggregation over the files under `data_dir`.
///
/// Reads `scraped_data/<source>.json` for each known source, builds the feed
/// and atomically replaces `aggregated_articles.json` with it.
///
/// # Errors
///
/// Only the final write can fail: [`FeedError::OutputWrite`] or
/// [`FeedError::Serialize`]. Missing or corrupt source files are reported in
/// the returned payload's `sources` map.
#[instrument(level = "info", skip_all, fields(data_dir = %data_dir.display()))]
pub async fn aggregate(data_dir: &Path) -> Result<AggregatedPayload, FeedError> {
    info!("Aggregating data from all sources");

    let mut loads = Vec::with_capacity(SourceId::ALL.len());
    for source in SourceId::ALL {
        let load = load_source(&source_path(data_dir, source)).await;
        loads.push((source, load));
    }

    let payload = build_payload(loads, &timestamp_now());

    let output_path = aggregated_path(data_dir);
    if let Err(e) = write_payload(&payload, &output_path).await {
        error!(path = %output_path.display(), error = %e, "Failed to write aggregated feed");
        return Err(e);
    }

    let errored = payload
        .sources
        .values()
        .filter(|s| s.status == SourceState::Error)
        .count();
    if errored > 0 {
        warn!(errored, "Aggregated feed written with source errors");
    }
    info!(
        total = payload.total_articles,
        path = %output_path.display(),
        "Aggregated feed written"
    );

    Ok(payload)
}
