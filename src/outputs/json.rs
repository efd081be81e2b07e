//! JSON file output shared by the scrapers and the aggregator.
//!
//! Every file this crate produces is written whole and swapped into place:
//! the document goes to a sibling `*.tmp` file first, which is then renamed
//! over the destination. A reader polling the destination therefore sees
//! either the previous document or the new one, never a truncated write.

use crate::error::FeedError;
use crate::models::{AggregatedPayload, Article};
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write a per-source article list.
pub async fn write_articles(articles: &[Article], path: &Path) -> Result<(), FeedError> {
    write_json_atomic(articles, path).await
}

/// Write the aggregated feed document.
pub async fn write_payload(payload: &AggregatedPayload, path: &Path) -> Result<(), FeedError> {
    write_json_atomic(payload, path).await
}

/// Serialize `value` as pretty JSON and atomically replace `path` with it.
///
/// # Errors
///
/// - [`FeedError::Serialize`] if `value` cannot be serialized
/// - [`FeedError::OutputWrite`] if the parent directory cannot be created or
///   the temporary file cannot be written or renamed
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_json_atomic<T>(value: &T, path: &Path) -> Result<(), FeedError>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_vec_pretty(value)?;
    let write_err = |source| FeedError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let tmp_path = temp_path_for(path);
    if let Err(e) = fs::write(&tmp_path, &json).await {
        error!(tmp = %tmp_path.display(), error = %e, "Failed to write temporary file");
        let _ = fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }
    if let Err(e) = fs::rename(&tmp_path, path).await {
        error!(tmp = %tmp_path.display(), error = %e, "Failed to move temporary file into place");
        let _ = fs::remove_file(&tmp_path).await;
        return Err(write_err(e));
    }

    info!(bytes = json.len(), "Wrote JSON file");
    Ok(())
}

/// `feed.json` -> `feed.json.tmp`, in the same directory so the rename stays
/// on one filesystem.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("output"));
    name.push(".tmp");
    path.with_file_name(name)
}
