//! Utility functions for timestamps, data-directory layout and text cleanup.
//!
//! This module provides helper functions used throughout the application:
//! - Fixed-width RFC 3339 timestamps, so string order is time order
//! - Paths of the per-source files and the aggregated feed
//! - Whitespace normalisation for text pulled out of HTML
//! - String truncation for logging

use crate::models::SourceId;
use chrono::{SecondsFormat, Utc};
use itertools::Itertools;
use std::path::{Path, PathBuf};

/// Directory under the data dir holding one JSON file per source.
pub const SCRAPED_DIR: &str = "scraped_data";

/// File name of the merged feed under the data dir.
pub const AGGREGATED_FILE: &str = "aggregated_articles.json";

/// Current UTC time as an RFC 3339 string with microsecond precision.
///
/// Every timestamp has the same width (`2026-10-18T09:15:02.123456Z`), which
/// lets the feed sort on plain string comparison.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Path of the per-source article file.
///
/// ```ignore
/// assert_eq!(source_path(Path::new(".tmp"), SourceId::BenBites),
///            PathBuf::from(".tmp/scraped_data/bens_bites.json"));
/// ```
pub fn source_path(data_dir: &Path, source: SourceId) -> PathBuf {
    data_dir.join(SCRAPED_DIR).join(source.file_name())
}

/// Path of the aggregated feed document.
pub fn aggregated_path(data_dir: &Path) -> PathBuf {
    data_dir.join(AGGREGATED_FILE)
}

/// Collapse every run of whitespace to one space and trim both ends.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` characters with `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((idx, _)) => format!("{}…(+{} bytes)", &s[..idx], s.len() - idx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_now_is_fixed_width() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), "2026-10-18T09:15:02.123456Z".len());
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn test_layout_paths() {
        let dir = Path::new(".tmp");
        assert_eq!(
            source_path(dir, SourceId::BenBites),
            PathBuf::from(".tmp/scraped_data/bens_bites.json")
        );
        assert_eq!(
            source_path(dir, SourceId::AiRundown),
            PathBuf::from(".tmp/scraped_data/ai_rundown.json")
        );
        assert_eq!(aggregated_path(dir), PathBuf::from(".tmp/aggregated_articles.json"));
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Hello \n\t world  "), "Hello world");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        assert_eq!(truncate_for_log("héllo", 2), "hé…(+3 bytes)");
    }
}
