//! Data models for newsletter articles, per-source status and the merged feed.
//!
//! This module defines the records that travel through the pipeline:
//! - [`Article`]: one newsletter item, as written by a scraper and read by
//!   the aggregator
//! - [`SourceId`]: the closed set of newsletter sites
//! - [`SourceStatus`] / [`SourceState`]: per-source metadata in the feed
//! - [`RunStatus`]: the report a scraper run returns
//! - [`AggregatedPayload`]: the merged feed document
//!
//! Timestamps are kept as the RFC 3339 strings they were written with so that
//! re-aggregating the same files reproduces them byte for byte.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Number of hex characters kept from the URL digest.
const ID_LEN: usize = 12;

/// A newsletter site that produces articles.
///
/// Serialized as its snake_case tag (`ben_bites`, `ai_rundown`), both in the
/// `source` field of an [`Article`] and as a key of the feed's `sources` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    BenBites,
    AiRundown,
}

impl SourceId {
    /// Every known source, in feed order.
    pub const ALL: [SourceId; 2] = [SourceId::BenBites, SourceId::AiRundown];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::BenBites => "ben_bites",
            SourceId::AiRundown => "ai_rundown",
        }
    }

    /// Human readable name used in log lines.
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceId::BenBites => "Ben's Bites",
            SourceId::AiRundown => "The AI Rundown",
        }
    }

    /// File name of the per-source output under `scraped_data/`.
    pub fn file_name(&self) -> &'static str {
        match self {
            SourceId::BenBites => "bens_bites.json",
            SourceId::AiRundown => "ai_rundown.json",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered newsletter item.
///
/// `url` is the identity of an article: the scrapers deduplicate on it and
/// `id` is derived from it. Fields other than `id`, `source`, `title` and
/// `url` tolerate being absent in a persisted file.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Article {
    /// Stable identifier derived from `url`, see [`article_id`].
    pub id: String,
    /// The site that produced this record.
    pub source: SourceId,
    /// Display title, never empty for freshly scraped records.
    pub title: String,
    /// Teaser text, empty when the listing page shows none.
    #[serde(default)]
    pub description: String,
    /// Canonical absolute URL.
    pub url: String,
    /// Preview image, if one could be discovered.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Publication time; approximated by the scrape time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    /// When this record was produced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scraped_date: Option<String>,
    /// Free-form labels.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Reserved for readers of the feed; never set by this crate.
    #[serde(default)]
    pub saved: bool,
}

impl Article {
    /// Build a freshly scraped article.
    ///
    /// The true publish time is not known from a listing page, so
    /// `published_date` is set to `scraped_at` as well.
    pub fn new(
        source: SourceId,
        title: String,
        description: String,
        url: String,
        image_url: Option<String>,
        tags: Vec<String>,
        scraped_at: &str,
    ) -> Self {
        Self {
            id: article_id(&url),
            source,
            title,
            description,
            url,
            image_url,
            published_date: Some(scraped_at.to_string()),
            scraped_date: Some(scraped_at.to_string()),
            tags,
            saved: false,
        }
    }

    /// Sort key for feed ordering; a missing date compares as the empty string.
    pub fn published_key(&self) -> &str {
        self.published_date.as_deref().unwrap_or("")
    }
}

/// Derive the stable article id for a URL: the first 12 hex characters of
/// its SHA-256 digest.
pub fn article_id(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut hex = format!("{:x}", digest);
    hex.truncate(ID_LEN);
    hex
}

/// Outcome of the most recent load of a source, as reported in the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceState {
    #[default]
    NotRun,
    Success,
    Error,
}

impl fmt::Display for SourceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceState::NotRun => "not_run",
            SourceState::Success => "success",
            SourceState::Error => "error",
        })
    }
}

/// Per-source metadata in the aggregated feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceStatus {
    pub last_scraped: Option<String>,
    pub article_count: usize,
    pub status: SourceState,
}

impl SourceStatus {
    pub fn success(article_count: usize, at: &str) -> Self {
        Self {
            last_scraped: Some(at.to_string()),
            article_count,
            status: SourceState::Success,
        }
    }

    pub fn error() -> Self {
        Self {
            status: SourceState::Error,
            ..Self::default()
        }
    }
}

/// Report returned by a single scraper run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RunStatus {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub article_count: usize,
    pub last_scraped: String,
}

impl RunStatus {
    pub fn ok(article_count: usize, last_scraped: &str) -> Self {
        Self {
            success: true,
            error: None,
            article_count,
            last_scraped: last_scraped.to_string(),
        }
    }

    pub fn failed(error: impl fmt::Display, last_scraped: &str) -> Self {
        Self {
            success: false,
            error: Some(error.to_string()),
            article_count: 0,
            last_scraped: last_scraped.to_string(),
        }
    }
}

/// The merged feed written by the aggregator.
///
/// `total_articles` always equals `articles.len()`; `sources` carries one
/// entry for every [`SourceId`], whether or not its file was present.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AggregatedPayload {
    pub last_updated: String,
    pub total_articles: usize,
    pub articles: Vec<Article>,
    pub sources: BTreeMap<SourceId, SourceStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: &str = "2026-10-18T09:15:02.123456Z";

    #[test]
    fn test_article_id_is_deterministic() {
        let a = article_id("https://news.bensbites.co/posts/123");
        let b = article_id("https://news.bensbites.co/posts/123");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_article_id_differs_per_url() {
        assert_ne!(
            article_id("https://www.therundown.ai/p/one"),
            article_id("https://www.therundown.ai/p/two")
        );
    }

    #[test]
    fn test_new_article_uses_scrape_time() {
        let article = Article::new(
            SourceId::AiRundown,
            "OpenAI ships a thing".to_string(),
            String::new(),
            "https://www.therundown.ai/p/thing".to_string(),
            None,
            vec!["AI".to_string()],
            NOW,
        );
        assert_eq!(article.id, article_id("https://www.therundown.ai/p/thing"));
        assert_eq!(article.published_date.as_deref(), Some(NOW));
        assert_eq!(article.scraped_date.as_deref(), Some(NOW));
        assert!(!article.saved);
    }

    #[test]
    fn test_article_serialization_shape() {
        let article = Article::new(
            SourceId::BenBites,
            "Agents everywhere".to_string(),
            String::new(),
            "https://news.bensbites.co/posts/agents".to_string(),
            None,
            vec![],
            NOW,
        );
        let value = serde_json::to_value(&article).unwrap();
        assert_eq!(value["source"], "ben_bites");
        assert_eq!(value["image_url"], serde_json::Value::Null);
        assert_eq!(value["saved"], false);
        assert_eq!(value["published_date"], NOW);
    }

    #[test]
    fn test_article_deserialization_defaults() {
        let json = r#"{
            "id": "abc123abc123",
            "source": "ai_rundown",
            "title": "Minimal",
            "url": "https://www.therundown.ai/p/minimal"
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.description, "");
        assert_eq!(article.image_url, None);
        assert_eq!(article.published_date, None);
        assert_eq!(article.published_key(), "");
        assert!(article.tags.is_empty());
        assert!(!article.saved);

        let out = serde_json::to_value(&article).unwrap();
        assert!(out.get("published_date").is_none());
    }

    #[test]
    fn test_article_rejects_unknown_source() {
        let json = r#"{"id": "x", "source": "hacker_news", "title": "t", "url": "https://x"}"#;
        assert!(serde_json::from_str::<Article>(json).is_err());
    }

    #[test]
    fn test_source_status_default_is_not_run() {
        let status = SourceStatus::default();
        assert_eq!(status.status, SourceState::NotRun);
        assert_eq!(status.article_count, 0);
        assert_eq!(status.last_scraped, None);

        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["status"], "not_run");
        assert_eq!(value["last_scraped"], serde_json::Value::Null);
    }

    #[test]
    fn test_sources_map_keys_are_tags() {
        let mut sources = BTreeMap::new();
        sources.insert(SourceId::AiRundown, SourceStatus::error());
        sources.insert(SourceId::BenBites, SourceStatus::success(3, NOW));
        let json = serde_json::to_string(&sources).unwrap();
        assert!(json.starts_with(r#"{"ben_bites":"#));
        assert!(json.contains(r#""ai_rundown":{"last_scraped":null,"article_count":0,"status":"error"}"#));
    }

    #[test]
    fn test_run_status_failed_serialization() {
        let status = RunStatus::failed("connection refused", NOW);
        let value = serde_json::to_value(&status).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "connection refused");
        assert_eq!(value["article_count"], 0);

        let ok = serde_json::to_value(RunStatus::ok(7, NOW)).unwrap();
        assert!(ok.get("error").is_none());
    }
}
