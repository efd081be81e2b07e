//! Newsletter scrapers that produce the per-source article files.
//!
//! Each scraper follows the same pipeline:
//!
//! 1. **Listing**: fetch the site's landing page and pull candidate
//!    [`Listing`]s out of its HTML
//! 2. **Selection**: deduplicate candidates by URL (first wins) and cap them
//! 3. **Enrichment**: optionally discover a preview image per article
//! 4. **Output**: atomically write the articles to `scraped_data/<source>.json`
//!
//! # Supported Sources
//!
//! | Source | Module | Site | Cap |
//! |--------|--------|------|-----|
//! | Ben's Bites | [`bens_bites`] | news.bensbites.co | 20 |
//! | The AI Rundown | [`ai_rundown`] | www.therundown.ai | 15 |
//!
//! A failed listing fetch leaves any previous per-source file untouched, so
//! the aggregator only ever sees a complete earlier file or none at all.

use crate::error::FeedError;
use crate::models::{Article, RunStatus, SourceId};
use crate::outputs::json::write_articles;
use crate::utils::{source_path, timestamp_now, truncate_for_log};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{Html, Selector};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

pub mod ai_rundown;
pub mod bens_bites;

/// Browser-like user agent; both sites serve reduced markup to unknown clients.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Timeout for a listing page request.
const LISTING_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for a single article page fetched for image discovery.
const IMAGE_TIMEOUT: Duration = Duration::from_secs(5);

static OG_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[property="og:image"]"#).unwrap());
static TWITTER_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="twitter:image"]"#).unwrap());
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img[src]").unwrap());

/// A candidate article pulled from a listing page, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub title: String,
    pub url: String,
    pub description: String,
    pub tags: Vec<String>,
}

/// Options shared by every scraper run.
#[derive(Debug, Clone, Copy)]
pub struct ScrapeOptions {
    /// Fetch each article page to look for a preview image.
    pub fetch_images: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self { fetch_images: true }
    }
}

/// Build the HTTP client used for every request of a run.
pub fn http_client() -> Result<Client, FeedError> {
    Ok(Client::builder()
        .user_agent(USER_AGENT)
        .timeout(LISTING_TIMEOUT)
        .build()?)
}

/// Scrape one source and persist its articles under `data_dir`.
///
/// Never returns an error: failures are logged and reported through the
/// returned [`RunStatus`]. Nothing is written unless the listing was fetched
/// and parsed.
#[instrument(level = "info", skip_all, fields(%source))]
pub async fn run(source: SourceId, data_dir: &Path, options: ScrapeOptions) -> RunStatus {
    let scraped_at = timestamp_now();
    info!("Scraping {}", source.display_name());

    let result = async {
        let client = http_client()?;
        let articles = match source {
            SourceId::BenBites => bens_bites::scrape(&client, options, &scraped_at).await?,
            SourceId::AiRundown => ai_rundown::scrape(&client, options, &scraped_at).await?,
        };
        write_articles(&articles, &source_path(data_dir, source)).await?;
        Ok::<usize, FeedError>(articles.len())
    }
    .await;

    match result {
        Ok(count) => {
            info!(count, "Found {} articles from {}", count, source.display_name());
            RunStatus::ok(count, &scraped_at)
        }
        Err(e) => {
            error!(error = %e, "Error scraping {}", source.display_name());
            RunStatus::failed(e, &scraped_at)
        }
    }
}

/// Fetch a page body, failing on non-2xx responses.
#[instrument(level = "debug", skip(client))]
async fn fetch_page(client: &Client, url: &str) -> Result<String, FeedError> {
    Ok(client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?)
}

/// Turn listing candidates into articles: dedupe by URL, cap, then enrich.
async fn build_articles(
    client: &Client,
    source: SourceId,
    listings: Vec<Listing>,
    cap: usize,
    options: ScrapeOptions,
    scraped_at: &str,
) -> Vec<Article> {
    let selected = select_listings(listings, cap);
    debug!(count = selected.len(), %source, "Selected listings");

    stream::iter(selected)
        .then(|listing| async move {
            let image_url = if options.fetch_images {
                discover_image(client, &listing.url).await
            } else {
                None
            };
            debug!(title = %truncate_for_log(&listing.title, 80), has_image = image_url.is_some(), "Built article");
            Article::new(
                source,
                listing.title,
                listing.description,
                listing.url,
                image_url,
                listing.tags,
                scraped_at,
            )
        })
        .collect()
        .await
}

/// Keep the first listing per URL, at most `cap` of them.
pub fn select_listings(listings: Vec<Listing>, cap: usize) -> Vec<Listing> {
    listings
        .into_iter()
        .unique_by(|l| l.url.clone())
        .take(cap)
        .collect()
}

/// Best-effort preview image lookup; any failure yields `None`.
#[instrument(level = "debug", skip(client))]
async fn discover_image(client: &Client, url: &str) -> Option<String> {
    let response = match client.get(url).timeout(IMAGE_TIMEOUT).send().await {
        Ok(r) if r.status().is_success() => r,
        Ok(r) => {
            debug!(status = %r.status(), "Article page not available for image lookup");
            return None;
        }
        Err(e) => {
            debug!(error = %e, "Image lookup request failed");
            return None;
        }
    };
    let body = response.text().await.ok()?;
    extract_image_url(&body)
}

/// Pick a preview image from an article page: `og:image`, then
/// `twitter:image`, then the first absolute `<img src>`.
pub fn extract_image_url(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    meta_content(&document, &OG_IMAGE)
        .or_else(|| meta_content(&document, &TWITTER_IMAGE))
        .or_else(|| {
            document
                .select(&IMG)
                .next()
                .and_then(|img| img.value().attr("src"))
                .filter(|src| src.starts_with("http"))
                .map(str::to_string)
        })
}

/// First non-empty `content` attribute among the elements matching `selector`.
fn meta_content(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|c| !c.is_empty())
        .map(str::to_string)
}
