//! Ben's Bites scraper.
//!
//! Scrapes the link feed at [news.bensbites.co](https://news.bensbites.co).
//! Posts are linked from the landing page either as `/posts/...` paths or as
//! absolute external URLs; topic labels sit next to each link as `/tags/...`
//! anchors. The landing page carries no teaser text, so descriptions are
//! left empty.

use super::{build_articles, fetch_page, Listing, ScrapeOptions};
use crate::error::FeedError;
use crate::models::{Article, SourceId};
use crate::utils::normalize_whitespace;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, info, instrument};
use url::Url;

pub const SITE_URL: &str = "https://news.bensbites.co";

/// Most articles kept per run.
pub const MAX_ARTICLES: usize = 20;

/// Link texts shorter than this are icons or navigation.
const MIN_TITLE_CHARS: usize = 3;

static LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Fetch the landing page and build this run's articles.
#[instrument(level = "info", skip_all)]
pub async fn scrape(
    client: &Client,
    options: ScrapeOptions,
    scraped_at: &str,
) -> Result<Vec<Article>, FeedError> {
    let html = fetch_page(client, SITE_URL).await?;
    let listings = parse_listing(&html)?;
    info!(count = listings.len(), source = SITE_URL, "Indexed Ben's Bites links");

    Ok(build_articles(
        client,
        SourceId::BenBites,
        listings,
        MAX_ARTICLES,
        options,
        scraped_at,
    )
    .await)
}

/// Extract post links from the landing page HTML.
pub fn parse_listing(html: &str) -> Result<Vec<Listing>, FeedError> {
    let base = Url::parse(SITE_URL)?;
    let site = base.as_str().trim_end_matches('/');
    let document = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut listings = Vec::new();

    for link in document.select(&LINK) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if !(href.contains("/posts/") || href.starts_with("http")) {
            continue;
        }
        let Ok(resolved) = base.join(href) else {
            debug!(%href, "Skipping unresolvable link");
            continue;
        };
        let url = resolved.to_string();

        // `/out` links are click-through redirects, not posts.
        if url.trim_end_matches('/') == site || url.contains("/out") || seen.contains(&url) {
            continue;
        }

        let title = normalize_whitespace(&link.text().collect::<String>());
        if title.chars().count() < MIN_TITLE_CHARS {
            continue;
        }

        seen.insert(url.clone());
        listings.push(Listing {
            title,
            tags: sibling_tags(link),
            url,
            description: String::new(),
        });
    }

    Ok(listings)
}

/// Texts of the `/tags/` links under the same parent element as `link`.
fn sibling_tags(link: ElementRef<'_>) -> Vec<String> {
    let Some(parent) = link.parent().and_then(ElementRef::wrap) else {
        return Vec::new();
    };
    parent
        .select(&LINK)
        .filter(|a| a.value().attr("href").is_some_and(|h| h.contains("/tags/")))
        .map(|a| normalize_whitespace(&a.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .collect()
}
