//! The AI Rundown scraper.
//!
//! Scrapes the newsletter archive at [therundown.ai](https://www.therundown.ai).
//! Each issue appears as an `<h3>` headline that either wraps a link or sits
//! inside one, usually followed by a one-line teaser (often a `PLUS:` line)
//! in the next sibling element.

use super::{build_articles, fetch_page, Listing, ScrapeOptions};
use crate::error::FeedError;
use crate::models::{Article, SourceId};
use crate::utils::normalize_whitespace;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

pub const SITE_URL: &str = "https://www.therundown.ai";

/// Most articles kept per run.
pub const MAX_ARTICLES: usize = 15;

/// Every article from this source carries these labels.
pub const TAGS: [&str; 2] = ["AI", "newsletter"];

/// Headlines shorter than this are section labels.
const MIN_TITLE_CHARS: usize = 5;

/// Teasers must be longer than this to be used as a description.
const MIN_DESCRIPTION_CHARS: usize = 10;

/// Only links on the newsletter's own domain are issues.
const SITE_DOMAIN: &str = "therundown.ai";

static HEADLINE: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());
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
    info!(count = listings.len(), source = SITE_URL, "Indexed AI Rundown headlines");

    Ok(build_articles(
        client,
        SourceId::AiRundown,
        listings,
        MAX_ARTICLES,
        options,
        scraped_at,
    )
    .await)
}

/// Extract issue headlines from the landing page HTML.
pub fn parse_listing(html: &str) -> Result<Vec<Listing>, FeedError> {
    let base = Url::parse(SITE_URL)?;
    let document = Html::parse_document(html);
    let mut listings = Vec::new();

    for headline in document.select(&HEADLINE) {
        let title = normalize_whitespace(&headline.text().collect::<String>());
        if title.chars().count() < MIN_TITLE_CHARS {
            continue;
        }

        let Some(href) = headline_href(headline) else {
            debug!(%title, "Headline has no link");
            continue;
        };
        let url = match base.join(href) {
            Ok(resolved) => resolved.to_string(),
            Err(e) => {
                debug!(%href, error = %e, "Skipping unresolvable link");
                continue;
            }
        };
        if !url.contains(SITE_DOMAIN) {
            continue;
        }

        listings.push(Listing {
            title,
            url,
            description: teaser(headline),
            tags: TAGS.iter().map(|t| t.to_string()).collect(),
        });
    }

    Ok(listings)
}

/// The link inside the headline, else the closest enclosing link.
fn headline_href(headline: ElementRef<'_>) -> Option<&str> {
    headline
        .select(&LINK)
        .next()
        .or_else(|| {
            headline
                .ancestors()
                .filter_map(ElementRef::wrap)
                .find(|el| el.value().name() == "a" && el.value().attr("href").is_some())
        })
        .and_then(|a| a.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
}

/// Text of the element right after the headline, when long enough.
fn teaser(headline: ElementRef<'_>) -> String {
    headline
        .next_siblings()
        .find_map(ElementRef::wrap)
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .filter(|text| text.chars().count() > MIN_DESCRIPTION_CHARS)
        .unwrap_or_default()
}
