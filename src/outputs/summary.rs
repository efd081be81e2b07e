//! Human readable run summary printed after an aggregation.

use crate::models::AggregatedPayload;
use std::fmt::Write;

/// Render the total article count and one line per source.
///
/// ```text
/// Summary:
/// Total articles: 3
/// Sources:
///   ben_bites: success (3 articles, last scraped 2026-10-18T12:00:00.000000Z)
///   ai_rundown: not_run (0 articles)
/// ```
pub fn render_summary(payload: &AggregatedPayload) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Summary:");
    let _ = writeln!(out, "Total articles: {}", payload.total_articles);
    let _ = writeln!(out, "Sources:");
    for (source, status) in &payload.sources {
        let _ = write!(
            out,
            "  {}: {} ({} articles",
            source, status.status, status.article_count
        );
        if let Some(at) = &status.last_scraped {
            let _ = write!(out, ", last scraped {}", at);
        }
        let _ = writeln!(out, ")");
    }
    out
}
