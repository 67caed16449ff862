//! Conversion of raw fetcher output into the canonical article shape.
//!
//! Normalization derives a deterministic id from the title, truncates the
//! content to a display snippet, resolves the publication instant, and
//! runs the location detector and classifier over the combined
//! title-plus-content text. The classifier's conflict location, when
//! present, supersedes the generic detector result.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::classify;
use crate::geo;
use crate::models::{Article, Category, Location, RawArticle};

/// Maximum display-snippet length in characters.
const MAX_SNIPPET_CHARS: usize = 300;

/// Number of hash bytes kept for the article id (12 hex characters).
const ID_BYTES: usize = 6;

/// Derive the stable article id from a title.
///
/// Re-scraping the same title yields the same id, which is what lets
/// dedup work across runs.
pub fn article_id(title: &str) -> String {
    let digest = Sha256::digest(title.as_bytes());
    digest
        .iter()
        .take(ID_BYTES)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Truncate content to the display length, appending an ellipsis marker
/// only when something was actually cut.
fn snippet(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= MAX_SNIPPET_CHARS {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(MAX_SNIPPET_CHARS).collect();
        format!("{cut}...")
    }
}

/// Resolve the publication instant from whatever date string the fetcher
/// found. RFC 3339 and RFC 2822 are both common in the wild; anything
/// unparseable (or absent) falls back to the current instant.
fn publication_instant(date: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = date else {
        return Utc::now();
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return dt.with_timezone(&Utc);
    }
    debug!(date = raw, "Unparseable publication date; using now");
    Utc::now()
}

/// Normalize a raw article and enrich it with location, category, and
/// importance in one pass.
///
/// `hint` is the source's editorial category; it fills in only when the
/// text matched no conflict and no keyword bucket. `default_location`
/// likewise applies only when the detector found nothing in the text.
pub fn normalize(
    raw: &RawArticle,
    source: &str,
    hint: Option<Category>,
    default_location: Option<&Location>,
) -> Article {
    let text = format!("{}. {}", raw.title, raw.content);

    let geo_hit = geo::detect_location(&text);
    let classification = classify::classify(&text);
    let importance = classify::importance(&text);

    let category = match hint {
        Some(hinted) if !classification.keyword_match => hinted,
        _ => classification.category,
    };

    // A named conflict pins both the point and the region.
    let (mut location, region) = match classification.location {
        Some(conflict) => (conflict.location, conflict.region),
        None => (geo_hit.location, geo_hit.region),
    };
    if region == "global" {
        if let Some(default) = default_location {
            location = default.clone();
        }
    }

    let instant = publication_instant(raw.date.as_deref());

    Article {
        id: article_id(&raw.title),
        title: raw.title.clone(),
        content: snippet(&raw.content),
        source: source.to_string(),
        url: raw.link.clone(),
        date: instant.to_rfc3339(),
        timestamp: instant.timestamp_millis(),
        location,
        category: Some(category),
        region,
        importance,
        show_on_map: Some(classification.show_on_map),
    }
}
