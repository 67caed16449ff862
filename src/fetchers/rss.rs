//! RSS feed fetcher.
//!
//! Parses `rss > channel > item` feeds with per-item field fallback:
//! `content:encoded`, then `content`, then `description`. Item content
//! has HTML tags stripped and whitespace collapsed. Items older than the
//! freshness window are silently skipped, as are items without a title
//! or link.
//!
//! Each fetch (download and parse together) races a hard wall-clock
//! timeout; a timeout counts as a failure for the retry policy.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use once_cell::sync::Lazy;
use quick_xml::de::from_str;
use regex::Regex;
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, error, info, instrument};

use crate::fetchers::Harvest;
use crate::models::RawArticle;
use crate::retry::Retry;
use crate::sources::RssSource;
use crate::utils::truncate_for_log;

/// Hard cap on one download-plus-parse attempt.
const FETCH_TIMEOUT: Duration = Duration::from_secs(15);
/// Items published longer ago than this are skipped.
const FRESHNESS_HOURS: i64 = 72;
/// Delay base for the per-source retry policy.
const RETRY_BASE: Duration = Duration::from_millis(1000);

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    content: Option<String>,
    // quick-xml surfaces namespaced elements by their local name, so
    // <content:encoded> arrives here as "encoded".
    encoded: Option<String>,
}

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Strip HTML tags and collapse runs of whitespace.
fn clean_text(raw: &str) -> String {
    let without_tags = TAG_RE.replace_all(raw, " ");
    WS_RE.replace_all(&without_tags, " ").trim().to_string()
}

/// Replace HTML entities that are not valid XML before handing the body
/// to the XML parser. Feeds embed these in titles and descriptions.
fn scrub_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

fn parse_item_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a feed body into raw articles, applying the freshness window
/// relative to `now`.
fn parse_feed(xml: &str, now: DateTime<Utc>) -> Result<Vec<RawArticle>, Box<dyn Error>> {
    let cleaned = scrub_entities(xml);
    let rss: Rss = from_str(&cleaned).map_err(|e| {
        format!(
            "feed xml parse failed: {e} (body: {})",
            truncate_for_log(xml, 120)
        )
    })?;

    let cutoff = now - ChronoDuration::hours(FRESHNESS_HOURS);
    let mut out = Vec::with_capacity(rss.channel.items.len());

    for item in rss.channel.items {
        let Some(title) = item.title.map(|t| clean_text(&t)).filter(|t| !t.is_empty()) else {
            continue;
        };
        let Some(link) = item.link.filter(|l| !l.trim().is_empty()) else {
            continue;
        };

        if let Some(published) = item.pub_date.as_deref().and_then(parse_item_date) {
            if published < cutoff {
                debug!(%title, %published, "Skipping stale feed item");
                continue;
            }
        }

        let body = item
            .encoded
            .or(item.content)
            .or(item.description)
            .unwrap_or_default();

        out.push(RawArticle {
            title,
            content: clean_text(&body),
            link: link.trim().to_string(),
            date: item.pub_date,
        });
    }

    Ok(out)
}

/// One download-plus-parse attempt, raced against [`FETCH_TIMEOUT`].
async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<RawArticle>, Box<dyn Error>> {
    let attempt = async {
        let body = client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_feed(&body, Utc::now())
    };

    match timeout(FETCH_TIMEOUT, attempt).await {
        Ok(result) => result,
        Err(_) => Err(format!("feed fetch timed out after {FETCH_TIMEOUT:?}").into()),
    }
}

/// Fetch every configured feed sequentially.
///
/// Per-source retry with exponential backoff; a source that keeps
/// failing contributes nothing and the batch moves on.
#[instrument(level = "info", skip_all)]
pub async fn fetch_all(client: &reqwest::Client, sources: &[RssSource]) -> Vec<Harvest> {
    let mut all = Vec::new();

    for source in sources {
        let retry = Retry::new(source.retries, RETRY_BASE);
        let result = retry
            .run(&source.name, || fetch_feed(client, &source.url))
            .await;

        match result {
            Ok(items) => {
                info!(
                    source = %source.name,
                    hint = ?source.category_hint,
                    count = items.len(),
                    "Fetched RSS feed"
                );
                all.extend(items.into_iter().map(|article| Harvest {
                    source_name: source.name.clone(),
                    category_hint: source.category_hint,
                    default_location: source.default_location.clone(),
                    article,
                }));
            }
            Err(e) => {
                error!(source = %source.name, error = %e, "RSS source failed; skipping");
            }
        }
    }

    info!(count = all.len(), "RSS stage complete");
    all
}
