//! Data models for raw and normalized news articles.
//!
//! This module defines the core data structures used throughout the pipeline:
//! - [`RawArticle`]: Transient fetcher output, consumed by the normalizer
//! - [`Article`]: The canonical map-ready article shape written to disk
//! - [`Location`], [`Category`], [`Importance`]: Enrichment fields
//!
//! The [`Article`] serialization uses camelCase field names because the
//! JSON output file is the contract with the map-rendering frontend, hence
//! the `rename_all` attributes.

use serde::{Deserialize, Serialize};

/// A raw article as produced by any fetcher.
///
/// Never persisted; each raw article is handed to the normalizer
/// immediately after the fetcher that produced it completes.
#[derive(Debug, Clone)]
pub struct RawArticle {
    /// The headline. Fetchers skip items without one.
    pub title: String,
    /// Body text or summary. May be empty.
    pub content: String,
    /// Absolute URL of the story (fetchers resolve relative links).
    pub link: String,
    /// Publication date as found upstream, if any.
    pub date: Option<String>,
}

/// A geographic point with an optional human-readable name.
///
/// Latitude and longitude are always finite; unresolvable text maps to
/// the `(0, 0)` "global" point rather than to missing coordinates.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Location {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng, name: None }
    }

    pub fn named(lat: f64, lng: f64, name: &str) -> Self {
        Self {
            lat,
            lng,
            name: Some(name.to_string()),
        }
    }

    /// The fallback point used when no place matched.
    pub fn global() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Closed set of topical categories.
///
/// The serialized names are part of the output-file contract and must not
/// change without coordinating with the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Category {
    #[serde(rename = "wars")]
    Wars,
    #[serde(rename = "disaster")]
    Disaster,
    #[serde(rename = "economy")]
    Economy,
    #[serde(rename = "world-politics")]
    WorldPolitics,
    #[serde(rename = "science-tech")]
    ScienceTech,
    #[serde(rename = "planet-people")]
    PlanetPeople,
    #[serde(rename = "culture-curiosities")]
    CultureCuriosities,
}

impl Category {
    /// Priority categories are kept ahead of everything else when the
    /// ranker trims the batch.
    pub fn is_priority(self) -> bool {
        matches!(
            self,
            Category::Wars | Category::Disaster | Category::Economy | Category::WorldPolitics
        )
    }

    /// Non-conflict categories the sample generator cycles through.
    pub const GENERAL: [Category; 5] = [
        Category::Economy,
        Category::WorldPolitics,
        Category::ScienceTech,
        Category::PlanetPeople,
        Category::Disaster,
    ];
}

/// Display-hint importance ladder. Does not influence ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    Low,
}

/// A normalized, enriched article as written to the output file.
///
/// Created once per raw article, enriched in place by the location
/// detector and the classifier, then kept or dropped by the ranker.
/// `category` and `show_on_map` are `Option` only so that records loaded
/// from a pre-classification fallback file can be represented; the
/// ranker's categorize-if-missing step guarantees both are `Some` before
/// the sink runs.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Deterministic id derived from the title (content hash, fixed
    /// length), so re-scraping the same title yields the same id.
    pub id: String,
    pub title: String,
    /// Display snippet, truncated with an ellipsis marker when cut.
    pub content: String,
    /// Human-readable origin name (for example "BBC World").
    pub source: String,
    pub url: String,
    /// RFC-3339 rendering of the same instant as `timestamp`.
    pub date: String,
    /// Epoch milliseconds; the ranker's sort key.
    pub timestamp: i64,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    /// Coarse geographic bucket such as "eastern_europe"; independent of
    /// `category`.
    pub region: String,
    pub importance: Importance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_on_map: Option<bool>,
}
