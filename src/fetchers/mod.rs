//! Fetcher strategies for pulling raw articles from configured sources.
//!
//! Three strategies run in a fixed sequence per pipeline run:
//!
//! | Stage | Module | Method | Notes |
//! |-------|-----------|----------------------|----------------------------------|
//! | 1     | [`rss`]   | Feed parse           | Retry with backoff, 15 s race    |
//! | 2     | [`html`]  | HTTP GET + selectors | 10 s request timeout             |
//! | 3     | [`browser`] | Headless Chrome    | 30 s nav, 10 s selector wait     |
//!
//! # Common Patterns
//!
//! Each fetcher exposes a `fetch_all` that walks its sources
//! sequentially (deliberately not concurrently: simpler error isolation,
//! predictable load on upstream sites) and isolates failures per source:
//! exhausted retries or a thrown error degrade to an empty list for that
//! source, logged, and the batch continues.

pub mod browser;
pub mod html;
pub mod rss;

use crate::models::{Category, Location, RawArticle};

/// A raw article tagged with the descriptor it came from, so the
/// normalizer knows the origin name, editorial category hint, and any
/// default location.
#[derive(Debug)]
pub struct Harvest {
    pub source_name: String,
    pub category_hint: Option<Category>,
    pub default_location: Option<Location>,
    pub article: RawArticle,
}
