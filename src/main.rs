//! # News Atlas
//!
//! A news aggregation pipeline that pulls articles from RSS feeds,
//! text-only news sites, and JavaScript-heavy pages, then geolocates,
//! classifies, and ranks them into a single JSON dataset for a map UI.
//!
//! ## Usage
//!
//! ```sh
//! news_atlas -o public/news
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Fetch**: RSS feeds, static HTML pages, then headless-browser pages
//! 2. **Normalize**: stable ids, snippets, timestamps
//! 3. **Enrich**: location detection, categorization, importance scoring
//! 4. **Rank**: dedupe, sort, priority backfill, map quota
//! 5. **Output**: write `data.json` (with sample fallback when scraping
//!    yields nothing)

use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod classify;
mod cli;
mod fetchers;
mod geo;
mod models;
mod normalize;
mod outputs;
mod rank;
mod retry;
mod sample;
mod sources;
mod utils;

use cli::Cli;
use fetchers::Harvest;
use models::Article;
use utils::ensure_writable_dir;

/// Sent on every plain HTTP request so text-only mirrors serve us the
/// same markup they serve a desktop browser.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_atlas starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.output_dir, ?args.sample_file, args.skip_browser, "Parsed CLI arguments");

    // Early check: ensure the output dir is writable
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(HTTP_TIMEOUT)
        .build()?;

    // ---- Stage 1: RSS feeds ----
    let rss_sources = sources::rss_sources();
    let rss_harvest = fetchers::rss::fetch_all(&client, &rss_sources).await;

    // ---- Stage 2: static HTML pages ----
    let html_sources = sources::html_sources();
    let static_sources: Vec<_> = html_sources
        .iter()
        .filter(|s| !s.requires_js)
        .cloned()
        .collect();
    let html_harvest = fetchers::html::fetch_all(&client, &static_sources).await;

    // ---- Stage 3: headless browser ----
    let browser_harvest = if args.skip_browser {
        info!("Headless-browser stage skipped by flag");
        Vec::new()
    } else {
        let js_sources: Vec<_> = html_sources
            .iter()
            .filter(|s| s.requires_js)
            .cloned()
            .collect();
        fetchers::browser::fetch_all(&js_sources).await
    };

    let harvest: Vec<Harvest> = rss_harvest
        .into_iter()
        .chain(html_harvest)
        .chain(browser_harvest)
        .collect();
    info!(count = harvest.len(), "Total raw articles harvested");

    // ---- Normalize and enrich ----
    let mut articles: Vec<Article> = harvest
        .iter()
        .map(|h| {
            normalize::normalize(
                &h.article,
                &h.source_name,
                h.category_hint,
                h.default_location.as_ref(),
            )
        })
        .collect();

    // ---- Fallback chain when every stage came back empty ----
    if articles.is_empty() {
        warn!("No articles scraped from any source; falling back to sample data");
        articles = match sample::load_fallback_file(&args.sample_file).await {
            Some(saved) => saved,
            None => sample::generate(args.sample_count),
        };
    }

    // ---- Rank and write ----
    let ranked = rank::rank(articles);

    outputs::json::write_articles(&ranked, &args.output_dir).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
