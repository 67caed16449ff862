//! Headless-browser fetcher for script-rendered sources.
//!
//! Launches one headless Chrome instance per run via CDP, navigates each
//! configured source with a page-load timeout, waits for the article
//! selector to appear, and feeds the rendered DOM through the same
//! extraction logic as the static fetcher.
//!
//! The browser is an OS process; it is closed on every exit path,
//! including per-source errors, by capturing the scrape result before
//! cleanup rather than returning early across it.

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use std::error::Error;
use std::time::Duration;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, error, info, instrument, warn};

use crate::fetchers::{Harvest, html};
use crate::sources::HtmlSource;

/// Page-load budget per source.
const NAV_TIMEOUT: Duration = Duration::from_secs(30);
/// How long to wait for the article selector after load.
const SELECTOR_TIMEOUT: Duration = Duration::from_secs(10);
/// Poll interval while waiting for the selector.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Fetch every script-rendered source.
///
/// A browser that fails to launch degrades to zero articles for the
/// whole stage (logged); it never aborts the run.
#[instrument(level = "info", skip_all)]
pub async fn fetch_all(sources: &[HtmlSource]) -> Vec<Harvest> {
    if sources.is_empty() {
        return Vec::new();
    }

    match run_with_browser(sources).await {
        Ok(all) => {
            info!(count = all.len(), "Headless browser stage complete");
            all
        }
        Err(e) => {
            error!(error = %e, "Headless browser stage failed; continuing without it");
            Vec::new()
        }
    }
}

/// Launch, scrape, and tear down. The browser close runs regardless of
/// how the scrape went.
async fn run_with_browser(sources: &[HtmlSource]) -> Result<Vec<Harvest>, Box<dyn Error>> {
    let config = BrowserConfig::builder()
        .build()
        .map_err(|e| format!("browser config: {e}"))?;
    let (mut browser, mut handler) = Browser::launch(config).await?;

    // The handler drives CDP message dispatch for as long as the
    // browser lives.
    let handler_task = tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    });

    // Capture the result before cleanup so every path releases the
    // browser process.
    let harvested = scrape_sources(&browser, sources).await;

    if let Err(e) = browser.close().await {
        warn!(error = %e, "Browser close reported an error");
    }
    let _ = browser.wait().await;
    handler_task.abort();

    Ok(harvested)
}

async fn scrape_sources(browser: &Browser, sources: &[HtmlSource]) -> Vec<Harvest> {
    let mut all = Vec::new();

    for source in sources {
        match scrape_source(browser, source).await {
            Ok(items) => {
                info!(source = %source.name, count = items.len(), "Fetched rendered page");
                all.extend(items.into_iter().map(|article| Harvest {
                    source_name: source.name.clone(),
                    category_hint: None,
                    default_location: source.default_location.clone(),
                    article,
                }));
            }
            Err(e) => {
                error!(source = %source.name, error = %e, "Rendered source failed; skipping");
            }
        }
    }

    all
}

async fn scrape_source(
    browser: &Browser,
    source: &HtmlSource,
) -> Result<Vec<crate::models::RawArticle>, Box<dyn Error>> {
    let page = timeout(NAV_TIMEOUT, browser.new_page(source.url.as_str()))
        .await
        .map_err(|_| format!("navigation timed out after {NAV_TIMEOUT:?}"))??;

    // The page handle must be closed on every path below.
    let result = async {
        let _ = timeout(NAV_TIMEOUT, page.wait_for_navigation()).await;

        let deadline = Instant::now() + SELECTOR_TIMEOUT;
        loop {
            match page.find_element(source.article_selector.as_str()).await {
                Ok(_) => break,
                Err(_) if Instant::now() < deadline => sleep(POLL_INTERVAL).await,
                Err(e) => {
                    return Err::<_, Box<dyn Error>>(
                        format!(
                            "article selector {:?} never appeared: {e}",
                            source.article_selector
                        )
                        .into(),
                    );
                }
            }
        }

        let rendered = page.content().await?;
        debug!(source = %source.name, bytes = rendered.len(), "Rendered DOM captured");
        Ok(html::extract_articles(&rendered, source))
    }
    .await;

    if let Err(e) = page.close().await {
        warn!(source = %source.name, error = %e, "Page close reported an error");
    }
    result
}
