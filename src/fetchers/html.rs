//! Static-HTML fetcher.
//!
//! Issues a plain GET (shared client carries the browser User-Agent and
//! request timeout), parses the body into a DOM, and extracts one raw
//! article per element matching the source's article selector. Relative
//! links are resolved against the source's base URL. Elements missing a
//! title or link are skipped.

use scraper::{Html, Selector};
use std::error::Error;
use tracing::{error, info, instrument, warn};
use url::Url;

use crate::fetchers::Harvest;
use crate::models::RawArticle;
use crate::sources::HtmlSource;

/// Extract raw articles from an already-downloaded page.
///
/// Shared with the browser fetcher, which feeds the rendered DOM through
/// the same selectors. A selector that fails to parse is a configuration
/// bug; it is logged and yields zero articles for the source.
pub fn extract_articles(html: &str, source: &HtmlSource) -> Vec<RawArticle> {
    let Ok(article_sel) = Selector::parse(&source.article_selector) else {
        error!(source = %source.name, selector = %source.article_selector, "Bad article selector");
        return Vec::new();
    };
    let Ok(title_sel) = Selector::parse(&source.title_selector) else {
        error!(source = %source.name, selector = %source.title_selector, "Bad title selector");
        return Vec::new();
    };
    let Ok(link_sel) = Selector::parse(&source.link_selector) else {
        error!(source = %source.name, selector = %source.link_selector, "Bad link selector");
        return Vec::new();
    };
    let content_sel = source
        .content_selector
        .as_deref()
        .and_then(|s| Selector::parse(s).ok());

    let base = match Url::parse(&source.base_url) {
        Ok(url) => url,
        Err(e) => {
            error!(source = %source.name, error = %e, "Bad base url");
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);
    let mut articles = Vec::new();

    for element in document.select(&article_sel) {
        let title = element
            .select(&title_sel)
            .next()
            .map(|t| t.text().collect::<Vec<_>>().join(" ").trim().to_string())
            .unwrap_or_default();
        if title.is_empty() {
            continue;
        }

        let Some(href) = element
            .select(&link_sel)
            .next()
            .and_then(|l| l.value().attr("href"))
        else {
            continue;
        };
        let Ok(link) = base.join(href) else {
            warn!(source = %source.name, href, "Unresolvable link; skipping item");
            continue;
        };

        let content = content_sel
            .as_ref()
            .and_then(|sel| element.select(sel).next())
            .map(|c| c.text().collect::<Vec<_>>().join(" ").trim().to_string())
            .unwrap_or_default();

        articles.push(RawArticle {
            title,
            content,
            link: link.to_string(),
            date: None,
        });
    }

    articles
}

async fn fetch_source(
    client: &reqwest::Client,
    source: &HtmlSource,
) -> Result<Vec<RawArticle>, Box<dyn Error>> {
    let body = client
        .get(&source.url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;
    Ok(extract_articles(&body, source))
}

/// Fetch every static HTML source sequentially, isolating failures.
#[instrument(level = "info", skip_all)]
pub async fn fetch_all(client: &reqwest::Client, sources: &[HtmlSource]) -> Vec<Harvest> {
    let mut all = Vec::new();

    for source in sources {
        match fetch_source(client, source).await {
            Ok(items) => {
                if items.is_empty() {
                    // Usually means the upstream markup changed.
                    warn!(source = %source.name, "Static fetch matched no articles");
                } else {
                    info!(source = %source.name, count = items.len(), "Fetched static page");
                }
                all.extend(items.into_iter().map(|article| Harvest {
                    source_name: source.name.clone(),
                    category_hint: None,
                    default_location: source.default_location.clone(),
                    article,
                }));
            }
            Err(e) => {
                error!(source = %source.name, error = %e, "Static source failed; skipping");
            }
        }
    }

    info!(count = all.len(), "Static HTML stage complete");
    all
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> HtmlSource {
        HtmlSource {
            name: "Test".to_string(),
            url: "https://example.com/list".to_string(),
            base_url: "https://example.com".to_string(),
            article_selector: ".story".to_string(),
            title_selector: ".headline".to_string(),
            content_selector: Some(".summary".to_string()),
            link_selector: "a".to_string(),
            requires_js: false,
            default_location: None,
        }
    }

    #[test]
    fn test_extracts_title_content_and_resolved_link() {
        let html = r#"
            <div class="story">
                <a href="/articles/1"><span class="headline">First story</span></a>
                <p class="summary">Summary text</p>
            </div>
        "#;
        let articles = extract_articles(html, &source());
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "First story");
        assert_eq!(articles[0].content, "Summary text");
        assert_eq!(articles[0].link, "https://example.com/articles/1");
    }

    #[test]
    fn test_absolute_links_kept() {
        let html = r#"
            <div class="story">
                <a href="https://other.example.org/x"><span class="headline">T</span></a>
            </div>
        "#;
        let articles = extract_articles(html, &source());
        assert_eq!(articles[0].link, "https://other.example.org/x");
    }

    #[test]
    fn test_items_missing_title_or_link_skipped() {
        let html = r#"
            <div class="story"><a href="/no-title">x</a></div>
            <div class="story"><span class="headline">No link</span></div>
            <div class="story">
                <a href="/ok"><span class="headline">Kept</span></a>
            </div>
        "#;
        let articles = extract_articles(html, &source());
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Kept");
    }

    #[test]
    fn test_missing_content_selector_yields_empty_content() {
        let mut src = source();
        src.content_selector = None;
        let html = r#"
            <div class="story">
                <a href="/a"><span class="headline">T</span></a>
                <p class="summary">ignored</p>
            </div>
        "#;
        let articles = extract_articles(html, &src);
        assert_eq!(articles[0].content, "");
    }

    #[test]
    fn test_no_matches_is_empty_not_error() {
        let articles = extract_articles("<html><body></body></html>", &source());
        assert!(articles.is_empty());
    }
}
