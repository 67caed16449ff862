//! Curated source descriptors for the three fetcher strategies.
//!
//! Sources are in-process configuration rather than an external file:
//! the tables below are the single place where feed URLs, CSS selectors,
//! and per-source retry budgets live. Within a fetcher stage, sources are
//! processed in the order listed here.

use crate::models::{Category, Location};

/// Descriptor for one RSS feed.
#[derive(Debug, Clone)]
pub struct RssSource {
    /// Human-readable origin name, copied onto every article.
    pub name: String,
    pub url: String,
    /// Retries after the initial fetch attempt.
    pub retries: usize,
    /// Editorial hint about what the feed mostly carries. Informational;
    /// the classifier remains authoritative.
    pub category_hint: Option<Category>,
    /// Applied when the location detector finds nothing in the text.
    pub default_location: Option<Location>,
}

impl RssSource {
    fn new(name: &str, url: &str, retries: usize) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
            retries,
            category_hint: None,
            default_location: None,
        }
    }

    fn hint(mut self, category: Category) -> Self {
        self.category_hint = Some(category);
        self
    }

    fn located(mut self, location: Location) -> Self {
        self.default_location = Some(location);
        self
    }
}

/// Descriptor for one HTML page source, static or script-rendered.
///
/// The browser fetcher runs the exact same selector extraction as the
/// static fetcher, so both share this shape; `requires_js` routes the
/// source to the right stage.
#[derive(Debug, Clone)]
pub struct HtmlSource {
    pub name: String,
    pub url: String,
    /// Relative links in the page are resolved against this.
    pub base_url: String,
    /// Selects one element per article.
    pub article_selector: String,
    /// Selects the headline within an article element.
    pub title_selector: String,
    /// Selects body/summary text within an article element, if the page
    /// has any at the listing level.
    pub content_selector: Option<String>,
    /// Selects the element carrying the `href` within an article element.
    pub link_selector: String,
    /// True for pages whose content is populated client-side.
    pub requires_js: bool,
    pub default_location: Option<Location>,
}

/// RSS feeds, fetched first. Wire services and world desks with stable
/// feed URLs.
pub fn rss_sources() -> Vec<RssSource> {
    vec![
        RssSource::new("BBC World", "https://feeds.bbci.co.uk/news/world/rss.xml", 2),
        RssSource::new("Al Jazeera", "https://www.aljazeera.com/xml/rss/all.xml", 2),
        RssSource::new("Guardian World", "https://www.theguardian.com/world/rss", 2),
        RssSource::new("NPR News", "https://feeds.npr.org/1001/rss.xml", 2),
        RssSource::new("AP News", "https://feedx.net/rss/ap.xml", 3),
        RssSource::new("The Hill", "https://thehill.com/feed/", 2)
            .hint(Category::WorldPolitics)
            .located(Location::named(38.9072, -77.0369, "Washington")),
    ]
}

/// HTML page sources. Text-only mirrors parse reliably without a
/// browser; the script-rendered entries go through the headless stage.
pub fn html_sources() -> Vec<HtmlSource> {
    vec![
        HtmlSource {
            name: "CNN Lite".to_string(),
            url: "https://lite.cnn.com".to_string(),
            base_url: "https://lite.cnn.com".to_string(),
            article_selector: ".card--lite".to_string(),
            title_selector: "a".to_string(),
            content_selector: None,
            link_selector: "a".to_string(),
            requires_js: false,
            default_location: None,
        },
        HtmlSource {
            name: "NPR Text".to_string(),
            url: "https://text.npr.org".to_string(),
            base_url: "https://text.npr.org".to_string(),
            article_selector: "li".to_string(),
            title_selector: ".topic-title".to_string(),
            content_selector: None,
            link_selector: ".topic-title".to_string(),
            requires_js: false,
            default_location: None,
        },
        HtmlSource {
            name: "Reuters World".to_string(),
            url: "https://www.reuters.com/world/".to_string(),
            base_url: "https://www.reuters.com".to_string(),
            article_selector: "[data-testid='MediaStoryCard']".to_string(),
            title_selector: "[data-testid='Heading']".to_string(),
            content_selector: Some("[data-testid='Description']".to_string()),
            link_selector: "a[data-testid='Heading']".to_string(),
            requires_js: true,
            default_location: None,
        },
    ]
}
