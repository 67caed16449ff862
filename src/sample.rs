//! Last-resort article fixtures.
//!
//! When every fetcher comes back empty the pipeline falls back to, in
//! order: a pre-existing sample JSON file, then the generator below. The
//! generator guarantees at least one article per named conflict zone so
//! the map view is never empty, and fills remaining slots by cycling the
//! general categories.

use chrono::{Duration as ChronoDuration, Utc};
use rand::{Rng, rng};
use tracing::{info, warn};

use crate::geo::{self, GeoMatch};
use crate::models::{Article, Category, Importance, Location};
use crate::normalize;

/// Window for randomized fixture timestamps.
const SAMPLE_WINDOW_DAYS: i64 = 7;

/// Load a pre-existing sample file, if it exists and holds a non-empty
/// article array. Any problem reading or parsing it just disables this
/// fallback level.
pub async fn load_fallback_file(path: &str) -> Option<Vec<Article>> {
    let body = tokio::fs::read_to_string(path).await.ok()?;
    match serde_json::from_str::<Vec<Article>>(&body) {
        Ok(articles) if !articles.is_empty() => {
            info!(path, count = articles.len(), "Loaded fallback sample file");
            Some(articles)
        }
        Ok(_) => None,
        Err(e) => {
            warn!(path, error = %e, "Fallback sample file is unparseable; ignoring");
            None
        }
    }
}

fn headline_for(category: Category, index: usize) -> String {
    match category {
        Category::Economy => format!("Markets weigh central bank signals in week {index}"),
        Category::WorldPolitics => format!("Leaders prepare for regional summit round {index}"),
        Category::ScienceTech => format!("Research team reports progress on fusion milestone {index}"),
        Category::PlanetPeople => format!("Climate assessment updates projections, part {index}"),
        Category::Disaster => format!("Aftershocks continue following magnitude 6 earthquake, day {index}"),
        Category::Wars | Category::CultureCuriosities => {
            format!("Regional developments under review, item {index}")
        }
    }
}

fn fixture(
    title: &str,
    content: &str,
    category: Category,
    show_on_map: bool,
    place: GeoMatch,
) -> Article {
    let mut rng = rng();
    let offset_ms = rng.random_range(0..ChronoDuration::days(SAMPLE_WINDOW_DAYS).num_milliseconds());
    let instant = Utc::now() - ChronoDuration::milliseconds(offset_ms);

    Article {
        id: normalize::article_id(title),
        title: title.to_string(),
        content: content.to_string(),
        source: "sample".to_string(),
        url: "https://example.com/sample".to_string(),
        date: instant.to_rfc3339(),
        timestamp: instant.timestamp_millis(),
        location: place.location,
        category: Some(category),
        region: place.region,
        importance: Importance::Medium,
        show_on_map: Some(show_on_map),
    }
}

/// Build plausible fixture articles.
///
/// Always yields one `wars` article per known conflict zone, then cycles
/// the general categories until `count` is reached (so the result length
/// is `max(count, conflict_zone_count)`).
pub fn generate(count: usize) -> Vec<Article> {
    let mut articles = Vec::new();

    for zone in geo::CONFLICTS {
        let title = format!("Situation in {} escalates as talks stall", zone.name);
        let content = format!(
            "Reports from {} describe renewed fighting while mediators push for a ceasefire.",
            zone.name
        );
        articles.push(fixture(
            &title,
            &content,
            Category::Wars,
            true,
            GeoMatch::from_conflict(zone),
        ));
    }

    let mut index = 0usize;
    while articles.len() < count {
        let category = Category::GENERAL[index % Category::GENERAL.len()];
        let title = headline_for(category, index);
        let show = category == Category::Disaster;
        articles.push(fixture(
            &title,
            "Generated fixture article for local development and fallback use.",
            category,
            show,
            GeoMatch {
                location: Location::global(),
                region: "global".to_string(),
            },
        ));
        index += 1;
    }

    info!(count = articles.len(), "Generated sample articles");
    articles
}
