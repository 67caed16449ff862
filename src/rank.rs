//! Deduplication, ordering, and bounded selection of the final batch.
//!
//! Steps, applied in order to the concatenated article list:
//!
//! 1. Categorize-if-missing (fallback-file records may predate
//!    classification; freshly scraped articles pass through unchanged)
//! 2. Deduplicate by exact title, first occurrence wins
//! 3. Sort by timestamp, newest first
//! 4. Keep all priority-category articles, backfilling with the most
//!    recent others up to a minimum batch size
//! 5. Truncate to the maximum output size
//! 6. Force map visibility onto wars/disaster rows until the minimum
//!    number of map markers is reached or the list is exhausted

use itertools::Itertools;
use tracing::{debug, info};

use crate::classify;
use crate::models::{Article, Category};

/// Hard cap on the output batch.
pub const MAX_OUTPUT: usize = 50;
/// Minimum batch size the priority selection backfills toward.
pub const MIN_PRIORITY_BATCH: usize = 30;
/// Minimum number of `showOnMap` articles in the final batch.
pub const MIN_MAP_ITEMS: usize = 10;

/// Run classification for records that lack a definitive
/// category/visibility pair. Already-classified articles are returned
/// untouched so scraped and stored records can be mixed freely.
fn ensure_classified(mut article: Article) -> Article {
    if article.category.is_some() && article.show_on_map.is_some() {
        return article;
    }

    let text = format!("{}. {}", article.title, article.content);
    let classification = classify::classify(&text);
    article.category = Some(classification.category);
    article.show_on_map = Some(classification.show_on_map);
    if let Some(conflict) = classification.location {
        article.location = conflict.location;
        article.region = conflict.region;
    }
    debug!(id = %article.id, category = ?article.category, "Classified stored article");
    article
}

/// Produce the final bounded, ordered batch.
pub fn rank(articles: Vec<Article>) -> Vec<Article> {
    let input_len = articles.len();

    let deduped: Vec<Article> = articles
        .into_iter()
        .map(ensure_classified)
        .unique_by(|a| a.title.clone())
        .collect();
    let duplicates = input_len - deduped.len();

    let mut sorted = deduped;
    sorted.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let (priority, others): (Vec<Article>, Vec<Article>) = sorted
        .into_iter()
        .partition(|a| a.category.is_some_and(Category::is_priority));

    let mut selected = priority;
    if selected.len() < MIN_PRIORITY_BATCH {
        let fill = MIN_PRIORITY_BATCH - selected.len();
        selected.extend(others.into_iter().take(fill));
    }
    selected.truncate(MAX_OUTPUT);

    let mut on_map = selected
        .iter()
        .filter(|a| a.show_on_map == Some(true))
        .count();
    if on_map < MIN_MAP_ITEMS {
        for article in selected.iter_mut() {
            if on_map >= MIN_MAP_ITEMS {
                break;
            }
            let forceable = matches!(
                article.category,
                Some(Category::Wars) | Some(Category::Disaster)
            );
            if forceable && article.show_on_map != Some(true) {
                article.show_on_map = Some(true);
                on_map += 1;
            }
        }
    }

    info!(
        input = input_len,
        duplicates,
        output = selected.len(),
        on_map,
        "Ranked article batch"
    );
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Importance, Location};

    fn article(title: &str, category: Category, timestamp: i64, show: bool) -> Article {
        Article {
            id: crate::normalize::article_id(title),
            title: title.to_string(),
            content: String::new(),
            source: "test".to_string(),
            url: "https://example.com".to_string(),
            date: "2025-05-06T12:00:00+00:00".to_string(),
            timestamp,
            location: Location::global(),
            category: Some(category),
            region: "global".to_string(),
            importance: Importance::Low,
            show_on_map: Some(show),
        }
    }

    fn batch(count: usize, category: Category, show: bool) -> Vec<Article> {
        (0..count)
            .map(|i| {
                article(
                    &format!("{category:?} headline {i}"),
                    category,
                    1_000_000 + i as i64,
                    show,
                )
            })
            .collect()
    }

    #[test]
    fn test_dedup_first_occurrence_wins() {
        let mut a = article("Same title", Category::Wars, 100, true);
        a.source = "first".to_string();
        let mut b = article("Same title", Category::Wars, 200, true);
        b.source = "second".to_string();

        let out = rank(vec![a, b]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source, "first");
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let mut input = batch(20, Category::Wars, true);
        input.extend(batch(20, Category::Wars, true)); // exact duplicates

        let once = rank(input);
        let twice = rank(once.clone());

        let ids_once: Vec<&str> = once.iter().map(|a| a.id.as_str()).collect();
        let ids_twice: Vec<&str> = twice.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids_once, ids_twice);
        assert_eq!(
            once.iter().map(|a| a.show_on_map).collect::<Vec<_>>(),
            twice.iter().map(|a| a.show_on_map).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_sorted_newest_first() {
        let input = vec![
            article("old", Category::Wars, 100, true),
            article("new", Category::Wars, 300, true),
            article("mid", Category::Wars, 200, true),
        ];
        let out = rank(input);
        let stamps: Vec<i64> = out.iter().map(|a| a.timestamp).collect();
        assert_eq!(stamps, vec![300, 200, 100]);
    }

    #[test]
    fn test_truncates_to_max_output() {
        let out = rank(batch(80, Category::Wars, true));
        assert_eq!(out.len(), MAX_OUTPUT);
    }

    #[test]
    fn test_backfills_to_minimum_batch() {
        // 10 priority + 40 others: output is min(50, max(30, 10)) = 30.
        let mut input = batch(10, Category::Wars, true);
        input.extend(batch(40, Category::ScienceTech, true));

        let out = rank(input);
        assert_eq!(out.len(), MIN_PRIORITY_BATCH);

        // Priority articles come first, backfill after.
        let priority_count = out
            .iter()
            .take_while(|a| a.category.is_some_and(Category::is_priority))
            .count();
        assert_eq!(priority_count, 10);
    }

    #[test]
    fn test_priority_articles_exceeding_minimum_are_all_kept() {
        // 42 priority + 30 others: output is min(50, max(30, 42)) = 42.
        let mut input = batch(42, Category::Economy, false);
        input.extend(batch(30, Category::CultureCuriosities, false));

        let out = rank(input);
        assert_eq!(out.len(), 42);
        assert!(
            out.iter()
                .all(|a| a.category.is_some_and(Category::is_priority))
        );
    }

    #[test]
    fn test_map_quota_forced_onto_wars_and_disaster() {
        // Nothing flagged for the map; 10 wars rows are available to force.
        let mut input = batch(10, Category::Wars, false);
        input.extend(batch(40, Category::WorldPolitics, false));

        let out = rank(input);
        let on_map = out.iter().filter(|a| a.show_on_map == Some(true)).count();
        assert_eq!(on_map, MIN_MAP_ITEMS);
        assert!(
            out.iter()
                .filter(|a| a.show_on_map == Some(true))
                .all(|a| a.category == Some(Category::Wars))
        );
    }

    #[test]
    fn test_map_quota_stops_at_exhaustion() {
        // Only 4 forceable rows exist; quota does what it can.
        let mut input = batch(4, Category::Disaster, false);
        input.extend(batch(30, Category::WorldPolitics, false));

        let out = rank(input);
        let on_map = out.iter().filter(|a| a.show_on_map == Some(true)).count();
        assert_eq!(on_map, 4);
    }

    #[test]
    fn test_map_quota_satisfied_count_not_touched() {
        let input = batch(40, Category::Wars, true);
        let out = rank(input);
        let on_map = out.iter().filter(|a| a.show_on_map == Some(true)).count();
        assert_eq!(on_map, 40);
    }

    #[test]
    fn test_categorize_if_missing() {
        let mut stored = article("placeholder", Category::Wars, 100, true);
        stored.title = "Magnitude 7 earthquake shakes the region".to_string();
        stored.category = None;
        stored.show_on_map = None;

        let out = rank(vec![stored]);
        assert_eq!(out[0].category, Some(Category::Disaster));
        assert_eq!(out[0].show_on_map, Some(true));
    }

    #[test]
    fn test_already_classified_passes_through_unchanged() {
        // Text says earthquake, but the stored classification wins.
        let mut stored = article(
            "Magnitude 7 earthquake shakes the region",
            Category::Economy,
            100,
            false,
        );
        stored.show_on_map = Some(false);

        let out = rank(vec![stored]);
        assert_eq!(out[0].category, Some(Category::Economy));
        assert_eq!(out[0].show_on_map, Some(false));
    }
}
