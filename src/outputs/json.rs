//! JSON sink for the final article batch.
//!
//! Serializes the ranked article list as pretty-printed JSON to
//! `{output_dir}/data.json`, fully replacing any previous content.
//! A write failure here is the only fatal condition in the pipeline and
//! propagates to the orchestrator.

use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

use crate::models::Article;

/// File name inside the output directory. The map UI fetches this path.
const OUTPUT_FILE: &str = "data.json";

/// Write the final batch, replacing any previous output.
#[instrument(level = "info", skip_all, fields(output_dir = %output_dir))]
pub async fn write_articles(articles: &[Article], output_dir: &str) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(articles)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(output_dir, error = %e, "Failed to create output directory");
        return Err(e.into());
    }

    let path = format!("{}/{}", output_dir.trim_end_matches('/'), OUTPUT_FILE);
    info!(path = %path, count = articles.len(), "Writing article JSON");
    fs::write(&path, json).await?;
    info!(path = %path, "Wrote article JSON");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Importance, Location};

    fn article(title: &str) -> Article {
        Article {
            id: crate::normalize::article_id(title),
            title: title.to_string(),
            content: "Body".to_string(),
            source: "test".to_string(),
            url: "https://example.com".to_string(),
            date: "2025-05-06T12:00:00+00:00".to_string(),
            timestamp: 1_746_532_800_000,
            location: Location::named(51.5074, -0.1278, "London"),
            category: Some(Category::WorldPolitics),
            region: "europe".to_string(),
            importance: Importance::Medium,
            show_on_map: Some(true),
        }
    }

    #[tokio::test]
    async fn test_written_file_round_trips() {
        let dir = std::env::temp_dir().join(format!("news_atlas_sink_{}", std::process::id()));
        let dir = dir.to_string_lossy().to_string();

        let batch = vec![article("First"), article("Second")];
        write_articles(&batch, &dir).await.unwrap();

        let body = tokio::fs::read_to_string(format!("{dir}/data.json"))
            .await
            .unwrap();
        let back: Vec<Article> = serde_json::from_str(&body).unwrap();

        assert_eq!(back.len(), 2);
        assert_eq!(back[0].title, "First");
        assert_eq!(back[0].location, batch[0].location);
        assert_eq!(back[0].category, Some(Category::WorldPolitics));
        assert_eq!(back[0].timestamp, batch[0].timestamp);

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_overwrites_previous_output() {
        let dir = std::env::temp_dir().join(format!("news_atlas_sink_ow_{}", std::process::id()));
        let dir = dir.to_string_lossy().to_string();

        write_articles(&[article("One"), article("Two")], &dir)
            .await
            .unwrap();
        write_articles(&[article("Only")], &dir).await.unwrap();

        let body = tokio::fs::read_to_string(format!("{dir}/data.json"))
            .await
            .unwrap();
        let back: Vec<Article> = serde_json::from_str(&body).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back[0].title, "Only");

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
