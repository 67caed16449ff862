//! Small helpers for logging and file system validation.

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        // max may land inside a multibyte character; back off to the
        // nearest char boundary before slicing.
        let mut cut = max;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then performs a write test by
/// creating and immediately deleting a probe file. Used by the
/// orchestrator before any fetching starts, so a bad output path fails
/// the run early instead of after minutes of scraping.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_multibyte_boundary() {
        // 119 ASCII bytes, then a two-byte char straddling offset 120.
        let s = format!("{}établissement", "a".repeat(119));
        let result = truncate_for_log(&s, 120);
        assert!(result.starts_with(&"a".repeat(119)));
        assert!(result.contains("…(+"));

        let all_multibyte = "é".repeat(80);
        let truncated = truncate_for_log(&all_multibyte, 33);
        assert!(truncated.starts_with(&"é".repeat(16)));
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_path() {
        let dir = std::env::temp_dir().join(format!("news_atlas_probe_{}", std::process::id()));
        let dir = dir.to_string_lossy().to_string();

        ensure_writable_dir(&dir).await.unwrap();
        assert!(std::path::Path::new(&dir).is_dir());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
