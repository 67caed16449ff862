//! Command-line interface definitions for News Atlas.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags or environment variables.

use clap::Parser;

/// Command-line arguments for the News Atlas pipeline.
///
/// # Examples
///
/// ```sh
/// # Default paths (writes public/news/data.json)
/// news_atlas
///
/// # Custom output directory, skipping the headless-browser stage
/// news_atlas -o ./out --skip-browser
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory the final data.json is written to
    #[arg(short, long, default_value = "public/news")]
    pub output_dir: String,

    /// Pre-existing sample article file used when scraping yields nothing
    #[arg(long, default_value = "public/news/sample-data.json")]
    pub sample_file: String,

    /// Skip the headless-browser stage (for hosts without Chrome)
    #[arg(long)]
    pub skip_browser: bool,

    /// Number of articles the sample generator produces on total fallback
    #[arg(long, default_value_t = 20)]
    pub sample_count: usize,
}
