//! Command-line interface definitions for the harvester.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! The database URL can also come from the `DATABASE_URL` environment
//! variable (a local `.env` file is honored).

use crate::crawler::DEFAULT_MAX_CONCURRENT;
use clap::Parser;

/// Command-line arguments for the harvester.
///
/// # Examples
///
/// ```sh
/// # Crawl two listing pages per source into ./news.db
/// sci_news_harvester --pages 2
///
/// # First run against a fresh database
/// sci_news_harvester --seed-admin
///
/// # Only one source, higher fetch parallelism
/// sci_news_harvester -s rscf --max-concurrent 5
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Number of listing pages to crawl per source
    #[arg(short, long, default_value_t = 2)]
    pub pages: u32,

    /// Database URL; the file is created on first use
    #[arg(short, long, env = "DATABASE_URL", default_value = "sqlite://news.db")]
    pub database_url: String,

    /// Maximum simultaneous fetches per source run
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENT)]
    pub max_concurrent: usize,

    /// Crawl only the named sources (repeatable; default: all)
    #[arg(short, long = "source")]
    pub source: Vec<String>,

    /// Create the author account before the run if it does not exist
    #[arg(long)]
    pub seed_admin: bool,
}
