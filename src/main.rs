//! # Sci News Harvester
//!
//! A concurrent crawler that harvests science-news articles from Russian
//! science portals (sibac.info, rscf.ru) into a local news database.
//!
//! ## Pipeline
//!
//! 1. **Link discovery**: fetch the configured number of listing pages per
//!    source and collect article URLs
//! 2. **Content extraction**: fetch every discovered article and extract
//!    title + body text
//! 3. **Persistence**: dedupe against already-stored titles and bulk-insert
//!    the new rows inside one transaction
//!
//! Both fetch phases share a per-source concurrency limiter (3 in-flight
//! requests by default). The run always finishes with a structured JSON
//! status payload on stdout.
//!
//! ## Usage
//!
//! ```sh
//! sci_news_harvester --seed-admin --pages 2
//! ```

use clap::Parser;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod crawler;
mod error;
mod fetch;
mod models;
mod sources;
mod store;
mod task;

use cli::Cli;
use error::Result;
use models::CrawlReport;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

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
    info!("sci_news_harvester starting up");

    let args = Cli::parse();
    debug!(?args.pages, ?args.max_concurrent, ?args.source, "Parsed CLI arguments");

    // --- Database ---
    let options = SqliteConnectOptions::from_str(&args.database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    info!(database = %args.database_url, "Database ready");

    if args.seed_admin {
        store::seed_author(&pool, store::AUTHOR_USERNAME).await?;
        info!(username = store::AUTHOR_USERNAME, "Author account ensured");
    }

    // --- Crawl ---
    let sources = sources::build_sources(&args.source)?;
    info!(count = sources.len(), pages = args.pages, "Sources configured");

    let report = task::run_crawl(&pool, &sources, args.pages, args.max_concurrent).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    if matches!(report, CrawlReport::Error { .. }) {
        std::process::exit(1);
    }
    Ok(())
}
