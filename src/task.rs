//! The crawl task: orchestration plus persistence behind a non-throwing
//! boundary.
//!
//! [`run_crawl`] is the entry point a job runner (or the CLI) invokes. It
//! never returns an error; every failure path folds into the structured
//! [`CrawlReport`] payload, so the caller only ever observes
//! `success` / `empty` / `no new articles` / `error`.

use crate::crawler;
use crate::error::{HarvestError, Result};
use crate::models::CrawlReport;
use crate::sources::Source;
use crate::store;
use sqlx::SqlitePool;
use tracing::{error, info, instrument, warn};

/// Run one complete crawl over `sources` and persist the new articles.
///
/// All failures (network, parse plumbing, database, missing author account)
/// are caught here and reported through the payload. No partial results are
/// persisted from a failed run.
#[instrument(level = "info", skip(pool, sources))]
pub async fn run_crawl(
    pool: &SqlitePool,
    sources: &[Box<dyn Source>],
    pages: u32,
    max_concurrent: usize,
) -> CrawlReport {
    match crawl_and_store(pool, sources, pages, max_concurrent).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "crawl run failed");
            CrawlReport::Error {
                details: e.to_string(),
            }
        }
    }
}

async fn crawl_and_store(
    pool: &SqlitePool,
    sources: &[Box<dyn Source>],
    pages: u32,
    max_concurrent: usize,
) -> Result<CrawlReport> {
    let records = crawler::crawl_all(sources, pages, max_concurrent).await?;

    if records.is_empty() {
        warn!("crawl produced no articles");
        return Ok(CrawlReport::Empty {
            message: "no articles found".to_string(),
        });
    }

    let author_id = store::find_author(pool, store::AUTHOR_USERNAME)
        .await?
        .ok_or_else(|| HarvestError::AuthorNotFound(store::AUTHOR_USERNAME.to_string()))?;

    let added = store::commit(pool, &records, author_id).await?;
    if added == 0 {
        info!("every crawled title already stored");
        Ok(CrawlReport::NoNewArticles)
    } else {
        Ok(CrawlReport::Success { added })
    }
}
