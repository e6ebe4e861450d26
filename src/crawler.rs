//! Two-phase crawl orchestration.
//!
//! One source run is two sequential fan-outs sharing one concurrency limiter:
//!
//! 1. **Phase A (link discovery)**: one task per listing page number, each
//!    gated by the limiter; the per-page URL lists are flattened in page
//!    order once every task has concluded.
//! 2. **Phase B (content extraction)**: one task per discovered URL, same
//!    gating; articles without a recognizable content container come back as
//!    `None` and are dropped, preserving the Phase-A URL order for the rest.
//!
//! # Fan-in semantics
//!
//! Tasks are awaited with `join_all`, so results come back positionally and a
//! failing task does not cancel its siblings. The first failure is surfaced
//! only after the whole batch has concluded, and it fails the run: partial
//! results are discarded rather than persisted.
//!
//! # Concurrency bounds
//!
//! The limiter caps in-flight extractions per source run (default 3). The
//! HTTP client's connection pool is a second, implicit bound underneath it,
//! so effective parallelism is the smaller of the two.

use crate::error::Result;
use crate::models::ArticleRecord;
use crate::sources::Source;
use futures::future::join_all;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{info, instrument};

/// Default number of simultaneously in-flight fetches per source run.
pub const DEFAULT_MAX_CONCURRENT: usize = 3;

/// Crawl every configured source and concatenate their articles in
/// configuration order.
///
/// Each source gets its own full Phase A + Phase B cycle with its own
/// limiter. A failure in any source fails the whole run.
#[instrument(level = "info", skip(sources))]
pub async fn crawl_all(
    sources: &[Box<dyn Source>],
    pages: u32,
    max_concurrent: usize,
) -> Result<Vec<ArticleRecord>> {
    let mut articles = Vec::new();
    for source in sources {
        info!(source = source.name(), pages, "starting source crawl");
        let records = crawl_source(source.as_ref(), pages, max_concurrent).await?;
        info!(
            source = source.name(),
            count = records.len(),
            "source crawl finished"
        );
        articles.extend(records);
    }
    Ok(articles)
}

/// Run both phases for one source and return its article records.
#[instrument(level = "info", skip(source), fields(source = source.name()))]
pub async fn crawl_source(
    source: &dyn Source,
    pages: u32,
    max_concurrent: usize,
) -> Result<Vec<ArticleRecord>> {
    // A zero-permit semaphore would deadlock the first acquire.
    let limiter = Arc::new(Semaphore::new(max_concurrent.max(1)));

    // Phase A: discover article URLs across listing pages.
    let link_tasks = (1..=pages).map(|page| {
        let limiter = Arc::clone(&limiter);
        async move {
            let _permit = limiter.acquire_owned().await?;
            source.extract_links(page).await
        }
    });
    let per_page = try_collect(join_all(link_tasks).await)?;
    let urls: Vec<String> = per_page.into_iter().flatten().collect();
    info!(count = urls.len(), "discovered article urls");

    // Phase B: extract content for every discovered URL.
    let content_tasks = urls.iter().map(|url| {
        let limiter = Arc::clone(&limiter);
        async move {
            let _permit = limiter.acquire_owned().await?;
            source.extract_content(url).await
        }
    });
    let extracted = try_collect(join_all(content_tasks).await)?;
    let articles: Vec<ArticleRecord> = extracted.into_iter().flatten().collect();
    info!(count = articles.len(), "extracted articles");

    Ok(articles)
}

/// Collect batch results positionally, surfacing the first failure only
/// after the whole batch has been awaited.
fn try_collect<T>(results: Vec<Result<T>>) -> Result<Vec<T>> {
    let mut collected = Vec::with_capacity(results.len());
    let mut first_err = None;
    for result in results {
        match result {
            Ok(value) => collected.push(value),
            Err(e) if first_err.is_none() => first_err = Some(e),
            Err(_) => {}
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(collected),
    }
}
