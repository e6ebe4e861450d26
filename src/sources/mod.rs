//! Source implementations for the crawled science-news portals.
//!
//! Each source knows two things: how to list article URLs from one paginated
//! listing page, and how to extract title + body text from one article page.
//! Everything else (fan-out, concurrency, persistence) is source-agnostic and
//! lives in the orchestrator.
//!
//! # Supported sources
//!
//! | Source | Module | Listing | Notes |
//! |--------|--------|---------|-------|
//! | sibac.info | [`sibac`] | `?page=N` archive | conference-paper archive |
//! | rscf.ru | [`rscf`] | `?PAGEN_2=N` press releases | falls back to `article` container |
//!
//! # Common behavior
//!
//! - Listing extraction returns an empty vector when nothing matches; only
//!   the fetch itself can fail.
//! - Article extraction returns `Ok(None)` when no content container matches;
//!   the orchestrator silently drops those. A missing `h1` degrades to the
//!   `"no title"` placeholder instead of failing.

use crate::error::{HarvestError, Result};
use crate::models::ArticleRecord;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

pub mod rscf;
pub mod sibac;

pub use rscf::Rscf;
pub use sibac::Sibac;

/// Placeholder used when an article page carries no `h1` heading.
pub const NO_TITLE: &str = "no title";

static H1_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("h1").unwrap());

/// One crawlable site: link discovery plus content extraction.
#[async_trait]
pub trait Source: Send + Sync {
    /// Short name used for configuration and log fields.
    fn name(&self) -> &'static str;

    /// Fetch listing page `page` and return the absolute article URLs on it,
    /// in document order.
    async fn extract_links(&self, page: u32) -> Result<Vec<String>>;

    /// Fetch an article page and extract its title and body text.
    ///
    /// Returns `Ok(None)` when the page has no recognizable content
    /// container.
    async fn extract_content(&self, url: &str) -> Result<Option<ArticleRecord>>;
}

/// Build the sources for a run from the configured names.
///
/// An empty slice selects every registered source, in registration order.
///
/// # Errors
///
/// Returns [`HarvestError::UnknownSource`] for a name with no implementation.
pub fn build_sources(names: &[String]) -> Result<Vec<Box<dyn Source>>> {
    if names.is_empty() {
        return Ok(vec![Box::new(Sibac::new()?), Box::new(Rscf::new()?)]);
    }
    names
        .iter()
        .map(|name| match name.as_str() {
            sibac::NAME => Ok(Box::new(Sibac::new()?) as Box<dyn Source>),
            rscf::NAME => Ok(Box::new(Rscf::new()?) as Box<dyn Source>),
            other => Err(HarvestError::UnknownSource(other.to_string())),
        })
        .collect()
}

/// Parse a CSS selector literal, mapping the parse error into [`HarvestError`].
pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| HarvestError::Selector(e.to_string()))
}

/// Collect the `href` of every element matching `selector`, resolved against
/// `base`. Elements without an `href`, and hrefs that do not resolve, are
/// skipped.
pub(crate) fn collect_links(html: &str, selector: &Selector, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();
    for element in document.select(selector) {
        if let Some(href) = element.value().attr("href") {
            if let Ok(resolved) = base.join(href) {
                links.push(resolved.to_string());
            }
        }
    }
    links
}

/// Extract title and flattened body text from an article page.
///
/// The first `h1` is the title (placeholder when absent). The content
/// container is the first match among `content_selectors`, tried in priority
/// order; no match yields `None`.
pub(crate) fn extract_article(
    html: &str,
    content_selectors: &[Selector],
    url: &str,
) -> Option<ArticleRecord> {
    let document = Html::parse_document(html);

    let title = document
        .select(&H1_SELECTOR)
        .next()
        .map(|h| h.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| NO_TITLE.to_string());

    let container = content_selectors
        .iter()
        .find_map(|sel| document.select(sel).next())?;

    Some(ArticleRecord {
        title,
        content: flatten_text(container),
        source_url: url.to_string(),
    })
}

/// Flatten an element's text nodes into one string: each node trimmed, empty
/// nodes dropped, blocks joined with a blank line.
pub(crate) fn flatten_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
