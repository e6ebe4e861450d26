//! sibac.info article source.
//!
//! Scrapes the conference-paper archive at
//! [sibac.info/arhive-article](https://sibac.info/arhive-article). Listing
//! pages are addressed with a `?page=N` query parameter and link articles
//! from `#archive-wrapp div.item a`; article bodies live in
//! `div.field-items`.

use super::{Source, collect_links, extract_article, parse_selector};
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::models::ArticleRecord;
use async_trait::async_trait;
use scraper::Selector;
use tracing::{debug, info, instrument};
use url::Url;

/// Configuration name of this source.
pub const NAME: &str = "sibac";

const BASE_URL: &str = "https://sibac.info";
const START_URL: &str = "https://sibac.info/arhive-article";
const LISTING_SELECTOR: &str = "#archive-wrapp div.item a";
const CONTENT_SELECTORS: &[&str] = &["div.field-items"];

/// Crawler for sibac.info.
pub struct Sibac {
    fetcher: Fetcher,
    base_url: Url,
    listing: Selector,
    content: Vec<Selector>,
}

impl Sibac {
    /// Build the source with its own HTTP session.
    pub fn new() -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new()?,
            base_url: Url::parse(BASE_URL)?,
            listing: parse_selector(LISTING_SELECTOR)?,
            content: CONTENT_SELECTORS
                .iter()
                .map(|s| parse_selector(s))
                .collect::<Result<_>>()?,
        })
    }

    fn page_url(&self, page: u32) -> String {
        format!("{START_URL}?page={page}")
    }

    fn parse_listing(&self, html: &str) -> Vec<String> {
        collect_links(html, &self.listing, &self.base_url)
    }

    fn parse_article(&self, html: &str, url: &str) -> Option<ArticleRecord> {
        extract_article(html, &self.content, url)
    }
}

#[async_trait]
impl Source for Sibac {
    fn name(&self) -> &'static str {
        NAME
    }

    #[instrument(level = "info", skip(self))]
    async fn extract_links(&self, page: u32) -> Result<Vec<String>> {
        let html = self.fetcher.fetch(&self.page_url(page)).await?;
        let links = self.parse_listing(&html);
        info!(count = links.len(), "indexed sibac listing page");
        debug!(urls = ?links, "sibac urls");
        Ok(links)
    }

    #[instrument(level = "info", skip_all, fields(%url))]
    async fn extract_content(&self, url: &str) -> Result<Option<ArticleRecord>> {
        let html = self.fetcher.fetch(url).await?;
        Ok(self.parse_article(&html, url))
    }
}
