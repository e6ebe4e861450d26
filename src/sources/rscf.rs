//! rscf.ru press-release source.
//!
//! Scrapes the Russian Science Foundation's press releases at
//! [rscf.ru/news/release](https://rscf.ru/news/release/). Listing pages use
//! the Bitrix-style `?PAGEN_2=N` pagination parameter; article bodies live in
//! `div.b-news-detail-content` with a bare `article` element as fallback for
//! older pages.

use super::{Source, collect_links, extract_article, parse_selector};
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::models::ArticleRecord;
use async_trait::async_trait;
use scraper::Selector;
use tracing::{debug, info, instrument};
use url::Url;

/// Configuration name of this source.
pub const NAME: &str = "rscf";

const BASE_URL: &str = "https://rscf.ru";
const START_URL: &str = "https://rscf.ru/news/release/";
const LISTING_SELECTOR: &str = ".news-content .news-title";
const CONTENT_SELECTORS: &[&str] = &["div.b-news-detail-content", "article"];

/// Crawler for rscf.ru.
pub struct Rscf {
    fetcher: Fetcher,
    base_url: Url,
    listing: Selector,
    content: Vec<Selector>,
}

impl Rscf {
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
        format!("{START_URL}?PAGEN_2={page}")
    }

    fn parse_listing(&self, html: &str) -> Vec<String> {
        collect_links(html, &self.listing, &self.base_url)
    }

    fn parse_article(&self, html: &str, url: &str) -> Option<ArticleRecord> {
        extract_article(html, &self.content, url)
    }
}

#[async_trait]
impl Source for Rscf {
    fn name(&self) -> &'static str {
        NAME
    }

    #[instrument(level = "info", skip(self))]
    async fn extract_links(&self, page: u32) -> Result<Vec<String>> {
        let html = self.fetcher.fetch(&self.page_url(page)).await?;
        let links = self.parse_listing(&html);
        info!(count = links.len(), "indexed rscf listing page");
        debug!(urls = ?links, "rscf urls");
        Ok(links)
    }

    #[instrument(level = "info", skip_all, fields(%url))]
    async fn extract_content(&self, url: &str) -> Result<Option<ArticleRecord>> {
        let html = self.fetcher.fetch(url).await?;
        Ok(self.parse_article(&html, url))
    }
}
