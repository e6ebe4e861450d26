//! Data models for crawled articles and the crawl report payload.
//!
//! This module defines the structures that flow through the pipeline:
//! - [`ArticleRecord`]: a scraped article before it reaches the database
//! - [`CrawlReport`]: the structured status payload returned by a crawl run
//!
//! The persisted `news` row itself is described by the SQL migrations; the
//! crawler only ever bulk-inserts new rows and never updates existing ones.

use serde::{Deserialize, Serialize};

/// A raw article as extracted from a source page.
///
/// Produced by the content-extraction phase. Records with an empty title or
/// empty content never reach the database; the persistence gate drops them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRecord {
    /// The article headline, or `"no title"` when the page had no `h1`.
    pub title: String,
    /// The flattened text of the article's content container.
    pub content: String,
    /// The URL the article was extracted from.
    pub source_url: String,
}

/// Structured outcome of one crawl run.
///
/// This is the only thing a caller of the task wrapper ever observes; all
/// pipeline failures are folded into the `error` variant rather than raised.
///
/// # Wire format
///
/// Serializes with a `status` discriminator matching the job contract:
///
/// ```json
/// {"status": "success", "added": 6}
/// {"status": "empty", "message": "no articles found"}
/// {"status": "no new articles"}
/// {"status": "error", "details": "..."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum CrawlReport {
    /// New rows were inserted.
    #[serde(rename = "success")]
    Success { added: u64 },
    /// The crawl completed but found no articles at all.
    #[serde(rename = "empty")]
    Empty { message: String },
    /// Articles were found but every title already existed.
    #[serde(rename = "no new articles")]
    NoNewArticles,
    /// The run failed; `details` carries the underlying error text.
    #[serde(rename = "error")]
    Error { details: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_serializes_with_status_tag() {
        let json = serde_json::to_value(CrawlReport::Success { added: 6 }).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["added"], 6);
    }

    #[test]
    fn no_new_articles_uses_spaced_status_string() {
        let json = serde_json::to_value(CrawlReport::NoNewArticles).unwrap();
        assert_eq!(json["status"], "no new articles");
    }

    #[test]
    fn error_report_round_trips() {
        let report = CrawlReport::Error {
            details: "listing fetch timed out".to_string(),
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: CrawlReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
