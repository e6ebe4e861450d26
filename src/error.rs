//! Crate-wide error type for the harvesting pipeline.
//!
//! Every fallible operation in the pipeline returns [`Result`]. Errors
//! propagate with `?` all the way up to the task wrapper, which is the only
//! place they are converted into a user-facing report payload.

use thiserror::Error;

/// Errors produced by the harvesting pipeline.
#[derive(Error, Debug)]
pub enum HarvestError {
    /// An HTTP request failed (connect, timeout, non-2xx status, body read).
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A database query or transaction failed.
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),

    /// Running the embedded migrations failed.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// A URL could not be parsed or resolved.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    /// Serializing the report payload failed.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSS selector literal failed to parse.
    #[error("invalid selector `{0}`")]
    Selector(String),

    /// The concurrency limiter was closed while a task waited on it.
    #[error("concurrency limiter closed")]
    LimiterClosed(#[from] tokio::sync::AcquireError),

    /// A source name given on the command line has no registered implementation.
    #[error("unknown source `{0}`")]
    UnknownSource(String),

    /// The author account that owns crawled rows does not exist.
    #[error("author account `{0}` not found")]
    AuthorNotFound(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HarvestError>;
