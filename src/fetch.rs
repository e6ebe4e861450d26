//! HTTP fetching with bounded timeouts and a shared connection pool.
//!
//! Every network request in the pipeline goes through a [`Fetcher`], a thin
//! wrapper around one `reqwest::Client` configured for the target sites:
//! a browser-like user agent, a three-part timeout (total / connect / read),
//! and TLS certificate verification disabled because the target portals ship
//! broken certificate chains.
//!
//! The client's connection pool is capped, so effective parallelism is the
//! smaller of the pool cap and the orchestrator's concurrency limiter.

use crate::error::Result;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument};

/// User agent presented to the target sites.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

/// Wall-clock bound for one complete request.
const TOTAL_TIMEOUT: Duration = Duration::from_secs(60);
/// Bound for establishing the TCP/TLS connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// Bound for each socket read while streaming the body.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Idle connections kept per host; caps pooled parallelism under the limiter.
const POOL_MAX_PER_HOST: usize = 10;

/// HTTP fetcher shared by one source for the duration of a crawl run.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Build a fetcher with the crawl-wide client configuration.
    ///
    /// Certificate verification is intentionally disabled: sibac.info and
    /// rscf.ru intermittently serve incomplete chains and the crawler only
    /// reads public pages.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying TLS backend fails to initialize.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .danger_accept_invalid_certs(true)
            .timeout(TOTAL_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(READ_TIMEOUT)
            .pool_max_idle_per_host(POOL_MAX_PER_HOST)
            .build()?;
        Ok(Self { client })
    }

    /// Fetch a URL and return the decoded response body.
    ///
    /// Non-2xx statuses are errors. The fetcher never retries; a failure
    /// propagates to the enclosing phase task and is handled by the
    /// orchestrator's fan-in.
    #[instrument(level = "debug", skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "fetched page");
        Ok(body)
    }
}
