//! HTTP client with politeness delay for imdb.com
//!
//! This module provides a rate-limited HTTP client that keeps a fixed
//! pause between successive fetches to bound the request rate against the
//! source server. Each page gets exactly one fetch attempt; any transport
//! error or non-success status is fatal to the crawl.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

use crate::error::{Result, ScrapeError};

/// Default User-Agent mimicking a modern browser
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default Accept-Language header
const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Rate limiter enforcing the politeness delay
///
/// Ensures that requests are spaced at least `min_interval` apart so the
/// crawl never exceeds one request per interval against the source server.
pub struct RateLimiter {
    /// Minimum interval between requests
    min_interval: Duration,
    /// Timestamp of the last request
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given minimum interval.
    ///
    /// # Arguments
    /// * `min_interval` - Politeness delay between successive requests
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use imdb_core::client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(Duration::from_secs(1));
    /// ```
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(Instant::now() - min_interval)),
        }
    }

    /// Acquire permission to make a request.
    ///
    /// Waits if necessary so that the minimum interval since the previous
    /// request is respected. The first acquisition never waits.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            let wait_time = self.min_interval - elapsed;
            sleep(wait_time).await;
        }

        *last = Instant::now();
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Politeness delay between fetches in seconds (default: 1.0)
    pub politeness_delay_secs: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            politeness_delay_secs: 1.0,
            timeout_secs: 30,
        }
    }
}

/// HTTP client for imdb.com with a fixed inter-request delay
///
/// This client automatically:
/// - Spaces requests by the configured politeness delay
/// - Sets browser-like headers
///
/// It deliberately does NOT retry: a failed fetch aborts the crawl, and
/// the caller decides what to do with the partial result.
pub struct ImdbClient {
    /// Underlying HTTP client
    client: reqwest::Client,
    /// Rate limiter for request spacing
    rate_limiter: RateLimiter,
}

impl ImdbClient {
    /// Create a new client with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration.
    ///
    /// # Arguments
    /// * `config` - Client configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::ACCEPT_LANGUAGE,
                    reqwest::header::HeaderValue::from_static(DEFAULT_ACCEPT_LANGUAGE),
                );
                headers
            })
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let rate_limiter = RateLimiter::new(Duration::from_secs_f64(config.politeness_delay_secs));

        Ok(Self {
            client,
            rate_limiter,
        })
    }

    /// Fetch HTML content from an absolute URL.
    ///
    /// Waits out the politeness delay, then issues a single GET. There is
    /// no retry on any failure.
    ///
    /// # Arguments
    /// * `url` - Absolute URL of the page to fetch
    ///
    /// # Returns
    /// The HTML content as a string
    ///
    /// # Errors
    /// - `ScrapeError::Http` - transport-level failure (unreachable, timeout)
    /// - `ScrapeError::FetchFailed` - server answered with a non-2xx status
    pub async fn fetch(&self, url: &str) -> Result<String> {
        self.rate_limiter.acquire().await;

        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            log::warn!("fetch of {} failed with HTTP {}", url, status);
            return Err(ScrapeError::FetchFailed {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.text().await?)
    }

    /// Get a reference to the rate limiter (for testing)
    #[cfg(test)]
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}
