//! Error types for the IMDb episode-ratings crawler
//!
//! This module defines all error types used throughout the library.
//! Fatal crawl conditions fall into two user-facing classes: "could not
//! fetch" (`Http`, `FetchFailed`) and "page structure not recognized"
//! (`TemplateMismatch`).

use thiserror::Error;

/// Error type for crawler operations
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// HTTP request failed at the transport level
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("fetch failed for {url}: HTTP {status}")]
    FetchFailed {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Required HTML element was absent from the fetched page
    #[error("page structure not recognized: {0}")]
    TemplateMismatch(String),

    /// URL does not belong to the source site or cannot be resolved
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Requested season lies outside the scraped span
    #[error("season {season} is outside the scraped range {first}-{last}")]
    SeasonOutOfRange { season: u32, first: u32, last: u32 },

    /// Reading or writing the result file failed
    #[error("file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Result file did not contain the expected JSON structure
    #[error("result file malformed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    /// Whether this error belongs to the "could not fetch" class, as
    /// opposed to a template mismatch. Callers use this to word their
    /// diagnostics: a fetch failure hints at a connectivity problem, a
    /// template mismatch at a wrong address or a source-format change.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, ScrapeError::Http(_) | ScrapeError::FetchFailed { .. })
    }
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, ScrapeError>;
