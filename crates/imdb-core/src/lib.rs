//! IMDb Ratings Scraper Core Library
//!
//! This crate provides the core crawling functionality for collecting
//! per-episode metadata (title, season, episode number, audience rating)
//! of a television series from imdb.com.
//!
//! # Features
//! - Follow a series' "next episode" chain from a seed page
//! - Extract title, season/episode numbers, and rating per page
//! - Stop cleanly at unaired episodes or the end of the chain
//! - Politeness delay between fetches to avoid server overload
//! - Persist results in the JSON shape the season summary reads back

pub mod client;
pub mod crawler;
pub mod error;
pub mod parser;
pub mod seasons;
pub mod store;
pub mod types;

// Re-export main types for convenience
pub use client::{ClientConfig, ImdbClient, RateLimiter};
pub use crawler::{CrawlError, CrawlState, CrawlerConfig, EpisodeCrawler, ProgressEvent};
pub use error::{Result, ScrapeError};
pub use seasons::{SeasonSpan, SeasonSummary};
pub use types::{CrawlResult, EpisodeRecord, PageOutcome, NO_RATING};
