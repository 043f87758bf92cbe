//! Season aggregation over a crawl result
//!
//! The downstream consumer derives the set of seasons present as the
//! inclusive range from the first record's season to the last record's
//! season. It trusts discovery order instead of scanning the whole
//! sequence: pages are linked in broadcast sequence, so season numbers are
//! monotonically non-decreasing.

use std::ops::RangeInclusive;

use crate::error::{Result, ScrapeError};
use crate::types::{CrawlResult, EpisodeRecord};

/// Inclusive span of seasons covered by a crawl result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonSpan {
    /// Season of the first scraped episode
    pub first: u32,
    /// Season of the last scraped episode
    pub last: u32,
}

impl SeasonSpan {
    /// All seasons in the span, in order.
    pub fn seasons(&self) -> RangeInclusive<u32> {
        self.first..=self.last
    }

    /// Whether the span covers the given season.
    pub fn contains(&self, season: u32) -> bool {
        (self.first..=self.last).contains(&season)
    }

    /// Select a sub-range of seasons for presentation.
    ///
    /// The endpoints are reordered if supplied out of order.
    ///
    /// # Errors
    /// `ScrapeError::SeasonOutOfRange` if either endpoint falls outside
    /// the span.
    ///
    /// # Example
    /// ```
    /// use imdb_core::seasons::SeasonSpan;
    ///
    /// let span = SeasonSpan { first: 1, last: 5 };
    /// assert_eq!(span.select(4, 2).unwrap(), 2..=4);
    /// assert!(span.select(1, 9).is_err());
    /// ```
    pub fn select(&self, a: u32, b: u32) -> Result<RangeInclusive<u32>> {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        for endpoint in [lo, hi] {
            if !self.contains(endpoint) {
                return Err(ScrapeError::SeasonOutOfRange {
                    season: endpoint,
                    first: self.first,
                    last: self.last,
                });
            }
        }

        Ok(lo..=hi)
    }
}

/// Per-season figures for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSummary {
    /// Season number
    pub season: u32,
    /// Number of scraped episodes in the season
    pub episode_count: usize,
    /// Number of episodes carrying a published rating
    pub rated_count: usize,
    /// Mean of the published ratings; `None` if no episode is rated yet
    pub mean_rating: Option<f64>,
}

impl CrawlResult {
    /// Span of seasons covered by this result, from the first and last
    /// records only. `None` for an empty result.
    pub fn season_span(&self) -> Option<SeasonSpan> {
        let first = self.episodes.first()?.season;
        let last = self.episodes.last()?.season;
        Some(SeasonSpan { first, last })
    }

    /// Episodes of one season, in discovery order.
    pub fn episodes_in_season(&self, season: u32) -> impl Iterator<Item = &EpisodeRecord> {
        self.episodes.iter().filter(move |e| e.season == season)
    }

    /// Summarize the given seasons for presentation.
    pub fn summarize_seasons(&self, range: RangeInclusive<u32>) -> Vec<SeasonSummary> {
        range
            .map(|season| {
                let episodes: Vec<_> = self.episodes_in_season(season).collect();
                let rated: Vec<_> = episodes.iter().filter(|e| e.is_rated()).collect();
                let mean_rating = if rated.is_empty() {
                    None
                } else {
                    Some(rated.iter().map(|e| e.rating).sum::<f64>() / rated.len() as f64)
                };
                SeasonSummary {
                    season,
                    episode_count: episodes.len(),
                    rated_count: rated.len(),
                    mean_rating,
                }
            })
            .collect()
    }
}
