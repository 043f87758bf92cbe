//! Data types for the IMDb episode-ratings crawler
//!
//! This module contains the core data structures used throughout the
//! library. `EpisodeRecord` and `CrawlResult` serialize to the exact JSON
//! shape the downstream season summary reads back.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rating value recorded when IMDb has not published a rating yet.
///
/// IMDb never issues a true zero rating, so `0.0` doubles as the
/// "no rating yet" sentinel. The persisted format requires a concrete
/// number for every episode, which rules out an absent/nullable field.
pub const NO_RATING: f64 = 0.0;

/// One scraped episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    /// Display name of the episode
    pub title: String,
    /// Season number (1-based)
    pub season: u32,
    /// Episode number within the season (1-based)
    pub episode: u32,
    /// IMDb rating in [0.0, 10.0]; `NO_RATING` if not rated yet
    pub rating: f64,
}

impl EpisodeRecord {
    /// Whether a rating was published for this episode, as opposed to
    /// the `NO_RATING` sentinel.
    pub fn is_rated(&self) -> bool {
        self.rating != NO_RATING
    }
}

/// Accumulated result of one crawl
///
/// Created empty at crawl start, appended to once per extracted page, and
/// final once the crawl terminates. Episodes stay in crawl-discovery order,
/// which is broadcast order because the pages are linked in sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlResult {
    /// Series title, resolved once before the crawl starts
    pub series_title: String,
    /// Scraped episodes in discovery order
    pub episodes: Vec<EpisodeRecord>,
}

impl CrawlResult {
    /// Create an empty result for the given series.
    pub fn new(series_title: impl Into<String>) -> Self {
        Self {
            series_title: series_title.into(),
            episodes: Vec::new(),
        }
    }

    /// Number of scraped episodes.
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    /// Whether no episode has been scraped.
    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

// The file format is a two-element sequence [series_title, episodes], kept
// for round-trip compatibility with existing result files.
impl Serialize for CrawlResult {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (&self.series_title, &self.episodes).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CrawlResult {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (series_title, episodes) = <(String, Vec<EpisodeRecord>)>::deserialize(deserializer)?;
        Ok(Self {
            series_title,
            episodes,
        })
    }
}

/// Outcome of extracting a single episode page
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// The page describes an already-broadcast episode
    Aired {
        /// Extracted episode data
        record: EpisodeRecord,
        /// Address of the next episode page, possibly relative;
        /// `None` on the last episode of the series
        next_url: Option<String>,
    },
    /// The broadcast-date indicator announces a future air date;
    /// the crawl ends here without a record for this page
    Unaired,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> EpisodeRecord {
        EpisodeRecord {
            title: "Ozymandias".to_string(),
            season: 5,
            episode: 14,
            rating: 10.0,
        }
    }

    #[test]
    fn test_episode_record_serialization_field_names() {
        let json = serde_json::to_value(sample_record()).unwrap();
        assert_eq!(json["title"], "Ozymandias");
        assert_eq!(json["season"], 5);
        assert_eq!(json["episode"], 14);
        assert_eq!(json["rating"], 10.0);
    }

    #[test]
    fn test_episode_record_is_rated() {
        assert!(sample_record().is_rated());

        let unrated = EpisodeRecord {
            title: "Finale".to_string(),
            season: 6,
            episode: 1,
            rating: NO_RATING,
        };
        assert!(!unrated.is_rated());
    }

    #[test]
    fn test_crawl_result_serializes_as_two_element_sequence() {
        let mut result = CrawlResult::new("Breaking Bad");
        result.episodes.push(sample_record());

        let json = serde_json::to_value(&result).unwrap();
        let array = json.as_array().expect("top level must be a sequence");
        assert_eq!(array.len(), 2);
        assert_eq!(array[0], "Breaking Bad");
        assert_eq!(array[1].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_crawl_result_round_trip() {
        let mut result = CrawlResult::new("Breaking Bad");
        result.episodes.push(sample_record());
        result.episodes.push(EpisodeRecord {
            title: "Felina".to_string(),
            season: 5,
            episode: 16,
            rating: 9.9,
        });

        let json = serde_json::to_string(&result).unwrap();
        let restored: CrawlResult = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, result);
    }

    #[test]
    fn test_crawl_result_starts_empty() {
        let result = CrawlResult::new("Test Series");
        assert!(result.is_empty());
        assert_eq!(result.len(), 0);
    }
}
