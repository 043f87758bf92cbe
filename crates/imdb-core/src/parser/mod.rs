//! HTML parsers for imdb.com episode pages
//!
//! This module contains parsers for extracting data from IMDb HTML pages:
//! - `episode`: Parse a single episode page into a record or a termination signal
//! - `series`: Parse the series title for the one-off seed resolution

pub mod episode;
pub mod series;

// Re-export main parsing functions
pub use episode::{parse_episode_page, parse_heading_numbers, parse_rating_value};
pub use series::parse_series_title;
