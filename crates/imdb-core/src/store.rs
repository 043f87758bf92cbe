//! Persistence of crawl results
//!
//! Results are stored as a JSON file holding the two-element sequence
//! `[series_title, episodes]`. The shape is load-bearing: the season
//! summary (and any other downstream consumer) reads the same structure
//! back, so a round trip must reproduce the title and the ordered episode
//! sequence exactly.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::CrawlResult;

/// Default persistence target
pub const DEFAULT_OUTPUT_PATH: &str = "scraped.json";

/// Write a crawl result to a JSON file, replacing any existing file.
///
/// # Errors
/// - `ScrapeError::Io` if the file cannot be created or written
/// - `ScrapeError::Json` if serialization fails
pub fn save(result: &CrawlResult, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, result)?;
    writer.flush()?;
    log::debug!(
        "saved {} episode(s) of {:?} to {}",
        result.len(),
        result.series_title,
        path.display()
    );
    Ok(())
}

/// Read a crawl result back from a JSON file.
///
/// # Errors
/// - `ScrapeError::Io` if the file cannot be opened
/// - `ScrapeError::Json` if it does not hold the two-element sequence
pub fn load(path: impl AsRef<Path>) -> Result<CrawlResult> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    Ok(serde_json::from_reader(reader)?)
}
