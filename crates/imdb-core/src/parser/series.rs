//! Series title parser for imdb.com
//!
//! The series title is resolved once per crawl, from the seed page, using
//! the same container-lookup rule as the episode extractor. Episode pages
//! carry the parent series in a dedicated block above the episode header.

use scraper::Html;

use crate::error::{Result, ScrapeError};

use super::episode::required;

/// Parse the series title from an episode page.
///
/// The title lives in the `title` attribute of the parent-series link, not
/// in its text, which holds the episode-count label instead.
///
/// # Arguments
/// * `html` - Raw HTML content of an episode page
///
/// # Returns
/// * `Ok(String)` with the series display title
/// * `Err(ScrapeError::TemplateMismatch)` if the parent-series block or its
///   link is absent, which means the address does not point to a valid
///   episode page
pub fn parse_series_title(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let container = required(root, "div.titleParent", "series title block")?;
    let link = required(container, "a", "series title link")?;

    let title = link
        .value()
        .attr("title")
        .map(str::trim)
        .unwrap_or_default();
    if title.is_empty() {
        return Err(ScrapeError::TemplateMismatch(
            "series title attribute".to_string(),
        ));
    }

    Ok(title.to_string())
}
