//! Episode page parser for imdb.com
//!
//! Transforms the markup of one episode page into a `PageOutcome`: an
//! extracted record, or the unaired termination signal. Structural elements
//! that every page of the canonical template carries (header block, date
//! indicator, title, season/episode heading) are fatal when absent; the
//! rating element is display-only and its absence yields the sentinel.

use scraper::{ElementRef, Html, Selector};

use crate::error::{Result, ScrapeError};
use crate::types::{EpisodeRecord, PageOutcome, NO_RATING};

/// Marker phrase in the broadcast-date indicator of a not-yet-aired episode.
///
/// Kept as a literal substring check; the source site words it exactly
/// like this on unaired episode pages.
const UNAIRED_MARKER: &str = "Episode airs";

/// Parse one episode page.
///
/// # Arguments
/// * `html` - Raw HTML content of the episode page
///
/// # Returns
/// * `Ok(PageOutcome::Aired)` with the extracted record and the optional
///   address of the next episode page
/// * `Ok(PageOutcome::Unaired)` if the broadcast-date indicator announces
///   a future air date
/// * `Err(ScrapeError::TemplateMismatch)` if an expected structural
///   element is absent
pub fn parse_episode_page(html: &str) -> Result<PageOutcome> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    // Header block with all relevant information
    let vital = required(root, "div.vital", "episode header block")?;

    // Broadcast-date indicator; an unaired episode ends the crawl here
    let date = required(vital, r#"a[title="See more release dates"]"#, "broadcast date indicator")?;
    if element_text(date).contains(UNAIRED_MARKER) {
        return Ok(PageOutcome::Unaired);
    }

    // Episode title
    let title_el = required(vital, r#"h1[itemprop="name"]"#, "episode title heading")?;
    let title = element_text(title_el);
    if title.is_empty() {
        return Err(ScrapeError::TemplateMismatch(
            "episode title heading".to_string(),
        ));
    }

    // Combined "Season N | Episode M" heading
    let heading_el = required(vital, "div.bp_heading", "season/episode heading")?;
    let heading = element_text(heading_el);
    let (season, episode) = parse_heading_numbers(&heading).ok_or_else(|| {
        ScrapeError::TemplateMismatch(format!("season/episode heading: {:?}", heading))
    })?;

    // Rating is missing for some episodes; substitute the sentinel.
    // A present but malformed rating is a template change and fatal.
    let rating = match optional(vital, r#"span[itemprop="ratingValue"]"#) {
        Some(el) => {
            let text = element_text(el);
            parse_rating_value(&text).ok_or_else(|| {
                ScrapeError::TemplateMismatch(format!("rating value: {:?}", text))
            })?
        }
        None => NO_RATING,
    };

    // Next-episode link; absent on the last episode of the series.
    // Link resolution is the crawler's job, so the raw href is returned.
    let next_url = optional(vital, "a.bp_item.np_next")
        .and_then(|el| el.value().attr("href"))
        .map(|href| href.to_string());

    Ok(PageOutcome::Aired {
        record: EpisodeRecord {
            title,
            season,
            episode,
            rating,
        },
        next_url,
    })
}

/// Parse season and episode numbers from a combined heading.
///
/// The heading is split on `|`; the final whitespace-delimited token of
/// each half supplies the number, taking the token's trailing digit run
/// so that both `"Season 3"` and `"S3"` yield `3`. Both numbers must be
/// positive.
///
/// # Examples
/// ```
/// use imdb_core::parser::parse_heading_numbers;
///
/// assert_eq!(parse_heading_numbers("Season 3 | Episode 12"), Some((3, 12)));
/// assert_eq!(parse_heading_numbers("S3 | Ep 12"), Some((3, 12)));
/// assert_eq!(parse_heading_numbers("Season finale"), None);
/// ```
pub fn parse_heading_numbers(text: &str) -> Option<(u32, u32)> {
    let (season_half, episode_half) = text.split_once('|')?;
    let season = trailing_number(season_half)?;
    let episode = trailing_number(episode_half)?;
    Some((season, episode))
}

/// Extract the number carried by the final whitespace-delimited token.
fn trailing_number(half: &str) -> Option<u32> {
    let token = half.split_whitespace().last()?;
    let re = regex_lite::Regex::new(r"(\d+)$").ok()?;
    let caps = re.captures(token)?;
    let number: u32 = caps.get(1)?.as_str().parse().ok()?;
    if number > 0 {
        Some(number)
    } else {
        None
    }
}

/// Parse a rating value in [0.0, 10.0] from element text.
///
/// # Examples
/// ```
/// use imdb_core::parser::parse_rating_value;
///
/// assert_eq!(parse_rating_value("8.5"), Some(8.5));
/// assert_eq!(parse_rating_value(" 9.0 "), Some(9.0));
/// assert_eq!(parse_rating_value("11.2"), None);
/// assert_eq!(parse_rating_value("n/a"), None);
/// ```
pub fn parse_rating_value(text: &str) -> Option<f64> {
    let rating: f64 = text.trim().parse().ok()?;
    if (0.0..=10.0).contains(&rating) {
        Some(rating)
    } else {
        None
    }
}

/// Find the first descendant matching `css`, or a `TemplateMismatch`
/// naming the missing element.
pub(super) fn required<'a>(
    scope: ElementRef<'a>,
    css: &str,
    what: &str,
) -> Result<ElementRef<'a>> {
    optional(scope, css).ok_or_else(|| ScrapeError::TemplateMismatch(what.to_string()))
}

/// Find the first descendant matching `css`, if any.
pub(super) fn optional<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

/// Collect and trim an element's text content.
pub(super) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
