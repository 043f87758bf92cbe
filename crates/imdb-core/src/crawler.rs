//! Sequential episode crawler
//!
//! This module provides the high-level crawl API. It combines the HTTP
//! client with the episode parser and drives the traversal from a seed
//! page along the "next episode" chain until the series is exhausted, an
//! unaired episode is reached, or a fatal condition aborts the crawl.
//!
//! The crawl is strictly sequential: one page is fetched and fully
//! processed before the next address is chosen. The politeness delay
//! between fetches already serializes the useful throughput, so there is
//! nothing to gain from concurrency here.

use thiserror::Error;
use url::Url;

use crate::client::{ClientConfig, ImdbClient};
use crate::error::{Result, ScrapeError};
use crate::parser::{parse_episode_page, parse_series_title};
use crate::types::{CrawlResult, PageOutcome};

/// Base URL of the source site
const IMDB_BASE_URL: &str = "https://www.imdb.com";

/// Configuration for the crawler
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Source domain prefix; validates seed addresses and anchors
    /// relative next-links (default: `https://www.imdb.com`)
    pub base_url: String,
    /// Politeness delay between fetches in seconds (default: 1.0)
    pub politeness_delay_secs: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            base_url: IMDB_BASE_URL.to_string(),
            politeness_delay_secs: 1.0,
            timeout_secs: 30,
        }
    }
}

/// Traversal state of a crawl
///
/// The crawler holds exactly one current address at a time; there is no
/// backward navigation, no revisiting, and no cycle detection (the site
/// links episodes in a simple forward chain).
#[derive(Debug)]
pub enum CrawlState {
    /// About to fetch the page at this address
    Running(String),
    /// Normal termination: unaired episode reached or no next link
    Completed,
    /// Fatal condition; accumulated records survive as a partial result
    Aborted(ScrapeError),
}

/// Progress event emitted during a crawl
///
/// Observational output only; events never influence control flow.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Crawl started from the seed page
    Started {
        seed_url: String,
        series_title: String,
    },
    /// One episode page was extracted and appended to the result
    EpisodeScraped {
        title: String,
        season: u32,
        episode: u32,
        /// Whether a rating was published, as opposed to the sentinel
        rated: bool,
    },
    /// Crawl terminated normally
    Completed { episode_count: usize },
}

/// A fatal crawl condition together with whatever was accumulated before
/// it. The caller decides whether the partial result is worth persisting.
#[derive(Debug, Error)]
#[error("crawl aborted: {reason}")]
pub struct CrawlError {
    /// The condition that aborted the crawl
    pub reason: ScrapeError,
    /// Episodes accumulated before the abort, in discovery order
    pub partial: CrawlResult,
}

/// Sequential crawler for a series' episode chain
///
/// # Example
/// ```no_run
/// use imdb_core::EpisodeCrawler;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let crawler = EpisodeCrawler::new()?;
///
///     let seed = "https://www.imdb.com/title/tt0959621/";
///     let title = crawler.resolve_series_title(seed).await?;
///     let result = crawler.crawl(seed, &title, |_event| {}).await?;
///     println!("scraped {} episodes of {}", result.len(), result.series_title);
///
///     Ok(())
/// }
/// ```
pub struct EpisodeCrawler {
    client: ImdbClient,
    config: CrawlerConfig,
}

impl EpisodeCrawler {
    /// Create a new crawler with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> Result<Self> {
        Self::with_config(CrawlerConfig::default())
    }

    /// Create a new crawler with custom configuration.
    ///
    /// # Arguments
    /// * `config` - Crawler configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(config: CrawlerConfig) -> Result<Self> {
        let client = ImdbClient::with_config(ClientConfig {
            politeness_delay_secs: config.politeness_delay_secs,
            timeout_secs: config.timeout_secs,
        })?;
        Ok(Self { client, config })
    }

    /// Create a new crawler with a pre-configured client.
    ///
    /// Useful for testing or when custom client settings are needed.
    pub fn with_client(client: ImdbClient, config: CrawlerConfig) -> Self {
        Self { client, config }
    }

    /// Check that a seed address belongs to the source site.
    ///
    /// # Errors
    /// `ScrapeError::InvalidUrl` if the address does not start with the
    /// configured source domain prefix.
    pub fn validate_seed(&self, url: &str) -> Result<()> {
        if url.starts_with(&self.config.base_url) {
            Ok(())
        } else {
            Err(ScrapeError::InvalidUrl(format!(
                "{} does not start with {}",
                url, self.config.base_url
            )))
        }
    }

    /// Resolve the series title with one preliminary fetch of the seed
    /// page, outside the crawl loop.
    ///
    /// # Errors
    /// - `ScrapeError::InvalidUrl` if the seed is off-site
    /// - `ScrapeError::Http` / `ScrapeError::FetchFailed` if the fetch fails
    /// - `ScrapeError::TemplateMismatch` if the page carries no series title
    pub async fn resolve_series_title(&self, seed_url: &str) -> Result<String> {
        self.validate_seed(seed_url)?;
        let html = self.client.fetch(seed_url).await?;
        parse_series_title(&html)
    }

    /// Crawl the episode chain starting at `seed_url`.
    ///
    /// Fetches one page at a time, extracts it, appends the record, and
    /// follows the next-episode link until the chain ends or an unaired
    /// episode is reached. Each extracted record is reported through
    /// `progress` before the next fetch.
    ///
    /// # Arguments
    /// * `seed_url` - Absolute address of the first episode page
    /// * `series_title` - Title resolved via `resolve_series_title`
    /// * `progress` - Callback receiving `ProgressEvent`s
    ///
    /// # Errors
    /// On a fatal condition the returned `CrawlError` carries both the
    /// reason and the partial result accumulated so far.
    pub async fn crawl<F>(
        &self,
        seed_url: &str,
        series_title: &str,
        mut progress: F,
    ) -> std::result::Result<CrawlResult, CrawlError>
    where
        F: FnMut(ProgressEvent),
    {
        let mut result = CrawlResult::new(series_title);

        let mut state = match self.validate_seed(seed_url) {
            Ok(()) => CrawlState::Running(seed_url.to_string()),
            Err(reason) => CrawlState::Aborted(reason),
        };

        progress(ProgressEvent::Started {
            seed_url: seed_url.to_string(),
            series_title: series_title.to_string(),
        });

        loop {
            state = match state {
                CrawlState::Running(url) => match self.step(&url, &mut result, &mut progress).await
                {
                    Ok(next) => next,
                    Err(reason) => CrawlState::Aborted(reason),
                },
                CrawlState::Completed => {
                    log::info!(
                        "crawl of {:?} completed with {} episode(s)",
                        result.series_title,
                        result.len()
                    );
                    progress(ProgressEvent::Completed {
                        episode_count: result.len(),
                    });
                    return Ok(result);
                }
                CrawlState::Aborted(reason) => {
                    log::error!(
                        "crawl of {:?} aborted after {} episode(s): {}",
                        result.series_title,
                        result.len(),
                        reason
                    );
                    return Err(CrawlError {
                        reason,
                        partial: result,
                    });
                }
            };
        }
    }

    /// Process one page and decide the next state.
    async fn step<F>(
        &self,
        url: &str,
        result: &mut CrawlResult,
        progress: &mut F,
    ) -> Result<CrawlState>
    where
        F: FnMut(ProgressEvent),
    {
        let html = self.client.fetch(url).await?;

        match parse_episode_page(&html)? {
            PageOutcome::Unaired => {
                log::info!("unaired episode at {}, stopping", url);
                Ok(CrawlState::Completed)
            }
            PageOutcome::Aired { record, next_url } => {
                progress(ProgressEvent::EpisodeScraped {
                    title: record.title.clone(),
                    season: record.season,
                    episode: record.episode,
                    rated: record.is_rated(),
                });
                result.episodes.push(record);

                match next_url {
                    Some(href) => Ok(CrawlState::Running(self.resolve_next(&href)?)),
                    None => Ok(CrawlState::Completed),
                }
            }
        }
    }

    /// Resolve a next-episode href against the source domain. The site
    /// emits site-relative paths here.
    fn resolve_next(&self, href: &str) -> Result<String> {
        let base = Url::parse(&self.config.base_url)
            .map_err(|_| ScrapeError::InvalidUrl(self.config.base_url.clone()))?;
        let next = base
            .join(href)
            .map_err(|_| ScrapeError::InvalidUrl(href.to_string()))?;
        Ok(next.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_crawler(server: &MockServer) -> EpisodeCrawler {
        EpisodeCrawler::with_config(CrawlerConfig {
            base_url: server.uri(),
            politeness_delay_secs: 0.0,
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn episode_page(
        title: &str,
        heading: &str,
        date: &str,
        rating: Option<&str>,
        next_href: Option<&str>,
    ) -> String {
        let rating_html = rating
            .map(|r| format!(r#"<span itemprop="ratingValue">{}</span>"#, r))
            .unwrap_or_default();
        let next_html = next_href
            .map(|href| format!(r#"<a class="bp_item np_next" href="{}">Next</a>"#, href))
            .unwrap_or_default();
        format!(
            r#"<html><body>
                <div class="titleParent"><a title="Test Series" href="/title/tt0000001/">All</a></div>
                <div class="vital">
                    <h1 itemprop="name">{}</h1>
                    <div class="bp_heading">{}</div>
                    <a title="See more release dates">{}</a>
                    {}
                    {}
                </div>
            </body></html>"#,
            title, heading, date, rating_html, next_html
        )
    }

    async fn mount_page(server: &MockServer, page_path: &str, body: String) {
        Mock::given(method("GET"))
            .and(path(page_path))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_chain_of_three_pages_completes() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/title/tt1/",
            episode_page("One", "Season 1 | Episode 1", "20 Jan. 2008", Some("8.1"), Some("/title/tt2/")),
        )
        .await;
        mount_page(
            &server,
            "/title/tt2/",
            episode_page("Two", "Season 1 | Episode 2", "27 Jan. 2008", Some("8.2"), Some("/title/tt3/")),
        )
        .await;
        mount_page(
            &server,
            "/title/tt3/",
            episode_page("Three", "Season 1 | Episode 3", "3 Feb. 2008", Some("8.3"), None),
        )
        .await;

        let crawler = test_crawler(&server);
        let seed = format!("{}/title/tt1/", server.uri());

        let mut events = Vec::new();
        let result = crawler
            .crawl(&seed, "Test Series", |event| events.push(event))
            .await
            .unwrap();

        assert_eq!(result.series_title, "Test Series");
        let titles: Vec<_> = result.episodes.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["One", "Two", "Three"]);

        // Started + 3 records + Completed
        assert_eq!(events.len(), 5);
        assert!(matches!(events[0], ProgressEvent::Started { .. }));
        assert!(matches!(
            events[4],
            ProgressEvent::Completed { episode_count: 3 }
        ));
    }

    #[tokio::test]
    async fn test_unaired_page_completes_without_record() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/title/tt1/",
            episode_page("One", "Season 1 | Episode 1", "20 Jan. 2008", Some("8.1"), Some("/title/tt2/")),
        )
        .await;
        mount_page(
            &server,
            "/title/tt2/",
            episode_page("Two", "Season 1 | Episode 2", "27 Jan. 2008", Some("8.2"), Some("/title/tt3/")),
        )
        .await;
        mount_page(
            &server,
            "/title/tt3/",
            episode_page("Three", "Season 1 | Episode 3", "Episode airs 3 Feb. 2027", None, None),
        )
        .await;

        let crawler = test_crawler(&server);
        let seed = format!("{}/title/tt1/", server.uri());

        let result = crawler.crawl(&seed, "Test Series", |_| {}).await.unwrap();

        // The unaired page contributes nothing; prior records stand
        assert_eq!(result.len(), 2);
        assert_eq!(result.episodes[1].title, "Two");
    }

    #[tokio::test]
    async fn test_template_mismatch_aborts_with_partial() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/title/tt1/",
            episode_page("One", "Season 1 | Episode 1", "20 Jan. 2008", Some("8.1"), Some("/title/tt2/")),
        )
        .await;
        mount_page(
            &server,
            "/title/tt2/",
            "<html><body><p>layout changed</p></body></html>".to_string(),
        )
        .await;

        let crawler = test_crawler(&server);
        let seed = format!("{}/title/tt1/", server.uri());

        let error = crawler.crawl(&seed, "Test Series", |_| {}).await.unwrap_err();

        assert!(matches!(error.reason, ScrapeError::TemplateMismatch(_)));
        assert!(!error.reason.is_fetch_failure());
        // Previously accumulated records are preserved, not discarded
        assert_eq!(error.partial.len(), 1);
        assert_eq!(error.partial.episodes[0].title, "One");
    }

    #[tokio::test]
    async fn test_fetch_failure_aborts_with_partial() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/title/tt1/",
            episode_page("One", "Season 1 | Episode 1", "20 Jan. 2008", None, Some("/title/tt2/")),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/title/tt2/"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let crawler = test_crawler(&server);
        let seed = format!("{}/title/tt1/", server.uri());

        let error = crawler.crawl(&seed, "Test Series", |_| {}).await.unwrap_err();

        assert!(error.reason.is_fetch_failure());
        assert_eq!(error.partial.len(), 1);
    }

    #[tokio::test]
    async fn test_off_site_seed_is_rejected() {
        let server = MockServer::start().await;
        let crawler = test_crawler(&server);

        let error = crawler
            .crawl("https://example.com/title/tt1/", "Test Series", |_| {})
            .await
            .unwrap_err();

        assert!(matches!(error.reason, ScrapeError::InvalidUrl(_)));
        assert!(error.partial.is_empty());
    }

    #[tokio::test]
    async fn test_progress_marks_unrated_episode() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/title/tt1/",
            episode_page("One", "S3 | Ep 12", "22 Sep. 2013", None, None),
        )
        .await;

        let crawler = test_crawler(&server);
        let seed = format!("{}/title/tt1/", server.uri());

        let mut rated_flags = Vec::new();
        let result = crawler
            .crawl(&seed, "Test Series", |event| {
                if let ProgressEvent::EpisodeScraped { rated, season, episode, .. } = event {
                    rated_flags.push((season, episode, rated));
                }
            })
            .await
            .unwrap();

        assert_eq!(rated_flags, [(3, 12, false)]);
        assert_eq!(result.episodes[0].rating, crate::types::NO_RATING);
    }

    #[tokio::test]
    async fn test_resolve_series_title_from_seed() {
        let server = MockServer::start().await;
        mount_page(
            &server,
            "/title/tt1/",
            episode_page("One", "Season 1 | Episode 1", "20 Jan. 2008", None, None),
        )
        .await;

        let crawler = test_crawler(&server);
        let seed = format!("{}/title/tt1/", server.uri());

        let title = crawler.resolve_series_title(&seed).await.unwrap();
        assert_eq!(title, "Test Series");
    }

    #[test]
    fn test_config_default() {
        let config = CrawlerConfig::default();
        assert_eq!(config.base_url, "https://www.imdb.com");
        assert_eq!(config.politeness_delay_secs, 1.0);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_resolve_next_joins_relative_href() {
        let crawler = EpisodeCrawler::with_config(CrawlerConfig::default()).unwrap();
        let next = crawler.resolve_next("/title/tt2301457/").unwrap();
        assert_eq!(next, "https://www.imdb.com/title/tt2301457/");
    }
}
