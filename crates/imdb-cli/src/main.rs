//! Interactive CLI for the IMDb episode-ratings scraper
//!
//! `scrape` (the default command) walks a series' episode chain from a
//! seed page and stores the result; `seasons` reads a stored result back
//! and summarizes the ratings by season.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};

use imdb_core::{
    store, CrawlError, CrawlerConfig, EpisodeCrawler, ProgressEvent, ScrapeError, SeasonSpan,
};

#[derive(Parser)]
#[command(name = "imdb-ratings")]
#[command(about = "Collect per-episode IMDb ratings for a TV series")]
#[command(version)]
struct Cli {
    /// File holding the scraped data
    #[arg(
        short,
        long,
        global = true,
        default_value = store::DEFAULT_OUTPUT_PATH
    )]
    output: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape all episodes starting from a seed page (default)
    Scrape {
        /// URL of the first episode; prompted for when omitted
        #[arg(long)]
        seed: Option<String>,

        /// Skip the series-title confirmation
        #[arg(short, long)]
        yes: bool,

        /// Politeness delay between fetches in seconds
        #[arg(long, default_value_t = 1.0)]
        delay: f64,
    },

    /// Summarize scraped ratings by season
    Seasons {
        /// First season to include
        #[arg(long)]
        first: Option<u32>,

        /// Last season to include
        #[arg(long)]
        last: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Scrape { seed, yes, delay }) => {
            cmd_scrape(seed, yes, delay, &cli.output).await
        }
        Some(Commands::Seasons { first, last }) => cmd_seasons(first, last, &cli.output),
        None => cmd_scrape(None, false, 1.0, &cli.output).await,
    }
}

async fn cmd_scrape(seed: Option<String>, yes: bool, delay: f64, output: &Path) -> Result<()> {
    let config = CrawlerConfig {
        politeness_delay_secs: delay,
        ..CrawlerConfig::default()
    };
    let base_url = config.base_url.clone();
    let crawler = EpisodeCrawler::with_config(config)?;

    // Resolve the seed and confirm the series; answering "n" loops back
    // to the URL prompt so a different series can be picked.
    let mut seed = seed;
    let (seed_url, series_title) = loop {
        let url = match seed.take() {
            Some(url) => url,
            None => prompt_seed_url(&base_url)?,
        };

        let series_title = crawler
            .resolve_series_title(&url)
            .await
            .map_err(|e| anyhow::anyhow!(describe(&e)))?;

        if yes {
            break (url, series_title);
        }

        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Do you want to scrape \"{}\"?", series_title))
            .default(true)
            .interact()?;
        if confirmed {
            break (url, series_title);
        }
        println!();
    };

    println!("\nPlease wait while episodes are scraped.\n");

    match crawler.crawl(&seed_url, &series_title, print_progress).await {
        Ok(result) => {
            store::save(&result, output)?;
            println!("\nScraped data was saved in the file {}.", output.display());
            Ok(())
        }
        Err(CrawlError { reason, partial }) => {
            eprintln!("\n{}", describe(&reason));

            if !partial.is_empty() {
                let save_partial = Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(format!(
                        "Save the {} episode(s) scraped before the failure?",
                        partial.len()
                    ))
                    .default(true)
                    .interact()?;
                if save_partial {
                    store::save(&partial, output)?;
                    println!("Partial data was saved in the file {}.", output.display());
                }
            }

            std::process::exit(1);
        }
    }
}

/// Print one line per progress event, in the scrape log style.
fn print_progress(event: ProgressEvent) {
    match event {
        ProgressEvent::Started { .. } => {}
        ProgressEvent::EpisodeScraped {
            title,
            season,
            episode,
            rated,
        } => {
            let note = if rated { "" } else { " [no rating yet]" };
            println!("- \"{}\" (S{} - E{}){}", title, season, episode, note);
        }
        ProgressEvent::Completed { episode_count } => {
            println!("\nScraped {} episode(s).", episode_count);
        }
    }
}

/// Word a fatal condition so the user can tell a connectivity problem
/// from a wrong address or a source-format change.
fn describe(reason: &ScrapeError) -> String {
    if reason.is_fetch_failure() {
        format!(
            "Could not fetch from the source site: {}.\n\
             Check your connection and try again.",
            reason
        )
    } else if matches!(reason, ScrapeError::TemplateMismatch(_)) {
        format!(
            "An important HTML code element wasn't found ({}).\n\
             Check again whether you entered the correct URL; \
             the site's layout may also have changed.",
            reason
        )
    } else {
        reason.to_string()
    }
}

fn prompt_seed_url(base_url: &str) -> Result<String> {
    println!("Please enter the URL of the first episode in a season.");

    let url: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("URL")
        .validate_with(|input: &String| -> Result<(), String> {
            if input.trim().starts_with(base_url) {
                Ok(())
            } else {
                Err(format!("The URL has to start with \"{}\".", base_url))
            }
        })
        .interact_text()?;

    Ok(url.trim().to_string())
}

fn cmd_seasons(first: Option<u32>, last: Option<u32>, output: &Path) -> Result<()> {
    let result = store::load(output).with_context(|| {
        format!(
            "no scraped data at {}; run the scrape command first",
            output.display()
        )
    })?;
    let span = result
        .season_span()
        .context("the scraped file contains no episodes")?;

    if span.first == span.last {
        println!(
            "Data for \"{}\" (season {}) imported.\n",
            result.series_title, span.first
        );
    } else {
        println!(
            "Data for \"{}\" (seasons {}-{}) imported.\n",
            result.series_title, span.first, span.last
        );
    }

    let range = match (first, last) {
        (Some(a), Some(b)) => span.select(a, b)?,
        (Some(n), None) | (None, Some(n)) => span.select(n, n)?,
        // One or two seasons need no narrowing; beyond that, ask.
        (None, None) if span.last.saturating_sub(span.first) < 2 => span.seasons(),
        (None, None) => prompt_season_range(&span)?,
    };

    println!(
        "{:<8} {:>9} {:>7} {:>12}",
        "Season", "Episodes", "Rated", "Mean rating"
    );
    for summary in result.summarize_seasons(range) {
        let mean = summary
            .mean_rating
            .map(|m| format!("{:.2}", m))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<8} {:>9} {:>7} {:>12}",
            summary.season, summary.episode_count, summary.rated_count, mean
        );
    }

    Ok(())
}

fn prompt_season_range(span: &SeasonSpan) -> Result<RangeInclusive<u32>> {
    println!("Please choose which seasons you want to include.\n");

    let theme = ColorfulTheme::default();
    let mut endpoints = [span.first; 2];
    for (slot, which) in endpoints.iter_mut().zip(["First", "Last"]) {
        *slot = Input::with_theme(&theme)
            .with_prompt(format!("{} season number", which))
            .validate_with(|n: &u32| -> Result<(), String> {
                if span.contains(*n) {
                    Ok(())
                } else {
                    Err(format!(
                        "Enter a number from {} to {}.",
                        span.first, span.last
                    ))
                }
            })
            .interact_text()?;
    }

    // select() reorders the endpoints if the higher one came first
    Ok(span.select(endpoints[0], endpoints[1])?)
}
