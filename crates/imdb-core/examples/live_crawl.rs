use imdb_core::{EpisodeCrawler, ProgressEvent};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Breaking Bad S01E01
    let seed = "https://www.imdb.com/title/tt0959621/";

    let crawler = EpisodeCrawler::new()?;

    println!("Resolving series title from {}...\n", seed);
    let series_title = crawler.resolve_series_title(seed).await?;
    println!("Series: {}\n", series_title);

    let result = crawler
        .crawl(seed, &series_title, |event| {
            if let ProgressEvent::EpisodeScraped {
                title,
                season,
                episode,
                rated,
            } = event
            {
                let note = if rated { "" } else { " [no rating yet]" };
                println!("- \"{}\" (S{} - E{}){}", title, season, episode, note);
            }
        })
        .await?;

    println!("\nScraped {} episode(s).", result.len());

    if let Some(span) = result.season_span() {
        for summary in result.summarize_seasons(span.seasons()) {
            let mean = summary
                .mean_rating
                .map(|m| format!("{:.2}", m))
                .unwrap_or_else(|| "—".to_string());
            println!(
                "Season {}: {} episode(s), mean rating {}",
                summary.season, summary.episode_count, mean
            );
        }
    }

    Ok(())
}
