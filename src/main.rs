use anyhow::Result;
use clap::Parser;
use futures_util::future::join_all;
use rand::Rng;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

mod client;
mod config;
mod export;
mod feed;
mod models;
mod parsers;

use client::{FeedFetcher, FlashscoreClient};
use config::Config;
use feed::MatchStatus;
use models::{Match, Tournament, TournamentKey};
use parsers::{
    embedded_results_feed, parse_archive, parse_odds, parse_score, parse_status,
    parse_tournament_index, ResultsParser,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let client = FlashscoreClient::new(&config.fsign)?;
    run(&config, &client).await
}

async fn run(config: &Config, client: &dyn FeedFetcher) -> Result<()> {
    info!("Fetching tournament index: {}", config.index_url);
    let index_feed = client.fetch_text(&config.index_url).await?;

    let mut keys = parse_tournament_index(&index_feed, &config.tournament_base_url);
    if let Some(limit) = config.max_tournaments {
        keys.truncate(limit);
    }
    info!("Indexed {} tournaments", keys.len());

    let results_parser = ResultsParser::new(config.link_templates());

    for key in &keys {
        if let Err(e) = process_tournament(config, client, &results_parser, key).await {
            error!("Tournament '{}' failed: {:#}", key.slug, e);
        }
        pause(config.fetch_delay_ms).await;
    }

    Ok(())
}

/// Decode every archived season of one tournament and write its CSV.
async fn process_tournament(
    config: &Config,
    client: &dyn FeedFetcher,
    parser: &ResultsParser,
    key: &TournamentKey,
) -> Result<()> {
    let archive_url = client.validate_reachable(&key.link_archives).await?;
    let archive_html = client.fetch_text(&archive_url).await?;
    let seasons = parse_archive(key, &archive_html, &config.base_url)?;
    info!("[{}] {} archived seasons", key.slug, seasons.len());

    let mut rows = Vec::new();
    for mut season in seasons {
        match process_season(client, parser, &mut season).await {
            Ok(()) => rows.extend(season.to_rows()),
            Err(e) => error!("[{}] season '{}' failed: {:#}", key.slug, season.name, e),
        }
        pause(config.fetch_delay_ms).await;
    }

    let path = Path::new(&config.output_dir).join(format!("tournament_{}.csv", key.slug));
    export::write_csv(&rows, &path)
}

/// Decode one season: results feed, then per-match status/score/odds feeds.
/// A failing match is dropped; its siblings still land on the season.
async fn process_season(
    client: &dyn FeedFetcher,
    parser: &ResultsParser,
    season: &mut Tournament,
) -> Result<()> {
    let page = client.fetch_text(&season.link_results).await?;
    let results_feed = embedded_results_feed(&page)?;
    let (surface, matches) = parser.parse(&results_feed)?;
    info!(
        "[{}] surface {}, {} matches",
        season.name,
        surface.as_str(),
        matches.len()
    );

    for mut m in matches {
        match process_match(client, &mut m).await {
            Ok(()) => season.add_match(m),
            Err(e) => warn!("[{}] match {} dropped: {:#}", season.name, m.match_id, e),
        }
    }
    Ok(())
}

async fn process_match(client: &dyn FeedFetcher, m: &mut Match) -> Result<()> {
    // Every synthesized link must exist before the match is accepted; a 404
    // on any of them drops this match only.
    let links = [
        &m.player1.link,
        &m.player2.link,
        &m.links.odds,
        &m.links.stats,
        &m.links.score,
        &m.links.status,
    ];
    for check in join_all(links.iter().map(|link| client.validate_reachable(link))).await {
        check?;
    }

    let status_feed = client.fetch_text(&m.links.status).await?;
    parse_status(&status_feed)?.apply(m);

    // Only finished matches publish a trustworthy score feed.
    if m.status == MatchStatus::Finished {
        let score_feed = client.fetch_text(&m.links.score).await?;
        parse_score(m, &score_feed)?;
    }

    let odds_feed = client.fetch_text(&m.links.odds).await?;
    parse_odds(m, &odds_feed)?;

    Ok(())
}

/// Polite spacing between provider requests, with jitter so repeated runs do
/// not fire on a fixed cadence.
async fn pause(base_ms: u64) {
    let jitter = rand::thread_rng().gen_range(0..=250);
    tokio::time::sleep(Duration::from_millis(base_ms + jitter)).await;
}
