use clap::Parser;

use crate::parsers::LinkTemplates;

/// Flashscore tennis feed decoder and CSV exporter
#[derive(Parser, Debug, Clone)]
#[command(name = "tennisfeed", version, about)]
pub struct Config {
    /// Tournament index feed URL
    #[arg(
        long,
        env = "TENNISFEED_INDEX_URL",
        default_value = "https://www.flashscore.com/x/req/m_2_5724"
    )]
    pub index_url: String,

    /// Site root, used to resolve relative links from archive pages
    #[arg(
        long,
        env = "TENNISFEED_BASE_URL",
        default_value = "https://www.flashscore.com/"
    )]
    pub base_url: String,

    /// Base URL for tournament pages; archive links are derived from it
    #[arg(
        long,
        env = "TENNISFEED_TOURNAMENT_BASE_URL",
        default_value = "https://www.flashscore.com/tennis/atp-singles/"
    )]
    pub tournament_base_url: String,

    /// Base URL for player profile links
    #[arg(
        long,
        env = "TENNISFEED_PLAYER_BASE_URL",
        default_value = "https://www.flashscore.com/player/"
    )]
    pub player_base_url: String,

    /// Feed endpoint prefix for per-match odds
    #[arg(
        long,
        env = "TENNISFEED_ODDS_FEED_URL",
        default_value = "https://2.flashscore.ninja/2/x/feed/df_od_1_"
    )]
    pub odds_feed_url: String,

    /// Feed endpoint prefix for per-match statistics
    #[arg(
        long,
        env = "TENNISFEED_STATS_FEED_URL",
        default_value = "https://2.flashscore.ninja/2/x/feed/df_st_1_"
    )]
    pub stats_feed_url: String,

    /// Feed endpoint prefix for per-match scores
    #[arg(
        long,
        env = "TENNISFEED_SCORE_FEED_URL",
        default_value = "https://2.flashscore.ninja/2/x/feed/df_sur_1_"
    )]
    pub score_feed_url: String,

    /// Feed endpoint prefix for per-match status
    #[arg(
        long,
        env = "TENNISFEED_STATUS_FEED_URL",
        default_value = "https://2.flashscore.ninja/2/x/feed/dc_1_"
    )]
    pub status_feed_url: String,

    /// Request-signing header value the feed endpoints require
    #[arg(long, env = "TENNISFEED_FSIGN", default_value = "SW9D1eZo")]
    pub fsign: String,

    /// Directory receiving the per-tournament CSV files
    #[arg(long, env = "TENNISFEED_OUTPUT_DIR", default_value = "data/flashscore")]
    pub output_dir: String,

    /// Base delay between HTTP requests in milliseconds (random jitter added)
    #[arg(long, env = "TENNISFEED_FETCH_DELAY_MS", default_value = "500")]
    pub fetch_delay_ms: u64,

    /// Decode at most this many tournaments (partial runs)
    #[arg(long, env = "TENNISFEED_MAX_TOURNAMENTS")]
    pub max_tournaments: Option<usize>,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        let urls = [
            ("index-url", &self.index_url),
            ("base-url", &self.base_url),
            ("tournament-base-url", &self.tournament_base_url),
            ("player-base-url", &self.player_base_url),
            ("odds-feed-url", &self.odds_feed_url),
            ("stats-feed-url", &self.stats_feed_url),
            ("score-feed-url", &self.score_feed_url),
            ("status-feed-url", &self.status_feed_url),
        ];
        for (name, url) in urls {
            if !url.starts_with("https://") {
                anyhow::bail!("{name} must start with https:// (got '{url}')");
            }
        }
        // Slugs and ids are appended directly to these, so the separator has
        // to already be there.
        for (name, url) in [
            ("base-url", &self.base_url),
            ("tournament-base-url", &self.tournament_base_url),
            ("player-base-url", &self.player_base_url),
        ] {
            if !url.ends_with('/') {
                anyhow::bail!("{name} must end with '/' (got '{url}')");
            }
        }
        if self.output_dir.is_empty() {
            anyhow::bail!("output-dir must not be empty");
        }
        Ok(())
    }

    pub fn link_templates(&self) -> LinkTemplates {
        LinkTemplates {
            player: self.player_base_url.clone(),
            odds: self.odds_feed_url.clone(),
            stats: self.stats_feed_url.clone(),
            score: self.score_feed_url.clone(),
            status: self.status_feed_url.clone(),
        }
    }
}
