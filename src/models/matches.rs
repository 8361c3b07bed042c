use serde::Serialize;
use tracing::warn;

use crate::feed::{FeedError, FeedResult, MatchStatus, Round, Surface, Winner};

use super::odds::{CorrectScoreOdds, HomeAwayOdds, OverUnderOdds};
use super::player::Player;
use super::Row;

/// Score details for one player in one set. All three fields are
/// independently absent-or-present; an absent games score means the set was
/// not played.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScoreSet {
    pub score: Option<String>,
    pub tiebreak: Option<String>,
    pub duration: Option<String>,
}

/// Per-purpose sub-feed links synthesized for one match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchLinks {
    pub odds: String,
    pub stats: String,
    pub score: String,
    pub status: String,
}

/// A decoded tennis match. Constructed once per results-feed pass, then
/// append-only: status, sets and odds are attached as the per-purpose
/// sub-feeds are decoded, until the match is flattened for export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// Provider match id, unique within its tournament
    pub match_id: String,
    /// Scheduled start, formatted `YYYY-MM-DD HH:MM:SS` (UTC)
    pub match_date: String,
    /// Scheduled start as the raw epoch-seconds string from the feed
    pub timestamp: String,
    pub round: Round,
    /// Known only after the tournament header has been decoded
    pub surface: Option<Surface>,
    pub player1: Player,
    pub player2: Player,
    pub links: MatchLinks,
    pub status: MatchStatus,
    pub winner: Winner,
    pub p1_win_sets: u32,
    pub p2_win_sets: u32,
    pub global_duration: String,
    /// Fixed slots for sets 1-5; index 0 is set 1
    pub p1_sets: [ScoreSet; 5],
    pub p2_sets: [ScoreSet; 5],
    pub p1_home_away: Vec<HomeAwayOdds>,
    pub p2_home_away: Vec<HomeAwayOdds>,
    pub over: Vec<OverUnderOdds>,
    pub under: Vec<OverUnderOdds>,
    pub correct_score: Vec<CorrectScoreOdds>,
}

impl Match {
    /// Build a match with identity fields filled and everything else at its
    /// resting default (scheduled, no winner, empty collections). Every call
    /// allocates fresh collections; nothing is shared between matches.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        match_id: String,
        match_date: String,
        timestamp: String,
        round: Round,
        surface: Option<Surface>,
        player1: Player,
        player2: Player,
        links: MatchLinks,
    ) -> Self {
        Match {
            match_id,
            match_date,
            timestamp,
            round,
            surface,
            player1,
            player2,
            links,
            status: MatchStatus::Scheduled,
            winner: Winner::None,
            p1_win_sets: 0,
            p2_win_sets: 0,
            global_duration: String::new(),
            p1_sets: Default::default(),
            p2_sets: Default::default(),
            p1_home_away: Vec::new(),
            p2_home_away: Vec::new(),
            over: Vec::new(),
            under: Vec::new(),
            correct_score: Vec::new(),
        }
    }

    /// Store both players' details for one set. `set_index` is zero-based
    /// (slot 0 holds set 1).
    pub fn record_set(&mut self, set_index: usize, p1: ScoreSet, p2: ScoreSet) {
        self.p1_sets[set_index] = p1;
        self.p2_sets[set_index] = p2;
    }

    /// Recompute the set-win tally from the recorded games scores.
    ///
    /// The tally is reset first so a repeated pass over the same match is
    /// idempotent. Sets with either games score absent are skipped; equal
    /// games counts award neither side (logged, the feed should not produce
    /// them); a non-numeric games score is a hard failure.
    pub fn tally_sets(&mut self) -> FeedResult<()> {
        self.p1_win_sets = 0;
        self.p2_win_sets = 0;

        for (index, (set1, set2)) in self.p1_sets.iter().zip(self.p2_sets.iter()).enumerate() {
            let (Some(raw1), Some(raw2)) = (set1.score.as_deref(), set2.score.as_deref()) else {
                continue;
            };
            let games1 = parse_games(raw1)?;
            let games2 = parse_games(raw2)?;

            if games1 > games2 {
                self.p1_win_sets += 1;
            } else if games2 > games1 {
                self.p2_win_sets += 1;
            } else {
                warn!(
                    match_id = %self.match_id,
                    set = index + 1,
                    games = games1,
                    "tied games count in set, awarding neither side"
                );
            }
        }
        Ok(())
    }

    /// Append one home/away odds record per side.
    pub fn append_home_away(&mut self, player1: HomeAwayOdds, player2: HomeAwayOdds) {
        self.p1_home_away.push(player1);
        self.p2_home_away.push(player2);
    }

    /// Append the over and under records of one bookmaker-threshold pair.
    pub fn append_over_under(&mut self, over: OverUnderOdds, under: OverUnderOdds) {
        self.over.push(over);
        self.under.push(under);
    }

    pub fn append_correct_score(&mut self, odds: CorrectScoreOdds) {
        self.correct_score.push(odds);
    }

    /// Project the match, its sets and its odds into a single-level
    /// field-to-value row for export. Absent values flatten to the empty
    /// string. Odds keys are derived from bookmaker and variant; when two
    /// odds entries collide on the same key (duplicate bookmaker rows in one
    /// feed) the last write wins.
    pub fn flatten(&self) -> Row {
        let mut row = Row::new();

        row.insert("match_id".into(), self.match_id.clone());
        row.insert("match_date".into(), self.match_date.clone());
        row.insert("timestamp".into(), self.timestamp.clone());
        row.insert("round".into(), self.round.as_str().to_string());
        row.insert(
            "surface".into(),
            self.surface.map(|s| s.as_str().to_string()).unwrap_or_default(),
        );

        row.insert("player1_name".into(), self.player1.name.clone());
        row.insert("player2_name".into(), self.player2.name.clone());
        row.insert("player1_id".into(), self.player1.id.clone());
        row.insert("player2_id".into(), self.player2.id.clone());
        row.insert("player1_nationality".into(), self.player1.nationality.clone());
        row.insert("player2_nationality".into(), self.player2.nationality.clone());
        row.insert("player1_link".into(), self.player1.link.clone());
        row.insert("player2_link".into(), self.player2.link.clone());

        row.insert("odds_link".into(), self.links.odds.clone());
        row.insert("stats_link".into(), self.links.stats.clone());
        row.insert("score_link".into(), self.links.score.clone());
        row.insert("status_link".into(), self.links.status.clone());
        row.insert("status".into(), self.status.as_str().to_string());
        row.insert("winner".into(), self.winner.as_i32().to_string());
        row.insert("p1_win_sets".into(), self.p1_win_sets.to_string());
        row.insert("p2_win_sets".into(), self.p2_win_sets.to_string());
        row.insert("global_duration".into(), self.global_duration.clone());

        for (prefix, sets) in [("p1", &self.p1_sets), ("p2", &self.p2_sets)] {
            for (index, set) in sets.iter().enumerate() {
                let n = index + 1;
                row.insert(
                    format!("{prefix}_set{n}_score"),
                    set.score.clone().unwrap_or_default(),
                );
                row.insert(
                    format!("{prefix}_set{n}_tiebreak"),
                    set.tiebreak.clone().unwrap_or_default(),
                );
                row.insert(
                    format!("{prefix}_set{n}_duration"),
                    set.duration.clone().unwrap_or_default(),
                );
            }
        }

        for (prefix, odds_list) in [("p1", &self.p1_home_away), ("p2", &self.p2_home_away)] {
            for odd in odds_list.iter() {
                let stem = format!(
                    "{prefix}_odd_home_away_{}_{}",
                    odd.bookmaker, odd.bet_variant
                );
                row.insert(format!("{stem}_start"), odd.odd_start.clone());
                row.insert(format!("{stem}_end"), odd.odd_end.clone());
            }
        }

        for (prefix, odds_list) in [("over", &self.over), ("under", &self.under)] {
            for odd in odds_list.iter() {
                let stem = format!(
                    "{prefix}_odd_{}_{}_{}_{}",
                    odd.bookmaker, odd.bet_variant, odd.threshold_type, odd.threshold_value
                );
                row.insert(format!("{stem}_start"), odd.odd_start.clone());
                row.insert(format!("{stem}_end"), odd.odd_end.clone());
            }
        }

        for odd in self.correct_score.iter() {
            let stem = format!("correct_odd_{}_{}", odd.bookmaker, odd.score);
            row.insert(format!("{stem}_start"), odd.odd_start.clone());
            row.insert(format!("{stem}_end"), odd.odd_end.clone());
        }

        row
    }
}

fn parse_games(raw: &str) -> FeedResult<u32> {
    raw.parse::<u32>()
        .map_err(|_| FeedError::InvalidNumericFormat {
            field: "games score",
            value: raw.to_string(),
        })
}
