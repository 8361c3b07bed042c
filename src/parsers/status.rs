//! Decoder for a match's status feed: lifecycle status plus, once the match
//! is resolved, the winning side.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::feed::{extract, extract_optional, FeedResult, MatchStatus, Winner};
use crate::models::Match;

static STATUS_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬DB÷([^¬÷]+)¬DD÷").expect("status pattern compiles"));
static WINNER_SIDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬DJ÷([^¬÷]+)¬AZ÷").expect("winner pattern compiles"));

/// Decoded status-feed payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: MatchStatus,
    pub winner: Winner,
}

impl StatusUpdate {
    pub fn apply(self, m: &mut Match) {
        m.status = self.status;
        m.winner = self.winner;
    }
}

/// Decode one status feed. The status id is mandatory and closed-vocabulary;
/// the winner side is optional — its absence is the valid "no winner yet"
/// state.
pub fn parse_status(feed: &str) -> FeedResult<StatusUpdate> {
    let status = MatchStatus::normalize(extract(feed, &STATUS_ID)?)?;
    let winner = extract_optional(feed, &WINNER_SIDE)?
        .map(Winner::from_side)
        .unwrap_or_default();
    Ok(StatusUpdate { status, winner })
}
