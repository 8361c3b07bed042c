pub mod matches;
pub mod odds;
pub mod player;
pub mod tournament;

pub use matches::{Match, MatchLinks, ScoreSet};
pub use odds::{CorrectScoreOdds, HomeAwayOdds, OverUnderOdds};
pub use player::Player;
pub use tournament::{Tournament, TournamentKey};

use std::collections::BTreeMap;

/// One flattened export row: field name to string value, ordered by key so
/// repeated runs over identical input produce identical rows.
pub type Row = BTreeMap<String, String>;
