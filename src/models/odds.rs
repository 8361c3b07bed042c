use serde::Serialize;

/// Odds on one side of a home/away market. Appended pairwise: one record for
/// each player per bookmaker and bet variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HomeAwayOdds {
    /// Scope of the bet, e.g. "full-time", "set-1"
    pub bet_variant: String,
    pub bookmaker: String,
    /// Opening odds
    pub odd_start: String,
    /// Closing odds; equals `odd_start` when the feed published no movement
    pub odd_end: String,
}

/// Odds on one side of an over/under market. Two records per
/// bookmaker-threshold pair: one "over", one "under".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverUnderOdds {
    pub bet_variant: String,
    /// "Games" or "Sets"
    pub threshold_type: String,
    /// Numeric cutoff the bet is evaluated against, e.g. "21.5"
    pub threshold_value: String,
    pub bookmaker: String,
    pub odd_start: String,
    pub odd_end: String,
}

/// Odds on an exact final score, e.g. "2:0".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrectScoreOdds {
    pub score: String,
    pub bookmaker: String,
    pub odd_start: String,
    pub odd_end: String,
}
