//! Closed vocabularies for the provider's coded enumerations.
//!
//! Every table is intentionally exhaustive: an unmapped code is a decode
//! failure, not a pass-through, so feed-format drift surfaces immediately.
//! The one exception is the tournament round, which degrades to a sentinel
//! for matches outside the play-off bracket (round-robin stages carry no
//! round code at all).

use serde::Serialize;

use super::error::{FeedError, FeedResult};

/// Tournament round, normalized from the feed's display names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Round {
    Final,
    SemiFinals,
    Robin,
    QuarterFinals,
    RoundOf8,
    RoundOf16,
    RoundOf32,
    RoundOf64,
    Qualifying,
    /// Sentinel for matches without a recognized round code.
    NotPlayOff,
}

impl Round {
    /// Map a feed round name onto its normalized value. Returns `None` for
    /// codes outside the nine known names; the results decoder turns that
    /// into [`Round::NotPlayOff`].
    pub fn from_code(code: &str) -> Option<Round> {
        match code {
            "Final" => Some(Round::Final),
            "Semi-finals" => Some(Round::SemiFinals),
            "3rd place" => Some(Round::Robin),
            "Quarter-finals" => Some(Round::QuarterFinals),
            "1/8-finals" => Some(Round::RoundOf8),
            "1/16-finals" => Some(Round::RoundOf16),
            "1/32-finals" => Some(Round::RoundOf32),
            "1/64-finals" => Some(Round::RoundOf64),
            "Qualifying Finals" => Some(Round::Qualifying),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Round::Final => "final",
            Round::SemiFinals => "semi_finals",
            Round::Robin => "robin",
            Round::QuarterFinals => "quarter_finals",
            Round::RoundOf8 => "round_of_8",
            Round::RoundOf16 => "round_of_16",
            Round::RoundOf32 => "round_of_32",
            Round::RoundOf64 => "round_of_64",
            Round::Qualifying => "qualif",
            Round::NotPlayOff => "NOT Play Off",
        }
    }
}

/// Match lifecycle status as published by the status feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    Finished,
    Retired,
    Walkover,
    Awarded,
}

impl MatchStatus {
    pub fn normalize(code: &str) -> FeedResult<MatchStatus> {
        match code {
            "1" => Ok(MatchStatus::Scheduled),
            "3" => Ok(MatchStatus::Finished),
            "8" => Ok(MatchStatus::Retired),
            "9" => Ok(MatchStatus::Walkover),
            "54" => Ok(MatchStatus::Awarded),
            other => Err(FeedError::UnknownCode {
                table: "status",
                code: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Scheduled => "scheduled",
            MatchStatus::Finished => "finished",
            MatchStatus::Retired => "retired",
            MatchStatus::Walkover => "walkover",
            MatchStatus::Awarded => "awarded",
        }
    }
}

/// Which side won the match. `None` is a valid state (match not yet
/// resolved), so winner-side lookups are always optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    #[default]
    None,
    Player1,
    Player2,
}

impl Winner {
    /// `H` (home) and `A` (away) are the only recognized sides; anything
    /// else, including absence, stays [`Winner::None`].
    pub fn from_side(code: &str) -> Winner {
        match code {
            "H" => Winner::Player1,
            "A" => Winner::Player2,
            _ => Winner::None,
        }
    }

    /// Numeric form used in flattened rows: -1 none, 1 player1, 2 player2.
    pub fn as_i32(&self) -> i32 {
        match self {
            Winner::None => -1,
            Winner::Player1 => 1,
            Winner::Player2 => 2,
        }
    }
}

/// Court surface, published once per tournament in the results-feed header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Hard,
    Clay,
    Grass,
    Carpet,
}

impl Surface {
    pub fn normalize(code: &str) -> FeedResult<Surface> {
        match code.to_lowercase().as_str() {
            "hard" => Ok(Surface::Hard),
            "clay" => Ok(Surface::Clay),
            "grass" => Ok(Surface::Grass),
            "carpet" => Ok(Surface::Carpet),
            other => Err(FeedError::UnknownCode {
                table: "surface",
                code: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Hard => "hard",
            Surface::Clay => "clay",
            Surface::Grass => "grass",
            Surface::Carpet => "carpet",
        }
    }
}

/// Resolve a provider bookmaker id to its display name.
///
/// The table is closed; an unknown id means the odds feed format has drifted
/// and the whole feed must be rejected rather than mislabeled.
pub fn bookmaker_name(id: &str) -> FeedResult<&'static str> {
    match id {
        "160" => Ok("Unibet"),
        "129" => Ok("Bwin"),
        "398" => Ok("Netbet"),
        "141" => Ok("Betclic"),
        "484" => Ok("Parions-Sport"),
        "264" => Ok("Winamax"),
        other => Err(FeedError::UnknownCode {
            table: "bookmaker",
            code: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_known_codes() {
        assert_eq!(Round::from_code("Final"), Some(Round::Final));
        assert_eq!(Round::from_code("Semi-finals"), Some(Round::SemiFinals));
        assert_eq!(Round::Final.as_str(), "final");
        assert_eq!(Round::SemiFinals.as_str(), "semi_finals");
        assert_eq!(Round::Qualifying.as_str(), "qualif");
    }

    #[test]
    fn test_round_unknown_code_degrades() {
        assert_eq!(Round::from_code("Group Stage"), None);
        assert_eq!(Round::NotPlayOff.as_str(), "NOT Play Off");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(MatchStatus::normalize("1").unwrap(), MatchStatus::Scheduled);
        assert_eq!(MatchStatus::normalize("3").unwrap(), MatchStatus::Finished);
        assert_eq!(MatchStatus::normalize("8").unwrap(), MatchStatus::Retired);
        assert_eq!(MatchStatus::normalize("9").unwrap(), MatchStatus::Walkover);
        assert_eq!(MatchStatus::normalize("54").unwrap(), MatchStatus::Awarded);
        assert!(matches!(
            MatchStatus::normalize("7"),
            Err(FeedError::UnknownCode { table: "status", .. })
        ));
    }

    #[test]
    fn test_winner_sides() {
        assert_eq!(Winner::from_side("H"), Winner::Player1);
        assert_eq!(Winner::from_side("A"), Winner::Player2);
        assert_eq!(Winner::from_side("X"), Winner::None);
        assert_eq!(Winner::None.as_i32(), -1);
        assert_eq!(Winner::Player1.as_i32(), 1);
        assert_eq!(Winner::Player2.as_i32(), 2);
    }

    #[test]
    fn test_surface_case_insensitive() {
        assert_eq!(Surface::normalize("Hard").unwrap(), Surface::Hard);
        assert_eq!(Surface::normalize("clay").unwrap(), Surface::Clay);
        assert!(Surface::normalize("ice").is_err());
    }

    #[test]
    fn test_bookmaker_lookup() {
        assert_eq!(bookmaker_name("141").unwrap(), "Betclic");
        assert_eq!(bookmaker_name("160").unwrap(), "Unibet");
        assert!(matches!(
            bookmaker_name("999"),
            Err(FeedError::UnknownCode { table: "bookmaker", .. })
        ));
    }
}
