//! Decoder for a match's score feed: per-set games, tiebreaks and durations
//! for both players, plus the derived set-win tally.
//!
//! The feed interleaves the three concerns, so they are extracted through
//! three independent pattern families and zipped back into the five
//! [`ScoreSet`] slots per player. Closing field codes vary with what the
//! provider emitted after each value, hence the alternations.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::feed::{extract, extract_optional, FeedResult, MatchStatus};
use crate::models::{Match, ScoreSet};

struct Field {
    re: Regex,
    optional: bool,
}

impl Field {
    fn new(pattern: &str, optional: bool) -> Field {
        Field {
            re: Regex::new(pattern).expect("score pattern compiles"),
            optional,
        }
    }

    fn get(&self, text: &str) -> FeedResult<Option<String>> {
        let value = if self.optional {
            extract_optional(text, &self.re)?
        } else {
            Some(extract(text, &self.re)?)
        };
        Ok(value.map(str::to_string))
    }
}

// Games won per set. Set 1 is mandatory for both players; a missing set 1
// means the feed is not a finished-match score feed at all.
static P1_GAMES: Lazy<[Field; 5]> = Lazy::new(|| {
    [
        Field::new(r"¬BA÷([^¬÷]+)¬(?:BB|DA|~BD)÷", false),
        Field::new(r"¬~BC÷([^¬÷]+)¬(?:BD|DC|~BF)÷", true),
        Field::new(r"¬~BE÷([^¬÷]+)¬(?:BF|DE|~BH)÷", true),
        Field::new(r"¬~BG÷([^¬÷]+)¬(?:BH|DG|~BJ)÷", true),
        Field::new(r"¬~BI÷([^¬÷]+)¬(?:BJ|DI|~A1)÷", true),
    ]
});

static P2_GAMES: Lazy<[Field; 5]> = Lazy::new(|| {
    [
        Field::new(r"¬BB÷([^¬÷]+)¬(?:RC|DB|~BC|BA|~A1)÷", false),
        Field::new(r"¬BD÷([^¬÷]+)¬(?:RD|DD|~BE|~BC|~A1)÷", true),
        Field::new(r"¬BF÷([^¬÷]+)¬(?:RE|DF|~BG|~BE|~A1)÷", true),
        Field::new(r"¬BH÷([^¬÷]+)¬(?:RF|DH|~BI|~BG|~A1)÷", true),
        Field::new(r"¬BJ÷([^¬÷]+)¬(?:RG|DJ|~BI|~A1)÷", true),
    ]
});

// Tiebreak points, present only for sets that went to a tiebreak.
static P1_TIEBREAK: Lazy<[Field; 5]> = Lazy::new(|| {
    [
        Field::new(r"¬DA÷([^¬÷]+)¬BB÷", true),
        Field::new(r"¬DC÷([^¬÷]+)¬BD÷", true),
        Field::new(r"¬DE÷([^¬÷]+)¬BF÷", true),
        Field::new(r"¬DG÷([^¬÷]+)¬BH÷", true),
        Field::new(r"¬DI÷([^¬÷]+)¬BJ÷", true),
    ]
});

static P2_TIEBREAK: Lazy<[Field; 5]> = Lazy::new(|| {
    [
        Field::new(r"¬DB÷([^¬÷]+)¬RC÷", true),
        Field::new(r"¬DD÷([^¬÷]+)¬RD÷", true),
        Field::new(r"¬DF÷([^¬÷]+)¬RE÷", true),
        Field::new(r"¬DH÷([^¬÷]+)¬RF÷", true),
        Field::new(r"¬DJ÷([^¬÷]+)¬RG÷", true),
    ]
});

// Whole-match clock plus one elapsed-time value per set.
static TOTAL_DURATION: Lazy<Field> =
    Lazy::new(|| Field::new(r"¬~RB÷([^¬÷]+)¬~(?:MIT|PSPH|PSPA|A1)÷", true));

static SET_DURATIONS: Lazy<[Field; 5]> = Lazy::new(|| {
    [
        Field::new(r"¬RC÷([^¬÷]+)¬~(?:BC|RB)÷", true),
        Field::new(r"¬RD÷([^¬÷]+)¬~(?:BE|RB)÷", true),
        Field::new(r"¬RE÷([^¬÷]+)¬~(?:BG|RB)÷", true),
        Field::new(r"¬RF÷([^¬÷]+)¬~(?:BI|RB)÷", true),
        Field::new(r"¬RG÷([^¬÷]+)¬~RB÷", true),
    ]
});

fn extract_family(fields: &[Field; 5], text: &str) -> FeedResult<[Option<String>; 5]> {
    let mut values: [Option<String>; 5] = Default::default();
    for (slot, field) in values.iter_mut().zip(fields.iter()) {
        *slot = field.get(text)?;
    }
    Ok(values)
}

/// Reconstruct the per-set scores of `m` from its score feed and derive the
/// set-win tally. Matches that did not finish (scheduled, walkover, awarded,
/// retired) carry no trustworthy score feed and are left untouched.
pub fn parse_score(m: &mut Match, feed: &str) -> FeedResult<()> {
    if m.status != MatchStatus::Finished {
        return Ok(());
    }

    let p1_games = extract_family(&P1_GAMES, feed)?;
    let p2_games = extract_family(&P2_GAMES, feed)?;
    let p1_tiebreak = extract_family(&P1_TIEBREAK, feed)?;
    let p2_tiebreak = extract_family(&P2_TIEBREAK, feed)?;
    let durations = extract_family(&SET_DURATIONS, feed)?;

    m.global_duration = TOTAL_DURATION.get(feed)?.unwrap_or_default();

    for (index, duration) in durations.into_iter().enumerate() {
        let p1 = ScoreSet {
            score: p1_games[index].clone(),
            tiebreak: p1_tiebreak[index].clone(),
            duration: duration.clone(),
        };
        let p2 = ScoreSet {
            score: p2_games[index].clone(),
            tiebreak: p2_tiebreak[index].clone(),
            duration,
        };
        m.record_set(index, p1, p2);
    }

    m.tally_sets()
}
