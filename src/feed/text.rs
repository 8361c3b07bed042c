//! Low-level primitives for the provider's flat-text wire format.
//!
//! A feed payload is a concatenation of `CODE÷value¬` units. Structural
//! boundaries are `~CODE÷` sentinel tokens, and each extractable value sits
//! between two field codes, guaranteed free of the `¬` and `÷` separator
//! characters.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::error::{FeedError, FeedResult};

/// Split `text` on a literal sentinel token (e.g. `~AA÷`).
///
/// Purely structural: the element before the first sentinel is kept, and the
/// call site decides whether it is a header to consume or preamble to skip.
/// The returned iterator is lazy and restartable — splitting the same text
/// twice yields identical sequences.
pub fn segments<'t, 'p>(text: &'t str, sentinel: &'p str) -> std::str::Split<'t, &'p str> {
    text.split(sentinel)
}

fn malformed(pattern: &Regex, found: usize, segment: &str) -> FeedError {
    FeedError::MalformedSegment {
        pattern: pattern.as_str().to_string(),
        found,
        segment: segment.to_string(),
    }
}

/// Core cardinality check shared by [`extract`] and [`extract_optional`]:
/// `Ok(Some)` for exactly one match, `Ok(None)` for zero, error for two or
/// more. Ambiguity is never tolerated — two matches mean the feed grammar
/// has drifted and the value cannot be trusted.
fn find_exactly_one<'t>(text: &'t str, pattern: &Regex) -> FeedResult<Option<&'t str>> {
    let mut caps = pattern.captures_iter(text);
    match (caps.next(), caps.next()) {
        (Some(cap), None) => {
            let value = cap.get(1).map(|m| m.as_str()).unwrap_or_default();
            debug!(pattern = pattern.as_str(), value, "field extracted");
            Ok(Some(value))
        }
        (None, _) => Ok(None),
        (Some(_), Some(_)) => Err(malformed(pattern, 2 + caps.count(), text)),
    }
}

/// Extract the single value captured by `pattern` from `text`.
///
/// Exactly one match is required; zero or several is [`FeedError::MalformedSegment`].
pub fn extract<'t>(text: &'t str, pattern: &Regex) -> FeedResult<&'t str> {
    find_exactly_one(text, pattern)?.ok_or_else(|| malformed(pattern, 0, text))
}

/// Like [`extract`], but zero matches yields `None` instead of an error.
/// Two or more matches is still an error.
pub fn extract_optional<'t>(text: &'t str, pattern: &Regex) -> FeedResult<Option<&'t str>> {
    find_exactly_one(text, pattern)
}

/// An (opening, closing) odds pair as published by the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OddsPair {
    pub start: String,
    pub end: String,
}

// `NUMBER` alone means no movement; `NUMBER[u]NUMBER` / `NUMBER[d]NUMBER`
// marks the direction of movement with the second number as the closing value.
static ODDS_PAIR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)(?:\[[ud]\](\d+(?:\.\d+)?))?$").expect("odds-pair regex compiles")
});

/// Decompose a raw odds value into its (opening, closing) pair.
///
/// A bare number closes where it opened; anything outside the grammar is
/// [`FeedError::InvalidNumericFormat`].
pub fn split_odds(raw: &str) -> FeedResult<OddsPair> {
    let caps = ODDS_PAIR_RE
        .captures(raw.trim())
        .ok_or_else(|| FeedError::InvalidNumericFormat {
            field: "odds",
            value: raw.to_string(),
        })?;
    let start = caps
        .get(1)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    let end = caps
        .get(2)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| start.clone());
    Ok(OddsPair { start, end })
}

static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}").expect("year regex compiles"));

/// Pull the first 4-digit year out of a display name like "ATP Acapulco 2024".
pub fn extract_year(text: &str) -> FeedResult<&str> {
    YEAR_RE
        .find(text)
        .map(|m| m.as_str())
        .ok_or_else(|| FeedError::InvalidNumericFormat {
            field: "year",
            value: text.to_string(),
        })
}
