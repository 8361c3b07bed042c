//! Decoder for a match's odds feed.
//!
//! The feed nests four levels deep: market (`~OA÷`) → bet variant (`~OB÷`)
//! → threshold group (`~OCT÷`, over/under and correct-score only) →
//! bookmaker (`~OE÷`). Decoded records accumulate onto the owning match, so
//! repeated invocations append rather than replace.
//!
//! Severity is routed on the error variant: an unknown bookmaker id or an
//! unknown market type means the feed format has drifted and aborts the
//! whole feed; any other failure inside one bookmaker or threshold sub-block
//! skips that sub-block only.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, warn};

use crate::feed::{bookmaker_name, extract, segments, split_odds, FeedError, FeedResult, OddsPair};
use crate::models::{CorrectScoreOdds, HomeAwayOdds, Match, OverUnderOdds};

const MARKET_SENTINEL: &str = "~OA÷";
const VARIANT_SENTINEL: &str = "~OB÷";
const THRESHOLD_SENTINEL: &str = "~OCT÷";
const BOOKMAKER_SENTINEL: &str = "~OE÷";

static BET_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬OAU÷([^¬÷]+)¬OAI÷").expect("bet-type pattern compiles"));
static BET_VARIANT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^¬÷]+)¬OBU÷").expect("bet-variant pattern compiles"));
static THRESHOLD_TYPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^¬÷]+)¬OC÷").expect("threshold-type pattern compiles"));
static THRESHOLD_VALUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬OC÷([^¬÷]+)(?:¬LY÷|¬LZ÷)").expect("threshold-value pattern compiles"));
static BOOKMAKER_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^¬÷]+)¬OD÷").expect("bookmaker-id pattern compiles"));
static BOOKMAKER_WEB_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬OD÷([^¬÷]+)¬OPI÷").expect("bookmaker-web-name pattern compiles"));
static PAIRED_ODD_1: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬XB÷([^¬÷]+)¬XC÷").expect("first-odd pattern compiles"));
static PAIRED_ODD_2: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬XC÷([^¬÷]+)¬OG÷").expect("second-odd pattern compiles"));

/// Decode one odds feed onto `m`.
pub fn parse_odds(m: &mut Match, feed: &str) -> FeedResult<()> {
    for market in segments(feed, MARKET_SENTINEL).skip(1) {
        let bet_type = extract(market, &BET_TYPE)?;

        match bet_type {
            "home-away" | "over-under" | "correct-score" => {}
            // Recognized markets this decoder deliberately does not model.
            "odd-even" | "asian-handicap" => {
                debug!(bet_type, "ignoring unmodeled market type");
                continue;
            }
            other => return Err(FeedError::UnsupportedMarketType(other.to_string())),
        }

        for variant in segments(market, VARIANT_SENTINEL).skip(1) {
            let bet_variant = match extract(variant, &BET_VARIANT) {
                Ok(v) => v,
                Err(e) => {
                    warn!(error = %e, "skipping odds variant without label");
                    continue;
                }
            };
            info!(bet_type, bet_variant, "decoding odds variant");

            match bet_type {
                "home-away" => decode_home_away(m, variant, bet_variant)?,
                "over-under" => decode_over_under(m, variant, bet_variant)?,
                "correct-score" => decode_correct_score(m, variant, bet_variant)?,
                _ => unreachable!("filtered above"),
            }
        }
    }

    Ok(())
}

fn resolve_bookmaker(block: &str) -> FeedResult<&'static str> {
    let name = bookmaker_name(extract(block, &BOOKMAKER_ID)?)?;
    if let Ok(web_name) = extract(block, &BOOKMAKER_WEB_NAME) {
        debug!(bookmaker = name, web_name, "bookmaker resolved");
    }
    Ok(name)
}

fn paired_odds(block: &str) -> FeedResult<(OddsPair, OddsPair)> {
    let first = split_odds(extract(block, &PAIRED_ODD_1)?)?;
    let second = split_odds(extract(block, &PAIRED_ODD_2)?)?;
    Ok((first, second))
}

fn single_odds(block: &str) -> FeedResult<OddsPair> {
    split_odds(extract(block, &PAIRED_ODD_2)?)
}

/// Bubble up table-drift errors, log-and-skip everything else.
fn contain(result: FeedResult<()>, unit: &str, block: &str) -> FeedResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e @ FeedError::UnknownCode { .. }) => Err(e),
        Err(e) => {
            warn!(error = %e, unit, block, "skipping odds sub-block");
            Ok(())
        }
    }
}

fn decode_home_away(m: &mut Match, variant: &str, bet_variant: &str) -> FeedResult<()> {
    for block in segments(variant, BOOKMAKER_SENTINEL).skip(1) {
        let decoded = resolve_bookmaker(block).and_then(|bookmaker| {
            let (odd1, odd2) = paired_odds(block)?;
            m.append_home_away(
                HomeAwayOdds {
                    bet_variant: bet_variant.to_string(),
                    bookmaker: bookmaker.to_string(),
                    odd_start: odd1.start,
                    odd_end: odd1.end,
                },
                HomeAwayOdds {
                    bet_variant: bet_variant.to_string(),
                    bookmaker: bookmaker.to_string(),
                    odd_start: odd2.start,
                    odd_end: odd2.end,
                },
            );
            Ok(())
        });
        contain(decoded, "home-away bookmaker", block)?;
    }
    Ok(())
}

fn decode_over_under(m: &mut Match, variant: &str, bet_variant: &str) -> FeedResult<()> {
    for group in segments(variant, THRESHOLD_SENTINEL).skip(1) {
        let decoded = decode_threshold_group(m, group, bet_variant);
        contain(decoded, "over-under threshold group", group)?;
    }
    Ok(())
}

fn decode_threshold_group(m: &mut Match, group: &str, bet_variant: &str) -> FeedResult<()> {
    let threshold_type = extract(group, &THRESHOLD_TYPE)?;
    let threshold_value = extract(group, &THRESHOLD_VALUE)?;

    for block in segments(group, BOOKMAKER_SENTINEL).skip(1) {
        let decoded = resolve_bookmaker(block).and_then(|bookmaker| {
            let (over, under) = paired_odds(block)?;
            m.append_over_under(
                OverUnderOdds {
                    bet_variant: bet_variant.to_string(),
                    threshold_type: threshold_type.to_string(),
                    threshold_value: threshold_value.to_string(),
                    bookmaker: bookmaker.to_string(),
                    odd_start: over.start,
                    odd_end: over.end,
                },
                OverUnderOdds {
                    bet_variant: bet_variant.to_string(),
                    threshold_type: threshold_type.to_string(),
                    threshold_value: threshold_value.to_string(),
                    bookmaker: bookmaker.to_string(),
                    odd_start: under.start,
                    odd_end: under.end,
                },
            );
            Ok(())
        });
        contain(decoded, "over-under bookmaker", block)?;
    }
    Ok(())
}

fn decode_correct_score(m: &mut Match, variant: &str, _bet_variant: &str) -> FeedResult<()> {
    for group in segments(variant, THRESHOLD_SENTINEL).skip(1) {
        let decoded = decode_score_group(m, group);
        contain(decoded, "correct-score group", group)?;
    }
    Ok(())
}

fn decode_score_group(m: &mut Match, group: &str) -> FeedResult<()> {
    // The threshold slot carries the predicted score label here.
    let score = extract(group, &THRESHOLD_VALUE)?;

    for block in segments(group, BOOKMAKER_SENTINEL).skip(1) {
        let decoded = resolve_bookmaker(block).and_then(|bookmaker| {
            let pair = single_odds(block)?;
            m.append_correct_score(CorrectScoreOdds {
                score: score.to_string(),
                bookmaker: bookmaker.to_string(),
                odd_start: pair.start,
                odd_end: pair.end,
            });
            Ok(())
        });
        contain(decoded, "correct-score bookmaker", block)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Round;
    use crate::models::{MatchLinks, Player};

    fn empty_match() -> Match {
        let player = |id: &str| Player {
            id: id.into(),
            name: id.into(),
            nationality: "Spain".into(),
            link: String::new(),
        };
        Match::new(
            "Kx3ou23b".into(),
            "2025-02-24 21:00:00".into(),
            "1740430800".into(),
            Round::Final,
            None,
            player("p1"),
            player("p2"),
            MatchLinks::default(),
        )
    }

    const HOME_AWAY: &str = "x~OA÷¬OAU÷home-away¬OAI÷ha¬~OB÷full-time¬OBU÷ft¬SOB÷1¬\
        ~OE÷141¬OD÷Betclic.fr¬OPI÷https://static.example/80-141.png¬OPN÷¬\
        XB÷1.85[u]1.90¬XC÷2.10[d]2.00¬OG÷1¬";

    const OVER_UNDER: &str = "x~OA÷¬OAU÷over-under¬OAI÷ou¬~OB÷full-time¬OBU÷ft¬\
        ~OCT÷Games¬OC÷21.5¬LY÷Over¬LZ÷Under¬\
        ~OE÷160¬OD÷Unibet¬OPI÷https://static.example/160.png¬OPN÷¬XB÷1.80¬XC÷1.95[u]2.05¬OG÷1¬";

    const CORRECT_SCORE: &str = "x~OA÷¬OAU÷correct-score¬OAI÷cs¬~OB÷full-time¬OBU÷ft¬\
        ~OCT÷s¬OC÷2:0¬LY÷2:0¬\
        ~OE÷129¬OD÷Bwin¬OPI÷https://static.example/129.png¬OPN÷¬XC÷3.25¬OG÷1¬";

    #[test]
    fn test_home_away_market() {
        let mut m = empty_match();
        parse_odds(&mut m, HOME_AWAY).unwrap();

        assert_eq!(m.p1_home_away.len(), 1);
        assert_eq!(m.p2_home_away.len(), 1);
        let p1 = &m.p1_home_away[0];
        assert_eq!(p1.bookmaker, "Betclic");
        assert_eq!(p1.bet_variant, "full-time");
        assert_eq!((p1.odd_start.as_str(), p1.odd_end.as_str()), ("1.85", "1.90"));
        let p2 = &m.p2_home_away[0];
        assert_eq!((p2.odd_start.as_str(), p2.odd_end.as_str()), ("2.10", "2.00"));
    }

    #[test]
    fn test_over_under_market() {
        let mut m = empty_match();
        parse_odds(&mut m, OVER_UNDER).unwrap();

        assert_eq!(m.over.len(), 1);
        assert_eq!(m.under.len(), 1);
        let over = &m.over[0];
        assert_eq!(over.bookmaker, "Unibet");
        assert_eq!(over.threshold_type, "Games");
        assert_eq!(over.threshold_value, "21.5");
        assert_eq!((over.odd_start.as_str(), over.odd_end.as_str()), ("1.80", "1.80"));
        let under = &m.under[0];
        assert_eq!((under.odd_start.as_str(), under.odd_end.as_str()), ("1.95", "2.05"));
    }

    #[test]
    fn test_correct_score_market() {
        let mut m = empty_match();
        parse_odds(&mut m, CORRECT_SCORE).unwrap();

        assert_eq!(m.correct_score.len(), 1);
        let odd = &m.correct_score[0];
        assert_eq!(odd.score, "2:0");
        assert_eq!(odd.bookmaker, "Bwin");
        assert_eq!((odd.odd_start.as_str(), odd.odd_end.as_str()), ("3.25", "3.25"));
    }

    #[test]
    fn test_odds_accumulate_across_invocations() {
        let mut m = empty_match();
        parse_odds(&mut m, HOME_AWAY).unwrap();
        parse_odds(&mut m, HOME_AWAY).unwrap();
        assert_eq!(m.p1_home_away.len(), 2);
    }

    #[test]
    fn test_ignored_market_types() {
        let feed = "x~OA÷¬OAU÷odd-even¬OAI÷oe¬~OB÷full-time¬OBU÷ft¬\
            ~OE÷141¬OD÷Betclic.fr¬OPI÷p¬OPN÷¬XB÷1.85¬XC÷1.85¬OG÷1¬";
        let mut m = empty_match();
        parse_odds(&mut m, feed).unwrap();
        assert!(m.p1_home_away.is_empty());
    }

    #[test]
    fn test_unknown_market_type_fails() {
        let feed = "x~OA÷¬OAU÷both-score¬OAI÷bs¬~OB÷full-time¬OBU÷ft¬";
        let mut m = empty_match();
        let err = parse_odds(&mut m, feed).unwrap_err();
        assert!(matches!(err, FeedError::UnsupportedMarketType(t) if t == "both-score"));
    }

    #[test]
    fn test_unknown_bookmaker_aborts_feed() {
        let feed = "x~OA÷¬OAU÷home-away¬OAI÷ha¬~OB÷full-time¬OBU÷ft¬\
            ~OE÷999¬OD÷Mystery¬OPI÷p¬OPN÷¬XB÷1.85¬XC÷1.85¬OG÷1¬";
        let mut m = empty_match();
        let err = parse_odds(&mut m, feed).unwrap_err();
        assert!(matches!(err, FeedError::UnknownCode { table: "bookmaker", .. }));
    }

    #[test]
    fn test_malformed_bookmaker_block_skipped() {
        // Second bookmaker block lacks its odds fields; the first still lands.
        let feed = "x~OA÷¬OAU÷home-away¬OAI÷ha¬~OB÷full-time¬OBU÷ft¬\
            ~OE÷141¬OD÷Betclic.fr¬OPI÷p¬OPN÷¬XB÷1.85¬XC÷1.85¬OG÷1¬\
            ~OE÷129¬OD÷Bwin¬OPI÷p¬OPN÷¬OG÷1¬";
        let mut m = empty_match();
        parse_odds(&mut m, feed).unwrap();
        assert_eq!(m.p1_home_away.len(), 1);
        assert_eq!(m.p1_home_away[0].bookmaker, "Betclic");
    }
}
