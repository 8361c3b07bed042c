//! Decoder for a season's results feed: the tournament surface header plus
//! one segment per match.

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::feed::{extract, extract_optional, segments, FeedError, FeedResult, Round, Surface};
use crate::models::{Match, MatchLinks, Player};

const MATCH_SENTINEL: &str = "~AA÷";

/// Provider match ids known to be malformed on the provider side; decoding
/// them is not worth special-casing, so they are skipped outright.
const EXCLUDED_MATCH_IDS: [&str; 3] = ["EV2zgEbq", "6H7IaZrg", "0v7Mbgba"];

static SURFACE_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬~ZA÷([^¬÷]+)¬ZEE÷").expect("surface pattern compiles"));
static MATCH_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([^¬÷]+)¬AD÷").expect("match-id pattern compiles"));
static MATCH_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬AD÷([^¬÷]+)¬ADE÷").expect("date pattern compiles"));
static MATCH_ROUND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬ER÷([^¬÷]+)¬RW÷").expect("round pattern compiles"));
static P1_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬WU÷([^¬÷]+)¬(?:AS|GRA|AZ)÷").expect("p1 name pattern compiles"));
static P2_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬WV÷([^¬÷]+)¬(?:AS|GRB|AZ)÷").expect("p2 name pattern compiles"));
static P1_NATIONALITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬FU÷([^¬÷]+)¬CY÷").expect("p1 nationality pattern compiles"));
static P2_NATIONALITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"¬FV÷([^¬÷]+)¬(?:AH|OB|WB|BB)÷").expect("p2 nationality pattern compiles")
});
static P1_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬PX÷([^¬÷]+)¬WU÷").expect("p1 id pattern compiles"));
static P2_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬PY÷([^¬÷]+)¬WV÷").expect("p2 id pattern compiles"));

/// Base URLs substituted into per-match and per-player links.
#[derive(Debug, Clone)]
pub struct LinkTemplates {
    pub player: String,
    pub odds: String,
    pub stats: String,
    pub score: String,
    pub status: String,
}

impl Default for LinkTemplates {
    fn default() -> Self {
        LinkTemplates {
            player: "https://www.flashscore.com/player/".into(),
            odds: "https://2.flashscore.ninja/2/x/feed/df_od_1_".into(),
            stats: "https://2.flashscore.ninja/2/x/feed/df_st_1_".into(),
            score: "https://2.flashscore.ninja/2/x/feed/df_sur_1_".into(),
            status: "https://2.flashscore.ninja/2/x/feed/dc_1_".into(),
        }
    }
}

/// Builds [`Match`] records from one tournament's results feed.
///
/// Purely computational: links are synthesized by template substitution but
/// their reachability is checked by the caller through the HTTP collaborator.
pub struct ResultsParser {
    templates: LinkTemplates,
}

impl ResultsParser {
    pub fn new(templates: LinkTemplates) -> Self {
        ResultsParser { templates }
    }

    /// Decode a results feed into the tournament surface and its matches.
    ///
    /// The segment before the first match sentinel is the tournament header;
    /// a surface that fails to decode aborts the whole tournament, since
    /// every downstream record would inherit the wrong court. A match
    /// segment that fails to decode is logged and skipped without touching
    /// its siblings.
    pub fn parse(&self, feed: &str) -> FeedResult<(Surface, Vec<Match>)> {
        let mut parts = segments(feed, MATCH_SENTINEL);
        let header = parts.next().unwrap_or_default();
        let surface = decode_surface(header)?;

        let mut matches = Vec::new();
        for segment in parts {
            match self.decode_segment(segment, surface) {
                Ok(Some(m)) => matches.push(m),
                Ok(None) => debug!(segment, "skipping denylisted match id"),
                Err(e) => warn!(error = %e, segment, "skipping malformed match segment"),
            }
        }
        Ok((surface, matches))
    }

    fn decode_segment(&self, segment: &str, surface: Surface) -> FeedResult<Option<Match>> {
        let match_id = extract(segment, &MATCH_ID)?;
        if EXCLUDED_MATCH_IDS.contains(&match_id) {
            return Ok(None);
        }

        let name1 = extract(segment, &P1_NAME)?;
        let name2 = extract(segment, &P2_NAME)?;
        let nationality1 = extract(segment, &P1_NATIONALITY)?;
        let nationality2 = extract(segment, &P2_NATIONALITY)?;
        let id1 = extract(segment, &P1_ID)?;
        let id2 = extract(segment, &P2_ID)?;
        let (match_date, timestamp) = decode_date(segment)?;
        let round = extract_optional(segment, &MATCH_ROUND)?
            .and_then(Round::from_code)
            .unwrap_or(Round::NotPlayOff);

        let t = &self.templates;
        let player1 = Player {
            id: id1.to_string(),
            name: name1.to_string(),
            nationality: nationality1.to_string(),
            link: format!("{}{}/{}/", t.player, name1, id1),
        };
        let player2 = Player {
            id: id2.to_string(),
            name: name2.to_string(),
            nationality: nationality2.to_string(),
            link: format!("{}{}/{}/", t.player, name2, id2),
        };
        let links = MatchLinks {
            odds: format!("{}{}/", t.odds, match_id),
            stats: format!("{}{}/", t.stats, match_id),
            score: format!("{}{}/", t.score, match_id),
            status: format!("{}{}/", t.status, match_id),
        };

        Ok(Some(Match::new(
            match_id.to_string(),
            match_date,
            timestamp.to_string(),
            round,
            Some(surface),
            player1,
            player2,
            links,
        )))
    }
}

/// The header names the tournament as "ATP - SINGLES: City (Country), surface";
/// the surface is whatever follows the last ", ".
fn decode_surface(header: &str) -> FeedResult<Surface> {
    let tournament_part = extract(header, &SURFACE_HEADER)?;
    let (_, raw_surface) =
        tournament_part
            .rsplit_once(", ")
            .ok_or_else(|| FeedError::MalformedSegment {
                pattern: "', ' surface delimiter".to_string(),
                found: 0,
                segment: tournament_part.to_string(),
            })?;
    Surface::normalize(raw_surface.trim())
}

/// Convert the feed's epoch-seconds scheduling field into the formatted date
/// plus the raw timestamp string.
fn decode_date(segment: &str) -> FeedResult<(String, &str)> {
    let raw = extract(segment, &MATCH_DATE)?;
    let epoch: i64 = raw.parse().map_err(|_| FeedError::InvalidNumericFormat {
        field: "timestamp",
        value: raw.to_string(),
    })?;
    let datetime =
        DateTime::from_timestamp(epoch, 0).ok_or_else(|| FeedError::InvalidNumericFormat {
            field: "timestamp",
            value: raw.to_string(),
        })?;
    Ok((datetime.format("%Y-%m-%d %H:%M:%S").to_string(), raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "SA÷2¬~ZA÷ATP - SINGLES: Acapulco (Mexico), hard¬ZEE÷acapulco¬";

    fn segment(match_id: &str, round: &str) -> String {
        format!(
            "{match_id}¬AD÷1740430800¬ADE÷1740430800¬ER÷{round}¬RW÷0\
             ¬PX÷xGJsdJvO¬WU÷alcaraz-carlos¬AS÷1¬FU÷Spain¬CY÷ESP\
             ¬PY÷zVxYz123¬WV÷zverev-alexander¬AS÷2¬FV÷Germany¬AH÷5¬"
        )
    }

    fn feed(segments: &[String]) -> String {
        let mut feed = HEADER.to_string();
        for s in segments {
            feed.push_str(MATCH_SENTINEL);
            feed.push_str(s);
        }
        feed
    }

    #[test]
    fn test_full_segment_decodes() {
        let parser = ResultsParser::new(LinkTemplates::default());
        let (surface, matches) = parser.parse(&feed(&[segment("g2L1uSO9", "Final")])).unwrap();

        assert_eq!(surface, Surface::Hard);
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.match_id, "g2L1uSO9");
        assert_eq!(m.match_date, "2025-02-24 21:00:00");
        assert_eq!(m.timestamp, "1740430800");
        assert_eq!(m.round, Round::Final);
        assert_eq!(m.surface, Some(Surface::Hard));
        assert_eq!(m.player1.name, "alcaraz-carlos");
        assert_eq!(m.player1.id, "xGJsdJvO");
        assert_eq!(m.player1.nationality, "Spain");
        assert_eq!(
            m.player1.link,
            "https://www.flashscore.com/player/alcaraz-carlos/xGJsdJvO/"
        );
        assert_eq!(m.player2.name, "zverev-alexander");
        assert_eq!(m.player2.nationality, "Germany");
        assert_eq!(
            m.links.odds,
            "https://2.flashscore.ninja/2/x/feed/df_od_1_g2L1uSO9/"
        );
        assert_eq!(
            m.links.status,
            "https://2.flashscore.ninja/2/x/feed/dc_1_g2L1uSO9/"
        );
    }

    #[test]
    fn test_denylisted_match_skipped() {
        let parser = ResultsParser::new(LinkTemplates::default());
        let feed = feed(&[segment("EV2zgEbq", "Final"), segment("g2L1uSO9", "Final")]);
        let (_, matches) = parser.parse(&feed).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].match_id, "g2L1uSO9");
    }

    #[test]
    fn test_unknown_round_degrades_to_sentinel() {
        let parser = ResultsParser::new(LinkTemplates::default());
        let (_, matches) = parser
            .parse(&feed(&[segment("g2L1uSO9", "Group Stage")]))
            .unwrap();
        assert_eq!(matches[0].round, Round::NotPlayOff);
    }

    #[test]
    fn test_malformed_segment_does_not_abort_siblings() {
        let parser = ResultsParser::new(LinkTemplates::default());
        let feed = feed(&["broken segment with no fields".to_string(), segment("g2L1uSO9", "Final")]);
        let (_, matches) = parser.parse(&feed).unwrap();
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_invalid_surface_aborts_tournament() {
        let parser = ResultsParser::new(LinkTemplates::default());
        let feed = format!(
            "SA÷2¬~ZA÷ATP - SINGLES: Acapulco (Mexico), moon¬ZEE÷acapulco¬~AA÷{}",
            segment("g2L1uSO9", "Final")
        );
        assert!(matches!(
            parser.parse(&feed),
            Err(FeedError::UnknownCode { table: "surface", .. })
        ));
    }

    #[test]
    fn test_header_without_surface_delimiter_aborts() {
        let parser = ResultsParser::new(LinkTemplates::default());
        let feed = "SA÷2¬~ZA÷ATP - SINGLES hard¬ZEE÷acapulco¬".to_string();
        assert!(parser.parse(&feed).is_err());
    }

    #[test]
    fn test_grass_surface() {
        let parser = ResultsParser::new(LinkTemplates::default());
        let feed = "SA÷2¬~ZA÷ATP - SINGLES: Wimbledon (United Kingdom), grass¬ZEE÷wimbledon¬";
        let (surface, matches) = parser.parse(feed).unwrap();
        assert_eq!(surface, Surface::Grass);
        assert!(matches.is_empty());
    }
}
