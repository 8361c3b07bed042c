//! Decoder for the tournament index feed: one segment per tournament,
//! carrying its url slug and provider id.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::feed::{extract, segments};
use crate::models::TournamentKey;

const TOURNAMENT_SENTINEL: &str = "~MN÷";

static SLUG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬MU÷([^¬÷]+)¬MT÷").expect("slug pattern compiles"));
static ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"¬MTI÷([^¬÷]+)¬").expect("id pattern compiles"));

/// Decode the index feed into tournament keys. The text before the first
/// sentinel is index preamble and is discarded; a segment missing either
/// field is logged and skipped without affecting its siblings.
pub fn parse_tournament_index(feed: &str, archive_base: &str) -> Vec<TournamentKey> {
    let mut keys = Vec::new();

    for segment in segments(feed, TOURNAMENT_SENTINEL).skip(1) {
        let decoded = extract(segment, &SLUG).and_then(|slug| {
            let id = extract(segment, &ID)?;
            Ok(TournamentKey {
                slug: slug.to_string(),
                id: id.to_string(),
                link_archives: format!("{archive_base}{slug}/archive/"),
            })
        });
        match decoded {
            Ok(key) => {
                debug!(slug = %key.slug, id = %key.id, "tournament indexed");
                keys.push(key);
            }
            Err(e) => warn!(error = %e, "skipping malformed tournament segment"),
        }
    }

    keys
}
