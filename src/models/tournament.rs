use serde::Serialize;

use super::matches::Match;
use super::Row;

/// Minimal identity of a tournament as listed by the provider's index feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TournamentKey {
    /// Url slug, e.g. "acapulco"
    pub slug: String,
    /// Provider tournament id, e.g. "vDAjRCsI"
    pub id: String,
    /// Archive page listing every season of this tournament
    pub link_archives: String,
}

/// One season of a tournament with its decoded matches. Holds its
/// [`TournamentKey`] by composition; matches are appended as result feeds
/// are decoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tournament {
    pub key: TournamentKey,
    /// Display name, e.g. "ATP Acapulco 2024"
    pub name: String,
    pub year: String,
    pub link: String,
    pub link_results: String,
    /// Empty when the archive row lists no winner (season not finished)
    pub winner_name: String,
    pub matches: Vec<Match>,
}

impl Tournament {
    pub fn add_match(&mut self, m: Match) {
        self.matches.push(m);
    }

    /// Flatten every match into an export row prefixed with the
    /// tournament-level columns. A season without matches still yields one
    /// row carrying the tournament columns alone.
    pub fn to_rows(&self) -> Vec<Row> {
        let mut base = Row::new();
        base.insert("tournament_id".into(), self.key.id.clone());
        base.insert("tournament_slug".into(), self.key.slug.clone());
        base.insert("tournament_name".into(), self.name.clone());
        base.insert("tournament_year".into(), self.year.clone());

        if self.matches.is_empty() {
            return vec![base];
        }

        self.matches
            .iter()
            .map(|m| {
                let mut row = base.clone();
                row.extend(m.flatten());
                row
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Round;
    use crate::models::matches::MatchLinks;
    use crate::models::Player;

    fn tournament() -> Tournament {
        Tournament {
            key: TournamentKey {
                slug: "acapulco".into(),
                id: "vDAjRCsI".into(),
                link_archives: "https://www.flashscore.com/tennis/atp-singles/acapulco/archive/"
                    .into(),
            },
            name: "ATP Acapulco 2024".into(),
            year: "2024".into(),
            link: "https://www.flashscore.com/tennis/atp-singles/acapulco-2024/".into(),
            link_results: "https://www.flashscore.com/tennis/atp-singles/acapulco-2024/results/"
                .into(),
            winner_name: "Nadal R.".into(),
            matches: Vec::new(),
        }
    }

    fn player(id: &str) -> Player {
        Player {
            id: id.into(),
            name: "someone".into(),
            nationality: "Spain".into(),
            link: String::new(),
        }
    }

    #[test]
    fn test_to_rows_without_matches() {
        let rows = tournament().to_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["tournament_slug"], "acapulco");
        assert_eq!(rows[0]["tournament_id"], "vDAjRCsI");
        assert!(!rows[0].contains_key("match_id"));
    }

    #[test]
    fn test_to_rows_merges_tournament_columns() {
        let mut t = tournament();
        t.add_match(Match::new(
            "m1".into(),
            "2024-02-26 18:00:00".into(),
            "1708970400".into(),
            Round::Final,
            None,
            player("p1"),
            player("p2"),
            MatchLinks::default(),
        ));
        let rows = t.to_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["tournament_year"], "2024");
        assert_eq!(rows[0]["match_id"], "m1");
    }
}
