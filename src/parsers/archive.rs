//! HTML-facing parsers: the tournament archive listing page and the script
//! block that embeds a season's results feed.
//!
//! Everything here consumes already-fetched page text; errors are reported
//! through `anyhow` since this is collaborator territory, not the wire-format
//! decoder.

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::feed::extract_year;
use crate::models::{Tournament, TournamentKey};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("archive selector parses")
}

/// Parse a tournament archive page into one [`Tournament`] per listed
/// season. Rows that fail to parse are logged and skipped; a page without
/// the archive section at all is an error (wrong page, or markup drift).
pub fn parse_archive(key: &TournamentKey, html: &str, base_url: &str) -> Result<Vec<Tournament>> {
    let document = Html::parse_document(html);
    let section_sel = selector("section#tournament-page-archiv");
    let row_sel = selector("div.archive__row");

    let section = document
        .select(&section_sel)
        .next()
        .ok_or_else(|| anyhow!("tournament archive section not found"))?;

    let mut seasons = Vec::new();
    for row in section.select(&row_sel) {
        match parse_archive_row(key, row, base_url) {
            Ok(season) => {
                debug!(name = %season.name, year = %season.year, "archive season parsed");
                seasons.push(season);
            }
            Err(e) => warn!(error = %e, "skipping archive row"),
        }
    }
    Ok(seasons)
}

fn parse_archive_row(key: &TournamentKey, row: ElementRef, base_url: &str) -> Result<Tournament> {
    let season_sel = selector("div.archive__season a.archive__text--clickable");
    let winner_sel = selector("div.archive__winner a.archive__text--clickable");

    let link_tag = row
        .select(&season_sel)
        .next()
        .ok_or_else(|| anyhow!("season link not found in archive row"))?;

    // e.g. "ATP Acapulco 2024"
    let name: String = link_tag.text().collect::<String>().trim().to_string();
    let href = link_tag
        .value()
        .attr("href")
        .ok_or_else(|| anyhow!("season link has no href"))?;

    let link = match href.strip_prefix('/') {
        Some(rest) => format!("{base_url}{rest}"),
        None => format!("{base_url}{href}"),
    };
    let link_results = format!("{link}results/");

    let year = extract_year(&name)
        .with_context(|| format!("no year in season name '{name}'"))?
        .to_string();

    let winner_name = row
        .select(&winner_sel)
        .next()
        .map(|tag| tag.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    Ok(Tournament {
        key: key.clone(),
        name,
        year,
        link,
        link_results,
        winner_name,
        matches: Vec::new(),
    })
}

// The season results page embeds its feed in a script block:
// cjs.initialFeeds['results'] = { data: `...`, };
static EMBEDDED_FEED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)cjs\.initialFeeds\['results'\]\s*=\s*\{.*?data:\s*`(.*?)`,")
        .expect("embedded-feed pattern compiles")
});

/// Pull the raw results feed text out of a season results page.
pub fn embedded_results_feed(html: &str) -> Result<String> {
    EMBEDDED_FEED
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| anyhow!("results feed data not found in page scripts"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> TournamentKey {
        TournamentKey {
            slug: "acapulco".into(),
            id: "vDAjRCsI".into(),
            link_archives: "https://www.flashscore.com/tennis/atp-singles/acapulco/archive/".into(),
        }
    }

    const ARCHIVE_PAGE: &str = r#"
        <html><body>
        <section id="tournament-page-archiv">
          <div class="archive__row">
            <div class="archive__season">
              <a class="archive__text--clickable" href="/tennis/atp-singles/acapulco-2024/">ATP Acapulco 2024</a>
            </div>
            <div class="archive__winner">
              <a class="archive__text--clickable">Nadal R.</a>
            </div>
          </div>
          <div class="archive__row">
            <div class="archive__season">
              <a class="archive__text--clickable" href="/tennis/atp-singles/acapulco-2023/">ATP Acapulco 2023</a>
            </div>
          </div>
          <div class="archive__row">
            <div class="archive__season">no link here</div>
          </div>
        </section>
        </body></html>"#;

    #[test]
    fn test_archive_rows_parsed() {
        let seasons = parse_archive(&key(), ARCHIVE_PAGE, "https://www.flashscore.com/").unwrap();
        assert_eq!(seasons.len(), 2);

        let latest = &seasons[0];
        assert_eq!(latest.name, "ATP Acapulco 2024");
        assert_eq!(latest.year, "2024");
        assert_eq!(
            latest.link,
            "https://www.flashscore.com/tennis/atp-singles/acapulco-2024/"
        );
        assert_eq!(
            latest.link_results,
            "https://www.flashscore.com/tennis/atp-singles/acapulco-2024/results/"
        );
        assert_eq!(latest.winner_name, "Nadal R.");
        assert_eq!(latest.key.slug, "acapulco");

        // Winner column is optional (season not finished yet)
        assert_eq!(seasons[1].winner_name, "");
    }

    #[test]
    fn test_missing_archive_section_is_error() {
        assert!(parse_archive(&key(), "<html><body></body></html>", "https://x.com/").is_err());
    }

    #[test]
    fn test_embedded_feed_extraction() {
        let html = "<script type=\"text/javascript\">\n\
            cjs.initialFeeds['results'] = {\n\
                data: `SA÷2¬~ZA÷ATP - SINGLES: Acapulco (Mexico), hard¬ZEE÷acapulco¬`,\n\
            };\n</script>";
        let feed = embedded_results_feed(html).unwrap();
        assert!(feed.starts_with("SA÷2¬~ZA÷"));
        assert!(feed.ends_with("¬ZEE÷acapulco¬"));
    }

    #[test]
    fn test_embedded_feed_missing_is_error() {
        assert!(embedded_results_feed("<html>no feed</html>").is_err());
    }
}
