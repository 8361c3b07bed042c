pub mod archive;
pub mod odds;
pub mod results;
pub mod score;
pub mod status;
pub mod tournaments;

pub use archive::{embedded_results_feed, parse_archive};
pub use odds::parse_odds;
pub use results::{LinkTemplates, ResultsParser};
pub use score::parse_score;
pub use status::{parse_status, StatusUpdate};
pub use tournaments::parse_tournament_index;
