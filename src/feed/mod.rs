pub mod codes;
pub mod error;
pub mod text;

pub use codes::{bookmaker_name, MatchStatus, Round, Surface, Winner};
pub use error::{FeedError, FeedResult};
pub use text::{extract, extract_optional, extract_year, segments, split_odds, OddsPair};
