use thiserror::Error;

/// Errors raised while decoding feed text.
///
/// The taxonomy is closed on purpose: every decode failure is one of these
/// four shapes, so call sites can route severity (skip one unit vs. abort the
/// batch) on the variant alone.
#[derive(Debug, Error)]
pub enum FeedError {
    /// A field pattern matched zero times (where one was required) or more
    /// than once (always). Carries the raw segment so the skipped unit can be
    /// logged with full context.
    #[error("expected exactly 1 match for pattern '{pattern}', found {found} in: {segment}")]
    MalformedSegment {
        pattern: String,
        found: usize,
        segment: String,
    },

    /// A provider code is absent from one of the closed lookup tables.
    #[error("unknown {table} code: '{code}'")]
    UnknownCode { table: &'static str, code: String },

    /// A numeric field (games score, odds value, epoch timestamp) failed to
    /// parse.
    #[error("invalid numeric {field}: '{value}'")]
    InvalidNumericFormat { field: &'static str, value: String },

    /// An odds market type outside the known and the known-but-ignored sets.
    #[error("unsupported odds market type: '{0}'")]
    UnsupportedMarketType(String),
}

pub type FeedResult<T> = Result<T, FeedError>;
