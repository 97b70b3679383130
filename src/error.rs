use crate::{Price, Timestamp};

/// Errors produced by this crate.
///
/// Short history and flat prices are not errors: they show up as `None`
/// indicator values. Only input that would make the indicators silently wrong
/// is rejected.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A bar is older than the one before it.
    #[error("bar {index} at {current} precedes previous bar at {previous}")]
    NonChronological {
        index: usize,
        previous: Timestamp,
        current: Timestamp,
    },

    /// A bar repeats the timestamp of the one before it.
    #[error("bar {index} repeats timestamp {timestamp}")]
    DuplicateTimestamp { index: usize, timestamp: Timestamp },

    /// A price is NaN, infinite, zero or negative.
    #[error("bar {index} has invalid {field} price: {value}")]
    InvalidPrice {
        index: usize,
        field: &'static str,
        value: Price,
    },

    /// OHLC values contradict each other (e.g. `low > high`).
    #[error("bar {index} is inconsistent: {reason}")]
    InconsistentBar { index: usize, reason: String },

    /// A trade was priced at NaN, infinity, zero or below.
    #[error("invalid trade price: {0}")]
    InvalidTradePrice(Price),

    /// An imported indicator table holds NaN or infinity.
    #[error("row {row} has non-finite {column}: {value}")]
    NonFiniteValue {
        row: usize,
        column: &'static str,
        value: f64,
    },

    /// RSI bands are not finite, or `oversold` is not below `overbought`.
    #[error("invalid RSI thresholds: oversold {oversold} must be below overbought {overbought}")]
    InvalidThresholds { oversold: f64, overbought: f64 },

    /// Symbol is blank after trimming.
    #[error("symbol must not be empty")]
    EmptySymbol,

    /// Lookback period text is not one of the supported values.
    #[error("unknown period {0:?}, expected one of 6mo, 1y, 2y, 5y")]
    UnknownPeriod(String),

    /// CSV reading or writing failed.
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    /// A settings file could not be read, or CSV output could not be
    /// flushed.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output was not valid UTF-8.
    #[error("csv output is not utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Settings file could not be parsed.
    #[error("invalid settings: {0}")]
    Config(#[from] toml::de::Error),
}

/// Crate result type.
pub type Result<T, E = Error> = std::result::Result<T, E>;
