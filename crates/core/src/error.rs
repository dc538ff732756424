//! Error types for the barkit crates.

use chrono::{DateTime, FixedOffset, TimeDelta};
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the barkit crates.
#[derive(Error, Debug)]
pub enum Error {
    /// No bar interval covers the requested timestamp.
    #[error("No bar covering {0} exists")]
    NotFound(DateTime<FixedOffset>),

    /// A physical index falls outside current storage.
    #[error("Index {index} out of range for series of {len} bars")]
    IndexOutOfRange { index: i64, len: usize },

    /// Target interval is finer than the source interval, or lays bucket
    /// boundaries outside the representable time range.
    #[error("Can not resample {source_period} bars to interval {target}")]
    InvalidInterval {
        source_period: TimeDelta,
        target: TimeDelta,
    },

    /// Target interval is not a whole multiple of the source interval.
    #[error("Target interval {target} is not a multiple of source interval {source_period}")]
    NonDivisibleInterval {
        source_period: TimeDelta,
        target: TimeDelta,
    },

    /// Operation requires at least one bar.
    #[error("Source series '{0}' has no bars")]
    EmptySource(String),

    /// Bar fields violate OHLC or time invariants.
    #[error("Invalid bar: {0}")]
    InvalidBar(String),

    /// Appended bar does not end after the current last bar.
    #[error("Bar ending {end} is not after last bar ending {last_end}")]
    NonMonotonic {
        end: DateTime<FixedOffset>,
        last_end: DateTime<FixedOffset>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an out-of-range error.
    pub fn out_of_range(index: i64, len: usize) -> Self {
        Error::IndexOutOfRange { index, len }
    }

    /// Create an invalid bar error.
    pub fn invalid_bar(msg: impl Into<String>) -> Self {
        Error::InvalidBar(msg.into())
    }

    /// Create an empty source error.
    pub fn empty_source(name: impl Into<String>) -> Self {
        Error::EmptySource(name.into())
    }

    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
