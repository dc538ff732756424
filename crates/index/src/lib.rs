//! Point-in-time lookup for bar series.
//!
//! This crate handles:
//! - End-time keyed index with ceiling search
//! - Logical to physical index translation across front eviction
//! - A series wrapper that keeps the index in step with appends

pub mod indexed_series;
pub mod temporal;

pub use indexed_series::{TimeIndexed, TimeIndexedSeries};
pub use temporal::{IndexEntry, TemporalIndex};
