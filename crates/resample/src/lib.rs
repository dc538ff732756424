//! Bar downsampling for the barkit crates.
//!
//! This crate handles:
//! - Interval validation (coarser, whole-multiple targets only)
//! - Bucket boundary placement, optionally aligned to a time of day
//! - Gap skipping between buckets
//! - OHLCV aggregation into an independent output series

pub mod accumulator;
mod alignment;
pub mod resampler;

pub use accumulator::BarAccumulator;
pub use resampler::{resample, BarResampler};
