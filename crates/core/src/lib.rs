//! Core types and configuration for the barkit crates.
//!
//! This crate provides shared types used across all other crates:
//! - Bar and bar series types
//! - The numeric abstraction bars are generic over
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod num;
pub mod series;
pub mod types;

pub use config::{Config, IndexConfig, ResampleConfig, SeriesConfig, UnderflowPolicy};
pub use error::{Error, Result};
pub use num::{Num, Price};
pub use series::{BarSeries, SeriesBuilder};
pub use types::*;
