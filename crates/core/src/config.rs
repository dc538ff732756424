//! Configuration structures for indexing and resampling.

use std::path::Path;

use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Temporal index configuration.
    pub index: IndexConfig,
    /// Resampling configuration.
    pub resample: ResampleConfig,
    /// Series storage configuration.
    pub series: SeriesConfig,
}

impl Config {
    /// Parse configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check values that serde alone cannot rule out.
    pub fn validate(&self) -> Result<()> {
        if self.resample.target_interval_secs == 0 {
            return Err(Error::config("resample.target_interval_secs must be > 0"));
        }
        if self.series.max_bar_count == Some(0) {
            return Err(Error::config("series.max_bar_count must be > 0"));
        }
        Ok(())
    }
}

/// What a lookup does when a logical index maps before the first stored bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnderflowPolicy {
    /// Fail with `IndexOutOfRange`.
    #[default]
    Strict,
    /// Substitute the first stored bar (index 0) if any bar is stored.
    Clamp,
}

/// Temporal index configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Handling of lookups that land on evicted bars.
    pub underflow: UnderflowPolicy,
}

/// Resampling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Target bar length in seconds.
    pub target_interval_secs: u64,
    /// Time of day the bucket grid is anchored to (None = anchor to data start).
    pub align_to: Option<NaiveTime>,
}

impl ResampleConfig {
    /// Target interval as a duration.
    pub fn target_interval(&self) -> Result<TimeDelta> {
        i64::try_from(self.target_interval_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .ok_or_else(|| {
                Error::config(format!(
                    "target_interval_secs {} out of range",
                    self.target_interval_secs
                ))
            })
    }
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            target_interval_secs: 300,
            align_to: None,
        }
    }
}

/// Series storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesConfig {
    /// Maximum bars kept in memory (None = unbounded).
    pub max_bar_count: Option<usize>,
}
