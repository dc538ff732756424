//! Ordered end-time index over a bar series.
//!
//! Each appended bar gets one entry keyed by its end time and holding the
//! bar's *logical* index. Entries are never removed: bars evicted from the
//! front of the series are reconciled at lookup time by subtracting the
//! series' removed count.

use std::collections::BTreeMap;

use barkit_core::{Bar, BarSeries, Error, IndexConfig, Num, Result, Timestamp, UnderflowPolicy};
use tracing::{debug, trace, warn};

/// Interval recorded for one appended bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    /// Logical index at insertion time.
    pub logical: usize,
    /// Begin time of the bar when it was indexed.
    pub begin_time: Timestamp,
}

/// End-time to logical-index map with ceiling lookup.
#[derive(Debug, Clone)]
pub struct TemporalIndex {
    entries: BTreeMap<Timestamp, IndexEntry>,
    /// Logical index handed to the next appended bar.
    next_logical: usize,
    underflow: UnderflowPolicy,
}

impl TemporalIndex {
    /// Index every bar currently stored in `series`.
    pub fn build<N: Num>(series: &BarSeries<N>, config: &IndexConfig) -> Self {
        let mut index = Self {
            entries: BTreeMap::new(),
            next_logical: series.removed_bars_count(),
            underflow: config.underflow,
        };
        for bar in series {
            index.record(bar);
        }
        debug!(
            series = series.name(),
            entries = index.entries.len(),
            first_logical = series.removed_bars_count(),
            "Built temporal index"
        );
        index
    }

    /// Add an entry for a newly appended bar and return its logical index.
    pub fn record<N: Num>(&mut self, bar: &Bar<N>) -> usize {
        self.record_interval(bar.begin_time(), bar.end_time())
    }

    /// Add an entry for a bar spanning `begin_time..=end_time`.
    pub fn record_interval(&mut self, begin_time: Timestamp, end_time: Timestamp) -> usize {
        let logical = self.next_logical;
        self.entries.insert(end_time, IndexEntry { logical, begin_time });
        self.next_logical += 1;
        trace!(end = %end_time, logical, "Indexed bar");
        logical
    }

    /// Entry with the smallest end time `>= ts`.
    pub fn ceiling(&self, ts: Timestamp) -> Option<(Timestamp, IndexEntry)> {
        self.entries
            .range(ts..)
            .next()
            .map(|(end, entry)| (*end, *entry))
    }

    /// Physical index in `series` of the bar covering `ts`.
    ///
    /// A bar covers `ts` when `begin_time <= ts <= end_time`. Fails with
    /// `NotFound` when no indexed bar does. Stored bars are checked as they
    /// are now, so a replaced last bar is judged by its own interval; evicted
    /// bars are checked against the interval recorded when they were indexed.
    pub fn lookup<N: Num>(&self, series: &BarSeries<N>, ts: Timestamp) -> Result<usize> {
        let Some((_, entry)) = self.ceiling(ts) else {
            return Err(Error::NotFound(ts));
        };

        if entry.logical < series.removed_bars_count() {
            if ts < entry.begin_time {
                return Err(Error::NotFound(ts));
            }
            return self.to_physical(series, entry.logical);
        }

        let physical = self.to_physical(series, entry.logical)?;
        if !series.bar(physical)?.covers(ts) {
            return Err(Error::NotFound(ts));
        }
        Ok(physical)
    }

    /// Translate a logical index to a position in current storage.
    pub fn to_physical<N: Num>(&self, series: &BarSeries<N>, logical: usize) -> Result<usize> {
        let len = series.bar_count();
        let physical = logical as i64 - series.removed_bars_count() as i64;

        if physical < 0 {
            return match self.underflow {
                UnderflowPolicy::Clamp if len > 0 => {
                    warn!(
                        series = series.name(),
                        logical,
                        removed = series.removed_bars_count(),
                        "Bar was evicted, clamping lookup to first stored bar"
                    );
                    Ok(0)
                }
                _ => Err(Error::out_of_range(physical, len)),
            };
        }

        let physical = physical as usize;
        if physical >= len {
            return Err(Error::out_of_range(physical as i64, len));
        }
        Ok(physical)
    }

    /// Number of entries, one per appended bar.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest logical index handed out so far.
    pub fn last_logical(&self) -> Option<usize> {
        self.next_logical.checked_sub(1).filter(|_| !self.entries.is_empty())
    }

    pub fn underflow(&self) -> UnderflowPolicy {
        self.underflow
    }
}
