//! Append-only bar series with front eviction.
//!
//! Bars are stored in a `VecDeque` ordered by end time. Two index spaces are
//! in play:
//! - the *physical* index, a position in current storage;
//! - the *logical* index, `removed_bars_count + physical`, which stays
//!   stable while bars are evicted from the front.

use std::collections::VecDeque;

use tracing::trace;

use crate::config::SeriesConfig;
use crate::error::{Error, Result};
use crate::num::Num;
use crate::types::Bar;

/// Ordered, append-only collection of bars.
#[derive(Debug, Clone)]
pub struct BarSeries<N> {
    /// Display name, carried over to derived series.
    name: String,
    bars: VecDeque<Bar<N>>,
    /// Cap on stored bars; older bars are evicted past this.
    max_bar_count: Option<usize>,
    /// Bars evicted from the front so far.
    removed_bars_count: usize,
}

impl<N: Num> BarSeries<N> {
    /// Create an empty, unbounded series.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bars: VecDeque::new(),
            max_bar_count: None,
            removed_bars_count: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a bar. Its end time must be after the current last bar's.
    pub fn add_bar(&mut self, bar: Bar<N>) -> Result<()> {
        if let Some(last) = self.bars.back() {
            if bar.end_time() <= last.end_time() {
                return Err(Error::NonMonotonic {
                    end: bar.end_time(),
                    last_end: last.end_time(),
                });
            }
        }
        self.bars.push_back(bar);
        self.evict_excess();
        Ok(())
    }

    /// Overwrite the last bar in place.
    pub fn replace_last(&mut self, bar: Bar<N>) -> Result<()> {
        let len = self.bars.len();
        if len >= 2 && bar.end_time() <= self.bars[len - 2].end_time() {
            return Err(Error::NonMonotonic {
                end: bar.end_time(),
                last_end: self.bars[len - 2].end_time(),
            });
        }
        match self.bars.back_mut() {
            Some(last) => {
                *last = bar;
                Ok(())
            }
            None => Err(Error::empty_source(self.name.clone())),
        }
    }

    /// Limit stored bars, evicting from the front immediately if needed.
    pub fn set_max_bar_count(&mut self, max_bar_count: usize) {
        self.max_bar_count = Some(max_bar_count);
        self.evict_excess();
    }

    fn evict_excess(&mut self) {
        let Some(max) = self.max_bar_count else {
            return;
        };
        let excess = self.bars.len().saturating_sub(max);
        if excess == 0 {
            return;
        }
        self.bars.drain(..excess);
        self.removed_bars_count += excess;
        trace!(series = %self.name, excess, removed = self.removed_bars_count, "Evicted bars");
    }

    pub fn max_bar_count(&self) -> Option<usize> {
        self.max_bar_count
    }

    /// Bar at a physical index.
    pub fn bar(&self, index: usize) -> Result<&Bar<N>> {
        self.bars
            .get(index)
            .ok_or_else(|| Error::out_of_range(index as i64, self.bars.len()))
    }

    /// Bar at a physical index, if present.
    pub fn get(&self, index: usize) -> Option<&Bar<N>> {
        self.bars.get(index)
    }

    pub fn first_bar(&self) -> Option<&Bar<N>> {
        self.bars.front()
    }

    pub fn last_bar(&self) -> Option<&Bar<N>> {
        self.bars.back()
    }

    /// Number of bars currently stored.
    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn removed_bars_count(&self) -> usize {
        self.removed_bars_count
    }

    /// Logical index of the first stored bar.
    pub fn begin_index(&self) -> Option<usize> {
        (!self.bars.is_empty()).then_some(self.removed_bars_count)
    }

    /// Logical index of the last stored bar.
    pub fn end_index(&self) -> Option<usize> {
        (!self.bars.is_empty()).then(|| self.removed_bars_count + self.bars.len() - 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bar<N>> {
        self.bars.iter()
    }
}

impl<'a, N> IntoIterator for &'a BarSeries<N> {
    type Item = &'a Bar<N>;
    type IntoIter = std::collections::vec_deque::Iter<'a, Bar<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}

/// Builder for new series.
#[derive(Debug, Clone)]
pub struct SeriesBuilder<N> {
    name: String,
    max_bar_count: Option<usize>,
    bars: Vec<Bar<N>>,
}

impl<N: Num> SeriesBuilder<N> {
    pub fn new() -> Self {
        Self {
            name: "unnamed_series".to_string(),
            max_bar_count: None,
            bars: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_max_bar_count(mut self, max_bar_count: usize) -> Self {
        self.max_bar_count = Some(max_bar_count);
        self
    }

    /// Apply storage limits from configuration.
    pub fn with_config(mut self, config: &SeriesConfig) -> Self {
        self.max_bar_count = config.max_bar_count;
        self
    }

    /// Initial bars, appended in order.
    pub fn with_bars(mut self, bars: impl IntoIterator<Item = Bar<N>>) -> Self {
        self.bars.extend(bars);
        self
    }

    /// Build the series, validating bar ordering.
    pub fn build(self) -> Result<BarSeries<N>> {
        let mut series = BarSeries::new(self.name);
        for bar in self.bars {
            series.add_bar(bar)?;
        }
        if let Some(max) = self.max_bar_count {
            series.set_max_bar_count(max);
        }
        Ok(series)
    }
}

impl<N: Num> Default for SeriesBuilder<N> {
    fn default() -> Self {
        Self::new()
    }
}
