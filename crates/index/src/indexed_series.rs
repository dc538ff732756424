//! Bar series wrapper that keeps a temporal index in step with appends.

use barkit_core::{Bar, BarSeries, IndexConfig, Num, Result, Timestamp};

use crate::temporal::TemporalIndex;

/// A series that supports lookup by timestamp.
pub trait TimeIndexed<N: Num> {
    /// The underlying series the returned indices refer to.
    fn series(&self) -> &BarSeries<N>;

    /// Physical index of the bar covering `ts`.
    fn index_of(&self, ts: Timestamp) -> Result<usize>;

    /// The bar covering `ts`.
    fn bar_at(&self, ts: Timestamp) -> Result<&Bar<N>> {
        let index = self.index_of(ts)?;
        self.series().bar(index)
    }
}

/// A [`BarSeries`] paired with a [`TemporalIndex`].
///
/// All mutation goes through this wrapper so every appended bar gets exactly
/// one index entry. Replacing the last bar leaves the index untouched.
#[derive(Debug, Clone)]
pub struct TimeIndexedSeries<N> {
    series: BarSeries<N>,
    index: TemporalIndex,
}

impl<N: Num> TimeIndexedSeries<N> {
    /// Wrap `series` with the default (strict) index configuration.
    pub fn new(series: BarSeries<N>) -> Self {
        Self::with_config(series, &IndexConfig::default())
    }

    /// Wrap `series`, indexing all bars it currently stores.
    pub fn with_config(series: BarSeries<N>, config: &IndexConfig) -> Self {
        let index = TemporalIndex::build(&series, config);
        Self { series, index }
    }

    /// Append `bar`, or overwrite the last bar when `replace` is set.
    pub fn add_bar(&mut self, bar: Bar<N>, replace: bool) -> Result<()> {
        if replace {
            self.replace_last(bar)
        } else {
            self.append(bar)
        }
    }

    /// Append a bar and index it.
    pub fn append(&mut self, bar: Bar<N>) -> Result<()> {
        let end_time = bar.end_time();
        let begin_time = bar.begin_time();
        self.series.add_bar(bar)?;
        // A small max_bar_count may already have evicted it.
        self.index.record_interval(begin_time, end_time);
        Ok(())
    }

    /// Overwrite the last bar. No index entry is added.
    pub fn replace_last(&mut self, bar: Bar<N>) -> Result<()> {
        self.series.replace_last(bar)
    }

    /// Cap stored bars. Evicted bars stay indexed and resolve per the
    /// configured underflow policy.
    pub fn set_max_bar_count(&mut self, max_bar_count: usize) {
        self.series.set_max_bar_count(max_bar_count);
    }

    pub fn index(&self) -> &TemporalIndex {
        &self.index
    }

    /// Release the series, dropping the index.
    pub fn into_inner(self) -> BarSeries<N> {
        self.series
    }
}

impl<N: Num> TimeIndexed<N> for TimeIndexedSeries<N> {
    fn series(&self) -> &BarSeries<N> {
        &self.series
    }

    fn index_of(&self, ts: Timestamp) -> Result<usize> {
        self.index.lookup(&self.series, ts)
    }
}
