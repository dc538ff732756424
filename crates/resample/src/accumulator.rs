//! Aggregation state for one output bucket.

use barkit_core::{Bar, Error, Num, Result, Timestamp};
use chrono::TimeDelta;

/// A target bar that's currently being built.
///
/// Trade counts are summed per merged bar. Individual trade times are not
/// tracked, so they can't be attributed to parts of the bucket afterwards.
#[derive(Debug, Clone)]
pub struct BarAccumulator<N> {
    /// Fixed bucket boundary.
    end_time: Timestamp,
    time_period: TimeDelta,
    open: Option<N>,
    high: Option<N>,
    low: Option<N>,
    close: Option<N>,
    volume: N,
    amount: N,
    trade_count: u64,
    merged: usize,
}

impl<N: Num> BarAccumulator<N> {
    pub fn new(end_time: Timestamp, time_period: TimeDelta) -> Self {
        Self {
            end_time,
            time_period,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: N::zero(),
            amount: N::zero(),
            trade_count: 0,
            merged: 0,
        }
    }

    pub fn end_time(&self) -> Timestamp {
        self.end_time
    }

    /// Whether `bar` ends at or before this bucket's boundary.
    pub fn belongs_to(&self, bar: &Bar<N>) -> bool {
        bar.end_time() <= self.end_time
    }

    /// Fold a source bar into the bucket.
    ///
    /// Bars must be merged in increasing end-time order.
    pub fn merge(&mut self, bar: &Bar<N>) {
        if self.open.is_none() {
            self.open = Some(bar.open());
        }
        match self.high {
            Some(high) if !bar.high().is_greater_than(&high) => {}
            _ => self.high = Some(bar.high()),
        }
        match self.low {
            Some(low) if !bar.low().is_less_than(&low) => {}
            _ => self.low = Some(bar.low()),
        }
        self.close = Some(bar.close());
        self.volume = self.volume.plus(bar.volume());
        self.amount = self.amount.plus(bar.amount());
        self.trade_count += bar.trade_count();
        self.merged += 1;
    }

    /// Number of source bars merged so far.
    pub fn merged(&self) -> usize {
        self.merged
    }

    /// Finalize into an immutable bar spanning `end_time - time_period..=end_time`.
    pub fn build(self) -> Result<Bar<N>> {
        let (Some(open), Some(high), Some(low), Some(close)) =
            (self.open, self.high, self.low, self.close)
        else {
            return Err(Error::invalid_bar(format!(
                "bucket ending {} has no merged bars",
                self.end_time
            )));
        };

        Ok(Bar::new(
            self.time_period,
            self.end_time,
            open,
            high,
            low,
            close,
            self.volume,
            self.amount,
        )?
        .with_trade_count(self.trade_count))
    }
}
