//! Downsampling of a bar series into a coarser interval.
//!
//! A single pass over the source merges bars into fixed-boundary buckets.
//! A source bar belongs to the current bucket while its end time is at or
//! before the bucket's end. Gaps in the source produce no output bars; the
//! boundary jumps by whole intervals to the bucket holding the next bar.

use barkit_core::{BarSeries, Error, Num, ResampleConfig, Result, SeriesBuilder};
use chrono::{NaiveTime, TimeDelta};
use tracing::{debug, trace};

use crate::accumulator::BarAccumulator;
use crate::alignment::{first_boundary, next_boundary};

/// Converts a series to a coarser, whole-multiple interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarResampler {
    target: TimeDelta,
    align_to: Option<NaiveTime>,
}

impl BarResampler {
    /// Buckets anchored to the source's first begin time.
    pub fn new(target: TimeDelta) -> Self {
        Self {
            target,
            align_to: None,
        }
    }

    /// Anchor buckets to a time of day instead of the data start.
    ///
    /// The first output bar may then cover fewer source bars than a full
    /// bucket, and its begin time may precede the first source bar.
    pub fn aligned_to(mut self, time_of_day: NaiveTime) -> Self {
        self.align_to = Some(time_of_day);
        self
    }

    /// Create a resampler from configuration.
    pub fn from_config(config: &ResampleConfig) -> Result<Self> {
        Ok(Self {
            target: config.target_interval()?,
            align_to: config.align_to,
        })
    }

    pub fn target_interval(&self) -> TimeDelta {
        self.target
    }

    pub fn align_to(&self) -> Option<NaiveTime> {
        self.align_to
    }

    /// Build a new series at the target interval from `source`.
    ///
    /// All source bars are assumed to share the first bar's period. The
    /// result is named after `source` and shares no storage with it.
    pub fn resample<N: Num>(&self, source: &BarSeries<N>) -> Result<BarSeries<N>> {
        let first = source
            .first_bar()
            .ok_or_else(|| Error::empty_source(source.name()))?;
        let source_period = first.time_period();
        self.check_interval(source_period)?;

        debug!(
            series = source.name(),
            bars = source.bar_count(),
            source_period = %source_period,
            target = %self.target,
            align_to = ?self.align_to,
            "Resampling series"
        );

        let mut target = SeriesBuilder::new().with_name(source.name()).build()?;
        let first_end = first_boundary(first, self.target, self.align_to)
            .ok_or_else(|| self.unrepresentable(source_period))?;
        let mut bucket = BarAccumulator::new(first_end, self.target);

        for bar in source {
            if !bucket.belongs_to(bar) {
                let next_end = next_boundary(bucket.end_time(), bar.end_time(), self.target)
                    .ok_or_else(|| self.unrepresentable(source_period))?;
                trace!(end = %bucket.end_time(), merged = bucket.merged(), "Finalized bucket");
                target.add_bar(bucket.build()?)?;
                bucket = BarAccumulator::new(next_end, self.target);
            }
            bucket.merge(bar);
        }
        trace!(end = %bucket.end_time(), merged = bucket.merged(), "Finalized bucket");
        target.add_bar(bucket.build()?)?;

        debug!(
            series = source.name(),
            bars = target.bar_count(),
            "Resampled series"
        );
        Ok(target)
    }

    fn check_interval(&self, source_period: TimeDelta) -> Result<()> {
        // Grid math runs in nanoseconds; a target without a nanosecond count
        // can not be laid out.
        let Some(target_ns) = self.target.num_nanoseconds() else {
            return Err(self.unrepresentable(source_period));
        };
        if self.target < source_period {
            return Err(Error::InvalidInterval {
                source_period,
                target: self.target,
            });
        }
        match source_period.num_nanoseconds() {
            Some(source_ns) if source_ns > 0 && target_ns % source_ns == 0 => Ok(()),
            _ => Err(Error::NonDivisibleInterval {
                source_period,
                target: self.target,
            }),
        }
    }

    fn unrepresentable(&self, source_period: TimeDelta) -> Error {
        Error::InvalidInterval {
            source_period,
            target: self.target,
        }
    }
}

/// Resample `source` to `target`, optionally aligned to a time of day.
pub fn resample<N: Num>(
    source: &BarSeries<N>,
    target: TimeDelta,
    align_to: Option<NaiveTime>,
) -> Result<BarSeries<N>> {
    BarResampler { target, align_to }.resample(source)
}
