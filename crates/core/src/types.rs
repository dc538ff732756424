//! Core bar type.

use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::num::Num;

/// Offset-aware instant used for bar boundaries.
pub type Timestamp = DateTime<FixedOffset>;

/// Immutable OHLCV bar covering `begin_time..=end_time`.
///
/// Deserialized bars go through the same checks as [`Bar::from_interval`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BarFields<N>", bound(deserialize = "N: Num + Deserialize<'de>"))]
pub struct Bar<N> {
    begin_time: Timestamp,
    end_time: Timestamp,
    open: N,
    high: N,
    low: N,
    close: N,
    volume: N,
    /// Traded notional.
    amount: N,
    trade_count: u64,
}

impl<N: Num> Bar<N> {
    /// Create a bar ending at `end_time` that lasted `time_period`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time_period: TimeDelta,
        end_time: Timestamp,
        open: N,
        high: N,
        low: N,
        close: N,
        volume: N,
        amount: N,
    ) -> Result<Self> {
        let begin_time = end_time.checked_sub_signed(time_period).ok_or_else(|| {
            Error::invalid_bar(format!("period {time_period} before {end_time} is out of range"))
        })?;
        Self::from_interval(begin_time, end_time, open, high, low, close, volume, amount)
    }

    /// Create a bar from explicit begin and end times.
    #[allow(clippy::too_many_arguments)]
    pub fn from_interval(
        begin_time: Timestamp,
        end_time: Timestamp,
        open: N,
        high: N,
        low: N,
        close: N,
        volume: N,
        amount: N,
    ) -> Result<Self> {
        if begin_time >= end_time {
            return Err(Error::invalid_bar(format!(
                "begin {begin_time} must be before end {end_time}"
            )));
        }
        // NaN compares false everywhere and fails here.
        let ordered = low <= open && open <= high && low <= close && close <= high;
        if !ordered {
            return Err(Error::invalid_bar(format!(
                "OHLC out of order at {end_time}: \
                 open={open:?} high={high:?} low={low:?} close={close:?}"
            )));
        }

        Ok(Self {
            begin_time,
            end_time,
            open,
            high,
            low,
            close,
            volume,
            amount,
            trade_count: 0,
        })
    }

    /// Set the number of trades in the bar.
    pub fn with_trade_count(mut self, trade_count: u64) -> Self {
        self.trade_count = trade_count;
        self
    }

    #[inline]
    pub fn begin_time(&self) -> Timestamp {
        self.begin_time
    }

    #[inline]
    pub fn end_time(&self) -> Timestamp {
        self.end_time
    }

    /// Length of the bar, `end_time - begin_time`.
    #[inline]
    pub fn time_period(&self) -> TimeDelta {
        self.end_time - self.begin_time
    }

    #[inline]
    pub fn open(&self) -> N {
        self.open
    }

    #[inline]
    pub fn high(&self) -> N {
        self.high
    }

    #[inline]
    pub fn low(&self) -> N {
        self.low
    }

    #[inline]
    pub fn close(&self) -> N {
        self.close
    }

    #[inline]
    pub fn volume(&self) -> N {
        self.volume
    }

    #[inline]
    pub fn amount(&self) -> N {
        self.amount
    }

    #[inline]
    pub fn trade_count(&self) -> u64 {
        self.trade_count
    }

    /// Whether `ts` lies within `begin_time..=end_time`.
    #[inline]
    pub fn covers(&self, ts: Timestamp) -> bool {
        self.begin_time <= ts && ts <= self.end_time
    }
}

/// Unvalidated field set a [`Bar`] is deserialized from.
#[derive(Deserialize)]
struct BarFields<N> {
    begin_time: Timestamp,
    end_time: Timestamp,
    open: N,
    high: N,
    low: N,
    close: N,
    volume: N,
    amount: N,
    trade_count: u64,
}

impl<N: Num> TryFrom<BarFields<N>> for Bar<N> {
    type Error = Error;

    fn try_from(fields: BarFields<N>) -> Result<Self> {
        let bar = Self::from_interval(
            fields.begin_time,
            fields.end_time,
            fields.open,
            fields.high,
            fields.low,
            fields.close,
            fields.volume,
            fields.amount,
        )?;
        Ok(bar.with_trade_count(fields.trade_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(h: u32, m: u32) -> Timestamp {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2019, 5, 13, h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_new_derives_begin_time() {
        let bar = Bar::new(TimeDelta::minutes(1), utc(1, 32), 1.0, 2.0, 0.5, 1.0, 10.0, 10.0)
            .unwrap()
            .with_trade_count(3);

        assert_eq!(bar.begin_time(), utc(1, 31));
        assert_eq!(bar.time_period(), TimeDelta::minutes(1));
        assert_eq!(bar.trade_count(), 3);
    }

    #[test]
    fn test_covers_is_inclusive() {
        let bar =
            Bar::new(TimeDelta::minutes(5), utc(1, 35), 1.0, 2.0, 0.5, 1.0, 0.0, 0.0).unwrap();

        assert!(bar.covers(utc(1, 30)));
        assert!(bar.covers(utc(1, 33)));
        assert!(bar.covers(utc(1, 35)));
        assert!(!bar.covers(utc(1, 36)));
        assert!(!bar.covers(utc(1, 29)));
    }

    #[test]
    fn test_rejects_empty_interval() {
        let result = Bar::from_interval(utc(1, 0), utc(1, 0), 1.0, 1.0, 1.0, 1.0, 0.0, 0.0);
        assert!(matches!(result, Err(Error::InvalidBar(_))));
    }

    #[test]
    fn test_rejects_close_above_high() {
        let result = Bar::new(TimeDelta::minutes(1), utc(1, 1), 1.0, 2.0, 0.5, 3.0, 0.0, 0.0);
        assert!(matches!(result, Err(Error::InvalidBar(_))));
    }

    #[test]
    fn test_rejects_nan_price() {
        let result = Bar::new(TimeDelta::minutes(1), utc(1, 1), f64::NAN, 2.0, 0.5, 1.0, 0.0, 0.0);
        assert!(matches!(result, Err(Error::InvalidBar(_))));
    }

    #[test]
    fn test_period_past_time_range_rejected() {
        let period = TimeDelta::try_days(100_000_000).unwrap();
        let result = Bar::new(period, utc(1, 0), 1.0, 1.0, 1.0, 1.0, 0.0, 0.0);
        assert!(matches!(result, Err(Error::InvalidBar(_))));
    }

    #[test]
    fn test_deserialize_rejects_inverted_interval() {
        let json = r#"{
            "begin_time": "2019-05-13T01:05:00+00:00",
            "end_time": "2019-05-13T01:00:00+00:00",
            "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5,
            "volume": 1.0, "amount": 1.0, "trade_count": 0
        }"#;
        assert!(serde_json::from_str::<Bar<f64>>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_unordered_ohlc() {
        let json = r#"{
            "begin_time": "2019-05-13T01:00:00+00:00",
            "end_time": "2019-05-13T01:05:00+00:00",
            "open": 1.0, "high": 0.5, "low": 2.0, "close": 1.5,
            "volume": 1.0, "amount": 1.0, "trade_count": 4
        }"#;
        assert!(serde_json::from_str::<Bar<f64>>(json).is_err());
    }

    #[test]
    fn test_serde_roundtrip_keeps_offset() {
        let end = FixedOffset::east_opt(2 * 3600)
            .unwrap()
            .with_ymd_and_hms(2019, 5, 13, 9, 0, 0)
            .unwrap();
        let bar = Bar::new(TimeDelta::hours(1), end, 1.0, 2.0, 0.5, 1.5, 7.0, 9.0).unwrap();

        let json = serde_json::to_string(&bar).unwrap();
        let back: Bar<f64> = serde_json::from_str(&json).unwrap();

        assert_eq!(back, bar);
        assert_eq!(back.end_time().offset().local_minus_utc(), 7200);
    }
}
