//! Bucket boundary arithmetic.
//!
//! Boundaries are bucket *end* times. Without alignment the grid starts at
//! the first source bar's begin time. With a time of day, the grid passes
//! through that time on the first bar's local date, in the first bar's
//! offset.

use barkit_core::{Bar, Num, Timestamp};
use chrono::{NaiveTime, TimeDelta};

/// `ceil(a / b)` for `b > 0`.
#[inline]
fn div_ceil(a: i64, b: i64) -> i64 {
    -(-a).div_euclid(b)
}

/// `base + steps * target`, or `None` past the representable range.
fn advance(base: Timestamp, target: TimeDelta, steps: i64) -> Option<Timestamp> {
    let nanos = target.num_nanoseconds()?.checked_mul(steps)?;
    base.checked_add_signed(TimeDelta::nanoseconds(nanos))
}

/// End time of the first output bucket.
///
/// `None` when the boundary falls outside the representable time range.
pub fn first_boundary<N: Num>(
    first: &Bar<N>,
    target: TimeDelta,
    align_to: Option<NaiveTime>,
) -> Option<Timestamp> {
    let Some(time_of_day) = align_to else {
        return first.begin_time().checked_add_signed(target);
    };

    let end = first.end_time();
    let anchor = end
        .date_naive()
        .and_time(time_of_day)
        .and_local_timezone(*end.offset())
        .single()?;

    let offset = (end - anchor).num_nanoseconds()?;
    let steps = div_ceil(offset, target.num_nanoseconds()?);
    advance(anchor, target, steps)
}

/// Smallest boundary `current + k * target` (k >= 1) that is `>= bar_end`.
///
/// Whole empty buckets between `current` and `bar_end` are skipped.
pub fn next_boundary(
    current: Timestamp,
    bar_end: Timestamp,
    target: TimeDelta,
) -> Option<Timestamp> {
    let gap = (bar_end - current).num_nanoseconds()?;
    let steps = div_ceil(gap, target.num_nanoseconds()?).max(1);
    advance(current, target, steps)
}
