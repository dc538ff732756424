//! Numeric abstraction for prices and volumes.

use ordered_float::OrderedFloat;
use std::fmt::Debug;
use std::ops::Add;

/// Price type with ordering support.
pub type Price = OrderedFloat<f64>;

/// A price or volume magnitude.
///
/// Aggregation only needs addition and ordered comparison, so any `Copy`
/// numeric that supports those can back a bar.
pub trait Num: Copy + Debug + PartialOrd + Add<Output = Self> {
    /// Additive identity.
    fn zero() -> Self;

    /// Sum of `self` and `other`.
    #[inline]
    fn plus(self, other: Self) -> Self {
        self + other
    }

    #[inline]
    fn is_greater_than(&self, other: &Self) -> bool {
        self > other
    }

    #[inline]
    fn is_less_than(&self, other: &Self) -> bool {
        self < other
    }
}

impl Num for f64 {
    #[inline]
    fn zero() -> Self {
        0.0
    }
}

impl Num for OrderedFloat<f64> {
    #[inline]
    fn zero() -> Self {
        OrderedFloat(0.0)
    }
}

#[cfg(feature = "decimal")]
impl Num for rust_decimal::Decimal {
    #[inline]
    fn zero() -> Self {
        rust_decimal::Decimal::ZERO
    }
}
