//! [`Percent`]-related definitions.

use std::str::FromStr;

use derive_more::Display;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Non-negative decimal percentage.
///
/// Not capped at `100`, so over-achievement remains observable.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Percent(Decimal);

impl Percent {
    /// Zero [`Percent`].
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Whole `100` [`Percent`].
    pub const HUNDRED: Self = Self(Decimal::ONE_HUNDRED);

    /// Creates a new [`Percent`] by checking the provided value is not
    /// negative.
    #[must_use]
    pub fn new(val: Decimal) -> Option<Self> {
        (val >= Decimal::ZERO).then_some(Self(val))
    }

    /// Calculates how many percent the `part` is of the `whole`, rounded to
    /// two decimal places.
    ///
    /// [`None`] is returned if the `whole` is not positive. Negative `part`s
    /// are counted as zero.
    #[must_use]
    pub fn of(part: Decimal, whole: Decimal) -> Option<Self> {
        if whole <= Decimal::ZERO {
            return None;
        }
        let ratio = part.max(Decimal::ZERO) * Decimal::ONE_HUNDRED / whole;
        Some(Self(ratio.round_dp_with_strategy(
            2,
            RoundingStrategy::MidpointAwayFromZero,
        )))
    }

    /// Returns this [`Percent`] capped at `100`.
    #[must_use]
    pub fn clamped(self) -> Self {
        self.min(Self::HUNDRED)
    }

    /// Returns the inner value of this [`Percent`].
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl FromStr for Percent {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid percent value")
    }
}

impl TryFrom<Decimal> for Percent {
    type Error = &'static str;

    fn try_from(val: Decimal) -> Result<Self, Self::Error> {
        Self::new(val).ok_or("negative percent value")
    }
}

impl From<Percent> for Decimal {
    fn from(p: Percent) -> Self {
        p.0
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::Percent;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn rejects_negative() {
        assert!(Percent::new(dec("-0.01")).is_none());
        assert!(Percent::new(Decimal::ZERO).is_some());
        assert!(Percent::new(dec("250")).is_some());
    }

    #[test]
    fn computes_ratio() {
        assert_eq!(
            Percent::of(dec("1500000"), dec("2000000")),
            Percent::new(dec("75")),
        );
        assert_eq!(
            Percent::of(dec("1"), dec("3")),
            Percent::new(dec("33.33")),
        );
        assert_eq!(Percent::of(dec("-10"), dec("100")), Some(Percent::ZERO));
        assert_eq!(Percent::of(dec("10"), Decimal::ZERO), None);
    }

    #[test]
    fn clamps_at_hundred() {
        let over = Percent::of(dec("3"), dec("2")).unwrap();

        assert_eq!(over.value(), dec("150"));
        assert_eq!(over.clamped(), Percent::HUNDRED);
        assert_eq!(Percent::ZERO.clamped(), Percent::ZERO);
    }
}
