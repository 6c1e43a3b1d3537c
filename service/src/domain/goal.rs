//! [`Goal`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Granularity, Money, Period};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sales target for a single [`Period`].
///
/// There is at most one [`Goal`] per [`Period`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Goal {
    /// ID of this [`Goal`].
    pub id: Id,

    /// [`Period`] this [`Goal`] is set for.
    pub period: Period,

    /// Revenue to be reached within the [`Period`].
    pub target_amount: TargetAmount,

    /// Number of deals to be made within the [`Period`].
    pub target_count: u32,

    /// [`DateTime`] when this [`Goal`] was created.
    pub created_at: CreationDateTime,
}

impl Goal {
    /// Returns the [`Granularity`] of this [`Goal`].
    #[must_use]
    pub const fn kind(&self) -> Granularity {
        self.period.granularity()
    }
}

/// ID of a [`Goal`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Positive revenue target of a [`Goal`].
#[derive(Clone, Copy, Debug, Display, Eq, Into, PartialEq)]
pub struct TargetAmount(Money);

impl TargetAmount {
    /// Creates a new [`TargetAmount`] if the provided `amount` is positive.
    #[must_use]
    pub fn new(amount: Money) -> Option<Self> {
        amount.is_positive().then_some(Self(amount))
    }

    /// Returns the inner [`Money`] amount.
    #[must_use]
    pub const fn money(self) -> Money {
        self.0
    }
}

/// [`DateTime`] when a [`Goal`] was created.
pub type CreationDateTime = DateTimeOf<(Goal, unit::Creation)>;
