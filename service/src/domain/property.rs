//! [`Property`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, define_text, unit, Date, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::nullable;

/// Property handled by the brokerage.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Property {
    /// ID of this [`Property`].
    pub id: Id,

    /// [`Name`] of this [`Property`].
    pub name: Name,

    /// Transaction [`Mode`] of this [`Property`].
    pub mode: Mode,

    /// Current [`Status`] of this [`Property`].
    pub status: Status,

    /// [`Date`] when the brokerage contract of this [`Property`] started.
    pub contract_started_on: Option<Date>,

    /// [`Date`] when the brokerage contract of this [`Property`] expires.
    pub contract_expires_on: Option<Date>,

    /// [`Date`] when the REINS listing of this [`Property`] must be renewed.
    pub reins_renewal_on: Option<Date>,

    /// Valuation amount of this [`Property`].
    pub valuation: Money,

    /// [`DateTime`] when this [`Property`] was created.
    pub created_at: CreationDateTime,
}

impl Property {
    /// Creates a new [`Property`] out of the provided [`Draft`].
    #[must_use]
    pub fn new(id: Id, draft: Draft, created_at: CreationDateTime) -> Self {
        let Draft {
            name,
            mode,
            status,
            contract_started_on,
            contract_expires_on,
            reins_renewal_on,
            valuation,
        } = draft;

        Self {
            id,
            name,
            mode,
            status,
            contract_started_on,
            contract_expires_on,
            reins_renewal_on,
            valuation,
            created_at,
        }
    }

    /// Indicates whether this [`Property`] is still on the market.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns the contract-related deadlines of this [`Property`].
    pub fn deadlines(&self) -> impl Iterator<Item = (Deadline, Date)> {
        [
            (Deadline::ContractExpiration, self.contract_expires_on),
            (Deadline::ReinsRenewal, self.reins_renewal_on),
        ]
        .into_iter()
        .filter_map(|(kind, date)| Some((kind, date?)))
    }

    /// Applies the provided [`Patch`] to this [`Property`].
    ///
    /// # Errors
    ///
    /// If the [`Patch`] changes the [`Status`] in a way not allowed to be
    /// done manually.
    pub fn apply(&mut self, patch: Patch) -> Result<(), Transition> {
        let Patch {
            name,
            mode,
            status,
            contract_started_on,
            contract_expires_on,
            reins_renewal_on,
            valuation,
        } = patch;

        if let Some(status) = status {
            if !self.status.can_be_set_manually(status) {
                return Err(Transition {
                    from: self.status,
                    to: status,
                });
            }
            self.status = status;
        }
        if let Some(name) = name {
            self.name = name;
        }
        if let Some(mode) = mode {
            self.mode = mode;
        }
        if let Some(date) = contract_started_on {
            self.contract_started_on = date;
        }
        if let Some(date) = contract_expires_on {
            self.contract_expires_on = date;
        }
        if let Some(date) = reins_renewal_on {
            self.reins_renewal_on = date;
        }
        if let Some(valuation) = valuation {
            self.valuation = valuation;
        }

        Ok(())
    }
}

/// ID of a [`Property`].
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
    Ord,
    PartialEq,
    PartialOrd,
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

define_text! {
    #[doc = "Name of a [`Property`]."]
    struct Name(max = 512);
}

define_kind! {
    #[doc = "Transaction mode a [`Property`] is handled in."]
    enum Mode {
        #[doc = "The brokerage owns the [`Property`] and sells it itself."]
        Seller = 1 => "seller",

        #[doc = "Exclusive brokerage contract."]
        Exclusive = 2 => "exclusive",

        #[doc = "General (non-exclusive) brokerage contract."]
        General = 3 => "general",

        #[doc = "Any other mode."]
        Other = 4 => "other",
    }
}

define_kind! {
    #[doc = "Lifecycle status of a [`Property`]."]
    enum Status {
        #[doc = "Listed on the market."]
        Active = 1 => "active",

        #[doc = "Under negotiation with a buyer."]
        Negotiating = 2 => "negotiating",

        #[doc = "Sale contract is signed."]
        Contracted = 3 => "contracted",

        #[doc = "Deal is closed and its proceeds are collected."]
        Completed = 4 => "completed",
    }
}

impl Status {
    /// Indicates whether this [`Status`] means the [`Property`] is still on
    /// the market.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active | Self::Negotiating)
    }

    /// Indicates whether the [`Property`] may be moved from this [`Status`]
    /// into the `next` one.
    ///
    /// Moving forward is always allowed, while [`Status::Completed`] may only
    /// go back to [`Status::Contracted`].
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self <= next || (self == Self::Completed && next == Self::Contracted)
    }

    /// Indicates whether the [`Property`] may be moved from this [`Status`]
    /// into the `next` one by a direct edit.
    ///
    /// [`Status::Completed`] is entered and left only as a consequence of a
    /// sale collection.
    #[must_use]
    pub fn can_be_set_manually(self, next: Self) -> bool {
        self == next
            || (self < next
                && self != Self::Completed
                && next != Self::Completed)
    }
}

/// Contract-related deadline of a [`Property`].
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
#[serde(rename_all = "snake_case")]
pub enum Deadline {
    /// Brokerage contract expiration.
    #[display("contract expiration")]
    ContractExpiration,

    /// REINS listing renewal.
    #[display("REINS renewal")]
    ReinsRenewal,
}

/// Forbidden [`Status`] transition.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[display("`{from}` -> `{to}`")]
pub struct Transition {
    /// [`Status`] the transition was attempted from.
    pub from: Status,

    /// [`Status`] the transition was attempted to.
    pub to: Status,
}

/// Input for creating a new [`Property`].
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    /// [`Name`] of a new [`Property`].
    pub name: Name,

    /// [`Mode`] of a new [`Property`].
    pub mode: Mode,

    /// Initial [`Status`] of a new [`Property`].
    pub status: Status,

    /// Contract start [`Date`], if known.
    pub contract_started_on: Option<Date>,

    /// Contract expiration [`Date`], if known.
    pub contract_expires_on: Option<Date>,

    /// REINS renewal [`Date`], if known.
    pub reins_renewal_on: Option<Date>,

    /// Valuation amount of a new [`Property`].
    pub valuation: Money,
}

/// Partial update of a [`Property`].
///
/// [`None`] fields are left untouched.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    /// New [`Name`].
    pub name: Option<Name>,

    /// New [`Mode`].
    pub mode: Option<Mode>,

    /// New [`Status`].
    pub status: Option<Status>,

    /// New contract start [`Date`] (or its removal).
    #[serde(default, deserialize_with = "nullable")]
    pub contract_started_on: Option<Option<Date>>,

    /// New contract expiration [`Date`] (or its removal).
    #[serde(default, deserialize_with = "nullable")]
    pub contract_expires_on: Option<Option<Date>>,

    /// New REINS renewal [`Date`] (or its removal).
    #[serde(default, deserialize_with = "nullable")]
    pub reins_renewal_on: Option<Option<Date>>,

    /// New valuation amount.
    pub valuation: Option<Money>,
}

/// [`DateTime`] when a [`Property`] was created.
pub type CreationDateTime = DateTimeOf<(Property, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::Status;

    #[test]
    fn cascade_transitions() {
        use Status as S;

        assert!(S::Contracted.can_transition_to(S::Completed));
        assert!(S::Active.can_transition_to(S::Completed));
        assert!(S::Completed.can_transition_to(S::Contracted));
        assert!(S::Completed.can_transition_to(S::Completed));

        assert!(!S::Completed.can_transition_to(S::Active));
        assert!(!S::Completed.can_transition_to(S::Negotiating));
        assert!(!S::Contracted.can_transition_to(S::Negotiating));
    }

    #[test]
    fn manual_transitions() {
        use Status as S;

        assert!(S::Active.can_be_set_manually(S::Negotiating));
        assert!(S::Active.can_be_set_manually(S::Contracted));
        assert!(S::Negotiating.can_be_set_manually(S::Contracted));
        assert!(S::Completed.can_be_set_manually(S::Completed));

        assert!(!S::Contracted.can_be_set_manually(S::Completed));
        assert!(!S::Completed.can_be_set_manually(S::Contracted));
        assert!(!S::Contracted.can_be_set_manually(S::Active));
    }

    #[test]
    fn active_statuses() {
        assert!(Status::Active.is_active());
        assert!(Status::Negotiating.is_active());
        assert!(!Status::Contracted.is_active());
        assert!(!Status::Completed.is_active());
    }
}
