//! [`Notification`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, Date, DateTimeOf};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::property::{self, Deadline};
#[cfg(doc)]
use crate::domain::Property;

/// Recorded notice about an upcoming [`Property`] [`Deadline`].
///
/// At most one [`Notification`] exists per [`Subject`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Notification {
    /// ID of this [`Notification`].
    pub id: Id,

    /// ID of the [`Property`] the [`Deadline`] belongs to.
    pub property_id: property::Id,

    /// Name of the [`Property`] at the moment of recording.
    pub property_name: property::Name,

    /// Kind of the [`Deadline`].
    pub kind: Deadline,

    /// [`Date`] the [`Deadline`] is due on.
    pub due_on: Date,

    /// Human-readable message.
    pub message: String,

    /// Whether the [`Deadline`] was urgent at the moment of recording.
    pub urgent: bool,

    /// Whether this [`Notification`] has been read.
    pub read: bool,

    /// [`DateTime`] when this [`Notification`] was recorded.
    pub created_at: CreationDateTime,
}

impl Notification {
    /// Returns the [`Subject`] of this [`Notification`].
    #[must_use]
    pub const fn subject(&self) -> Subject {
        Subject {
            property_id: self.property_id,
            kind: self.kind,
            due_on: self.due_on,
        }
    }
}

/// Single [`Deadline`] occurrence a [`Notification`] is recorded about.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Subject {
    /// ID of the [`Property`] the [`Deadline`] belongs to.
    pub property_id: property::Id,

    /// Kind of the [`Deadline`].
    pub kind: Deadline,

    /// [`Date`] the [`Deadline`] is due on.
    pub due_on: Date,
}

/// ID of a [`Notification`].
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

/// [`DateTime`] when a [`Notification`] was recorded.
pub type CreationDateTime = DateTimeOf<(Notification, unit::Creation)>;
