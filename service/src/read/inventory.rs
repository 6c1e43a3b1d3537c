//! [`Inventory`] read model definition.

use std::collections::BTreeMap;

use common::Money;
use serde::Serialize;
use strum::IntoEnumIterator as _;

use crate::domain::{
    property::{Mode, Status},
    Property,
};

/// Breakdown of the [`Property`] portfolio.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    /// Total number of [`Property`]s.
    pub total: usize,

    /// Number of [`Property`]s per [`Mode`].
    ///
    /// Every [`Mode`] is present, even with zero [`Property`]s.
    pub by_mode: BTreeMap<Mode, usize>,

    /// Number of [`Property`]s per [`Status`].
    ///
    /// Every [`Status`] is present, even with zero [`Property`]s.
    pub by_status: BTreeMap<Status, usize>,

    /// Number of [`Property`]s being [active].
    ///
    /// [active]: Property::is_active
    pub active_count: usize,

    /// Sum of valuations of active [`Mode::Seller`] [`Property`]s.
    pub seller_value: Money,

    /// Sum of valuations of all active [`Property`]s.
    pub active_value: Money,
}

impl Inventory {
    /// Builds an [`Inventory`] of the provided [`Property`]s.
    #[must_use]
    pub fn of<'p>(properties: impl IntoIterator<Item = &'p Property>) -> Self {
        let mut inventory = Self {
            total: 0,
            by_mode: Mode::iter().map(|m| (m, 0)).collect(),
            by_status: Status::iter().map(|s| (s, 0)).collect(),
            active_count: 0,
            seller_value: Money::ZERO,
            active_value: Money::ZERO,
        };
        for p in properties {
            inventory.total += 1;
            *inventory.by_mode.entry(p.mode).or_default() += 1;
            *inventory.by_status.entry(p.status).or_default() += 1;

            if p.is_active() {
                inventory.active_count += 1;
                inventory.active_value += p.valuation;
                if p.mode == Mode::Seller {
                    inventory.seller_value += p.valuation;
                }
            }
        }
        inventory
    }
}

#[cfg(test)]
mod spec {
    use common::Money;

    use crate::{
        domain::property::{Mode, Status},
        read::fixture::property,
    };

    use super::Inventory;

    #[test]
    fn counts_and_values() {
        let properties = [
            property("A", Mode::Seller, Status::Active, 30_000_000),
            property("B", Mode::Seller, Status::Negotiating, 20_000_000),
            property("C", Mode::Seller, Status::Completed, 99_000_000),
            property("D", Mode::Exclusive, Status::Active, 10_000_000),
            property("E", Mode::General, Status::Contracted, 5_000_000),
        ];

        let inventory = Inventory::of(&properties);

        assert_eq!(inventory.total, 5);
        assert_eq!(inventory.by_mode[&Mode::Seller], 3);
        assert_eq!(inventory.by_mode[&Mode::Other], 0);
        assert_eq!(inventory.by_status[&Status::Active], 2);
        assert_eq!(inventory.active_count, 3);
        assert_eq!(inventory.seller_value, Money::from(50_000_000));
        assert_eq!(inventory.active_value, Money::from(60_000_000));
    }
}
