//! Sales calendar read model definition.

use std::collections::BTreeMap;

use common::{Date, Money, YearMonth};
use serde::Serialize;

use crate::domain::{sale, Sale};

/// Single day of a sales calendar.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// [`Date`] of this [`Day`].
    pub date: Date,

    /// Sum of profits of the [`Sale`]s made on this [`Day`].
    pub revenue: Money,

    /// Number of the [`Sale`]s made on this [`Day`].
    pub deal_count: usize,

    /// IDs of the [`Sale`]s made on this [`Day`].
    pub sale_ids: Vec<sale::Id>,
}

/// Lays out the provided [`Sale`]s of the given month by days.
///
/// Only days having at least one [`Sale`] are returned, in chronological
/// order.
#[must_use]
pub fn layout<'s>(
    month: YearMonth,
    sales: impl IntoIterator<Item = &'s Sale>,
) -> Vec<Day> {
    let mut days = BTreeMap::<Date, Day>::new();
    for sale in sales.into_iter().filter(|s| month.contains(s.date)) {
        let day = days.entry(sale.date).or_insert_with(|| Day {
            date: sale.date,
            revenue: Money::ZERO,
            deal_count: 0,
            sale_ids: vec![],
        });
        day.revenue += sale.profit();
        day.deal_count += 1;
        day.sale_ids.push(sale.id);
    }
    days.into_values().collect()
}

#[cfg(test)]
mod spec {
    use common::Money;

    use crate::read::fixture::other_sale;

    use super::layout;

    #[test]
    fn groups_sales_by_day() {
        let sales = [
            other_sale("2024-06-20", 10),
            other_sale("2024-06-02", 20),
            other_sale("2024-06-20", 30),
            other_sale("2024-07-20", 40),
        ];

        let days = layout("2024-06".parse().unwrap(), &sales);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date.to_string(), "2024-06-02");
        assert_eq!(days[1].revenue, Money::from(40));
        assert_eq!(days[1].deal_count, 2);
        assert_eq!(days[1].sale_ids, [sales[0].id, sales[2].id]);
    }
}
