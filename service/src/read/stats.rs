//! [`Summary`] read model definition.

use common::{Money, Period};
use serde::Serialize;

use crate::domain::{sale, Sale};

/// Aggregated revenue of [`Sale`]s made within a [`Period`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// [`Period`] this [`Summary`] is aggregated over.
    pub period: Period,

    /// Sum of profits of all the [`Sale`]s in the [`Period`].
    pub total_revenue: Money,

    /// Number of [`Sale`]s in the [`Period`].
    pub deal_count: usize,

    /// Share of [`sale::Kind::RealEstate`] [`Sale`]s.
    pub real_estate: Share,

    /// Share of [`sale::Kind::Renovation`] [`Sale`]s.
    pub renovation: Share,

    /// Share of [`sale::Kind::Other`] [`Sale`]s.
    pub other: Share,
}

impl Summary {
    /// Aggregates the provided [`Sale`]s falling into the given [`Period`].
    ///
    /// [`Sale`]s outside the [`Period`] are ignored.
    #[must_use]
    pub fn of<'s>(
        period: Period,
        sales: impl IntoIterator<Item = &'s Sale>,
    ) -> Self {
        let mut summary = Self {
            period,
            total_revenue: Money::ZERO,
            deal_count: 0,
            real_estate: Share::default(),
            renovation: Share::default(),
            other: Share::default(),
        };
        for sale in sales.into_iter().filter(|s| period.contains(s.date)) {
            let profit = sale.profit();
            summary.total_revenue += profit;
            summary.deal_count += 1;

            let share = match sale.kind() {
                sale::Kind::RealEstate => &mut summary.real_estate,
                sale::Kind::Renovation => &mut summary.renovation,
                sale::Kind::Other => &mut summary.other,
            };
            share.count += 1;
            share.revenue += profit;
        }
        summary
    }
}

/// Part of a [`Summary`] contributed by a single [`sale::Kind`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Share {
    /// Number of [`Sale`]s.
    pub count: usize,

    /// Sum of profits of the [`Sale`]s.
    pub revenue: Money,
}

#[cfg(test)]
mod spec {
    use common::{Money, Period};

    use crate::read::fixture::other_sale;

    use super::Summary;

    #[test]
    fn sums_sales_of_period_only() {
        let sales = [
            other_sale("2024-06-01", 100),
            other_sale("2024-06-30", 250),
            other_sale("2024-07-01", 1000),
            other_sale("2024-05-31", 1000),
        ];
        let june: Period = "2024-06".parse().unwrap();

        let summary = Summary::of(june, &sales);

        assert_eq!(summary.total_revenue, Money::from(350));
        assert_eq!(summary.deal_count, 2);
        assert_eq!(summary.other.count, 2);
        assert_eq!(
            summary.deal_count,
            summary.real_estate.count
                + summary.renovation.count
                + summary.other.count,
        );
    }

    #[test]
    fn empty_period() {
        let summary = Summary::of("2024".parse().unwrap(), std::iter::empty());

        assert_eq!(summary.total_revenue, Money::ZERO);
        assert_eq!(summary.deal_count, 0);
    }
}
