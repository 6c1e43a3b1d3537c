//! Goal [`Progress`] read model definition.

use common::{Money, Percent, Period};
use serde::Serialize;

use crate::domain::{goal, Goal, Sale};

/// Progress of reaching a [`Goal`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    /// ID of the [`Goal`].
    pub goal_id: goal::Id,

    /// [`Period`] of the [`Goal`].
    pub period: Period,

    /// Revenue targeted by the [`Goal`].
    pub target_amount: Money,

    /// Number of deals targeted by the [`Goal`].
    pub target_count: u32,

    /// Actual revenue within the [`Period`].
    pub revenue: Money,

    /// Actual number of deals within the [`Period`].
    pub deal_count: usize,

    /// Revenue relatively to the target, not capped.
    pub percent: Percent,

    /// [`Progress::percent`] capped at `100`.
    pub display_percent: Percent,

    /// Indicator whether the target revenue is reached.
    pub achieved: bool,
}

impl Progress {
    /// Computes [`Progress`] of the provided [`Goal`] by the given [`Sale`]s.
    ///
    /// [`Sale`]s outside the [`Goal`]'s [`Period`] are ignored.
    #[must_use]
    pub fn of<'s>(
        goal: &Goal,
        sales: impl IntoIterator<Item = &'s Sale>,
    ) -> Self {
        let (revenue, deal_count) = sales
            .into_iter()
            .filter(|s| goal.period.contains(s.date))
            .fold((Money::ZERO, 0), |(rev, cnt), s| {
                (rev + s.profit(), cnt + 1)
            });

        let target = goal.target_amount.money();
        // Target amount is always positive.
        let percent = Percent::of(revenue.amount(), target.amount())
            .unwrap_or(Percent::ZERO);

        Self {
            goal_id: goal.id,
            period: goal.period,
            target_amount: target,
            target_count: goal.target_count,
            revenue,
            deal_count,
            percent,
            display_percent: percent.clamped(),
            achieved: percent >= Percent::HUNDRED,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::{DateTime, Money, Percent};

    use crate::{
        domain::{goal, Goal},
        read::fixture::other_sale,
    };

    use super::Progress;

    fn goal(period: &str, target: i64) -> Goal {
        Goal {
            id: goal::Id::new(),
            period: period.parse().unwrap(),
            target_amount: goal::TargetAmount::new(Money::from(target))
                .unwrap(),
            target_count: 5,
            created_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn overachieved_goal_is_capped_for_display() {
        let sales = [
            other_sale("2024-06-10", 3_000_000),
            other_sale("2024-06-20", 2_200_000),
            other_sale("2024-07-01", 9_000_000),
        ];

        let progress = Progress::of(&goal("2024-06", 5_000_000), &sales);

        assert_eq!(progress.revenue, Money::from(5_200_000));
        assert_eq!(progress.deal_count, 2);
        assert_eq!(progress.percent, "104".parse::<Percent>().unwrap());
        assert_eq!(progress.display_percent, Percent::HUNDRED);
        assert!(progress.achieved);
    }

    #[test]
    fn partial_progress() {
        let sales = [other_sale("2024-03-10", 1_000_000)];

        let progress = Progress::of(&goal("2024", 3_000_000), &sales);

        assert_eq!(progress.percent, "33.33".parse::<Percent>().unwrap());
        assert_eq!(progress.display_percent, progress.percent);
        assert!(!progress.achieved);
    }
}
