//! Lifecycle rules coordinating [`Sale`]s with [`Property`]s and
//! [`Achievement`]s.

use std::collections::{BTreeSet, HashMap, HashSet};

use common::{Money, Period, YearMonth};

#[cfg(doc)]
use crate::domain::Achievement;
use crate::{
    domain::{
        achievement::{Key, Rule},
        property::{self, Status, Transition},
        sale::{CollectionStatus, Kind},
        Goal, Property, Sale,
    },
    read::goal::Progress,
};

/// Number of deals within a month unlocking [`Rule::MonthlyDeals`].
pub const MONTHLY_DEALS: usize = 10;

/// Minimal profit of a single [`Sale`] unlocking [`Rule::MillionDeal`].
pub const MILLION: i64 = 1_000_000;

/// Returns the [`Status`] the [`Property`] linked to the provided [`Sale`]
/// should be moved to, along with its ID.
///
/// [`None`] is returned if the [`Sale`] is not linked to any [`Property`].
#[must_use]
pub fn cascade_target(sale: &Sale) -> Option<(property::Id, Status)> {
    if sale.kind() != Kind::RealEstate {
        return None;
    }
    let status = match sale.collection_status() {
        CollectionStatus::Collected => Status::Completed,
        CollectionStatus::Pending => Status::Contracted,
    };
    Some((sale.property_id()?, status))
}

/// Plans moving the provided [`Property`] to the `target` [`Status`].
///
/// `Ok(None)` means the [`Property`] already has the `target` [`Status`].
///
/// # Errors
///
/// If the [`Status`] machine forbids the [`Transition`].
pub fn plan(
    property: &Property,
    target: Status,
) -> Result<Option<Transition>, Transition> {
    let transition = Transition {
        from: property.status,
        to: target,
    };
    if transition.from == target {
        Ok(None)
    } else if transition.from.can_transition_to(target) {
        Ok(Some(transition))
    } else {
        Err(transition)
    }
}

/// Evaluates achievement [`Rule`]s against the whole history.
///
/// Returns [`Key`]s of the newly reached achievements (not present in the
/// `unlocked` ones), in a deterministic order.
#[must_use]
pub fn evaluate(
    sales: &[Sale],
    goals: &[Goal],
    unlocked: &HashSet<Key>,
) -> Vec<Key> {
    let mut reached = BTreeSet::new();

    if sales.len() == 1 {
        reached.extend(Key::once(Rule::FirstSale));
    }

    let mut per_month = HashMap::<YearMonth, usize>::new();
    for sale in sales {
        *per_month.entry(sale.date.year_month()).or_default() += 1;
    }
    reached.extend(
        per_month
            .into_iter()
            .filter(|(_, count)| *count >= MONTHLY_DEALS)
            .filter_map(|(month, _)| {
                Key::per(Rule::MonthlyDeals, Period::Month(month))
            }),
    );

    if sales.iter().any(|s| s.profit() >= Money::from(MILLION)) {
        reached.extend(Key::once(Rule::MillionDeal));
    }

    reached.extend(
        goals
            .iter()
            .filter(|g| matches!(g.period, Period::Month(_)))
            .filter(|g| Progress::of(g, sales).achieved)
            .filter_map(|g| Key::per(Rule::PerfectMonth, g.period)),
    );

    reached
        .into_iter()
        .filter(|key| !unlocked.contains(key))
        .collect()
}

#[cfg(test)]
mod spec {
    use std::collections::HashSet;

    use common::{DateTime, Money};

    use crate::{
        domain::{
            achievement::{Key, Rule},
            goal,
            property::{Mode, Status},
            sale::Collection,
            Goal,
        },
        read::fixture::{brokerage_sale, other_sale, property},
    };

    use super::{cascade_target, evaluate, plan};

    #[test]
    fn cascades_only_linked_real_estate() {
        let p = property("A", Mode::Exclusive, Status::Contracted, 0);

        let mut sale = brokerage_sale("2024-06-01", 100, Some(p.id));
        assert_eq!(cascade_target(&sale), Some((p.id, Status::Contracted)));

        sale.collection = Collection::Collected { on: sale.date };
        assert_eq!(cascade_target(&sale), Some((p.id, Status::Completed)));

        let unlinked = brokerage_sale("2024-06-01", 100, None);
        assert_eq!(cascade_target(&unlinked), None);
        assert_eq!(cascade_target(&other_sale("2024-06-01", 1)), None);
    }

    #[test]
    fn plans_transitions() {
        let mut p = property("A", Mode::Exclusive, Status::Contracted, 0);

        let t = plan(&p, Status::Completed).unwrap().unwrap();
        assert_eq!((t.from, t.to), (Status::Contracted, Status::Completed));
        assert_eq!(plan(&p, Status::Contracted), Ok(None));

        p.status = Status::Completed;
        assert!(plan(&p, Status::Contracted).unwrap().is_some());
        assert_eq!(plan(&p, Status::Completed), Ok(None));

        p.status = Status::Negotiating;
        assert!(plan(&p, Status::Completed).unwrap().is_some());
        assert!(plan(&p, Status::Contracted).unwrap().is_some());
    }

    #[test]
    fn first_sale_only_with_single_sale() {
        let none = HashSet::new();
        let first = Key::once(Rule::FirstSale).unwrap();

        assert_eq!(evaluate(&[other_sale("2024-06-01", 1)], &[], &none), [
            first
        ]);
        assert!(evaluate(&[], &[], &none).is_empty());
        assert!(evaluate(
            &[other_sale("2024-06-01", 1), other_sale("2024-06-02", 1)],
            &[],
            &none,
        )
        .is_empty());
        assert!(evaluate(
            &[other_sale("2024-06-01", 1)],
            &[],
            &HashSet::from([first]),
        )
        .is_empty());
    }

    #[test]
    fn monthly_and_million_rules() {
        let mut sales = (1..=10)
            .map(|d| other_sale(&format!("2024-06-{d:02}"), 1))
            .collect::<Vec<_>>();
        sales.push(other_sale("2024-07-01", 1_000_000));

        let keys = evaluate(&sales, &[], &HashSet::new());

        assert_eq!(keys, [
            Key::per(Rule::MonthlyDeals, "2024-06".parse().unwrap()).unwrap(),
            Key::once(Rule::MillionDeal).unwrap(),
        ]);
    }

    #[test]
    fn perfect_month_needs_monthly_goal_reached() {
        let sales = [
            other_sale("2024-06-01", 600),
            other_sale("2024-06-02", 400),
        ];
        let goal = |period: &str, target: i64| Goal {
            id: goal::Id::new(),
            period: period.parse().unwrap(),
            target_amount: goal::TargetAmount::new(Money::from(target))
                .unwrap(),
            target_count: 1,
            created_at: DateTime::now().coerce(),
        };
        let goals = [
            goal("2024-06", 1000),
            goal("2024-05", 1),
            goal("2024", 1000),
        ];

        let keys = evaluate(&sales, &goals, &HashSet::new());

        assert_eq!(keys, [Key::per(
            Rule::PerfectMonth,
            "2024-06".parse().unwrap()
        )
        .unwrap()]);
    }
}
