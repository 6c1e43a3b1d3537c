//! Agents ranking read model definition.

use std::{cmp::Reverse, collections::HashMap};

use common::{Money, Period};
use serde::Serialize;

use crate::domain::{sale, Sale};

/// Position of an agent in a ranking.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// One-based rank.
    pub rank: usize,

    /// Agent being ranked.
    pub agent: sale::Agent,

    /// Sum of profits of the agent's [`Sale`]s.
    pub revenue: Money,

    /// Number of the agent's [`Sale`]s.
    pub deal_count: usize,
}

/// Ranks agents by their [`Sale`]s falling into the provided [`Period`].
///
/// Agents are ordered by revenue (descending), then by deal count
/// (descending), then by name.
#[must_use]
pub fn rank<'s>(
    period: Period,
    sales: impl IntoIterator<Item = &'s Sale>,
) -> Vec<Entry> {
    let mut totals = HashMap::<&sale::Agent, (Money, usize)>::new();
    for sale in sales.into_iter().filter(|s| period.contains(s.date)) {
        let (revenue, count) = totals.entry(&sale.agent).or_default();
        *revenue += sale.profit();
        *count += 1;
    }

    let mut totals = totals.into_iter().collect::<Vec<_>>();
    totals.sort_by(|(a, (a_rev, a_cnt)), (b, (b_rev, b_cnt))| {
        (Reverse(a_rev), Reverse(a_cnt), a.as_str())
            .cmp(&(Reverse(b_rev), Reverse(b_cnt), b.as_str()))
    });

    totals
        .into_iter()
        .enumerate()
        .map(|(i, (agent, (revenue, deal_count)))| Entry {
            rank: i + 1,
            agent: agent.clone(),
            revenue,
            deal_count,
        })
        .collect()
}

#[cfg(test)]
mod spec {
    use common::Money;

    use crate::read::fixture::agent_sale;

    use super::rank;

    #[test]
    fn orders_by_revenue_count_and_name() {
        let sales = [
            agent_sale("carol", "2024-06-03", 500),
            agent_sale("bob", "2024-06-04", 300),
            agent_sale("bob", "2024-06-05", 200),
            agent_sale("alice", "2024-06-06", 500),
            agent_sale("dave", "2024-06-07", 900),
            agent_sale("erin", "2024-05-31", 10_000),
        ];

        let ranking = rank("2024-06".parse().unwrap(), &sales);

        let names = ranking
            .iter()
            .map(|e| (e.rank, e.agent.as_str()))
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            [(1, "dave"), (2, "bob"), (3, "alice"), (4, "carol")],
        );
        assert_eq!(ranking[1].revenue, Money::from(500));
        assert_eq!(ranking[1].deal_count, 2);
    }
}
