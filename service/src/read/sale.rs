//! [`Sale`] read model definition.
//!
//! [`Sale`]: crate::domain::Sale

pub mod list {
    //! [`Sale`]s list definitions.

    use std::cmp::Reverse;

    use common::Date;
    use serde::Deserialize;
    use smart_default::SmartDefault;

    use crate::domain::{
        sale::{CollectionStatus, DealName, Details, Kind},
        Sale,
    };

    /// Time window relative to today.
    #[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, SmartDefault)]
    #[serde(rename_all = "lowercase")]
    pub enum Window {
        /// Current calendar month.
        Month,

        /// Current calendar quarter.
        Quarter,

        /// Current calendar year.
        Year,

        /// No time restriction.
        #[default]
        All,
    }

    impl Window {
        /// Indicates whether the provided `date` falls into this [`Window`]
        /// relatively to `today`.
        #[must_use]
        pub fn contains(self, date: Date, today: Date) -> bool {
            match self {
                Self::Month => date.year_month() == today.year_month(),
                Self::Quarter => {
                    date.year() == today.year()
                        && date.quarter() == today.quarter()
                }
                Self::Year => date.year() == today.year(),
                Self::All => true,
            }
        }
    }

    /// Filter of a [`Sale`]s list.
    #[derive(Clone, Debug, Default, Deserialize)]
    #[serde(default, rename_all = "camelCase")]
    pub struct Filter {
        /// Text to search for (case-insensitively) in the deal, property
        /// and customer names.
        pub search: Option<String>,

        /// [`Kind`] of [`Sale`]s to include.
        #[serde(rename = "type")]
        pub kind: Option<Kind>,

        /// [`Window`] the [`Sale`]s should be made within.
        pub window: Window,

        /// [`CollectionStatus`] of [`Sale`]s to include.
        pub collection: Option<CollectionStatus>,

        /// Maximum number of [`Sale`]s to return.
        pub limit: Option<usize>,
    }

    impl Filter {
        /// Indicates whether the provided [`Sale`] passes this [`Filter`].
        #[must_use]
        pub fn matches(&self, sale: &Sale, today: Date) -> bool {
            if self.kind.is_some_and(|k| k != sale.kind())
                || self
                    .collection
                    .is_some_and(|c| c != sale.collection_status())
                || !self.window.contains(sale.date, today)
            {
                return false;
            }

            let Some(needle) = self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
            else {
                return true;
            };
            let needle = needle.to_lowercase();
            let property_name = match sale.details() {
                Details::RealEstate(d) => Some(d.property_name.as_str()),
                Details::Renovation(d) => Some(d.property_name.as_str()),
                Details::Other(_) => None,
            };
            sale.deal_name
                .as_ref()
                .map(DealName::as_str)
                .into_iter()
                .chain(property_name)
                .chain([sale.customer_name.as_str()])
                .any(|hay| hay.to_lowercase().contains(&needle))
        }

        /// Applies this [`Filter`] to the provided [`Sale`]s, returning the
        /// matching ones newest first.
        #[must_use]
        pub fn apply(&self, mut sales: Vec<Sale>, today: Date) -> Vec<Sale> {
            sales.retain(|s| self.matches(s, today));
            sales.sort_by_key(|s| (Reverse((s.date, s.created_at)), s.id));
            if let Some(limit) = self.limit {
                sales.truncate(limit);
            }
            sales
        }
    }

    #[cfg(test)]
    mod spec {
        use common::Date;

        use crate::{
            domain::sale::{CollectionStatus, DealName, Kind},
            read::fixture::{brokerage_sale, other_sale},
        };

        use super::{Filter, Window};

        fn today() -> Date {
            "2024-06-15".parse().unwrap()
        }

        #[test]
        fn windows() {
            let today = today();
            let date = |s: &str| s.parse::<Date>().unwrap();

            assert!(Window::Month.contains(date("2024-06-01"), today));
            assert!(!Window::Month.contains(date("2024-05-31"), today));
            assert!(Window::Quarter.contains(date("2024-04-01"), today));
            assert!(!Window::Quarter.contains(date("2024-07-01"), today));
            assert!(!Window::Quarter.contains(date("2023-04-01"), today));
            assert!(Window::Year.contains(date("2024-01-01"), today));
            assert!(Window::All.contains(date("1999-01-01"), today));
        }

        #[test]
        fn filters_and_orders_newest_first() {
            let mut named = other_sale("2024-06-01", 10);
            named.deal_name = Some(DealName::new("Harbor Deal").unwrap());
            let sales = vec![
                named.clone(),
                other_sale("2024-06-10", 20),
                brokerage_sale("2024-06-05", 30, None),
                other_sale("2023-12-31", 40),
            ];

            let all = Filter::default().apply(sales.clone(), today());
            assert_eq!(all.len(), 4);
            assert!(all.windows(2).all(|w| w[0].date >= w[1].date));

            let filter = Filter {
                window: Window::Month,
                kind: Some(Kind::Other),
                collection: Some(CollectionStatus::Pending),
                ..Filter::default()
            };
            assert_eq!(filter.apply(sales.clone(), today()).len(), 2);

            let filter = Filter {
                search: Some("harbor".into()),
                ..Filter::default()
            };
            let found = filter.apply(sales.clone(), today());
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].id, named.id);

            let filter = Filter {
                search: Some("TOWER".into()),
                ..Filter::default()
            };
            assert_eq!(filter.apply(sales.clone(), today()).len(), 1);

            let filter = Filter {
                limit: Some(1),
                ..Filter::default()
            };
            let latest = filter.apply(sales, today());
            assert_eq!(latest[0].date.to_string(), "2024-06-10");
        }
    }
}
