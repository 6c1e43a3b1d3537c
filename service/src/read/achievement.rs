//! [`Achievement`] catalog read model definition.

use strum::IntoEnumIterator as _;

use crate::domain::{achievement::Rule, Achievement};

/// Entry of the [`Achievement`] catalog.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Entry {
    /// [`Rule`] unlocking the [`Achievement`]s of this [`Entry`].
    pub rule: Rule,

    /// Title of the [`Rule`].
    pub name: &'static str,

    /// Description of the [`Rule`].
    pub description: &'static str,

    /// Icon of the [`Rule`].
    pub icon: &'static str,

    /// Indicator whether the [`Rule`] may be unlocked once per period.
    pub periodic: bool,

    /// Already unlocked [`Achievement`]s of the [`Rule`].
    pub unlocked: Vec<Achievement>,
}

/// Builds the catalog of every known [`Rule`] along with its already
/// unlocked [`Achievement`]s.
#[must_use]
pub fn catalog(unlocked: &[Achievement]) -> Vec<Entry> {
    Rule::iter()
        .map(|rule| Entry {
            rule,
            name: rule.title(),
            description: rule.description(),
            icon: rule.icon(),
            periodic: rule.is_periodic(),
            unlocked: unlocked
                .iter()
                .filter(|a| a.key.rule() == rule)
                .cloned()
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod spec {
    use common::DateTime;

    use crate::domain::{
        achievement::{Key, Rule},
        Achievement,
    };

    use super::catalog;

    #[test]
    fn lists_every_rule() {
        let june = "2024-06".parse().unwrap();
        let unlocked = [
            Achievement::unlock(
                Key::once(Rule::FirstSale).unwrap(),
                DateTime::now().coerce(),
            ),
            Achievement::unlock(
                Key::per(Rule::MonthlyDeals, june).unwrap(),
                DateTime::now().coerce(),
            ),
        ];

        let catalog = catalog(&unlocked);

        assert_eq!(catalog.len(), 4);
        assert_eq!(catalog[0].rule, Rule::FirstSale);
        assert_eq!(catalog[0].unlocked.len(), 1);
        assert_eq!(catalog[1].unlocked[0].key.period(), Some(june));
        assert!(catalog[2].unlocked.is_empty());
    }
}
