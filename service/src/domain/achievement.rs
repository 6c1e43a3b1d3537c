//! [`Achievement`] definitions.

use std::{fmt, str::FromStr};

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, define_text, unit, DateTimeOf, Period};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Unlocked achievement.
///
/// Immutable once unlocked, and never unlocked twice for the same [`Key`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Achievement {
    /// [`Key`] of this [`Achievement`].
    pub key: Key,

    /// [`Name`] of this [`Achievement`].
    pub name: Name,

    /// [`Description`] of this [`Achievement`].
    pub description: Description,

    /// [`Icon`] of this [`Achievement`].
    pub icon: Icon,

    /// [`DateTime`] when this [`Achievement`] was unlocked.
    pub unlocked_at: UnlockDateTime,
}

impl Achievement {
    /// Unlocks a new [`Achievement`] with the provided [`Key`], taking its
    /// presentation from the [`Rule`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn unlock(key: Key, unlocked_at: UnlockDateTime) -> Self {
        let rule = key.rule;
        Self {
            key,
            name: Name::new(rule.title()).expect("valid `Name`"),
            description: Description::new(rule.description())
                .expect("valid `Description`"),
            icon: Icon::new(rule.icon()).expect("valid `Icon`"),
            unlocked_at,
        }
    }
}

define_kind! {
    #[doc = "Rule unlocking an [`Achievement`]."]
    enum Rule {
        #[doc = "The very first sale is recorded."]
        FirstSale = 1 => "first_sale",

        #[doc = "A month has at least 10 deals."]
        MonthlyDeals = 2 => "monthly_10",

        #[doc = "A single sale earned at least 1,000,000."]
        MillionDeal = 3 => "million_deal",

        #[doc = "A monthly goal is fully reached."]
        PerfectMonth = 4 => "perfect_month",
    }
}

impl Rule {
    /// Indicates whether this [`Rule`] is unlocked once per [`Period`] rather
    /// than once overall.
    #[must_use]
    pub const fn is_periodic(self) -> bool {
        matches!(self, Self::MonthlyDeals | Self::PerfectMonth)
    }

    /// Returns the display title of this [`Rule`].
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::FirstSale => "First Step",
            Self::MonthlyDeals => "Monthly Master",
            Self::MillionDeal => "Million Seller",
            Self::PerfectMonth => "Perfect Month",
        }
    }

    /// Returns the description of this [`Rule`].
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::FirstSale => "Closed the very first deal",
            Self::MonthlyDeals => "Closed 10 deals within a month",
            Self::MillionDeal => "Earned 1,000,000 or more on a single deal",
            Self::PerfectMonth => "Reached 100% of a monthly goal",
        }
    }

    /// Returns the icon of this [`Rule`].
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::FirstSale => "🎯",
            Self::MonthlyDeals => "🏆",
            Self::MillionDeal => "💰",
            Self::PerfectMonth => "⭐",
        }
    }
}

/// Composite identity of an [`Achievement`].
///
/// Textual form is the [`Rule`] name optionally followed by `_` and the
/// [`Period`], e.g. `first_sale` or `monthly_10_2024-06`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Key {
    /// [`Rule`] unlocking the [`Achievement`].
    rule: Rule,

    /// [`Period`] the [`Achievement`] is unlocked for, if the [`Rule`] is
    /// periodic.
    period: Option<Period>,
}

impl Key {
    /// Creates a new [`Key`] of a non-periodic [`Rule`].
    ///
    /// [`None`] is returned if the [`Rule`] is periodic.
    #[must_use]
    pub const fn once(rule: Rule) -> Option<Self> {
        if rule.is_periodic() {
            None
        } else {
            Some(Self { rule, period: None })
        }
    }

    /// Creates a new [`Key`] of a periodic [`Rule`].
    ///
    /// [`None`] is returned if the [`Rule`] is not periodic.
    #[must_use]
    pub const fn per(rule: Rule, period: Period) -> Option<Self> {
        if rule.is_periodic() {
            Some(Self {
                rule,
                period: Some(period),
            })
        } else {
            None
        }
    }

    /// Returns the [`Rule`] of this [`Key`].
    #[must_use]
    pub const fn rule(self) -> Rule {
        self.rule
    }

    /// Returns the [`Period`] of this [`Key`], if any.
    #[must_use]
    pub const fn period(self) -> Option<Period> {
        self.period
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.period {
            Some(period) => write!(f, "{}_{period}", self.rule),
            None => write!(f, "{}", self.rule),
        }
    }
}

impl FromStr for Key {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ERR: &str = "invalid achievement `Key`";

        if let Ok(rule) = s.parse::<Rule>() {
            return Self::once(rule).ok_or(ERR);
        }
        let (rule, period) = s.rsplit_once('_').ok_or(ERR)?;
        Self::per(
            rule.parse().map_err(|_| ERR)?,
            period.parse().map_err(|_| ERR)?,
        )
        .ok_or(ERR)
    }
}

impl Serialize for Key {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Key {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

define_text! {
    #[doc = "Display name of an [`Achievement`]."]
    struct Name(max = 128);
}

define_text! {
    #[doc = "Description of an [`Achievement`]."]
    struct Description(max = 512);
}

define_text! {
    #[doc = "Icon of an [`Achievement`]."]
    struct Icon(max = 16);
}

/// [`DateTime`] when an [`Achievement`] was unlocked.
pub type UnlockDateTime = DateTimeOf<(Achievement, unit::Unlocking)>;

#[cfg(test)]
mod spec {
    use common::Period;

    use super::{Key, Rule};

    #[test]
    fn key_roundtrip() {
        let june: Period = "2024-06".parse().unwrap();

        for (key, text) in [
            (Key::once(Rule::FirstSale).unwrap(), "first_sale"),
            (Key::once(Rule::MillionDeal).unwrap(), "million_deal"),
            (
                Key::per(Rule::MonthlyDeals, june).unwrap(),
                "monthly_10_2024-06",
            ),
            (
                Key::per(Rule::PerfectMonth, june).unwrap(),
                "perfect_month_2024-06",
            ),
        ] {
            assert_eq!(key.to_string(), text);
            assert_eq!(text.parse::<Key>().unwrap(), key);
        }
    }

    #[test]
    fn key_requires_matching_periodicity() {
        let june: Period = "2024-06".parse().unwrap();

        assert!(Key::once(Rule::MonthlyDeals).is_none());
        assert!(Key::per(Rule::FirstSale, june).is_none());
        assert!("monthly_10".parse::<Key>().is_err());
        assert!("first_sale_2024-06".parse::<Key>().is_err());
        assert!("monthly_10_june".parse::<Key>().is_err());
    }
}
