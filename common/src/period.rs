//! Calendar [`Period`] definitions.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use time::Month;

use crate::{define_kind, Date};

define_kind! {
    #[doc = "Granularity of a [`Period`]."]
    enum Granularity {
        #[doc = "Single calendar month."]
        Monthly = 1 => "monthly",

        #[doc = "Single calendar year."]
        Yearly = 2 => "yearly",
    }
}

/// Calendar year.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Year(pub i32);

impl Year {
    /// Returns the first [`Date`] of this [`Year`].
    #[must_use]
    pub fn first_day(self) -> Date {
        YearMonth::from_parts(self.0, Month::January).first_day()
    }

    /// Returns the last [`Date`] of this [`Year`].
    #[must_use]
    pub fn last_day(self) -> Date {
        YearMonth::from_parts(self.0, Month::December).last_day()
    }

    /// Returns the inclusive range of [`Date`]s of this [`Year`].
    #[must_use]
    pub fn range(self) -> RangeInclusive<Date> {
        self.first_day()..=self.last_day()
    }

    /// Indicates whether the provided [`Date`] belongs to this [`Year`].
    #[must_use]
    pub fn contains(self, date: Date) -> bool {
        date.year() == self
    }

    /// Returns all the [`YearMonth`]s of this [`Year`] in order.
    pub fn months(self) -> impl Iterator<Item = YearMonth> {
        let first = YearMonth::from_parts(self.0, Month::January);
        std::iter::successors(Some(first), |m| Some(m.next())).take(12)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl FromStr for Year {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err("invalid `Year`, expected `YYYY`");
        }
        s.parse()
            .map(Self)
            .map_err(|_| "invalid `Year`, expected `YYYY`")
    }
}

/// Calendar month of a specific [`Year`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct YearMonth {
    /// Year of this [`YearMonth`].
    year: i32,

    /// Month of the year.
    month: Month,
}

impl YearMonth {
    /// Creates a new [`YearMonth`] out of the provided parts.
    #[must_use]
    pub const fn from_parts(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    /// Returns the [`Year`] of this [`YearMonth`].
    #[must_use]
    pub const fn year(self) -> Year {
        Year(self.year)
    }

    /// Returns the one-based number of the month.
    #[must_use]
    pub fn month(self) -> u8 {
        u8::from(self.month)
    }

    /// Returns the first [`Date`] of this [`YearMonth`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn first_day(self) -> Date {
        time::Date::from_calendar_date(self.year, self.month, 1)
            .expect("first day of a month always exists")
            .into()
    }

    /// Returns the last [`Date`] of this [`YearMonth`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn last_day(self) -> Date {
        let days = time::util::days_in_year_month(self.year, self.month);
        time::Date::from_calendar_date(self.year, self.month, days)
            .expect("last day of a month always exists")
            .into()
    }

    /// Returns the inclusive range of [`Date`]s of this [`YearMonth`].
    #[must_use]
    pub fn range(self) -> RangeInclusive<Date> {
        self.first_day()..=self.last_day()
    }

    /// Indicates whether the provided [`Date`] belongs to this [`YearMonth`].
    #[must_use]
    pub fn contains(self, date: Date) -> bool {
        date.year_month() == self
    }

    /// Returns the [`YearMonth`] preceding this one.
    #[must_use]
    pub fn previous(self) -> Self {
        match self.month {
            Month::January => Self::from_parts(self.year - 1, Month::December),
            m @ (Month::February
            | Month::March
            | Month::April
            | Month::May
            | Month::June
            | Month::July
            | Month::August
            | Month::September
            | Month::October
            | Month::November
            | Month::December) => Self::from_parts(self.year, m.previous()),
        }
    }

    /// Returns the [`YearMonth`] following this one.
    #[must_use]
    pub fn next(self) -> Self {
        match self.month {
            Month::December => Self::from_parts(self.year + 1, Month::January),
            m @ (Month::January
            | Month::February
            | Month::March
            | Month::April
            | Month::May
            | Month::June
            | Month::July
            | Month::August
            | Month::September
            | Month::October
            | Month::November) => Self::from_parts(self.year, m.next()),
        }
    }
}

impl Ord for YearMonth {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.year, self.month()).cmp(&(other.year, other.month()))
    }
}

impl PartialOrd for YearMonth {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month())
    }
}

impl FromStr for YearMonth {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const ERR: &str = "invalid `YearMonth`, expected `YYYY-MM`";

        let (year, month) = s.split_once('-').ok_or(ERR)?;
        if month.len() != 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ERR);
        }
        let Year(year) = year.parse().map_err(|_| ERR)?;
        let month = month.parse::<u8>().map_err(|_| ERR)?;
        let month = Month::try_from(month).map_err(|_| ERR)?;

        Ok(Self::from_parts(year, month))
    }
}

/// Calendar period: either a [`YearMonth`] or a whole [`Year`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Period {
    /// Single calendar month.
    Month(YearMonth),

    /// Whole calendar year.
    Year(Year),
}

impl Period {
    /// Returns the [`Granularity`] of this [`Period`].
    #[must_use]
    pub const fn granularity(self) -> Granularity {
        match self {
            Self::Month(_) => Granularity::Monthly,
            Self::Year(_) => Granularity::Yearly,
        }
    }

    /// Returns the [`Period`] of the provided [`Granularity`] containing the
    /// provided [`Date`].
    #[must_use]
    pub fn of(granularity: Granularity, date: Date) -> Self {
        match granularity {
            Granularity::Monthly => Self::Month(date.year_month()),
            Granularity::Yearly => Self::Year(date.year()),
        }
    }

    /// Returns the inclusive range of [`Date`]s of this [`Period`].
    #[must_use]
    pub fn range(self) -> RangeInclusive<Date> {
        match self {
            Self::Month(m) => m.range(),
            Self::Year(y) => y.range(),
        }
    }

    /// Indicates whether the provided [`Date`] belongs to this [`Period`].
    #[must_use]
    pub fn contains(self, date: Date) -> bool {
        match self {
            Self::Month(m) => m.contains(date),
            Self::Year(y) => y.contains(date),
        }
    }
}

impl From<YearMonth> for Period {
    fn from(m: YearMonth) -> Self {
        Self::Month(m)
    }
}

impl From<Year> for Period {
    fn from(y: Year) -> Self {
        Self::Year(y)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Month(m) => fmt::Display::fmt(m, f),
            Self::Year(y) => fmt::Display::fmt(y, f),
        }
    }
}

impl FromStr for Period {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('-') {
            s.parse().map(Self::Month)
        } else {
            s.parse().map(Self::Year)
        }
    }
}

/// Implements string-based [`serde`] (de)serialization for the provided
/// types.
macro_rules! impl_serde_via_str {
    ($($ty:ty),* $(,)?) => {$(
        impl Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: Serializer,
            {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(de::Error::custom)
            }
        }
    )*};
}

impl_serde_via_str!(Year, YearMonth, Period);

#[cfg(test)]
mod spec {
    use super::{Date, Granularity, Period, Year, YearMonth};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn parses_periods() {
        assert_eq!(
            "2024-06".parse::<Period>().unwrap(),
            Period::Month("2024-06".parse().unwrap()),
        );
        assert_eq!("2024".parse::<Period>().unwrap(), Period::Year(Year(2024)));

        assert!("2024-13".parse::<Period>().is_err());
        assert!("2024-6".parse::<Period>().is_err());
        assert!("24".parse::<Period>().is_err());
        assert!("june".parse::<Period>().is_err());
    }

    #[test]
    fn month_boundaries() {
        let feb = "2024-02".parse::<YearMonth>().unwrap();

        assert_eq!(feb.first_day(), date("2024-02-01"));
        assert_eq!(feb.last_day(), date("2024-02-29"));
        assert!(feb.contains(date("2024-02-29")));
        assert!(!feb.contains(date("2024-03-01")));
    }

    #[test]
    fn steps_across_years() {
        let jan = "2024-01".parse::<YearMonth>().unwrap();

        assert_eq!(jan.previous().to_string(), "2023-12");
        assert_eq!(jan.previous().next(), jan);
        assert_eq!(Year(2024).months().count(), 12);
        assert_eq!(
            Year(2024).months().last().map(|m| m.to_string()),
            Some("2024-12".into()),
        );
    }

    #[test]
    fn period_of_date() {
        let d = date("2024-06-15");

        assert_eq!(
            Period::of(Granularity::Monthly, d).to_string(),
            "2024-06",
        );
        assert_eq!(Period::of(Granularity::Yearly, d).to_string(), "2024");
        assert_eq!(
            Period::of(Granularity::Yearly, d).granularity(),
            Granularity::Yearly,
        );
    }
}
