//! Calendar [`Date`] definitions.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{fmt, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{Year, YearMonth};

/// `YYYY-MM-DD` format of a [`Date`].
const FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

/// Calendar date without a time zone.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] out of the provided components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day)
            .ok()
            .map(Self)
    }

    /// Returns the calendar year of this [`Date`].
    #[must_use]
    pub fn year(&self) -> Year {
        Year(self.0.year())
    }

    /// Returns the [`YearMonth`] this [`Date`] belongs to.
    #[must_use]
    pub fn year_month(&self) -> YearMonth {
        YearMonth::from_parts(self.0.year(), self.0.month())
    }

    /// Returns the zero-based quarter of the year this [`Date`] belongs to.
    #[must_use]
    pub fn quarter(&self) -> u8 {
        (u8::from(self.0.month()) - 1) / 3
    }

    /// Returns the number of days from this [`Date`] until the `other` one.
    ///
    /// Negative if the `other` [`Date`] is in the past.
    #[must_use]
    pub fn days_until(&self, other: Self) -> i64 {
        (other.0 - self.0).whole_days()
    }

    /// Returns the [`Date`] shifted by the provided number of days.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Option<Self> {
        self.0.checked_add(time::Duration::days(days)).map(Self)
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.format(FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for Date {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, FORMAT)
            .map(Self)
            .map_err(|_| "invalid `Date`, expected `YYYY-MM-DD`")
    }
}

impl Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(feature = "postgres")]
impl FromSql<'_> for Date {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::Date::from_sql(ty, raw).map(Self)
    }
}

#[cfg(feature = "postgres")]
impl ToSql for Date {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.0.to_sql(ty, w)
    }
}

#[cfg(test)]
mod spec {
    use super::Date;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn parses_and_formats() {
        assert_eq!(date("2024-06-05").to_string(), "2024-06-05");
        assert!("2024-6-5".parse::<Date>().is_err());
        assert!("2024-02-30".parse::<Date>().is_err());
        assert!("tomorrow".parse::<Date>().is_err());
    }

    #[test]
    fn counts_days() {
        assert_eq!(date("2024-06-28").days_until(date("2024-07-02")), 4);
        assert_eq!(date("2024-07-02").days_until(date("2024-06-28")), -4);
        assert_eq!(date("2024-06-28").days_until(date("2024-06-28")), 0);
    }

    #[test]
    fn quarter() {
        assert_eq!(date("2024-01-31").quarter(), 0);
        assert_eq!(date("2024-03-31").quarter(), 0);
        assert_eq!(date("2024-04-01").quarter(), 1);
        assert_eq!(date("2024-12-01").quarter(), 3);
    }
}
