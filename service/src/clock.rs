//! [`Clock`] abstractions.

use std::time::Duration;

use common::{Date, DateTime};
use time::UtcOffset;

/// Source of the current date and time.
pub trait Clock {
    /// Returns the current [`DateTime`].
    fn now(&self) -> DateTime;

    /// Returns the current calendar [`Date`] as observed by the business.
    fn today(&self) -> Date;
}

/// [`Clock`] reading the system time.
#[derive(Clone, Copy, Debug)]
pub struct System {
    /// [`UtcOffset`] the business operates in.
    offset: UtcOffset,
}

impl System {
    /// Creates a new [`System`] clock operating in the provided
    /// [`UtcOffset`].
    #[must_use]
    pub const fn new(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// Creates a new [`System`] clock operating in the provided whole-hours
    /// offset from UTC.
    ///
    /// [`None`] is returned if the offset is out of range.
    #[must_use]
    pub fn with_offset_hours(hours: i8) -> Option<Self> {
        UtcOffset::from_hms(hours, 0, 0).ok().map(Self::new)
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new(UtcOffset::UTC)
    }
}

impl Clock for System {
    fn now(&self) -> DateTime {
        DateTime::now()
    }

    fn today(&self) -> Date {
        self.now().date_at(self.offset)
    }
}

/// [`Clock`] frozen at some moment.
#[derive(Clone, Copy, Debug)]
pub struct Fixed {
    /// Frozen [`DateTime`].
    now: DateTime,

    /// [`UtcOffset`] the business operates in.
    offset: UtcOffset,
}

impl Fixed {
    /// Creates a new [`Fixed`] clock frozen at the provided [`DateTime`] in
    /// UTC.
    #[must_use]
    pub const fn at(now: DateTime) -> Self {
        Self {
            now,
            offset: UtcOffset::UTC,
        }
    }

    /// Creates a new [`Fixed`] clock frozen at the noon (UTC) of the provided
    /// [`Date`].
    #[must_use]
    pub fn on(date: Date) -> Self {
        Self::at(DateTime::at_midnight(date) + Duration::from_secs(12 * 3600))
    }
}

impl Clock for Fixed {
    fn now(&self) -> DateTime {
        self.now
    }

    fn today(&self) -> Date {
        self.now.date_at(self.offset)
    }
}

#[cfg(test)]
mod spec {
    use common::DateTime;
    use time::UtcOffset;

    use super::{Clock as _, Fixed, System};

    #[test]
    fn fixed_clock_is_frozen() {
        let clock = Fixed::on("2024-06-30".parse().unwrap());

        assert_eq!(clock.today().to_string(), "2024-06-30");
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn system_clock_offset() {
        assert!(System::with_offset_hours(9).is_some());
        assert!(System::with_offset_hours(30).is_none());

        let late = DateTime::from_rfc3339("2024-06-30T20:00:00Z").unwrap();
        let tokyo = UtcOffset::from_hms(9, 0, 0).unwrap();
        assert_eq!(late.date_at(tokyo).to_string(), "2024-07-01");
    }
}
