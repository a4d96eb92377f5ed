use crate::{Error, Malformed, Result};
use core::{fmt, str::FromStr};

/// A proleptic Gregorian calendar date within the range the century table can
/// express: 1800-01-01 through 2299-12-31.
///
/// Dates can only be built through [`CalendarDate::new`], so every value in
/// circulation names a real day. Ordering is chronological.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: u16,
    month: u8,
    day: u8,
}

impl CalendarDate {
    /// First supported year.
    pub const MIN_YEAR: u16 = 1800;
    /// Last supported year.
    pub const MAX_YEAR: u16 = 2299;

    /// The earliest date an identifier can encode.
    pub const MIN: Self = Self {
        year: Self::MIN_YEAR,
        month: 1,
        day: 1,
    };

    /// The latest date an identifier can encode.
    pub const MAX: Self = Self {
        year: Self::MAX_YEAR,
        month: 12,
        day: 31,
    };

    /// Builds a date, validating year range, month and day.
    ///
    /// # Errors
    ///
    /// - [`Error::YearOutOfRange`] when `year` is outside 1800-2299
    /// - [`Error::InvalidMonth`] when `month` is outside `1..=12`
    /// - [`Error::InvalidDay`] when `day` does not exist in that month
    ///
    /// # Example
    ///
    /// ```
    /// use pesel::{CalendarDate, Error};
    ///
    /// assert!(CalendarDate::new(2000, 2, 29).is_ok());
    /// assert_eq!(
    ///     CalendarDate::new(1900, 2, 29),
    ///     Err(Error::InvalidDay { year: 1900, month: 2, day: 29 })
    /// );
    /// ```
    pub const fn new(year: u16, month: u8, day: u8) -> Result<Self> {
        if year < Self::MIN_YEAR || year > Self::MAX_YEAR {
            return Err(Error::YearOutOfRange { year });
        }
        if month < 1 || month > 12 {
            return Err(Error::InvalidMonth { month });
        }
        if day < 1 || day > days_in_month(year, month) {
            return Err(Error::InvalidDay { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Full four-digit year.
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Calendar month, `1..=12`.
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// Day of month, starting at 1.
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// The following day, or `None` after [`CalendarDate::MAX`].
    pub const fn succ(&self) -> Option<Self> {
        let Self { year, month, day } = *self;
        if day < days_in_month(year, month) {
            Some(Self {
                year,
                month,
                day: day + 1,
            })
        } else if month < 12 {
            Some(Self {
                year,
                month: month + 1,
                day: 1,
            })
        } else if year < Self::MAX_YEAR {
            Some(Self {
                year: year + 1,
                month: 1,
                day: 1,
            })
        } else {
            None
        }
    }
}

/// Proleptic Gregorian leap rule: divisible by 4, not by 100 unless also by
/// 400.
pub const fn is_leap_year(year: u16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` of `year`. Returns 0 for a month outside
/// `1..=12`.
pub const fn days_in_month(year: u16, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = Error;

    /// Parses `YYYY-MM-DD`.
    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split('-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(Malformed::DateFormat.into());
        };
        if year.len() != 4 || month.len() != 2 || day.len() != 2 {
            return Err(Malformed::DateFormat.into());
        }
        let year = crate::error::parse_digits::<4>(year)?;
        let month = crate::error::parse_digits::<2>(month)?;
        let day = crate::error::parse_digits::<2>(day)?;

        let year = year.iter().fold(0_u16, |acc, &d| acc * 10 + u16::from(d));
        Self::new(year, month[0] * 10 + month[1], day[0] * 10 + day[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_rule_matches_gregorian_calendar() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(is_leap_year(1804));
        assert!(!is_leap_year(1800));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2100));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn february_29_only_in_leap_years() {
        assert!(CalendarDate::new(2000, 2, 29).is_ok());
        assert!(CalendarDate::new(2004, 2, 29).is_ok());
        assert_eq!(
            CalendarDate::new(2100, 2, 29),
            Err(Error::InvalidDay {
                year: 2100,
                month: 2,
                day: 29
            })
        );
        assert_eq!(
            CalendarDate::new(2001, 2, 29),
            Err(Error::InvalidDay {
                year: 2001,
                month: 2,
                day: 29
            })
        );
    }

    #[test]
    fn rejects_out_of_range_components() {
        assert_eq!(
            CalendarDate::new(1799, 12, 31),
            Err(Error::YearOutOfRange { year: 1799 })
        );
        assert_eq!(
            CalendarDate::new(2300, 1, 1),
            Err(Error::YearOutOfRange { year: 2300 })
        );
        assert_eq!(
            CalendarDate::new(1990, 13, 1),
            Err(Error::InvalidMonth { month: 13 })
        );
        assert_eq!(
            CalendarDate::new(1990, 0, 1),
            Err(Error::InvalidMonth { month: 0 })
        );
        assert_eq!(
            CalendarDate::new(1990, 4, 31),
            Err(Error::InvalidDay {
                year: 1990,
                month: 4,
                day: 31
            })
        );
        assert_eq!(
            CalendarDate::new(1990, 4, 0),
            Err(Error::InvalidDay {
                year: 1990,
                month: 4,
                day: 0
            })
        );
    }

    #[test]
    fn succ_rolls_over_month_and_year() {
        let d = CalendarDate::new(1999, 12, 31).unwrap();
        assert_eq!(d.succ(), Some(CalendarDate::new(2000, 1, 1).unwrap()));

        let d = CalendarDate::new(2000, 2, 28).unwrap();
        assert_eq!(d.succ(), Some(CalendarDate::new(2000, 2, 29).unwrap()));

        let d = CalendarDate::new(2001, 2, 28).unwrap();
        assert_eq!(d.succ(), Some(CalendarDate::new(2001, 3, 1).unwrap()));

        assert_eq!(CalendarDate::MAX.succ(), None);
    }

    #[test]
    fn full_range_has_expected_number_of_days() {
        let mut count = 1;
        let mut current = CalendarDate::MIN;
        while let Some(next) = current.succ() {
            assert!(next > current);
            current = next;
            count += 1;
        }
        assert_eq!(current, CalendarDate::MAX);
        // 500 years, 121 of them leap (125 divisible by 4, minus 1800, 1900,
        // 2100, 2200).
        assert_eq!(count, 500 * 365 + 121);
    }

    #[test]
    fn parses_and_displays_iso_dates() {
        let d: CalendarDate = "1944-05-14".parse().unwrap();
        assert_eq!((d.year(), d.month(), d.day()), (1944, 5, 14));
        assert_eq!(d.to_string(), "1944-05-14");

        assert_eq!(
            "1944-5-14".parse::<CalendarDate>(),
            Err(Error::MalformedInput(Malformed::DateFormat))
        );
        assert_eq!(
            "1944-05-14-01".parse::<CalendarDate>(),
            Err(Error::MalformedInput(Malformed::DateFormat))
        );
        assert_eq!(
            "1944-05-32".parse::<CalendarDate>(),
            Err(Error::InvalidDay {
                year: 1944,
                month: 5,
                day: 32
            })
        );
        assert!(matches!(
            "19x4-05-14".parse::<CalendarDate>(),
            Err(Error::MalformedInput(Malformed::NonDigit { .. }))
        ));
    }
}
