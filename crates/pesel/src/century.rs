//! Century-shifted month encoding.
//!
//! The identifier only has room for a two-digit year, so the birth century is
//! folded into the month field by adding a fixed offset:
//!
//! | Years     | Offset | Month codes |
//! |-----------|--------|-------------|
//! | 1800-1899 | +80    | 81-92       |
//! | 1900-1999 | +0     | 01-12       |
//! | 2000-2099 | +20    | 21-32       |
//! | 2100-2199 | +40    | 41-52       |
//! | 2200-2299 | +60    | 61-72       |

use crate::{CalendarDate, Error, Result};

/// `(first year of century, month offset)` for every supported century.
const CENTURIES: [(u16, u8); 5] = [(1800, 80), (1900, 0), (2000, 20), (2100, 40), (2200, 60)];

/// Returns the month offset for the century containing `year`.
///
/// # Errors
///
/// Returns [`Error::YearOutOfRange`] outside 1800-2299.
pub const fn century_offset(year: u16) -> Result<u8> {
    if year < CalendarDate::MIN_YEAR || year > CalendarDate::MAX_YEAR {
        return Err(Error::YearOutOfRange { year });
    }
    Ok(CENTURIES[((year - CalendarDate::MIN_YEAR) / 100) as usize].1)
}

/// Encodes a calendar month as the two-digit month code for `year`.
///
/// # Errors
///
/// - [`Error::YearOutOfRange`] outside 1800-2299
/// - [`Error::InvalidMonth`] when `month` is outside `1..=12`
///
/// # Example
///
/// ```
/// assert_eq!(pesel::encode_month(1944, 5), Ok(5));
/// assert_eq!(pesel::encode_month(2000, 1), Ok(21));
/// assert_eq!(pesel::encode_month(1850, 12), Ok(92));
/// ```
pub const fn encode_month(year: u16, month: u8) -> Result<u8> {
    if month < 1 || month > 12 {
        return Err(Error::InvalidMonth { month });
    }
    match century_offset(year) {
        Ok(offset) => Ok(month + offset),
        Err(e) => Err(e),
    }
}

/// Splits a month code into its century start year and calendar month.
///
/// # Errors
///
/// Returns [`Error::InvalidMonthCode`] when the code is not in any bracket.
pub const fn decode_month(code: u8) -> Result<(u16, u8)> {
    let bracket = code / 20;
    let month = code % 20;
    if bracket > 4 || month < 1 || month > 12 {
        return Err(Error::InvalidMonthCode { code });
    }
    // Brackets ordered by offset: 0 -> 1900, 1 -> 2000, ... 4 -> 1800.
    let century = match bracket {
        0 => 1900,
        1 => 2000,
        2 => 2100,
        3 => 2200,
        _ => 1800,
    };
    Ok((century, month))
}

/// Recovers the calendar date from the three two-digit date fields.
///
/// # Errors
///
/// - [`Error::InvalidMonthCode`] when `month_code` is not in any bracket
/// - [`Error::InvalidDay`] when `dd` does not exist in the decoded month
pub const fn decode_date(yy: u8, month_code: u8, dd: u8) -> Result<CalendarDate> {
    let (century, month) = match decode_month(month_code) {
        Ok(parts) => parts,
        Err(e) => return Err(e),
    };
    let year = century + yy as u16;
    CalendarDate::new(year, month, dd)
}

/// The six leading digits of every identifier issued on `date`.
pub const fn encode_date(date: &CalendarDate) -> [u8; 6] {
    let yy = (date.year() % 100) as u8;
    // Dates are range-checked on construction, so the offset lookup cannot
    // fail.
    let mm = date.month() + CENTURIES[((date.year() - CalendarDate::MIN_YEAR) / 100) as usize].1;
    let dd = date.day();
    [yy / 10, yy % 10, mm / 10, mm % 10, dd / 10, dd % 10]
}
