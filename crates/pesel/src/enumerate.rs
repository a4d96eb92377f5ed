use crate::{CalendarDate, DecodedPesel, Pesel, Sex};
use core::iter::FusedIterator;

/// Number of serial/sex-digit combinations per date.
pub const IDS_PER_DATE: usize = 10_000;

/// Lazily yields every identifier that can be issued on one date.
///
/// The six date digits are fixed; the serial (`000..=999`) and sex digit
/// (`0..=9`) are walked together as a four-digit suffix in ascending order and
/// the checksum is derived for each, so every item is valid. The sequence
/// always has exactly [`IDS_PER_DATE`] items and cloning the enumerator before
/// iterating replays it.
///
/// # Example
///
/// ```
/// use pesel::{CalendarDate, DateEnumerator};
///
/// let date = CalendarDate::new(2000, 1, 1).unwrap();
/// let mut ids = DateEnumerator::new(date);
/// assert_eq!(ids.len(), 10_000);
/// assert_eq!(ids.next().unwrap().pesel.to_string(), "00210100004");
/// assert_eq!(ids.last().unwrap().pesel.to_string(), "00210199994");
/// ```
#[derive(Clone, Debug)]
pub struct DateEnumerator {
    date: CalendarDate,
    next: u16,
}

impl DateEnumerator {
    /// Starts an enumeration for `date`.
    pub fn new(date: CalendarDate) -> Self {
        #[cfg(feature = "tracing")]
        tracing::trace!(%date, "enumerating identifiers for date");
        Self { date, next: 0 }
    }

    /// The date every yielded identifier encodes.
    pub const fn date(&self) -> CalendarDate {
        self.date
    }
}

impl Iterator for DateEnumerator {
    type Item = DecodedPesel;

    fn next(&mut self) -> Option<Self::Item> {
        if usize::from(self.next) >= IDS_PER_DATE {
            return None;
        }
        let pesel = Pesel::from_suffix(&self.date, self.next);
        self.next += 1;
        Some(DecodedPesel {
            pesel,
            date: self.date,
            sex: Sex::from_digit(pesel.sex_digit()),
            valid: true,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = IDS_PER_DATE - usize::from(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DateEnumerator {}

impl FusedIterator for DateEnumerator {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn yields_ten_thousand_valid_ids_for_the_date() {
        let date = CalendarDate::new(2000, 1, 1).unwrap();
        let mut seen = HashSet::new();
        for decoded in DateEnumerator::new(date) {
            assert!(decoded.valid);
            assert_eq!(decoded.date, date);
            assert!(decoded.pesel.to_string().starts_with("002101"));
            assert_eq!(decoded.pesel.validate(), Ok(decoded));
            assert!(seen.insert(decoded.pesel));
        }
        assert_eq!(seen.len(), IDS_PER_DATE);
    }

    #[test]
    fn order_is_ascending_by_suffix() {
        let date = CalendarDate::new(1850, 6, 30).unwrap();
        let suffixes: Vec<u16> = DateEnumerator::new(date)
            .map(|d| d.pesel.suffix())
            .collect();
        let expected: Vec<u16> = (0..10_000).collect();
        assert_eq!(suffixes, expected);
    }

    #[test]
    fn sex_alternates_with_last_suffix_digit() {
        let date = CalendarDate::new(2299, 12, 31).unwrap();
        let sexes: Vec<Sex> = DateEnumerator::new(date).take(4).map(|d| d.sex).collect();
        assert_eq!(sexes, [Sex::Female, Sex::Male, Sex::Female, Sex::Male]);
    }

    #[test]
    fn restartable_and_exact_size() {
        let date = CalendarDate::new(1999, 12, 31).unwrap();
        let fresh = DateEnumerator::new(date);
        let replay = fresh.clone();
        assert!(fresh.eq(replay));

        let mut ids = DateEnumerator::new(date);
        assert_eq!(ids.len(), 10_000);
        ids.nth(9_997);
        assert_eq!(ids.len(), 2);
        assert!(ids.next().is_some());
        assert!(ids.next().is_some());
        assert!(ids.next().is_none());
        assert!(ids.next().is_none());
        assert_eq!(ids.len(), 0);
    }
}
