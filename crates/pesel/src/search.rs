use crate::{
    CalendarDate, DecodedPesel, Fragment, Pesel, Sex, control_digit, encode_date, weighted_sum,
};
use core::iter::FusedIterator;

/// Lazily yields every identifier ending in a given fragment, one per birth
/// date whose checksum agrees with the fragment's last digit.
///
/// The sweep walks dates in ascending order. The fragment's contribution to
/// the checksum is computed once and the year/month contribution once per
/// month, so each day only costs two digit products.
///
/// # Example
///
/// ```
/// use pesel::{CalendarDate, Fragment, FragmentSearch};
///
/// let fragment: Fragment = "01458".parse().unwrap();
/// let from = CalendarDate::new(1944, 5, 1).unwrap();
/// let to = CalendarDate::new(1944, 5, 31).unwrap();
///
/// let hits: Vec<String> = FragmentSearch::within(fragment, from, to)
///     .map(|d| d.pesel.to_string())
///     .collect();
/// assert!(hits.contains(&"44051401458".to_string()));
/// ```
#[derive(Clone, Debug)]
pub struct FragmentSearch {
    fragment: Fragment,
    cursor: Option<CalendarDate>,
    end: CalendarDate,
    fragment_sum: u8,
    month: Option<(u16, u8, u8)>,
}

impl FragmentSearch {
    /// Searches the whole supported range, 1800-01-01 through 2299-12-31.
    pub fn new(fragment: Fragment) -> Self {
        Self::within(fragment, CalendarDate::MIN, CalendarDate::MAX)
    }

    /// Searches the inclusive window `from..=to`. An inverted window yields
    /// nothing.
    pub fn within(fragment: Fragment, from: CalendarDate, to: CalendarDate) -> Self {
        #[cfg(feature = "tracing")]
        tracing::trace!(%fragment, %from, %to, "searching dates for fragment");
        Self {
            fragment,
            cursor: (from <= to).then_some(from),
            end: to,
            fragment_sum: fragment.weighted_sum(),
            month: None,
        }
    }

    /// The fragment every yielded identifier ends with.
    pub const fn fragment(&self) -> Fragment {
        self.fragment
    }

    /// Weighted sum of the year and month digits of `date`, cached per month.
    fn month_sum(&mut self, date: &CalendarDate) -> u8 {
        match self.month {
            Some((year, month, sum)) if year == date.year() && month == date.month() => sum,
            _ => {
                let head = encode_date(date);
                let sum = weighted_sum(&head[..4], 0);
                self.month = Some((date.year(), date.month(), sum));
                sum
            }
        }
    }
}

impl Iterator for FragmentSearch {
    type Item = DecodedPesel;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(date) = self.cursor {
            if date > self.end {
                self.cursor = None;
                break;
            }
            self.cursor = date.succ();

            let day = date.day();
            let day_sum = weighted_sum(&[day / 10, day % 10], 4);
            let sum = (self.month_sum(&date) + day_sum + self.fragment_sum) % 10;
            if control_digit(sum) == self.fragment.checksum() {
                let pesel = Pesel::from_parts(&date, &self.fragment);
                return Some(DecodedPesel {
                    pesel,
                    date,
                    sex: Sex::from_digit(pesel.sex_digit()),
                    valid: true,
                });
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.cursor {
            None => (0, Some(0)),
            // Bounded by the number of days left, which is at most the full
            // range.
            Some(_) => (0, Some(FULL_RANGE_DAYS)),
        }
    }
}

impl FusedIterator for FragmentSearch {}

/// Days from 1800-01-01 through 2299-12-31 inclusive.
pub const FULL_RANGE_DAYS: usize = 500 * 365 + 121;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DateEnumerator, validate};

    fn date(y: u16, m: u8, d: u8) -> CalendarDate {
        CalendarDate::new(y, m, d).unwrap()
    }

    #[test]
    fn finds_known_identifier() {
        let fragment: Fragment = "01458".parse().unwrap();
        let hit = FragmentSearch::new(fragment)
            .find(|d| d.date == date(1944, 5, 14))
            .unwrap();
        assert_eq!(hit.pesel.to_string(), "44051401458");
        assert_eq!(hit.sex, Sex::Male);
    }

    #[test]
    fn every_hit_validates_and_ends_with_fragment() {
        let fragment: Fragment = "12345".parse().unwrap();
        let mut last = None;
        let mut count = 0;
        for hit in FragmentSearch::new(fragment) {
            let s = hit.pesel.to_string();
            assert!(s.ends_with("12345"), "{s}");
            assert_eq!(validate(&s), Ok(hit));
            if let Some(prev) = last {
                assert!(hit.date > prev, "dates must ascend");
            }
            last = Some(hit.date);
            count += 1;
        }
        assert!(count > 0);
        assert!(count < FULL_RANGE_DAYS);
    }

    #[test]
    fn agrees_with_date_enumeration() {
        let fragment: Fragment = "98760".parse().unwrap();
        let from = date(1999, 12, 1);
        let to = date(2000, 3, 31);

        let by_fragment: Vec<DecodedPesel> = FragmentSearch::within(fragment, from, to).collect();

        let mut by_date = Vec::new();
        let mut current = Some(from);
        while let Some(d) = current.filter(|d| *d <= to) {
            by_date.extend(
                DateEnumerator::new(d).filter(|decoded| decoded.pesel.fragment() == fragment),
            );
            current = d.succ();
        }

        assert!(!by_fragment.is_empty());
        assert_eq!(by_fragment, by_date);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let fragment: Fragment = "01458".parse().unwrap();
        let day = date(1944, 5, 14);
        let hits: Vec<_> = FragmentSearch::within(fragment, day, day).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].date, day);
    }

    #[test]
    fn empty_when_checksum_never_matches() {
        // Only 1944-05-14 is searched and it needs checksum 8.
        let fragment: Fragment = "01459".parse().unwrap();
        let day = date(1944, 5, 14);
        let mut search = FragmentSearch::within(fragment, day, day);
        assert_eq!(search.next(), None);
        assert_eq!(search.next(), None);
    }

    #[test]
    fn inverted_window_is_empty() {
        let fragment: Fragment = "01458".parse().unwrap();
        let search = FragmentSearch::within(fragment, date(2000, 1, 2), date(2000, 1, 1));
        assert_eq!(search.size_hint(), (0, Some(0)));
        assert_eq!(search.count(), 0);
    }

    #[test]
    fn restartable() {
        let fragment: Fragment = "55555".parse().unwrap();
        let search = FragmentSearch::within(fragment, date(1800, 1, 1), date(1801, 12, 31));
        assert!(search.clone().eq(search));
    }

    #[test]
    fn reaches_the_last_supported_day() {
        let last = Pesel::from_components(&CalendarDate::MAX, 0, 0);
        let hits: Vec<_> = FragmentSearch::new(last.fragment()).collect();
        assert_eq!(hits.last().map(|d| d.date), Some(CalendarDate::MAX));
        let first = Pesel::from_components(&CalendarDate::MIN, 0, 0);
        let hits = FragmentSearch::new(first.fragment()).next();
        assert_eq!(hits.map(|d| d.date), Some(CalendarDate::MIN));
    }
}
