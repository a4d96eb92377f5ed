use crate::{CalendarDate, DateEnumerator, DecodedPesel, Fragment, FragmentSearch, Pesel, Result};
use core::fmt;

/// One of the three lookups the engine answers.
///
/// The variants are closed: a request is either a full identifier to
/// validate, a date to enumerate, or a fragment to search for. Inputs are
/// already parsed, so a malformed request cannot be built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchRequest {
    /// Validate a single identifier.
    Validate(Pesel),
    /// Every identifier issued on a date.
    ByDate(CalendarDate),
    /// Every identifier ending in a fragment, across all dates.
    ByFragment(Fragment),
}

impl SearchRequest {
    /// Parses an identifier into a [`SearchRequest::Validate`].
    ///
    /// # Errors
    ///
    /// [`crate::Error::MalformedInput`] unless `pesel` is eleven ASCII digits.
    pub fn validate(pesel: &str) -> Result<Self> {
        pesel.parse().map(Self::Validate)
    }

    /// Builds a [`SearchRequest::ByDate`] from date components.
    ///
    /// # Errors
    ///
    /// Everything [`CalendarDate::new`] returns.
    pub fn by_date(year: u16, month: u8, day: u8) -> Result<Self> {
        CalendarDate::new(year, month, day).map(Self::ByDate)
    }

    /// Parses a fragment into a [`SearchRequest::ByFragment`].
    ///
    /// # Errors
    ///
    /// [`crate::Error::MalformedInput`] unless `fragment` is five ASCII digits.
    pub fn by_fragment(fragment: &str) -> Result<Self> {
        fragment.parse().map(Self::ByFragment)
    }

    /// Runs the request synchronously on the calling thread.
    ///
    /// Validation yields at most one item; failures surface as the single
    /// `Err` item. The enumerations never fail.
    pub fn run(&self) -> Results {
        match *self {
            Self::Validate(pesel) => Results::Single(Some(pesel.validate())),
            Self::ByDate(date) => Results::ByDate(DateEnumerator::new(date)),
            Self::ByFragment(fragment) => Results::ByFragment(FragmentSearch::new(fragment)),
        }
    }

    /// Short name of the variant, for logs.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validate(_) => "validate",
            Self::ByDate(_) => "by_date",
            Self::ByFragment(_) => "by_fragment",
        }
    }
}

impl fmt::Display for SearchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validate(pesel) => write!(f, "validate {pesel}"),
            Self::ByDate(date) => write!(f, "by date {date}"),
            Self::ByFragment(fragment) => write!(f, "by fragment {fragment}"),
        }
    }
}

/// Iterator returned by [`SearchRequest::run`].
#[derive(Clone, Debug)]
pub enum Results {
    /// Outcome of a validation, taken on first poll.
    Single(Option<Result<DecodedPesel>>),
    /// Date enumeration.
    ByDate(DateEnumerator),
    /// Fragment sweep.
    ByFragment(FragmentSearch),
}

impl Iterator for Results {
    type Item = Result<DecodedPesel>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Single(outcome) => outcome.take(),
            Self::ByDate(ids) => ids.next().map(Ok),
            Self::ByFragment(ids) => ids.next().map(Ok),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::Single(outcome) => {
                let n = usize::from(outcome.is_some());
                (n, Some(n))
            }
            Self::ByDate(ids) => ids.size_hint(),
            Self::ByFragment(ids) => ids.size_hint(),
        }
    }
}

impl core::iter::FusedIterator for Results {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Error, Malformed};

    #[test]
    fn constructors_reject_malformed_input() {
        assert!(matches!(
            SearchRequest::validate("123"),
            Err(Error::MalformedInput(Malformed::Length { .. }))
        ));
        assert!(matches!(
            SearchRequest::by_fragment("1234a"),
            Err(Error::MalformedInput(Malformed::NonDigit { .. }))
        ));
        assert_eq!(
            SearchRequest::by_date(2001, 2, 29),
            Err(Error::InvalidDay {
                year: 2001,
                month: 2,
                day: 29
            })
        );
    }

    #[test]
    fn validate_yields_one_result_or_one_error() {
        let ok: Vec<_> = SearchRequest::validate("44051401458").unwrap().run().collect();
        assert_eq!(ok.len(), 1);
        assert!(ok[0].as_ref().is_ok_and(|d| d.valid));

        let bad: Vec<_> = SearchRequest::validate("44051401450").unwrap().run().collect();
        assert_eq!(
            bad,
            [Err(Error::ChecksumMismatch {
                expected: 8,
                found: 0
            })]
        );
    }

    #[test]
    fn by_date_runs_the_enumerator() {
        let results = SearchRequest::by_date(2000, 1, 1).unwrap().run();
        assert_eq!(results.size_hint(), (10_000, Some(10_000)));
        assert_eq!(results.filter(Result::is_ok).count(), 10_000);
    }

    #[test]
    fn by_fragment_runs_the_sweep() {
        let request = SearchRequest::by_fragment("01458").unwrap();
        assert_eq!(request.kind(), "by_fragment");
        assert_eq!(request.to_string(), "by fragment 01458");
        let mut results = request.run();
        assert!(results.any(|r| r.is_ok_and(|d| d.pesel.to_string() == "44051401458")));
    }
}
