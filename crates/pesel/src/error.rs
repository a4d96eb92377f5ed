/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All possible errors that `pesel` can produce.
///
/// Every variant is cheap to copy so results can be forwarded across channels
/// and compared in tests without allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input does not have the fixed-width digit shape the operation
    /// expects.
    #[error("malformed input: {0}")]
    MalformedInput(Malformed),

    /// The two-digit month field does not fall in any century bracket.
    #[error("invalid month code: {code:02}")]
    InvalidMonthCode {
        /// The raw month field as written in the identifier.
        code: u8,
    },

    /// A calendar month outside `1..=12`.
    #[error("invalid month: {month}")]
    InvalidMonth {
        /// The offending month.
        month: u8,
    },

    /// The day does not exist in the given month and year.
    #[error("invalid day: {year:04}-{month:02}-{day:02}")]
    InvalidDay {
        /// Full four-digit year.
        year: u16,
        /// Calendar month, `1..=12`.
        month: u8,
        /// The offending day.
        day: u8,
    },

    /// The year cannot be expressed by the century table (1800-2299).
    #[error("year {year} is outside the supported range 1800-2299")]
    YearOutOfRange {
        /// The offending year.
        year: u16,
    },

    /// The identifier is structurally sound but its control digit is wrong.
    #[error("checksum mismatch: expected {expected}, found {found}")]
    ChecksumMismatch {
        /// The control digit derived from the first ten digits.
        expected: u8,
        /// The control digit present in the identifier.
        found: u8,
    },
}

/// Ways in which raw input can fail the shape check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Malformed {
    /// Wrong number of characters.
    Length {
        /// Required length.
        expected: usize,
        /// Length actually supplied.
        found: usize,
    },
    /// A character that is not an ASCII decimal digit.
    NonDigit {
        /// The offending byte.
        byte: u8,
        /// Its zero-based position.
        index: usize,
    },
    /// A date that is not written as `YYYY-MM-DD`.
    DateFormat,
}

impl core::fmt::Display for Malformed {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Length { expected, found } => {
                write!(f, "expected {expected} digits, found {found} characters")
            }
            Self::NonDigit { byte, index } => {
                write!(f, "non-digit byte {byte:#04x} at index {index}")
            }
            Self::DateFormat => f.write_str("expected a date formatted as YYYY-MM-DD"),
        }
    }
}

impl From<Malformed> for Error {
    fn from(err: Malformed) -> Self {
        Self::MalformedInput(err)
    }
}

/// Parses a fixed-width run of ASCII digits into their numeric values.
pub(crate) fn parse_digits<const N: usize>(s: &str) -> Result<[u8; N]> {
    let bytes = s.as_bytes();
    if bytes.len() != N {
        return Err(Malformed::Length {
            expected: N,
            found: s.chars().count(),
        }
        .into());
    }
    let mut digits = [0_u8; N];
    for (index, (&byte, slot)) in bytes.iter().zip(digits.iter_mut()).enumerate() {
        if !byte.is_ascii_digit() {
            return Err(Malformed::NonDigit { byte, index }.into());
        }
        *slot = byte - b'0';
    }
    Ok(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_exact_width_digits() {
        assert_eq!(parse_digits::<5>("01234"), Ok([0, 1, 2, 3, 4]));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            parse_digits::<5>("1234"),
            Err(Error::MalformedInput(Malformed::Length {
                expected: 5,
                found: 4
            }))
        );
    }

    #[test]
    fn rejects_non_digit() {
        assert_eq!(
            parse_digits::<5>("12a45"),
            Err(Error::MalformedInput(Malformed::NonDigit {
                byte: b'a',
                index: 2
            }))
        );
    }

    #[test]
    fn multibyte_input_is_not_a_digit() {
        // 5 bytes, 4 characters
        assert_eq!(
            parse_digits::<5>("12ł4"),
            Err(Error::MalformedInput(Malformed::NonDigit {
                byte: 0xC5,
                index: 2
            }))
        );
        assert_eq!(
            parse_digits::<5>("1ł"),
            Err(Error::MalformedInput(Malformed::Length {
                expected: 5,
                found: 2
            }))
        );
    }
}
