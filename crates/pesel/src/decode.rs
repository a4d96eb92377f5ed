use crate::{CalendarDate, Error, Pesel, Result, Sex, checksum_digit, decode_date};

/// An identifier together with everything it encodes.
///
/// Produced by [`decode`], [`validate`] and the enumerators. Two values with
/// the same digits are interchangeable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecodedPesel {
    /// The identifier itself.
    pub pesel: Pesel,
    /// Birth date recovered from the first six digits.
    pub date: CalendarDate,
    /// Sex recovered from the tenth digit.
    pub sex: Sex,
    /// `true` when the checksum digit matches.
    pub valid: bool,
}

impl Pesel {
    /// Decodes the date and sex fields and checks the checksum.
    ///
    /// This is a structural decode: an identifier whose date fields are sound
    /// but whose checksum is wrong is returned with `valid == false`. Use
    /// [`Pesel::validate`] to reject it instead.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidMonthCode`] when the month field is not in any
    ///   century bracket
    /// - [`Error::InvalidDay`] when the day does not exist in that month
    pub const fn decode(&self) -> Result<DecodedPesel> {
        let date = match decode_date(self.year_field(), self.month_code(), self.day_field()) {
            Ok(date) => date,
            Err(e) => return Err(e),
        };
        Ok(DecodedPesel {
            pesel: *self,
            date,
            sex: self.sex(),
            valid: crate::verify(self),
        })
    }

    /// Decodes the identifier and rejects it unless the checksum matches.
    ///
    /// # Errors
    ///
    /// Everything [`Pesel::decode`] returns, plus [`Error::ChecksumMismatch`].
    pub const fn validate(&self) -> Result<DecodedPesel> {
        let decoded = match self.decode() {
            Ok(decoded) => decoded,
            Err(e) => return Err(e),
        };
        if !decoded.valid {
            return Err(Error::ChecksumMismatch {
                expected: checksum_digit(&self.prefix()),
                found: self.checksum(),
            });
        }
        Ok(decoded)
    }
}

/// Parses and decodes an identifier string.
///
/// See [`Pesel::decode`] for how checksum failures are reported.
///
/// # Errors
///
/// [`Error::MalformedInput`] unless `input` is exactly eleven ASCII digits,
/// then everything [`Pesel::decode`] returns.
///
/// # Example
///
/// ```
/// use pesel::Sex;
///
/// let decoded = pesel::decode("44051401459").unwrap();
/// assert_eq!(decoded.date.to_string(), "1944-05-14");
/// assert_eq!(decoded.sex, Sex::Male);
/// assert!(!decoded.valid);
/// ```
pub fn decode(input: &str) -> Result<DecodedPesel> {
    input.parse::<Pesel>()?.decode()
}

/// Parses, decodes and verifies an identifier string.
///
/// Returns exactly one valid record or an error; it never returns a record
/// with `valid == false`.
///
/// # Errors
///
/// [`Error::MalformedInput`], [`Error::InvalidMonthCode`],
/// [`Error::InvalidDay`] or [`Error::ChecksumMismatch`].
pub fn validate(input: &str) -> Result<DecodedPesel> {
    input.parse::<Pesel>()?.validate()
}
