use crate::{CalendarDate, Error, Fragment, Malformed, Result, Sex, checksum_digit, encode_date};
use core::{fmt, str::FromStr};

/// An 11-digit PESEL identifier.
///
/// Construction only checks the shape (eleven decimal digits). Whether the
/// date fields and the checksum are meaningful is decided by
/// [`crate::decode`] and [`crate::validate`].
///
/// ```text
/// digit:  0 1 | 2 3 | 4 5 | 6 7 8  | 9   | 10
/// field:  yy  | mm  | dd  | serial | sex | checksum
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pesel {
    digits: [u8; 11],
}

impl Pesel {
    /// Number of digits in an identifier.
    pub const LEN: usize = 11;

    /// Builds an identifier from digit values (not ASCII).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedInput`] if any value is greater than 9.
    pub const fn from_digits(digits: [u8; 11]) -> Result<Self> {
        let mut index = 0;
        while index < Self::LEN {
            if digits[index] > 9 {
                return Err(Error::MalformedInput(Malformed::NonDigit {
                    byte: digits[index],
                    index,
                }));
            }
            index += 1;
        }
        Ok(Self { digits })
    }

    /// Builds the identifier issued on `date` with the given serial and sex
    /// digit, deriving the checksum.
    ///
    /// `serial` is taken modulo 1000 and `sex_digit` modulo 10, matching the
    /// width of their fields.
    ///
    /// # Example
    ///
    /// ```
    /// use pesel::{CalendarDate, Pesel};
    ///
    /// let date = CalendarDate::new(1944, 5, 14).unwrap();
    /// let pesel = Pesel::from_components(&date, 14, 5);
    /// assert_eq!(pesel.to_string(), "44051401458");
    /// ```
    pub const fn from_components(date: &CalendarDate, serial: u16, sex_digit: u8) -> Self {
        debug_assert!(serial < 1000, "serial exceeds three digits");
        debug_assert!(sex_digit < 10, "sex digit exceeds one digit");
        let serial = serial % 1000;
        Self::from_suffix(date, serial * 10 + (sex_digit % 10) as u16)
    }

    /// Builds the identifier issued on `date` whose serial and sex digit,
    /// read together as a four-digit number, equal `suffix`. The checksum is
    /// derived.
    pub const fn from_suffix(date: &CalendarDate, suffix: u16) -> Self {
        let head = encode_date(date);
        let suffix = suffix % 10_000;
        let mut digits = [
            head[0],
            head[1],
            head[2],
            head[3],
            head[4],
            head[5],
            (suffix / 1000) as u8,
            (suffix / 100 % 10) as u8,
            (suffix / 10 % 10) as u8,
            (suffix % 10) as u8,
            0,
        ];
        let mut prefix = [0_u8; 10];
        let mut i = 0;
        while i < 10 {
            prefix[i] = digits[i];
            i += 1;
        }
        digits[10] = checksum_digit(&prefix);
        Self { digits }
    }

    /// Joins the date digits of `date` with a five-digit fragment verbatim.
    ///
    /// The fragment's checksum digit is kept as given, so the result may fail
    /// validation.
    pub const fn from_parts(date: &CalendarDate, fragment: &Fragment) -> Self {
        let head = encode_date(date);
        let tail = fragment.digits();
        Self {
            digits: [
                head[0], head[1], head[2], head[3], head[4], head[5], tail[0], tail[1], tail[2],
                tail[3], tail[4],
            ],
        }
    }

    /// All eleven digit values.
    pub const fn digits(&self) -> &[u8; 11] {
        &self.digits
    }

    /// The ten digits covered by the checksum.
    pub const fn prefix(&self) -> [u8; 10] {
        let d = &self.digits;
        [d[0], d[1], d[2], d[3], d[4], d[5], d[6], d[7], d[8], d[9]]
    }

    /// Two-digit year within the century.
    pub const fn year_field(&self) -> u8 {
        self.digits[0] * 10 + self.digits[1]
    }

    /// Two-digit month code, century offset included.
    pub const fn month_code(&self) -> u8 {
        self.digits[2] * 10 + self.digits[3]
    }

    /// Two-digit day field.
    pub const fn day_field(&self) -> u8 {
        self.digits[4] * 10 + self.digits[5]
    }

    /// Three-digit serial number, `0..=999`.
    pub const fn serial(&self) -> u16 {
        self.digits[6] as u16 * 100 + self.digits[7] as u16 * 10 + self.digits[8] as u16
    }

    /// The tenth digit, whose parity encodes the sex.
    pub const fn sex_digit(&self) -> u8 {
        self.digits[9]
    }

    /// Sex derived from [`Pesel::sex_digit`].
    pub const fn sex(&self) -> Sex {
        Sex::from_digit(self.sex_digit())
    }

    /// Serial and sex digit read together, `0..=9999`.
    pub const fn suffix(&self) -> u16 {
        self.serial() * 10 + self.sex_digit() as u16
    }

    /// The control digit as written.
    pub const fn checksum(&self) -> u8 {
        self.digits[10]
    }

    /// The last five digits: serial, sex digit and checksum.
    pub const fn fragment(&self) -> Fragment {
        let d = &self.digits;
        Fragment::from_digits_unchecked([d[6], d[7], d[8], d[9], d[10]])
    }
}

impl fmt::Display for Pesel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.digits {
            fmt::Write::write_char(f, char::from(b'0' + d))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Pesel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pesel").field(&format_args!("{self}")).finish()
    }
}

impl FromStr for Pesel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::error::parse_digits::<11>(s).map(|digits| Self { digits })
    }
}

impl TryFrom<&str> for Pesel {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}
