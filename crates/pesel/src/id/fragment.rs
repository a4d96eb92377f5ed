use crate::{Error, Result, weighted_sum};
use core::{fmt, str::FromStr};

/// The last five digits of an identifier: three serial digits, the sex digit
/// and the checksum digit.
///
/// Used as a search key when the birth date is unknown.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fragment {
    digits: [u8; 5],
}

impl Fragment {
    /// Number of digits in a fragment.
    pub const LEN: usize = 5;

    pub(crate) const fn from_digits_unchecked(digits: [u8; 5]) -> Self {
        Self { digits }
    }

    /// The five digit values.
    pub const fn digits(&self) -> &[u8; 5] {
        &self.digits
    }

    /// Serial and sex digit read together, `0..=9999`.
    pub const fn suffix(&self) -> u16 {
        let d = &self.digits;
        d[0] as u16 * 1000 + d[1] as u16 * 100 + d[2] as u16 * 10 + d[3] as u16
    }

    /// The checksum digit the completed identifier must carry.
    pub const fn checksum(&self) -> u8 {
        self.digits[4]
    }

    /// Weighted checksum contribution of the serial and sex digits
    /// (positions 6 to 9).
    pub(crate) const fn weighted_sum(&self) -> u8 {
        let d = &self.digits;
        weighted_sum(&[d[0], d[1], d[2], d[3]], 6)
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for d in self.digits {
            fmt::Write::write_char(f, char::from(b'0' + d))?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Fragment").field(&format_args!("{self}")).finish()
    }
}

impl FromStr for Fragment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        crate::error::parse_digits::<5>(s).map(|digits| Self { digits })
    }
}

impl TryFrom<&str> for Fragment {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        s.parse()
    }
}
