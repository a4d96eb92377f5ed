use core::fmt;

/// Sex recorded in the tenth digit of an identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sex {
    /// Even sex digit.
    Female,
    /// Odd sex digit.
    Male,
}

impl Sex {
    /// Derives the sex from the parity of a digit.
    pub const fn from_digit(digit: u8) -> Self {
        if digit % 2 == 0 {
            Self::Female
        } else {
            Self::Male
        }
    }

    /// Lowercase English name, as used on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
