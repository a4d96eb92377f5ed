use crate::Pesel;

/// Positional weights applied to the first ten digits.
pub const WEIGHTS: [u8; 10] = [1, 3, 7, 9, 1, 3, 7, 9, 1, 3];

/// Weighted sum (mod 10) of `digits`, placed starting at position `offset`.
///
/// Partial sums over disjoint ranges add up mod 10, which lets a search
/// precompute the part of the checksum that does not change between
/// candidates.
///
/// Every entry of `digits` must be a decimal digit (`0..=9`). Larger values
/// give a meaningless sum in release builds.
///
/// # Panics
///
/// Panics if `offset + digits.len()` exceeds ten, or in debug builds if any
/// entry of `digits` is above nine.
pub const fn weighted_sum(digits: &[u8], offset: usize) -> u8 {
    let mut sum = 0_u8;
    let mut i = 0;
    while i < digits.len() {
        debug_assert!(digits[i] <= 9, "weighted_sum expects decimal digits");
        sum = (sum + (digits[i] * WEIGHTS[offset + i]) % 10) % 10;
        i += 1;
    }
    sum
}

/// Turns a weighted sum into the control digit.
pub const fn control_digit(sum: u8) -> u8 {
    (10 - sum % 10) % 10
}

/// Computes the control digit for the first ten digits of an identifier.
///
/// Each entry must be in `0..=9`, as for [`weighted_sum`].
///
/// # Example
///
/// ```
/// assert_eq!(pesel::checksum_digit(&[4, 4, 0, 5, 1, 4, 0, 1, 4, 5]), 8);
/// ```
pub const fn checksum_digit(digits: &[u8; 10]) -> u8 {
    control_digit(weighted_sum(digits, 0))
}

/// Returns `true` if the last digit of `pesel` matches the control digit
/// derived from the first ten.
pub const fn verify(pesel: &Pesel) -> bool {
    checksum_digit(&pesel.prefix()) == pesel.checksum()
}
