//! Brazilian phone number masking and validation

use crate::validation::{digits, Result, ValidationError};

/// Landline length (area code + 8 digits)
pub const MIN_PHONE_DIGITS: usize = 10;

/// Mobile length (area code + 9 digits)
pub const MAX_PHONE_DIGITS: usize = 11;

/// Apply the phone mask to whatever has been typed so far
///
/// | digits | result            |
/// |--------|-------------------|
/// | 1–2    | `(DD`             |
/// | 3–6    | `(DD) NNNN`       |
/// | 7–10   | `(DD) NNNN-NNNN`  |
/// | 11     | `(DD) NNNNN-NNNN` |
///
/// Input beyond 11 digits is dropped; empty input stays empty.
///
/// # Example
///
/// ```
/// use app_core::phone::format;
///
/// assert_eq!(format("11987654321"), "(11) 98765-4321");
/// assert_eq!(format("1187654321"), "(11) 8765-4321");
/// ```
pub fn format(input: &str) -> String {
    let digits: String = digits(input).chars().take(MAX_PHONE_DIGITS).collect();
    let len = digits.len();

    match len {
        0 => String::new(),
        1..=2 => format!("({}", digits),
        3..=6 => format!("({}) {}", &digits[..2], &digits[2..]),
        7..=10 => format!("({}) {}-{}", &digits[..2], &digits[2..6], &digits[6..]),
        _ => format!("({}) {}-{}", &digits[..2], &digits[2..7], &digits[7..]),
    }
}

/// Check a phone number, masked or not: 10 or 11 digits
pub fn validate(input: &str) -> Result<()> {
    let count = digits(input).len();
    if count < MIN_PHONE_DIGITS {
        return Err(ValidationError::PhoneTooShort);
    }
    if count > MAX_PHONE_DIGITS {
        return Err(ValidationError::PhoneTooLong);
    }
    Ok(())
}
