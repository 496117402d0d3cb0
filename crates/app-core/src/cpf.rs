//! CPF (Cadastro de Pessoas Físicas) masking and validation

use crate::validation::{digits, Result, ValidationError};

/// Number of digits in a CPF
pub const CPF_LENGTH: usize = 11;

/// Apply the `XXX.XXX.XXX-XX` mask to whatever has been typed so far
///
/// Non-digits are stripped and input beyond 11 digits is dropped, so
/// formatting a formatted value returns it unchanged.
///
/// # Example
///
/// ```
/// use app_core::cpf::format;
///
/// assert_eq!(format("1114447"), "111.444.7");
/// assert_eq!(format("11144477735"), "111.444.777-35");
/// assert_eq!(format("111.444.777-35"), "111.444.777-35");
/// ```
pub fn format(input: &str) -> String {
    let digits: String = digits(input).chars().take(CPF_LENGTH).collect();
    let mut formatted = String::with_capacity(14);

    for (i, c) in digits.chars().enumerate() {
        match i {
            3 | 6 => formatted.push('.'),
            9 => formatted.push('-'),
            _ => {}
        }
        formatted.push(c);
    }

    formatted
}

/// Check a CPF, masked or not
///
/// Requires exactly 11 digits, not all identical, with both mod-11 check
/// digits matching.
pub fn validate(input: &str) -> Result<()> {
    let numbers: Vec<u32> = digits(input).chars().filter_map(|c| c.to_digit(10)).collect();

    if numbers.len() != CPF_LENGTH {
        return Err(ValidationError::CpfLength);
    }

    if numbers.iter().all(|&n| n == numbers[0]) {
        return Err(ValidationError::InvalidCpf);
    }

    if numbers[9] != check_digit(&numbers[..9]) || numbers[10] != check_digit(&numbers[..10]) {
        return Err(ValidationError::InvalidCpf);
    }

    Ok(())
}

/// Whether `input` is a valid CPF
pub fn is_valid(input: &str) -> bool {
    validate(input).is_ok()
}

/// Mod-11 check digit over `numbers`, weights descending to 2
fn check_digit(numbers: &[u32]) -> u32 {
    let top = numbers.len() as u32 + 1;
    let sum: u32 = numbers
        .iter()
        .enumerate()
        .map(|(i, n)| n * (top - i as u32))
        .sum();

    match sum % 11 {
        remainder if remainder < 2 => 0,
        remainder => 11 - remainder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_progressive() {
        assert_eq!(format(""), "");
        assert_eq!(format("111"), "111");
        assert_eq!(format("1114"), "111.4");
        assert_eq!(format("111444"), "111.444");
        assert_eq!(format("1114447"), "111.444.7");
        assert_eq!(format("111444777"), "111.444.777");
        assert_eq!(format("1114447773"), "111.444.777-3");
        assert_eq!(format("11144477735"), "111.444.777-35");
    }

    #[test]
    fn test_format_is_idempotent() {
        for input in ["1", "1114", "1114447", "1114447773", "11144477735"] {
            let once = format(input);
            assert_eq!(format(&once), once);
        }
    }

    #[test]
    fn test_format_caps_at_eleven_digits() {
        assert_eq!(format("111444777351234"), "111.444.777-35");
    }

    #[test]
    fn test_format_strips_noise() {
        assert_eq!(format("111 444a777/35"), "111.444.777-35");
    }

    #[test]
    fn test_valid_cpf() {
        assert!(validate("11144477735").is_ok());
        assert!(validate("111.444.777-35").is_ok());
    }

    #[test]
    fn test_altered_check_digit_rejected() {
        assert_eq!(validate("11144477736"), Err(ValidationError::InvalidCpf));
        assert_eq!(validate("11144477725"), Err(ValidationError::InvalidCpf));
    }

    #[test]
    fn test_identical_digits_rejected() {
        for d in 0..=9 {
            let cpf = d.to_string().repeat(11);
            assert_eq!(validate(&cpf), Err(ValidationError::InvalidCpf), "{}", cpf);
        }
    }

    #[test]
    fn test_wrong_length() {
        assert_eq!(validate("1114447773"), Err(ValidationError::CpfLength));
        assert_eq!(validate("111444777351"), Err(ValidationError::CpfLength));
        assert_eq!(validate(""), Err(ValidationError::CpfLength));
    }

    #[test]
    fn test_check_digit_remainder_below_two_maps_to_zero() {
        assert_eq!(check_digit(&[1, 0, 0, 0, 0, 0, 0, 0, 0]), 1);
        assert_eq!(check_digit(&[0, 0, 0, 0, 0, 0, 0, 0, 1]), 9);
        // sum of 11
        assert_eq!(check_digit(&[0, 0, 0, 0, 0, 0, 0, 1, 4]), 0);
        assert_eq!(check_digit(&[0; 9]), 0);
    }

    #[test]
    fn test_is_valid() {
        assert!(is_valid("529.982.247-25"));
        assert!(!is_valid("529.982.247-26"));
    }
}
