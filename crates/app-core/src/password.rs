//! Password strength scoring

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::validation::{Result, ValidationError};

/// Minimum length that earns the length point
pub const MIN_STRONG_LENGTH: usize = 8;

/// Strength bucket shown under the password field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordStrength {
    /// Score 0–2
    #[default]
    Weak,
    /// Score 3–4
    Medium,
    /// Score 5
    Strong,
}

impl PasswordStrength {
    /// Evaluate `password`
    ///
    /// # Example
    ///
    /// ```
    /// use app_core::password::PasswordStrength;
    ///
    /// assert_eq!(PasswordStrength::of("abc"), PasswordStrength::Weak);
    /// assert_eq!(PasswordStrength::of("Abcdef1!"), PasswordStrength::Strong);
    /// ```
    pub fn of(password: &str) -> Self {
        Self::from_score(score(password))
    }

    /// Map a 0–5 score to a bucket
    pub fn from_score(score: u8) -> Self {
        match score {
            0..=2 => PasswordStrength::Weak,
            3..=4 => PasswordStrength::Medium,
            _ => PasswordStrength::Strong,
        }
    }

    /// Label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            PasswordStrength::Weak => "Fraca",
            PasswordStrength::Medium => "Média",
            PasswordStrength::Strong => "Forte",
        }
    }
}

/// One point each for: length ≥ 8, uppercase, lowercase, digit, symbol
pub fn score(password: &str) -> u8 {
    let checks = [
        password.graphemes(true).count() >= MIN_STRONG_LENGTH,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_lowercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    checks.iter().filter(|&&passed| passed).count() as u8
}

/// Check a new password and its confirmation
///
/// Both must be filled in, equal, and not weak.
pub fn validate_new_password(password: &str, confirmation: &str) -> Result<()> {
    if password.is_empty() || confirmation.is_empty() {
        return Err(ValidationError::MissingPasswords);
    }
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    if PasswordStrength::of(password) == PasswordStrength::Weak {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

/// Whether the update button should be enabled
pub fn can_submit(password: &str, confirmation: &str) -> bool {
    validate_new_password(password, confirmation).is_ok()
}
