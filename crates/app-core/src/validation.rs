//! Form validation
//!
//! Every flow step validates its fields when the primary action is tapped.
//! Failures are typed; their `Display` text is the message shown under the
//! form.

use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Domains offered as completions once the user types `@`
pub const EMAIL_SUGGESTIONS: [&str; 3] = ["@gmail.com", "@hotmail.com", "@yahoo.com.br"];

/// Minimum length of a first name, in characters
pub const MIN_FIRST_NAME_LENGTH: usize = 2;

/// Validation failure for a single form
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Empty email or missing `@`
    #[error("Por favor, insira um email válido")]
    InvalidEmail,

    /// Empty password on login
    #[error("Por favor, insira sua senha")]
    MissingPassword,

    /// CPF without exactly 11 digits
    #[error("CPF deve ter 11 dígitos")]
    CpfLength,

    /// CPF with wrong check digits or all digits equal
    #[error("CPF inválido")]
    InvalidCpf,

    /// Empty first name
    #[error("Por favor, insira seu nome")]
    MissingFirstName,

    /// Empty last name
    #[error("Por favor, insira seu sobrenome")]
    MissingLastName,

    /// First name below [`MIN_FIRST_NAME_LENGTH`]
    #[error("Nome deve ter pelo menos 2 caracteres")]
    FirstNameTooShort,

    /// Fewer than 10 phone digits
    #[error("Telefone deve ter pelo menos 10 dígitos")]
    PhoneTooShort,

    /// More than 11 phone digits
    #[error("Telefone deve ter no máximo 11 dígitos")]
    PhoneTooLong,

    /// New password or confirmation left empty
    #[error("Preencha a nova senha e a confirmação")]
    MissingPasswords,

    /// Confirmation differs from the new password
    #[error("As senhas não coincidem")]
    PasswordMismatch,

    /// Password scored as weak
    #[error("A senha é muito fraca")]
    WeakPassword,

    /// OTP code with missing digits
    #[error("Digite o código completo")]
    IncompleteCode,

    /// Terms not accepted
    #[error("Você precisa aceitar os termos de uso para continuar")]
    TermsNotAccepted,
}

/// Result type for validation
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Keep only ASCII digits
pub fn digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Check an email address
///
/// The rule is deliberately loose: non-empty and containing `@`. The server
/// owns real address verification.
///
/// # Example
///
/// ```
/// use app_core::validation::{validate_email, ValidationError};
///
/// assert!(validate_email("ana@example.com").is_ok());
/// assert_eq!(validate_email(""), Err(ValidationError::InvalidEmail));
/// ```
pub fn validate_email(email: &str) -> Result<()> {
    if email.trim().is_empty() || !email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Whether domain suggestions should be offered for `email`
pub fn should_suggest_domains(email: &str) -> bool {
    email.contains('@')
}

/// Complete `email` with a domain suggestion
///
/// Everything from the last `@` is replaced by `suggestion`. Without an `@`
/// the suggestion is appended.
pub fn apply_email_suggestion(email: &str, suggestion: &str) -> String {
    let base = match email.rfind('@') {
        Some(at) => &email[..at],
        None => email,
    };
    format!("{}{}", base, suggestion)
}

/// Check login credentials before sending them
pub fn validate_credentials(email: &str, password: &str) -> Result<()> {
    validate_email(email)?;
    if password.is_empty() {
        return Err(ValidationError::MissingPassword);
    }
    Ok(())
}

/// Check the personal-name step
pub fn validate_names(first_name: &str, last_name: &str) -> Result<()> {
    let first_name = first_name.trim();
    if first_name.is_empty() {
        return Err(ValidationError::MissingFirstName);
    }
    if last_name.trim().is_empty() {
        return Err(ValidationError::MissingLastName);
    }
    if first_name.graphemes(true).count() < MIN_FIRST_NAME_LENGTH {
        return Err(ValidationError::FirstNameTooShort);
    }
    Ok(())
}
