//! Account backend contract
//!
//! Every remote operation the flows perform goes through [`AccountBackend`].
//! It has exactly two outcomes: a response, or a [`BackendError`] whose
//! user-facing message is shown on the screen that made the request. The
//! simulated implementation lives in [`crate::simulated`]; the HTTP one in the
//! `networking` crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Backend error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The service refused the request; the message is meant for the user
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// The service could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with something we could not understand
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl BackendError {
    /// Text to show under the form
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Rejected(message) => message.clone(),
            BackendError::Network(_) => {
                "Sem conexão com o servidor. Verifique sua internet e tente novamente.".to_string()
            }
            BackendError::InvalidResponse(_) => {
                "Não foi possível concluir a operação. Tente novamente.".to_string()
            }
        }
    }
}

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Data collected by the account-creation flow
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountDraft {
    /// Email address
    pub email: String,
    /// CPF, masked
    pub cpf: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Phone, masked
    pub phone: String,
}

impl AccountDraft {
    /// Full display name
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
    }
}

/// Kind of request, used for logging and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Sign in
    Login,
    /// Register a new account
    CreateAccount,
    /// Send a password-recovery code
    SendOtp,
    /// Check a password-recovery code
    VerifyOtp,
    /// Set a new password
    UpdatePassword,
}

/// A request to the account service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BackendRequest {
    /// Sign in with email and password
    Login {
        /// Email address
        email: String,
        /// Password
        password: String,
    },
    /// Register a new account
    CreateAccount {
        /// Personal data
        account: AccountDraft,
        /// Chosen password
        password: String,
    },
    /// Send a recovery code to `email`
    SendOtp {
        /// Email address
        email: String,
    },
    /// Check the recovery code sent to `email`
    VerifyOtp {
        /// Email address
        email: String,
        /// Code typed by the user
        code: String,
    },
    /// Replace the password of `email`
    UpdatePassword {
        /// Email address
        email: String,
        /// New password
        password: String,
    },
}

impl BackendRequest {
    /// Kind of this request
    pub fn kind(&self) -> RequestKind {
        match self {
            BackendRequest::Login { .. } => RequestKind::Login,
            BackendRequest::CreateAccount { .. } => RequestKind::CreateAccount,
            BackendRequest::SendOtp { .. } => RequestKind::SendOtp,
            BackendRequest::VerifyOtp { .. } => RequestKind::VerifyOtp,
            BackendRequest::UpdatePassword { .. } => RequestKind::UpdatePassword,
        }
    }
}

/// Authenticated user session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Email address of the signed-in user
    pub email: String,
    /// Name to greet the user with
    pub display_name: String,
    /// Opaque access token
    pub access_token: String,
    /// When the session was issued
    pub issued_at: DateTime<Utc>,
}

/// A response from the account service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendResponse {
    /// Login succeeded
    Session(Session),
    /// The operation was accepted
    Accepted,
}

impl BackendResponse {
    /// Extract the session of a login response
    pub fn into_session(self) -> Result<Session> {
        match self {
            BackendResponse::Session(session) => Ok(session),
            BackendResponse::Accepted => Err(BackendError::InvalidResponse(
                "expected a session".to_string(),
            )),
        }
    }
}

/// The account service
///
/// Implementations must be cheap to share (`Arc<dyn AccountBackend>`); the
/// flows clone the handle into every effect.
#[async_trait]
pub trait AccountBackend: Send + Sync {
    /// Perform `request`
    async fn submit(&self, request: BackendRequest) -> Result<BackendResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_for_rejection_is_passed_through() {
        let error = BackendError::Rejected("Código inválido".to_string());
        assert_eq!(error.user_message(), "Código inválido");
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let error = BackendError::Network("connection reset by peer".to_string());
        assert!(!error.user_message().contains("reset"));
    }

    #[test]
    fn test_request_kind() {
        let request = BackendRequest::VerifyOtp {
            email: "a@b.com".to_string(),
            code: "123456".to_string(),
        };
        assert_eq!(request.kind(), RequestKind::VerifyOtp);
    }

    #[test]
    fn test_request_serialization() {
        let request = BackendRequest::SendOtp {
            email: "a@b.com".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "send_otp");
        assert_eq!(json["email"], "a@b.com");
    }

    #[test]
    fn test_into_session() {
        assert!(matches!(
            BackendResponse::Accepted.into_session(),
            Err(BackendError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_full_name() {
        let draft = AccountDraft {
            first_name: " Ana ".to_string(),
            last_name: "Souza".to_string(),
            ..Default::default()
        };
        assert_eq!(draft.full_name(), "Ana Souza");
    }
}
