//! Core application logic for ClickConsultas
//!
//! This crate contains the rules shared by every flow: form validation,
//! document and phone masks, password strength, the verification-code input
//! model, the account backend contract and the application configuration.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod config;
pub mod cpf;
pub mod otp;
pub mod password;
pub mod phone;
pub mod simulated;
pub mod validation;

pub use auth::{
    AccountBackend, AccountDraft, BackendError, BackendRequest, BackendResponse, RequestKind,
    Session,
};
pub use config::{AppConfig, BackendConfig, ConfigError, HttpConfig, OtpConfig, SimulationConfig};
pub use password::PasswordStrength;
pub use simulated::SimulatedBackend;
pub use validation::ValidationError;
