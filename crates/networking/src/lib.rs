//! Networking for ClickConsultas
//!
//! This crate provides the HTTP implementation of the account backend, with
//! timeout handling and mapping of service errors to user-facing messages.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod client;

pub use client::{ClientError, HttpBackend, HttpBackendConfig};
