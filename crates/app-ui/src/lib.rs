//! Screens and navigation for ClickConsultas
//!
//! This crate provides the headless UI layer: one reducer per screen, the
//! destinations each screen can present, and the navigation stack derived
//! from the presented chain.
//!
//! # Modules
//!
//! - [`screens`] - Application screens
//! - [`navigation`] - Routes and the navigation projection
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use app_core::simulated::SimulatedBackend;
//! use app_state::Store;
//! use app_ui::screens::{authentication, root, Environment};
//! use app_ui::navigation::Route;
//!
//! #[tokio::main]
//! async fn main() {
//!     let env = Environment::new(Arc::new(SimulatedBackend::default()));
//!     let store = Store::new(root::State::default(), root::Feature::new(env));
//!
//!     store.send(root::Action::Destination(
//!         app_state::PresentationAction::Presented(root::DestinationAction::Authentication(
//!             authentication::Action::ForgotPasswordTapped,
//!         )),
//!     ));
//!
//!     let stack = store.state().navigation().unwrap();
//!     assert_eq!(stack.current(), Route::ForgotPassword);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod navigation;
pub mod screens;

pub use navigation::{NavigationStack, Route, Screen};
pub use screens::Environment;
