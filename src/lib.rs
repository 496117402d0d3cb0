//! ClickConsultas client
//!
//! Assembles the application from an [`AppConfig`]: picks the account
//! backend, wires it into the screen environment, and starts a [`Store`]
//! on the root screen.
//!
//! ```no_run
//! use app_core::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), click_consultas::AppError> {
//!     click_consultas::init_logging();
//!     let store = click_consultas::build_store(&AppConfig::default())?;
//!     assert!(!store.state().is_authenticated());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::sync::Arc;

use app_core::auth::AccountBackend;
use app_core::config::{AppConfig, BackendConfig, ConfigError};
use app_core::simulated::SimulatedBackend;
use app_state::Store;
use app_ui::screens::{root, Environment};
use networking::{ClientError, HttpBackend, HttpBackendConfig};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors assembling the application
#[derive(Debug, Error)]
pub enum AppError {
    /// The configuration is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP backend could not be created
    #[error("Backend error: {0}")]
    Client(#[from] ClientError),
}

/// Result type for application assembly
pub type Result<T> = std::result::Result<T, AppError>;

/// Install the global `tracing` subscriber
///
/// Filters at `info` unless `RUST_LOG` says otherwise. Calling it again, or
/// after another subscriber was installed, does nothing.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Account backend selected by `config`
pub fn build_backend(config: &AppConfig) -> Result<Arc<dyn AccountBackend>> {
    config.validate()?;
    let backend: Arc<dyn AccountBackend> = match &config.backend {
        BackendConfig::Simulated(simulation) => {
            tracing::info!(latency_ms = simulation.latency_ms, "Using simulated backend");
            Arc::new(SimulatedBackend::new(simulation.clone()))
        }
        BackendConfig::Http(http) => {
            tracing::info!(base_url = %http.base_url, "Using HTTP backend");
            Arc::new(HttpBackend::new(HttpBackendConfig::from(http))?)
        }
    };
    Ok(backend)
}

/// Screen environment for `config`
pub fn build_environment(config: &AppConfig) -> Result<Environment> {
    let backend = build_backend(config)?;
    Ok(Environment::new(backend).with_otp(config.otp.clone()))
}

/// Store on the login screen, ready to receive actions
///
/// Must be called inside a tokio runtime.
pub fn build_store(config: &AppConfig) -> Result<Store<root::Feature>> {
    let env = build_environment(config)?;
    Ok(Store::new(root::State::default(), root::Feature::new(env)))
}
