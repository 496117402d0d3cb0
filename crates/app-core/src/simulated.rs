//! In-process account service
//!
//! Answers every request after a fixed delay. Requests whose kind is listed in
//! [`SimulationConfig::flaky_requests`] fail with probability
//! [`SimulationConfig::failure_rate`].

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use crate::auth::{AccountBackend, BackendError, BackendRequest, BackendResponse, Result, Session};
use crate::config::SimulationConfig;

/// Message returned for injected failures
pub const SIMULATED_FAILURE_MESSAGE: &str = "Ocorreu um erro inesperado. Tente novamente.";

/// Fake backend with configurable latency and failure injection
pub struct SimulatedBackend {
    config: SimulationConfig,
    rng: Mutex<StdRng>,
}

impl SimulatedBackend {
    /// Create a backend from `config`
    pub fn new(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn should_fail(&self, request: &BackendRequest) -> bool {
        if self.config.failure_rate <= 0.0 || !self.config.flaky_requests.contains(&request.kind()) {
            return false;
        }
        self.rng.lock().gen_bool(self.config.failure_rate.min(1.0))
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

#[async_trait]
impl AccountBackend for SimulatedBackend {
    async fn submit(&self, request: BackendRequest) -> Result<BackendResponse> {
        let kind = request.kind();
        tracing::debug!(?kind, latency_ms = self.config.latency_ms, "Simulating request");

        tokio::time::sleep(self.config.latency()).await;

        if self.should_fail(&request) {
            tracing::warn!(?kind, "Injected failure");
            return Err(BackendError::Rejected(SIMULATED_FAILURE_MESSAGE.to_string()));
        }

        match request {
            BackendRequest::Login { email, .. } => {
                let display_name = email
                    .split('@')
                    .next()
                    .filter(|local| !local.is_empty())
                    .unwrap_or(email.as_str())
                    .to_string();
                Ok(BackendResponse::Session(Session {
                    display_name,
                    email,
                    access_token: Uuid::new_v4().to_string(),
                    issued_at: Utc::now(),
                }))
            }
            _ => Ok(BackendResponse::Accepted),
        }
    }
}
