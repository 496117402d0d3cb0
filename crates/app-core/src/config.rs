//! Application configuration
//!
//! Loaded from JSON; every field has a default so an empty object is a valid
//! configuration (simulated backend, 6-digit codes, 60 s resend countdown).

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::RequestKind;
use crate::otp::DEFAULT_CODE_LENGTH;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid JSON for [`AppConfig`]
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Which backend the flows talk to
    pub backend: BackendConfig,
    /// Verification code settings
    pub otp: OtpConfig,
}

impl AppConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        self.backend.validate()?;
        self.otp.validate()
    }
}

/// Backend selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// In-process fake with a fixed delay
    Simulated(SimulationConfig),
    /// Real HTTP service
    Http(HttpConfig),
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Simulated(SimulationConfig::default())
    }
}

impl BackendConfig {
    fn validate(&self) -> Result<()> {
        match self {
            BackendConfig::Simulated(config) => config.validate(),
            BackendConfig::Http(config) => config.validate(),
        }
    }
}

/// Settings of the simulated backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Delay before every response, in milliseconds
    pub latency_ms: u64,
    /// Probability (0.0–1.0) that a flaky request fails
    pub failure_rate: f64,
    /// Requests subject to failure injection
    pub flaky_requests: HashSet<RequestKind>,
    /// RNG seed for reproducible failures
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            latency_ms: 1000,
            failure_rate: 0.0,
            flaky_requests: HashSet::new(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// One failure in ten for account creation and code verification
    pub fn with_failure_injection() -> Self {
        Self {
            failure_rate: 0.1,
            flaky_requests: [RequestKind::CreateAccount, RequestKind::VerifyOtp]
                .into_iter()
                .collect(),
            ..Default::default()
        }
    }

    /// Set the latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_ms = latency.as_millis() as u64;
        self
    }

    /// Set the RNG seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Latency as a duration
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.failure_rate) {
            return Err(ConfigError::Invalid(format!(
                "failure_rate must be between 0 and 1, got {}",
                self.failure_rate
            )));
        }
        Ok(())
    }
}

/// Settings of the HTTP backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Service root, e.g. `https://api.clickconsultas.com.br`
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl HttpConfig {
    /// Config for `base_url` with the default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Timeout as a duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}

/// Verification code settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtpConfig {
    /// Number of digits
    pub code_length: usize,
    /// Seconds before a new code may be requested
    pub resend_after_secs: u32,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: DEFAULT_CODE_LENGTH,
            resend_after_secs: 60,
        }
    }
}

impl OtpConfig {
    fn validate(&self) -> Result<()> {
        if !(4..=8).contains(&self.code_length) {
            return Err(ConfigError::Invalid(format!(
                "otp.code_length must be between 4 and 8, got {}",
                self.code_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_object_uses_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.otp.code_length, 6);
        assert_eq!(config.otp.resend_after_secs, 60);
        assert!(matches!(config.backend, BackendConfig::Simulated(_)));
    }

    #[test]
    fn test_http_backend() {
        let config = AppConfig::from_json_str(
            r#"{"backend": {"kind": "http", "base_url": "https://api.example.com"}}"#,
        )
        .unwrap();
        match config.backend {
            BackendConfig::Http(http) => {
                assert_eq!(http.base_url, "https://api.example.com");
                assert_eq!(http.timeout(), Duration::from_secs(30));
            }
            other => panic!("unexpected backend: {:?}", other),
        }
    }

    #[test]
    fn test_simulated_backend_fields() {
        let config = AppConfig::from_json_str(
            r#"{"backend": {"kind": "simulated", "latency_ms": 10, "failure_rate": 0.1,
                "flaky_requests": ["create_account"], "seed": 7}}"#,
        )
        .unwrap();
        match config.backend {
            BackendConfig::Simulated(sim) => {
                assert_eq!(sim.latency(), Duration::from_millis(10));
                assert!(sim.flaky_requests.contains(&RequestKind::CreateAccount));
                assert_eq!(sim.seed, Some(7));
            }
            other => panic!("unexpected backend: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_failure_rate() {
        let result = AppConfig::from_json_str(
            r#"{"backend": {"kind": "simulated", "failure_rate": 1.5}}"#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_base_url() {
        let result =
            AppConfig::from_json_str(r#"{"backend": {"kind": "http", "base_url": "ftp://x"}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_code_length() {
        let result = AppConfig::from_json_str(r#"{"otp": {"code_length": 2}}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            AppConfig::from_json_str("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"otp": {{"resend_after_secs": 30}}}}"#).unwrap();
        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.otp.resend_after_secs, 30);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            AppConfig::from_file("/nonexistent/click-consultas.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_failure_injection_preset() {
        let sim = SimulationConfig::with_failure_injection();
        assert_eq!(sim.failure_rate, 0.1);
        assert!(sim.flaky_requests.contains(&RequestKind::VerifyOtp));
        assert!(!sim.flaky_requests.contains(&RequestKind::Login));
    }
}
