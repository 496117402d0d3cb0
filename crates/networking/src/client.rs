//! HTTP account backend
//!
//! Every request is a JSON `POST`:
//!
//! | request          | path                        |
//! |------------------|-----------------------------|
//! | `Login`          | `/auth/login`               |
//! | `CreateAccount`  | `/accounts`                 |
//! | `SendOtp`        | `/auth/password/otp`        |
//! | `VerifyOtp`      | `/auth/password/otp/verify` |
//! | `UpdatePassword` | `/auth/password`            |
//!
//! A non-2xx answer carrying `{"message": ...}` becomes
//! [`BackendError::Rejected`] so the message reaches the user unchanged.

use std::time::Duration;

use app_core::auth::{AccountBackend, BackendError, BackendRequest, BackendResponse, Session};
use app_core::config::HttpConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client as ReqwestClient, Response as ReqwestResponse};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

/// Errors building the client
#[derive(Debug, Error)]
pub enum ClientError {
    /// reqwest refused the configuration
    #[error("Failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for [`HttpBackend`]
#[derive(Debug, Clone)]
pub struct HttpBackendConfig {
    /// Service root, without trailing slash
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpBackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.clickconsultas.com.br".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("ClickConsultas/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpBackendConfig {
    /// Create a new config with a service URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Default::default()
        }
    }

    /// Set the timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl From<&HttpConfig> for HttpBackendConfig {
    fn from(config: &HttpConfig) -> Self {
        Self::new(config.base_url.as_str()).with_timeout(config.timeout())
    }
}

// =============================================================================
// Wire Formats
// =============================================================================

/// Body of a successful login
#[derive(Debug, Deserialize)]
struct LoginResponse {
    email: String,
    display_name: String,
    access_token: String,
    #[serde(default = "Utc::now")]
    issued_at: DateTime<Utc>,
}

impl From<LoginResponse> for Session {
    fn from(body: LoginResponse) -> Self {
        Session {
            email: body.email,
            display_name: body.display_name,
            access_token: body.access_token,
            issued_at: body.issued_at,
        }
    }
}

/// Body of an error answer
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Path and JSON body of `request`
fn route(request: &BackendRequest) -> (&'static str, Value) {
    match request {
        BackendRequest::Login { email, password } => {
            ("/auth/login", json!({ "email": email, "password": password }))
        }
        BackendRequest::CreateAccount { account, password } => {
            ("/accounts", json!({ "account": account, "password": password }))
        }
        BackendRequest::SendOtp { email } => ("/auth/password/otp", json!({ "email": email })),
        BackendRequest::VerifyOtp { email, code } => (
            "/auth/password/otp/verify",
            json!({ "email": email, "code": code }),
        ),
        BackendRequest::UpdatePassword { email, password } => (
            "/auth/password",
            json!({ "email": email, "password": password }),
        ),
    }
}

// =============================================================================
// HTTP Backend
// =============================================================================

/// Account backend talking to the ClickConsultas API
///
/// # Examples
/// ```no_run
/// use app_core::auth::{AccountBackend, BackendRequest};
/// use networking::{HttpBackend, HttpBackendConfig};
///
/// async fn example() -> Result<(), Box<dyn std::error::Error>> {
///     let backend = HttpBackend::new(HttpBackendConfig::new("https://api.example.com"))?;
///     backend
///         .submit(BackendRequest::SendOtp {
///             email: "ana@gmail.com".to_string(),
///         })
///         .await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: ReqwestClient,
    config: HttpBackendConfig,
}

impl HttpBackend {
    /// Create a new backend
    pub fn new(config: HttpBackendConfig) -> Result<Self, ClientError> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Configuration in use
    pub fn config(&self) -> &HttpBackendConfig {
        &self.config
    }

    async fn parse_response(
        &self,
        request: &BackendRequest,
        response: ReqwestResponse,
    ) -> Result<BackendResponse, BackendError> {
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(error) => BackendError::Rejected(error.message),
                Err(_) => BackendError::InvalidResponse(format!("HTTP {}", status.as_u16())),
            });
        }

        match request {
            BackendRequest::Login { .. } => {
                let body: LoginResponse = response
                    .json()
                    .await
                    .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
                Ok(BackendResponse::Session(body.into()))
            }
            _ => Ok(BackendResponse::Accepted),
        }
    }
}

#[async_trait]
impl AccountBackend for HttpBackend {
    async fn submit(&self, request: BackendRequest) -> Result<BackendResponse, BackendError> {
        let (path, body) = route(&request);
        let url = format!("{}{}", self.config.base_url, path);
        tracing::debug!(kind = ?request.kind(), %url, "Sending request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BackendError::Network(format!("Request failed: {}", e)))?;

        self.parse_response(&request, response).await
    }
}
