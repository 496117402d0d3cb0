//! Integration tests for the HTTP backend
//!
//! These tests use wiremock to stand in for the account service and check
//! the request paths, bodies, and error mapping.

use app_core::auth::{AccountBackend, BackendError, BackendRequest, BackendResponse};
use networking::{HttpBackend, HttpBackendConfig};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend(server: &MockServer) -> HttpBackend {
    HttpBackend::new(HttpBackendConfig::new(server.uri())).unwrap()
}

// =============================================================================
// Successful Request Tests
// =============================================================================

#[tokio::test]
async fn test_login_returns_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "ana@gmail.com", "password": "secret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "email": "ana@gmail.com",
            "display_name": "Ana Souza",
            "access_token": "abc123",
            "issued_at": "2025-08-25T12:00:00Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = backend(&mock_server)
        .submit(BackendRequest::Login {
            email: "ana@gmail.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap();

    let session = response.into_session().unwrap();
    assert_eq!(session.display_name, "Ana Souza");
    assert_eq!(session.access_token, "abc123");
}

#[tokio::test]
async fn test_send_otp_accepted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/password/otp"))
        .and(body_json(json!({ "email": "ana@gmail.com" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = backend(&mock_server)
        .submit(BackendRequest::SendOtp {
            email: "ana@gmail.com".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response, BackendResponse::Accepted);
}

#[tokio::test]
async fn test_update_password_accepted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let response = backend(&mock_server)
        .submit(BackendRequest::UpdatePassword {
            email: "ana@gmail.com".to_string(),
            password: "Abcdef1!".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response, BackendResponse::Accepted);
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_rejection_message_is_passed_through() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/password/otp/verify"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Código inválido" })),
        )
        .mount(&mock_server)
        .await;

    let error = backend(&mock_server)
        .submit(BackendRequest::VerifyOtp {
            email: "ana@gmail.com".to_string(),
            code: "000000".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(error, BackendError::Rejected("Código inválido".to_string()));
    assert_eq!(error.user_message(), "Código inválido");
}

#[tokio::test]
async fn test_server_error_without_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/accounts"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&mock_server)
        .await;

    let error = backend(&mock_server)
        .submit(BackendRequest::CreateAccount {
            account: Default::default(),
            password: "Abcdef1!".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(error, BackendError::InvalidResponse("HTTP 500".to_string()));
}

#[tokio::test]
async fn test_malformed_login_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "x" })))
        .mount(&mock_server)
        .await;

    let error = backend(&mock_server)
        .submit(BackendRequest::Login {
            email: "ana@gmail.com".to_string(),
            password: "secret".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(error, BackendError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_timeout_is_a_network_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/password/otp"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let config = HttpBackendConfig::new(mock_server.uri()).with_timeout(Duration::from_millis(100));
    let error = HttpBackend::new(config)
        .unwrap()
        .submit(BackendRequest::SendOtp {
            email: "ana@gmail.com".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(error, BackendError::Network(_)));
}

#[tokio::test]
async fn test_unreachable_server_is_a_network_error() {
    let config = HttpBackendConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2));
    let error = HttpBackend::new(config)
        .unwrap()
        .submit(BackendRequest::SendOtp {
            email: "ana@gmail.com".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(error, BackendError::Network(_)));
}
