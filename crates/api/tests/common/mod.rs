//! Shared helpers for API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use lingua_api::auth::jwt::{generate_access_token, JwtConfig};
use lingua_api::config::{LlmConfig, PaymentConfig, ServerConfig};
use lingua_api::router::build_app_router;
use lingua_api::state::AppState;
use lingua_api::upstream::llm::LlmClient;
use lingua_api::upstream::payments::PaymentsClient;
use lingua_core::economy::TransactionKind;
use lingua_db::models::profile::{CreateProfile, Profile, UpdateProfile};
use lingua_db::repositories::{LedgerRepo, ProfileRepo};

/// JWT secret shared by [`test_config`] and token minting helpers.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret-that-is-long-enough";

/// Webhook secret used to compute valid test signatures.
pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";

/// Build a test `ServerConfig` with safe defaults and dummy secrets.
///
/// Upstream base URLs point at localhost so an accidental outbound call in a
/// test fails fast instead of hitting a real provider.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        public_base_url: "http://localhost:3000".to_string(),
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
        payments: PaymentConfig {
            secret_key: "sk_test_dummy".to_string(),
            webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
            api_base: "http://localhost:9".to_string(),
            tolerance_secs: 300,
            timeout_secs: 5,
        },
        llm: LlmConfig {
            api_key: "llm_test_dummy".to_string(),
            base_url: "http://localhost:9".to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 5,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// Uses [`build_app_router`] so integration tests exercise the same
/// middleware stack (CORS, request ID, timeout, tracing, panic recovery)
/// that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let payments = Arc::new(PaymentsClient::new(
        &config.payments,
        &config.public_base_url,
    ));
    let llm = Arc::new(LlmClient::new(&config.llm));

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        payments,
        llm,
    };
    build_app_router(state, &config)
}

/// Insert a profile with the given starting balance and admin flag, and
/// return it together with a valid access token for its subject.
pub async fn seed_profile(pool: &PgPool, balance: i64, is_admin: bool) -> (Profile, String) {
    let subject = Uuid::new_v4();
    let profile = ProfileRepo::create(
        pool,
        &CreateProfile {
            auth_subject: subject,
            display_name: format!("Test User {}", &subject.to_string()[..8]),
            email: Some(format!("{subject}@test.example")),
        },
    )
    .await
    .expect("profile creation should succeed");

    if balance > 0 {
        LedgerRepo::credit(
            pool,
            profile.id,
            balance,
            TransactionKind::Earn,
            "Seed balance",
            None,
        )
        .await
        .expect("seed credit should succeed");
    }

    let profile = if is_admin {
        ProfileRepo::update(
            pool,
            profile.id,
            &UpdateProfile {
                display_name: None,
                email: None,
                is_admin: Some(true),
            },
        )
        .await
        .expect("admin flag update should succeed")
        .expect("profile should exist")
    } else {
        ProfileRepo::find_by_id(pool, profile.id)
            .await
            .expect("profile lookup should succeed")
            .expect("profile should exist")
    };

    let jwt = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
    };
    let token = generate_access_token(subject, profile.email.clone(), &jwt)
        .expect("token generation should succeed");

    (profile, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send an unauthenticated GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

/// Send a JSON POST request with a bearer token.
pub async fn post_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

/// Send a JSON PUT request with a bearer token.
pub async fn put_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method("PUT")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

/// Send a DELETE request with a bearer token.
pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

/// Read a response body to completion and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Read a response body to completion as a UTF-8 string.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("body should be valid UTF-8")
}
