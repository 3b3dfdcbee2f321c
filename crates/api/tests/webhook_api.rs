//! Integration tests for the payment webhook: signature checks, crediting,
//! and idempotent redelivery.

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Utc;
use common::{body_json, get_auth, seed_profile, TEST_WEBHOOK_SECRET};
use lingua_core::signature::compute_signature;
use sqlx::PgPool;
use tower::ServiceExt;

fn checkout_event(session_id: &str, profile_id: i64, coins: i64) -> String {
    serde_json::json!({
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": session_id,
                "metadata": {
                    "profile_id": profile_id.to_string(),
                    "coins": coins.to_string()
                }
            }
        }
    })
    .to_string()
}

fn signed_header(body: &str) -> String {
    let timestamp = Utc::now().timestamp();
    let signature = compute_signature(TEST_WEBHOOK_SECRET, timestamp, body.as_bytes());
    format!("t={timestamp},v1={signature}")
}

async fn deliver(pool: PgPool, body: String, header: String) -> axum::response::Response {
    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/webhooks/payments")
        .header("Stripe-Signature", header)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("request should build");
    app.oneshot(request).await.expect("request should complete")
}

// ---------------------------------------------------------------------------
// Crediting
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn valid_event_credits_purchase(pool: PgPool) {
    let (profile, token) = seed_profile(&pool, 0, false).await;

    let body = checkout_event("cs_test_alpha", profile.id, 1200);
    let header = signed_header(&body);
    let response = deliver(pool.clone(), body, header).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/coins/balance",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["coin_balance"], 1200);

    // The ledger entry carries the session id.
    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/coins/transactions?kind=purchase",
        &token,
    )
    .await;
    let json = body_json(response).await;
    let entries = json["data"].as_array().expect("data should be an array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["external_ref"], "cs_test_alpha");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn redelivery_does_not_double_credit(pool: PgPool) {
    let (profile, token) = seed_profile(&pool, 0, false).await;

    let body = checkout_event("cs_test_dup", profile.id, 500);

    let response = deliver(pool.clone(), body.clone(), signed_header(&body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The provider retries the same event. Still 200, but no second credit.
    let response = deliver(pool.clone(), body.clone(), signed_header(&body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/coins/balance",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["coin_balance"], 500);
}

// ---------------------------------------------------------------------------
// Rejection paths
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn bad_signature_is_rejected(pool: PgPool) {
    let (profile, token) = seed_profile(&pool, 0, false).await;

    let body = checkout_event("cs_test_bad", profile.id, 500);
    let timestamp = Utc::now().timestamp();
    let header = format!("t={timestamp},v1={}", "0".repeat(64));

    let response = deliver(pool.clone(), body, header).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/coins/balance",
        &token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["coin_balance"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_timestamp_is_rejected(pool: PgPool) {
    let (profile, _) = seed_profile(&pool, 0, false).await;

    let body = checkout_event("cs_test_stale", profile.id, 500);
    let timestamp = Utc::now().timestamp() - 3600;
    let signature = compute_signature(TEST_WEBHOOK_SECRET, timestamp, body.as_bytes());
    let header = format!("t={timestamp},v1={signature}");

    let response = deliver(pool, body, header).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_signature_header_is_rejected(pool: PgPool) {
    let (profile, _) = seed_profile(&pool, 0, false).await;
    let body = checkout_event("cs_test_nohdr", profile.id, 500);

    let app = common::build_test_app(pool);
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/webhooks/payments")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .expect("request should build");
    let response = app.oneshot(request).await.expect("request should complete");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unrelated_event_type_is_acknowledged(pool: PgPool) {
    let body = serde_json::json!({
        "type": "invoice.paid",
        "data": { "object": { "id": "in_test_1" } }
    })
    .to_string();

    let response = deliver(pool, body.clone(), signed_header(&body)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn event_with_malformed_metadata_is_rejected(pool: PgPool) {
    let body = serde_json::json!({
        "type": "checkout.session.completed",
        "data": {
            "object": {
                "id": "cs_test_malformed",
                "metadata": { "profile_id": "seven", "coins": "-5" }
            }
        }
    })
    .to_string();

    let response = deliver(pool, body.clone(), signed_header(&body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
