//! Inbound payment-provider webhook handler.
//!
//! The raw request body is verified against the `Stripe-Signature` header
//! before any parsing. Crediting is idempotent: the session id is stored as
//! the purchase transaction's `external_ref`, which carries a unique index,
//! so a redelivered event cannot credit twice.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use lingua_core::economy::{self, TransactionKind};
use lingua_core::signature::{parse_signature_header, verify_signature};
use lingua_core::types::DbId;
use lingua_db::repositories::LedgerRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

/// The one event type this service acts on.
const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

// ---------------------------------------------------------------------------
// Event payload types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CheckoutSessionObject {
    id: String,
    #[serde(default)]
    metadata: SessionMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct SessionMetadata {
    profile_id: Option<String>,
    coins: Option<String>,
}

// ---------------------------------------------------------------------------
// Handler
// ---------------------------------------------------------------------------

/// POST /api/v1/webhooks/payments
///
/// Verify, parse, and apply a payment-provider event. Unrecognized event
/// types are acknowledged with 200 and otherwise ignored.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<StatusCode> {
    let header_value = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::BadRequest("Missing signature header".into()))?;

    let header = parse_signature_header(header_value)
        .map_err(|e| AppError::BadRequest(format!("Invalid signature header: {e}")))?;

    verify_signature(
        &state.config.payments.webhook_secret,
        &header,
        &body,
        Utc::now().timestamp(),
        state.config.payments.tolerance_secs,
    )
    .map_err(|e| AppError::BadRequest(format!("Webhook signature rejected: {e}")))?;

    let event: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Malformed event body: {e}")))?;

    let event_type = event
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or_else(|| AppError::BadRequest("Event missing type field".into()))?;

    if event_type != CHECKOUT_COMPLETED {
        tracing::info!(event_type, "Ignoring unhandled webhook event type");
        return Ok(StatusCode::OK);
    }

    let object = event
        .get("data")
        .and_then(|d| d.get("object"))
        .cloned()
        .ok_or_else(|| AppError::BadRequest("Event missing data.object".into()))?;
    let session: CheckoutSessionObject = serde_json::from_value(object)
        .map_err(|e| AppError::BadRequest(format!("Malformed checkout session: {e}")))?;

    let (profile_id, coins) = parse_metadata(&session)?;

    match LedgerRepo::credit(
        &state.pool,
        profile_id,
        coins,
        TransactionKind::Purchase,
        &economy::purchase_description(coins),
        Some(&session.id),
    )
    .await
    {
        Ok(Some(new_balance)) => {
            tracing::info!(
                profile_id,
                coins,
                session_id = %session.id,
                new_balance,
                "Credited coin purchase"
            );
            Ok(StatusCode::OK)
        }
        Ok(None) => Err(AppError::NotFound(format!(
            "No profile with id {profile_id} for checkout session {}",
            session.id
        ))),
        Err(err) if lingua_db::is_unique_violation(&err, "uq_coin_transactions_external_ref") => {
            // Redelivered event: already credited, acknowledge and move on.
            tracing::info!(
                session_id = %session.id,
                "Duplicate webhook delivery ignored"
            );
            Ok(StatusCode::OK)
        }
        Err(err) => Err(err.into()),
    }
}

/// Extract and validate the profile id and coin amount from session metadata.
fn parse_metadata(session: &CheckoutSessionObject) -> Result<(DbId, i64), AppError> {
    let profile_id: DbId = session
        .metadata
        .profile_id
        .as_deref()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| AppError::BadRequest("Session metadata missing profile_id".into()))?;

    let coins: i64 = session
        .metadata
        .coins
        .as_deref()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| AppError::BadRequest("Session metadata missing coins".into()))?;

    if coins <= 0 {
        return Err(AppError::BadRequest(
            "Session metadata coins must be positive".into(),
        ));
    }

    Ok((profile_id, coins))
}
