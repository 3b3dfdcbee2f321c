//! Handlers for the `/coins` resource: balance, own ledger, checkout.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use lingua_core::economy::{self, TransactionKind};
use lingua_core::error::CoreError;
use lingua_db::models::coin_transaction::CoinTransaction;
use lingua_db::repositories::ledger_repo::TransactionFilter;
use lingua_db::repositories::LedgerRepo;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Response body for `GET /coins/balance`.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub coin_balance: i64,
    pub total_study_secs: i64,
    pub streak_days: i32,
    pub last_check_in_on: Option<NaiveDate>,
}

/// Query parameters for `GET /coins/transactions`.
#[derive(Debug, Deserialize)]
pub struct TransactionListParams {
    pub kind: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(flatten)]
    pub page: PaginationParams,
}

/// Request body for `POST /coins/checkout`.
#[derive(Debug, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Id of one of the fixed coin packs (`starter`, `standard`, `premium`).
    pub pack: String,
}

/// Response body for `POST /coins/checkout`.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: String,
    pub coins: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/coins/balance
///
/// The caller's current balance plus study/streak counters. Everything is
/// read from the profile row loaded by the auth extractor for this request.
pub async fn get_balance(user: AuthUser) -> AppResult<Json<BalanceResponse>> {
    let p = user.profile;
    Ok(Json(BalanceResponse {
        coin_balance: p.coin_balance,
        total_study_secs: p.total_study_secs,
        streak_days: p.streak_days,
        last_check_in_on: p.last_check_in_on,
    }))
}

/// GET /api/v1/coins/transactions
///
/// The caller's own ledger entries, newest first, with optional kind and
/// date-range filters.
pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<TransactionListParams>,
) -> AppResult<Json<DataResponse<Vec<CoinTransaction>>>> {
    let kind = parse_kind(params.kind.as_deref())?;
    let (limit, offset) = params.page.clamp();

    let filter = TransactionFilter {
        profile_id: Some(user.profile.id),
        kind,
        from: params.from,
        to: params.to,
    };
    let entries = LedgerRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/coins/checkout
///
/// Create a payment-provider checkout session for one of the fixed coin
/// packs. Crediting happens later, via the completion webhook.
pub async fn create_checkout(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCheckoutRequest>,
) -> AppResult<(StatusCode, Json<CheckoutResponse>)> {
    let pack = economy::find_pack(&input.pack).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown coin pack: {}",
            input.pack
        )))
    })?;

    let session = state
        .payments
        .create_checkout_session(user.profile.id, pack)
        .await?;

    tracing::info!(
        profile_id = user.profile.id,
        pack = pack.id,
        session_id = %session.id,
        "Created checkout session"
    );

    Ok((
        StatusCode::CREATED,
        Json(CheckoutResponse {
            session_id: session.id,
            url: session.url,
            coins: pack.coins,
        }),
    ))
}

/// Parse an optional `kind` query value, rejecting unknown kinds.
fn parse_kind(kind: Option<&str>) -> Result<Option<TransactionKind>, AppError> {
    match kind {
        None => Ok(None),
        Some(s) => TransactionKind::parse(s).map(Some).ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown transaction kind: {s}"
            )))
        }),
    }
}
