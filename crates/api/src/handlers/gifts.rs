//! Handlers for the gift catalog and user-facing redemptions.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use lingua_core::error::CoreError;
use lingua_core::types::DbId;
use lingua_db::models::gift::Gift;
use lingua_db::models::redemption::GiftRedemption;
use lingua_db::repositories::redemption_repo::{RedeemOutcome, RedemptionFilter};
use lingua_db::repositories::{GiftRepo, RedemptionRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /redemptions`.
#[derive(Debug, Deserialize)]
pub struct RedeemRequest {
    pub gift_id: DbId,
    /// Opaque shipping payload (address, contact) for physical gifts.
    pub shipping: Option<serde_json::Value>,
}

/// Response body for a successful redemption.
#[derive(Debug, Serialize)]
pub struct RedeemResponse {
    pub redemption: GiftRedemption,
    pub new_balance: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/gifts
///
/// Active catalog items, cheapest first.
pub async fn list_gifts(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Gift>>>> {
    let gifts = GiftRepo::list(&state.pool, false).await?;
    Ok(Json(DataResponse { data: gifts }))
}

/// POST /api/v1/redemptions
///
/// Redeem a gift. The debit, stock decrement, redemption row, and ledger
/// row commit atomically; failures leave no side effects.
pub async fn create_redemption(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<RedeemRequest>,
) -> AppResult<(StatusCode, Json<RedeemResponse>)> {
    let outcome =
        RedemptionRepo::redeem(&state.pool, user.profile.id, input.gift_id, input.shipping)
            .await?;

    match outcome {
        RedeemOutcome::Redeemed {
            redemption,
            new_balance,
        } => {
            tracing::info!(
                profile_id = user.profile.id,
                gift_id = input.gift_id,
                redemption_id = redemption.id,
                new_balance,
                "Gift redeemed"
            );
            Ok((
                StatusCode::CREATED,
                Json(RedeemResponse {
                    redemption,
                    new_balance,
                }),
            ))
        }
        RedeemOutcome::GiftNotFound => Err(AppError::Core(CoreError::NotFound {
            entity: "Gift",
            id: input.gift_id,
        })),
        RedeemOutcome::GiftUnavailable => Err(AppError::Core(CoreError::Conflict(
            "Gift is inactive or out of stock".into(),
        ))),
        RedeemOutcome::InsufficientFunds {
            required,
            available,
        } => Err(AppError::Core(CoreError::InsufficientFunds {
            required,
            available,
        })),
    }
}

/// GET /api/v1/redemptions
///
/// The caller's own redemption requests, newest first.
pub async fn list_redemptions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<GiftRedemption>>>> {
    let (limit, offset) = page.clamp();
    let filter = RedemptionFilter {
        profile_id: Some(user.profile.id),
        status: None,
    };
    let redemptions = RedemptionRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: redemptions }))
}
