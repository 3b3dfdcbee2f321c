//! Admin-only handlers: user/ledger/redemption queries, CSV exports, gift
//! catalog management, and redemption status transitions.
//!
//! Every handler takes [`RequireAdmin`], so the admin flag is re-checked
//! against the database on each request.

use axum::extract::{Path, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use lingua_core::csv::CsvBuilder;
use lingua_core::economy::{GiftCategory, RedemptionStatus, TransactionKind};
use lingua_core::error::CoreError;
use lingua_core::types::DbId;
use lingua_db::models::coin_transaction::CoinTransaction;
use lingua_db::models::gift::{CreateGift, Gift, UpdateGift};
use lingua_db::models::profile::Profile;
use lingua_db::models::redemption::GiftRedemption;
use lingua_db::repositories::ledger_repo::TransactionFilter;
use lingua_db::repositories::redemption_repo::{RedemptionFilter, TransitionOutcome};
use lingua_db::repositories::{GiftRepo, LedgerRepo, ProfileRepo, RedemptionRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Content type for CSV export responses.
const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

/// Batch size for export queries. Exports page through the full result set
/// so the CSV always carries every row the filter matches.
const EXPORT_PAGE_SIZE: i64 = 1_000;

type CsvResponse = (StatusCode, [(axum::http::HeaderName, &'static str); 1], String);

fn csv_response(csv: String) -> CsvResponse {
    (StatusCode::OK, [(CONTENT_TYPE, CSV_CONTENT_TYPE)], csv)
}

// ---------------------------------------------------------------------------
// Query parameter types
// ---------------------------------------------------------------------------

/// Query parameters for the admin user list and export.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    /// Case-insensitive substring match on display name or email.
    pub search: Option<String>,
    #[serde(flatten)]
    pub page: PaginationParams,
}

/// Query parameters for the admin transaction list and export.
#[derive(Debug, Deserialize)]
pub struct AdminTransactionParams {
    pub profile_id: Option<DbId>,
    pub kind: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(flatten)]
    pub page: PaginationParams,
}

/// Query parameters for the admin redemption list and export.
#[derive(Debug, Deserialize)]
pub struct AdminRedemptionParams {
    pub profile_id: Option<DbId>,
    pub status: Option<String>,
    #[serde(flatten)]
    pub page: PaginationParams,
}

/// Query parameters for the admin gift list.
#[derive(Debug, Deserialize)]
pub struct AdminGiftParams {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Request body for `PUT /admin/redemptions/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateRedemptionStatusRequest {
    pub status: String,
}

impl AdminTransactionParams {
    fn filter(&self) -> Result<TransactionFilter, AppError> {
        let kind = match self.kind.as_deref() {
            None => None,
            Some(s) => Some(TransactionKind::parse(s).ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "Unknown transaction kind: {s}"
                )))
            })?),
        };
        Ok(TransactionFilter {
            profile_id: self.profile_id,
            kind,
            from: self.from,
            to: self.to,
        })
    }
}

impl AdminRedemptionParams {
    fn filter(&self) -> Result<RedemptionFilter, AppError> {
        let status = match self.status.as_deref() {
            None => None,
            Some(s) => Some(RedemptionStatus::parse(s).ok_or_else(|| {
                AppError::Core(CoreError::Validation(format!(
                    "Unknown redemption status: {s}"
                )))
            })?),
        };
        Ok(RedemptionFilter {
            profile_id: self.profile_id,
            status,
        })
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/users
pub async fn list_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<DataResponse<Vec<Profile>>>> {
    let (limit, offset) = params.page.clamp();
    let users = ProfileRepo::list(&state.pool, params.search.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse { data: users }))
}

/// GET /api/v1/admin/users/export
pub async fn export_users(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<UserListParams>,
) -> AppResult<CsvResponse> {
    let mut csv = CsvBuilder::new(&[
        "id",
        "display_name",
        "email",
        "coin_balance",
        "total_study_secs",
        "streak_days",
        "is_admin",
        "created_at",
    ]);
    let mut offset = 0;
    loop {
        let users = ProfileRepo::list(
            &state.pool,
            params.search.as_deref(),
            EXPORT_PAGE_SIZE,
            offset,
        )
        .await?;
        for user in &users {
            csv.row_owned(&[
                user.id.to_string(),
                user.display_name.clone(),
                user.email.clone().unwrap_or_default(),
                user.coin_balance.to_string(),
                user.total_study_secs.to_string(),
                user.streak_days.to_string(),
                user.is_admin.to_string(),
                user.created_at.to_rfc3339(),
            ]);
        }
        if (users.len() as i64) < EXPORT_PAGE_SIZE {
            break;
        }
        offset += EXPORT_PAGE_SIZE;
    }
    Ok(csv_response(csv.finish()))
}

// ---------------------------------------------------------------------------
// Transactions
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<AdminTransactionParams>,
) -> AppResult<Json<DataResponse<Vec<CoinTransaction>>>> {
    let filter = params.filter()?;
    let (limit, offset) = params.page.clamp();
    let entries = LedgerRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// GET /api/v1/admin/transactions/export
pub async fn export_transactions(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<AdminTransactionParams>,
) -> AppResult<CsvResponse> {
    let filter = params.filter()?;
    let mut csv = CsvBuilder::new(&[
        "id",
        "profile_id",
        "amount",
        "kind",
        "description",
        "external_ref",
        "created_at",
    ]);
    let mut offset = 0;
    loop {
        let entries = LedgerRepo::list(&state.pool, &filter, EXPORT_PAGE_SIZE, offset).await?;
        for entry in &entries {
            csv.row_owned(&[
                entry.id.to_string(),
                entry.profile_id.to_string(),
                entry.amount.to_string(),
                entry.kind.clone(),
                entry.description.clone(),
                entry.external_ref.clone().unwrap_or_default(),
                entry.created_at.to_rfc3339(),
            ]);
        }
        if (entries.len() as i64) < EXPORT_PAGE_SIZE {
            break;
        }
        offset += EXPORT_PAGE_SIZE;
    }
    Ok(csv_response(csv.finish()))
}

// ---------------------------------------------------------------------------
// Redemptions
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/redemptions
pub async fn list_redemptions(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<AdminRedemptionParams>,
) -> AppResult<Json<DataResponse<Vec<GiftRedemption>>>> {
    let filter = params.filter()?;
    let (limit, offset) = params.page.clamp();
    let redemptions = RedemptionRepo::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: redemptions }))
}

/// GET /api/v1/admin/redemptions/export
pub async fn export_redemptions(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<AdminRedemptionParams>,
) -> AppResult<CsvResponse> {
    let filter = params.filter()?;
    let mut csv = CsvBuilder::new(&[
        "id",
        "profile_id",
        "gift_id",
        "coins_spent",
        "status",
        "created_at",
    ]);
    let mut offset = 0;
    loop {
        let redemptions =
            RedemptionRepo::list(&state.pool, &filter, EXPORT_PAGE_SIZE, offset).await?;
        for r in &redemptions {
            csv.row_owned(&[
                r.id.to_string(),
                r.profile_id.to_string(),
                r.gift_id.to_string(),
                r.coins_spent.to_string(),
                r.status.clone(),
                r.created_at.to_rfc3339(),
            ]);
        }
        if (redemptions.len() as i64) < EXPORT_PAGE_SIZE {
            break;
        }
        offset += EXPORT_PAGE_SIZE;
    }
    Ok(csv_response(csv.finish()))
}

/// PUT /api/v1/admin/redemptions/{id}/status
///
/// Apply a workflow transition. Cancellation refunds the coins and restores
/// stock atomically with the status change.
pub async fn update_redemption_status(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRedemptionStatusRequest>,
) -> AppResult<Json<GiftRedemption>> {
    let next = RedemptionStatus::parse(&input.status).ok_or_else(|| {
        AppError::Core(CoreError::Validation(format!(
            "Unknown redemption status: {}",
            input.status
        )))
    })?;

    let outcome = RedemptionRepo::update_status(&state.pool, id, next)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Redemption",
            id,
        }))?;

    match outcome {
        TransitionOutcome::Updated(redemption) => {
            tracing::info!(
                redemption_id = id,
                status = next.as_str(),
                "Redemption status updated"
            );
            Ok(Json(redemption))
        }
        TransitionOutcome::InvalidTransition { from } => Err(AppError::Core(CoreError::Conflict(
            format!("Cannot transition redemption from {from} to {}", next.as_str()),
        ))),
    }
}

// ---------------------------------------------------------------------------
// Gift catalog management
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/gifts
pub async fn list_gifts(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(params): Query<AdminGiftParams>,
) -> AppResult<Json<DataResponse<Vec<Gift>>>> {
    let gifts = GiftRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: gifts }))
}

/// POST /api/v1/admin/gifts
pub async fn create_gift(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(input): Json<CreateGift>,
) -> AppResult<(StatusCode, Json<Gift>)> {
    validate_gift_fields(&input.name_en, &input.category, input.price_coins, input.stock)?;

    let gift = GiftRepo::create(&state.pool, &input).await?;
    tracing::info!(gift_id = gift.id, name = %gift.name_en, "Gift created");
    Ok((StatusCode::CREATED, Json(gift)))
}

/// PUT /api/v1/admin/gifts/{id}
pub async fn update_gift(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateGift>,
) -> AppResult<Json<Gift>> {
    if let Some(category) = input.category.as_deref() {
        if GiftCategory::parse(category).is_none() {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown gift category: {category}"
            ))));
        }
    }
    if input.price_coins.is_some_and(|p| p < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "price_coins must not be negative".into(),
        )));
    }
    if input.stock.is_some_and(|s| s < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "stock must not be negative".into(),
        )));
    }

    let gift = GiftRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Gift",
            id,
        }))?;
    Ok(Json(gift))
}

/// DELETE /api/v1/admin/gifts/{id}
///
/// Soft-deactivate: the gift disappears from the public catalog but stays
/// referenced by historical redemptions.
pub async fn deactivate_gift(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deactivated = GiftRepo::deactivate(&state.pool, id).await?;
    if deactivated {
        tracing::info!(gift_id = id, "Gift deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Gift",
            id,
        }))
    }
}

fn validate_gift_fields(
    name_en: &str,
    category: &str,
    price_coins: i64,
    stock: i32,
) -> Result<(), AppError> {
    if name_en.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name_en must not be empty".into(),
        )));
    }
    if GiftCategory::parse(category).is_none() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Unknown gift category: {category}"
        ))));
    }
    if price_coins < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "price_coins must not be negative".into(),
        )));
    }
    if stock < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "stock must not be negative".into(),
        )));
    }
    Ok(())
}
