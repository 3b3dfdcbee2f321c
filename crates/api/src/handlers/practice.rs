//! Handlers for practice-time submission and the daily check-in.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use lingua_core::economy::MAX_PRACTICE_SECS_PER_SUBMISSION;
use lingua_core::error::CoreError;
use lingua_db::repositories::profile_repo::CheckInOutcome;
use lingua_db::repositories::{PracticeRepo, ProfileRepo};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /practice`.
#[derive(Debug, Deserialize)]
pub struct PracticeRequest {
    /// Seconds practiced since the last submission.
    pub seconds: i64,
}

/// Response body for `POST /practice`.
#[derive(Debug, Serialize)]
pub struct PracticeResponse {
    /// Cumulative seconds practiced today (UTC) after this submission.
    pub day_seconds: i64,
    /// Whether this submission crossed the 30-minute bonus threshold.
    pub bonus_granted: bool,
    /// Coins credited by this submission.
    pub coins_earned: i64,
}

/// Response body for `POST /checkin`.
#[derive(Debug, Serialize)]
pub struct CheckInResponse {
    /// False when the caller had already checked in today.
    pub checked_in: bool,
    pub streak_days: i32,
    pub coins_earned: i64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/practice
///
/// Accumulate practice seconds for today (UTC). The first time the day's
/// total crosses 30 minutes, a 100-coin bonus is credited exactly once.
pub async fn submit_practice(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<PracticeRequest>,
) -> AppResult<Json<PracticeResponse>> {
    if input.seconds < 1 || input.seconds > MAX_PRACTICE_SECS_PER_SUBMISSION {
        return Err(AppError::Core(CoreError::Validation(format!(
            "seconds must be between 1 and {MAX_PRACTICE_SECS_PER_SUBMISSION}"
        ))));
    }

    let today = Utc::now().date_naive();
    let record = PracticeRepo::record(&state.pool, user.profile.id, today, input.seconds)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.profile.id,
        }))?;

    if record.bonus_granted {
        tracing::info!(
            profile_id = user.profile.id,
            day_seconds = record.day_seconds,
            "Daily practice bonus granted"
        );
    }

    Ok(Json(PracticeResponse {
        day_seconds: record.day_seconds,
        bonus_granted: record.bonus_granted,
        coins_earned: record.coins_earned,
    }))
}

/// POST /api/v1/checkin
///
/// Daily check-in: extends or resets the streak and credits the fixed
/// check-in reward, once per UTC day.
pub async fn check_in(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<CheckInResponse>> {
    let today = Utc::now().date_naive();
    let outcome = ProfileRepo::check_in(&state.pool, user.profile.id, today)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Profile",
            id: user.profile.id,
        }))?;

    let response = match outcome {
        CheckInOutcome::CheckedIn {
            streak_days,
            coins_earned,
        } => CheckInResponse {
            checked_in: true,
            streak_days,
            coins_earned,
        },
        CheckInOutcome::AlreadyCheckedIn { streak_days } => CheckInResponse {
            checked_in: false,
            streak_days,
            coins_earned: 0,
        },
    };

    Ok(Json(response))
}
