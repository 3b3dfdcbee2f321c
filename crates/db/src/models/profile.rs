//! Profile entity model and DTOs.

use chrono::NaiveDate;
use lingua_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Full profile row from the `profiles` table.
///
/// `auth_subject` is the hosted auth provider's subject UUID; the provider
/// owns the credential, we own everything else.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub auth_subject: Uuid,
    pub display_name: String,
    pub email: Option<String>,
    pub coin_balance: i64,
    pub total_study_secs: i64,
    pub streak_days: i32,
    pub last_check_in_on: Option<NaiveDate>,
    pub is_admin: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new profile.
#[derive(Debug, Deserialize)]
pub struct CreateProfile {
    pub auth_subject: Uuid,
    pub display_name: String,
    pub email: Option<String>,
}

/// DTO for updating an existing profile. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub is_admin: Option<bool>,
}
