//! Gift redemption entity model.

use lingua_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Row from the `gift_redemptions` table.
///
/// `shipping` is an opaque JSON payload (address, contact) supplied by the
/// user at redemption time for physical gifts.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GiftRedemption {
    pub id: DbId,
    pub profile_id: DbId,
    pub gift_id: DbId,
    pub coins_spent: i64,
    pub status: String,
    pub shipping: Option<serde_json::Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
