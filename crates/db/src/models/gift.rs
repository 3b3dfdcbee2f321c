//! Gift catalog entity model and DTOs.

use lingua_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog row from the `gifts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Gift {
    pub id: DbId,
    pub name_en: String,
    pub name_zh: String,
    pub description_en: String,
    pub description_zh: String,
    pub price_coins: i64,
    pub category: String,
    pub stock: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a catalog item.
#[derive(Debug, Deserialize)]
pub struct CreateGift {
    pub name_en: String,
    pub name_zh: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub description_zh: String,
    pub price_coins: i64,
    pub category: String,
    pub stock: i32,
}

/// DTO for updating a catalog item. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateGift {
    pub name_en: Option<String>,
    pub name_zh: Option<String>,
    pub description_en: Option<String>,
    pub description_zh: Option<String>,
    pub price_coins: Option<i64>,
    pub category: Option<String>,
    pub stock: Option<i32>,
    pub is_active: Option<bool>,
}
