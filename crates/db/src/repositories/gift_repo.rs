//! Repository for the `gifts` catalog table.

use lingua_core::types::DbId;
use sqlx::PgPool;

use crate::models::gift::{CreateGift, Gift, UpdateGift};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name_en, name_zh, description_en, description_zh, \
                       price_coins, category, stock, is_active, created_at, updated_at";

/// Provides CRUD operations for the gift catalog.
pub struct GiftRepo;

impl GiftRepo {
    /// Insert a new catalog item, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateGift) -> Result<Gift, sqlx::Error> {
        let query = format!(
            "INSERT INTO gifts
                (name_en, name_zh, description_en, description_zh, price_coins, category, stock)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Gift>(&query)
            .bind(&input.name_en)
            .bind(&input.name_zh)
            .bind(&input.description_en)
            .bind(&input.description_zh)
            .bind(input.price_coins)
            .bind(&input.category)
            .bind(input.stock)
            .fetch_one(pool)
            .await
    }

    /// Find a catalog item by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Gift>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gifts WHERE id = $1");
        sqlx::query_as::<_, Gift>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List catalog items, optionally including deactivated ones.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Gift>, sqlx::Error> {
        let query = if include_inactive {
            format!("SELECT {COLUMNS} FROM gifts ORDER BY price_coins, name_en")
        } else {
            format!(
                "SELECT {COLUMNS} FROM gifts \
                 WHERE is_active = true \
                 ORDER BY price_coins, name_en"
            )
        };
        sqlx::query_as::<_, Gift>(&query).fetch_all(pool).await
    }

    /// Update a catalog item. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateGift,
    ) -> Result<Option<Gift>, sqlx::Error> {
        let query = format!(
            "UPDATE gifts SET
                name_en = COALESCE($2, name_en),
                name_zh = COALESCE($3, name_zh),
                description_en = COALESCE($4, description_en),
                description_zh = COALESCE($5, description_zh),
                price_coins = COALESCE($6, price_coins),
                category = COALESCE($7, category),
                stock = COALESCE($8, stock),
                is_active = COALESCE($9, is_active),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Gift>(&query)
            .bind(id)
            .bind(&input.name_en)
            .bind(&input.name_zh)
            .bind(&input.description_en)
            .bind(&input.description_zh)
            .bind(input.price_coins)
            .bind(&input.category)
            .bind(input.stock)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a catalog item by setting `is_active = false`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE gifts SET is_active = false, updated_at = NOW() WHERE id = $1 AND is_active = true")
                .bind(id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
