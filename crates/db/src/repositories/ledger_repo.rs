//! Repository for the `coin_transactions` ledger.
//!
//! `credit` is the single entry point for adding coins: the balance update
//! and the ledger row commit in one transaction, so a crash between the two
//! writes cannot leave them inconsistent.

use chrono::NaiveDate;
use lingua_core::economy::TransactionKind;
use lingua_core::types::DbId;
use sqlx::PgPool;

use crate::models::coin_transaction::CoinTransaction;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, profile_id, amount, kind, description, external_ref, created_at";

/// Filters for listing ledger entries. `None` fields match everything.
#[derive(Debug, Default, Clone)]
pub struct TransactionFilter {
    pub profile_id: Option<DbId>,
    pub kind: Option<TransactionKind>,
    /// Inclusive lower bound on the entry's calendar date (UTC).
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on the entry's calendar date (UTC).
    pub to: Option<NaiveDate>,
}

/// Provides atomic balance mutations and ledger queries.
pub struct LedgerRepo;

impl LedgerRepo {
    /// Read a profile's denormalized coin balance.
    pub async fn balance(pool: &PgPool, profile_id: DbId) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT coin_balance FROM profiles WHERE id = $1")
            .bind(profile_id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(|(balance,)| balance))
    }

    /// Atomically add `amount` (positive) to a profile's balance and append
    /// the matching ledger row.
    ///
    /// Returns the new balance, or `None` if the profile does not exist. A
    /// unique violation on `external_ref` (duplicate webhook delivery)
    /// surfaces as the underlying database error for the caller to classify
    /// via [`crate::is_unique_violation`].
    pub async fn credit(
        pool: &PgPool,
        profile_id: DbId,
        amount: i64,
        kind: TransactionKind,
        description: &str,
        external_ref: Option<&str>,
    ) -> Result<Option<i64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Insert the ledger row first so a duplicate external_ref aborts
        // before the balance is touched.
        let inserted = sqlx::query(
            "INSERT INTO coin_transactions (profile_id, amount, kind, description, external_ref)
             SELECT $1, $2, $3, $4, $5
             WHERE EXISTS (SELECT 1 FROM profiles WHERE id = $1)",
        )
        .bind(profile_id)
        .bind(amount)
        .bind(kind.as_str())
        .bind(description)
        .bind(external_ref)
        .execute(&mut *tx)
        .await?;

        if inserted.rows_affected() == 0 {
            return Ok(None);
        }

        let (balance,): (i64,) = sqlx::query_as(
            "UPDATE profiles
             SET coin_balance = coin_balance + $2, updated_at = NOW()
             WHERE id = $1
             RETURNING coin_balance",
        )
        .bind(profile_id)
        .bind(amount)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(balance))
    }

    /// List ledger entries matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &TransactionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CoinTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM coin_transactions
             WHERE ($1::bigint IS NULL OR profile_id = $1)
               AND ($2::text IS NULL OR kind = $2)
               AND ($3::date IS NULL OR created_at >= $3::date)
               AND ($4::date IS NULL OR created_at < $4::date + 1)
             ORDER BY created_at DESC, id DESC
             LIMIT $5 OFFSET $6"
        );
        sqlx::query_as::<_, CoinTransaction>(&query)
            .bind(filter.profile_id)
            .bind(filter.kind.map(TransactionKind::as_str))
            .bind(filter.from)
            .bind(filter.to)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count ledger entries matching `filter`.
    pub async fn count(pool: &PgPool, filter: &TransactionFilter) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM coin_transactions
             WHERE ($1::bigint IS NULL OR profile_id = $1)
               AND ($2::text IS NULL OR kind = $2)
               AND ($3::date IS NULL OR created_at >= $3::date)
               AND ($4::date IS NULL OR created_at < $4::date + 1)",
        )
        .bind(filter.profile_id)
        .bind(filter.kind.map(TransactionKind::as_str))
        .bind(filter.from)
        .bind(filter.to)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }
}
