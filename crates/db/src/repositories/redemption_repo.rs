//! Repository for the `gift_redemptions` table.
//!
//! `redeem` replaces the original debit-then-insert-with-compensation
//! sequence: the debit, stock decrement, redemption row, and spend ledger
//! row either all commit or none do, so there is nothing to compensate.

use lingua_core::economy::{self, RedemptionStatus, TransactionKind};
use lingua_core::types::DbId;
use sqlx::PgPool;

use crate::models::gift::Gift;
use crate::models::redemption::GiftRedemption;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, profile_id, gift_id, coins_spent, status, shipping, created_at, updated_at";

/// Outcome of a redemption attempt.
#[derive(Debug)]
pub enum RedeemOutcome {
    /// The redemption committed; carries the new row and resulting balance.
    Redeemed {
        redemption: GiftRedemption,
        new_balance: i64,
    },
    /// No gift with the requested id.
    GiftNotFound,
    /// The gift is deactivated or out of stock.
    GiftUnavailable,
    /// Balance below the gift price. No side effects.
    InsufficientFunds { required: i64, available: i64 },
}

/// Outcome of an admin status transition.
#[derive(Debug)]
pub enum TransitionOutcome {
    /// The transition committed (cancellations also refund and restock).
    Updated(GiftRedemption),
    /// The requested transition is not allowed from the current status.
    InvalidTransition { from: String },
}

/// Filters for listing redemptions. `None` fields match everything.
#[derive(Debug, Default, Clone)]
pub struct RedemptionFilter {
    pub profile_id: Option<DbId>,
    pub status: Option<RedemptionStatus>,
}

/// Provides the redemption workflow and redemption queries.
pub struct RedemptionRepo;

impl RedemptionRepo {
    /// Redeem a gift: debit the balance, decrement stock, insert the pending
    /// redemption and its spend ledger row, all in one transaction.
    ///
    /// Every write path that touches both tables takes the gift row before
    /// the profile row; `update_status` keeps the same order.
    pub async fn redeem(
        pool: &PgPool,
        profile_id: DbId,
        gift_id: DbId,
        shipping: Option<serde_json::Value>,
    ) -> Result<RedeemOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Lock the gift row so stock checks and decrements serialize.
        let gift: Option<Gift> = sqlx::query_as(
            "SELECT id, name_en, name_zh, description_en, description_zh, price_coins, \
                    category, stock, is_active, created_at, updated_at
             FROM gifts WHERE id = $1 FOR UPDATE",
        )
        .bind(gift_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(gift) = gift else {
            return Ok(RedeemOutcome::GiftNotFound);
        };
        if !gift.is_active || gift.stock <= 0 {
            return Ok(RedeemOutcome::GiftUnavailable);
        }

        // Conditional debit: zero rows affected means insufficient funds and
        // the whole transaction rolls back untouched.
        let debited: Option<(i64,)> = sqlx::query_as(
            "UPDATE profiles
             SET coin_balance = coin_balance - $2, updated_at = NOW()
             WHERE id = $1 AND coin_balance >= $2
             RETURNING coin_balance",
        )
        .bind(profile_id)
        .bind(gift.price_coins)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((new_balance,)) = debited else {
            let available: Option<(i64,)> =
                sqlx::query_as("SELECT coin_balance FROM profiles WHERE id = $1")
                    .bind(profile_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            return Ok(RedeemOutcome::InsufficientFunds {
                required: gift.price_coins,
                available: available.map(|(b,)| b).unwrap_or(0),
            });
        };

        sqlx::query("UPDATE gifts SET stock = stock - 1, updated_at = NOW() WHERE id = $1")
            .bind(gift_id)
            .execute(&mut *tx)
            .await?;

        let insert_query = format!(
            "INSERT INTO gift_redemptions (profile_id, gift_id, coins_spent, shipping)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let redemption = sqlx::query_as::<_, GiftRedemption>(&insert_query)
            .bind(profile_id)
            .bind(gift_id)
            .bind(gift.price_coins)
            .bind(shipping)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO coin_transactions (profile_id, amount, kind, description)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(profile_id)
        .bind(-gift.price_coins)
        .bind(TransactionKind::Spend.as_str())
        .bind(economy::redemption_description(&gift.name_en))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(RedeemOutcome::Redeemed {
            redemption,
            new_balance,
        })
    }

    /// Find a redemption by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GiftRedemption>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM gift_redemptions WHERE id = $1");
        sqlx::query_as::<_, GiftRedemption>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List redemptions matching `filter`, newest first.
    pub async fn list(
        pool: &PgPool,
        filter: &RedemptionFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<GiftRedemption>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM gift_redemptions
             WHERE ($1::bigint IS NULL OR profile_id = $1)
               AND ($2::text IS NULL OR status = $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, GiftRedemption>(&query)
            .bind(filter.profile_id)
            .bind(filter.status.map(RedemptionStatus::as_str))
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Apply an admin status transition.
    ///
    /// Cancellation refunds the coins spent (as an earn ledger row) and
    /// restores the gift's stock, in the same transaction as the status
    /// change. Returns `None` if the redemption does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        next: RedemptionStatus,
    ) -> Result<Option<TransitionOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let select_query = format!("SELECT {COLUMNS} FROM gift_redemptions WHERE id = $1 FOR UPDATE");
        let current: Option<GiftRedemption> = sqlx::query_as(&select_query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        let from = RedemptionStatus::parse(&current.status);
        if !from.is_some_and(|from| from.can_transition_to(next)) {
            return Ok(Some(TransitionOutcome::InvalidTransition {
                from: current.status,
            }));
        }

        let update_query = format!(
            "UPDATE gift_redemptions SET status = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, GiftRedemption>(&update_query)
            .bind(id)
            .bind(next.as_str())
            .fetch_one(&mut *tx)
            .await?;

        if next == RedemptionStatus::Cancelled {
            // Lock order matches `redeem`: gift row first, then profile row.
            sqlx::query("UPDATE gifts SET stock = stock + 1, updated_at = NOW() WHERE id = $1")
                .bind(current.gift_id)
                .execute(&mut *tx)
                .await?;

            sqlx::query(
                "UPDATE profiles
                 SET coin_balance = coin_balance + $2, updated_at = NOW()
                 WHERE id = $1",
            )
            .bind(current.profile_id)
            .bind(current.coins_spent)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO coin_transactions (profile_id, amount, kind, description)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(current.profile_id)
            .bind(current.coins_spent)
            .bind(TransactionKind::Earn.as_str())
            .bind(format!("Refund for cancelled redemption #{id}"))
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(Some(TransitionOutcome::Updated(updated)))
    }
}
