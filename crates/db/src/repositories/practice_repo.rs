//! Repository for the `daily_practice` accumulator.
//!
//! The original check-then-act bonus grant could double-credit under
//! concurrency; here the grant is a conditional flip of `bonus_granted`
//! guarded by the per-day unique constraint, inside the same transaction
//! as the balance credit.

use chrono::NaiveDate;
use lingua_core::economy::{
    self, PRACTICE_BONUS_COINS, PRACTICE_BONUS_THRESHOLD_SECS, TransactionKind,
};
use lingua_core::types::DbId;
use sqlx::PgPool;

/// Result of recording a practice submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeRecord {
    /// Cumulative seconds practiced today after this submission.
    pub day_seconds: i64,
    /// Whether this submission triggered the daily bonus.
    pub bonus_granted: bool,
    /// Coins credited by this submission (bonus or 0).
    pub coins_earned: i64,
}

/// Provides practice-time accumulation and the daily bonus grant.
pub struct PracticeRepo;

impl PracticeRepo {
    /// Record `seconds` of practice for `today`.
    ///
    /// Accumulates into the profile's day row and lifetime total. The first
    /// time the day's total crosses the 30-minute threshold, exactly one
    /// 100-coin bonus is credited. Returns `None` if the profile does not
    /// exist.
    pub async fn record(
        pool: &PgPool,
        profile_id: DbId,
        today: NaiveDate,
        seconds: i64,
    ) -> Result<Option<PracticeRecord>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let bumped = sqlx::query(
            "UPDATE profiles
             SET total_study_secs = total_study_secs + $2, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(profile_id)
        .bind(seconds)
        .execute(&mut *tx)
        .await?;

        if bumped.rows_affected() == 0 {
            return Ok(None);
        }

        let (day_seconds, already_granted): (i64, bool) = sqlx::query_as(
            "INSERT INTO daily_practice (profile_id, practice_on, seconds)
             VALUES ($1, $2, $3)
             ON CONFLICT (profile_id, practice_on)
             DO UPDATE SET seconds = daily_practice.seconds + EXCLUDED.seconds
             RETURNING seconds, bonus_granted",
        )
        .bind(profile_id)
        .bind(today)
        .bind(seconds)
        .fetch_one(&mut *tx)
        .await?;

        let mut bonus_granted = false;
        if day_seconds >= PRACTICE_BONUS_THRESHOLD_SECS && !already_granted {
            // The conditional flip can only succeed once per (profile, day);
            // a concurrent submission loses the race and grants nothing.
            let granted = sqlx::query(
                "UPDATE daily_practice SET bonus_granted = true
                 WHERE profile_id = $1 AND practice_on = $2 AND bonus_granted = false",
            )
            .bind(profile_id)
            .bind(today)
            .execute(&mut *tx)
            .await?;

            if granted.rows_affected() == 1 {
                sqlx::query(
                    "UPDATE profiles
                     SET coin_balance = coin_balance + $2, updated_at = NOW()
                     WHERE id = $1",
                )
                .bind(profile_id)
                .bind(PRACTICE_BONUS_COINS)
                .execute(&mut *tx)
                .await?;

                sqlx::query(
                    "INSERT INTO coin_transactions (profile_id, amount, kind, description)
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(profile_id)
                .bind(PRACTICE_BONUS_COINS)
                .bind(TransactionKind::Earn.as_str())
                .bind(economy::practice_bonus_description(today))
                .execute(&mut *tx)
                .await?;

                bonus_granted = true;
            }
        }

        tx.commit().await?;
        Ok(Some(PracticeRecord {
            day_seconds,
            bonus_granted,
            coins_earned: if bonus_granted {
                PRACTICE_BONUS_COINS
            } else {
                0
            },
        }))
    }
}
