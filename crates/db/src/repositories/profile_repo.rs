//! Repository for the `profiles` table.

use chrono::NaiveDate;
use lingua_core::economy::{self, CHECK_IN_REWARD_COINS, TransactionKind};
use lingua_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::profile::{CreateProfile, Profile, UpdateProfile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, auth_subject, display_name, email, coin_balance, \
                       total_study_secs, streak_days, last_check_in_on, is_admin, \
                       created_at, updated_at";

/// Outcome of a daily check-in attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutcome {
    /// First check-in of the day: streak updated, reward credited.
    CheckedIn { streak_days: i32, coins_earned: i64 },
    /// The profile already checked in today; nothing changed.
    AlreadyCheckedIn { streak_days: i32 },
}

/// Provides CRUD and check-in operations for profiles.
pub struct ProfileRepo;

impl ProfileRepo {
    /// Insert a new profile, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProfile) -> Result<Profile, sqlx::Error> {
        let query = format!(
            "INSERT INTO profiles (auth_subject, display_name, email)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(input.auth_subject)
            .bind(&input.display_name)
            .bind(&input.email)
            .fetch_one(pool)
            .await
    }

    /// Find a profile by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE id = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a profile by the auth provider's subject UUID.
    pub async fn find_by_subject(
        pool: &PgPool,
        subject: Uuid,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM profiles WHERE auth_subject = $1");
        sqlx::query_as::<_, Profile>(&query)
            .bind(subject)
            .fetch_optional(pool)
            .await
    }

    /// List profiles, newest first, with optional case-insensitive search
    /// over display name and email.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Profile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM profiles
             WHERE ($1::text IS NULL
                    OR display_name ILIKE '%' || $1 || '%'
                    OR email ILIKE '%' || $1 || '%')
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(search)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a profile. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProfile,
    ) -> Result<Option<Profile>, sqlx::Error> {
        let query = format!(
            "UPDATE profiles SET
                display_name = COALESCE($2, display_name),
                email = COALESCE($3, email),
                is_admin = COALESCE($4, is_admin),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Profile>(&query)
            .bind(id)
            .bind(&input.display_name)
            .bind(&input.email)
            .bind(input.is_admin)
            .fetch_optional(pool)
            .await
    }

    /// Perform the daily check-in for `today`.
    ///
    /// The conditional update only fires when the profile has not yet
    /// checked in today, so concurrent calls cannot double-credit. Streak
    /// arithmetic, the balance credit, and the earn transaction all commit
    /// together.
    ///
    /// Returns `None` if the profile does not exist.
    pub async fn check_in(
        pool: &PgPool,
        id: DbId,
        today: NaiveDate,
    ) -> Result<Option<CheckInOutcome>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let streak: Option<(i32,)> = sqlx::query_as(
            "UPDATE profiles SET
                streak_days = CASE
                    WHEN last_check_in_on = $2::date - 1 THEN streak_days + 1
                    ELSE 1
                END,
                last_check_in_on = $2,
                coin_balance = coin_balance + $3,
                updated_at = NOW()
             WHERE id = $1
               AND (last_check_in_on IS NULL OR last_check_in_on < $2)
             RETURNING streak_days",
        )
        .bind(id)
        .bind(today)
        .bind(CHECK_IN_REWARD_COINS)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match streak {
            Some((streak_days,)) => {
                sqlx::query(
                    "INSERT INTO coin_transactions (profile_id, amount, kind, description)
                     VALUES ($1, $2, $3, $4)",
                )
                .bind(id)
                .bind(CHECK_IN_REWARD_COINS)
                .bind(TransactionKind::Earn.as_str())
                .bind(economy::check_in_description(today))
                .execute(&mut *tx)
                .await?;

                CheckInOutcome::CheckedIn {
                    streak_days,
                    coins_earned: CHECK_IN_REWARD_COINS,
                }
            }
            None => {
                // Either already checked in today or the profile is missing.
                let existing: Option<(i32,)> =
                    sqlx::query_as("SELECT streak_days FROM profiles WHERE id = $1")
                        .bind(id)
                        .fetch_optional(&mut *tx)
                        .await?;
                match existing {
                    Some((streak_days,)) => CheckInOutcome::AlreadyCheckedIn { streak_days },
                    None => return Ok(None),
                }
            }
        };

        tx.commit().await?;
        Ok(Some(outcome))
    }
}
