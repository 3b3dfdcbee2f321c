//! Persistence layer: connection pool, migrations, models, repositories.
//!
//! All ledger atomicity lives here: every operation that writes a profile's
//! `coin_balance` also inserts the matching `coin_transactions` row inside
//! the same database transaction, so the denormalized balance always equals
//! the sum of the ledger.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database is reachable with a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Whether a sqlx error is a PostgreSQL unique violation on the named
/// constraint or index.
///
/// Used by the webhook path to treat a duplicate `external_ref` insert as a
/// redelivered event rather than a failure.
pub fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
