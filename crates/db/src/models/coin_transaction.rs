//! Coin ledger entry model.

use lingua_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Immutable, append-only ledger row from `coin_transactions`.
///
/// `amount` is signed: positive for earn/purchase, negative for spend.
/// `external_ref` carries the payment provider's session id for purchases
/// and backs the idempotency unique index.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CoinTransaction {
    pub id: DbId,
    pub profile_id: DbId,
    pub amount: i64,
    pub kind: String,
    pub description: String,
    pub external_ref: Option<String>,
    pub created_at: Timestamp,
}
