//! Row models and DTOs, one module per table. The `daily_practice`
//! accumulator table has no row model; its repository returns computed
//! records only.

pub mod coin_transaction;
pub mod gift;
pub mod profile;
pub mod redemption;
