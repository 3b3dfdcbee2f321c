//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Multi-step ledger mutations
//! (balance write + transaction row, debit + redemption, bonus grant) run
//! inside a single database transaction.

pub mod gift_repo;
pub mod ledger_repo;
pub mod practice_repo;
pub mod profile_repo;
pub mod redemption_repo;

pub use gift_repo::GiftRepo;
pub use ledger_repo::LedgerRepo;
pub use practice_repo::PracticeRepo;
pub use profile_repo::ProfileRepo;
pub use redemption_repo::RedemptionRepo;
