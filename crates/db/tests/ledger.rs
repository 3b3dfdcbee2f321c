//! Integration tests for the coin ledger: atomic credits, balance reads,
//! filtering, and external-reference idempotency.

use lingua_core::economy::TransactionKind;
use lingua_db::models::profile::{CreateProfile, Profile};
use lingua_db::repositories::ledger_repo::TransactionFilter;
use lingua_db::repositories::{LedgerRepo, ProfileRepo};
use sqlx::PgPool;
use uuid::Uuid;

async fn seed_profile(pool: &PgPool) -> Profile {
    ProfileRepo::create(
        pool,
        &CreateProfile {
            auth_subject: Uuid::new_v4(),
            display_name: "Learner".to_string(),
            email: Some("learner@example.com".to_string()),
        },
    )
    .await
    .expect("profile creation should succeed")
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn credit_updates_balance_and_appends_row(pool: PgPool) {
    let profile = seed_profile(&pool).await;

    let balance = LedgerRepo::credit(
        &pool,
        profile.id,
        250,
        TransactionKind::Earn,
        "Test credit",
        None,
    )
    .await
    .unwrap()
    .expect("profile exists");
    assert_eq!(balance, 250);

    let entries = LedgerRepo::list(
        &pool,
        &TransactionFilter {
            profile_id: Some(profile.id),
            ..Default::default()
        },
        50,
        0,
    )
    .await
    .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].amount, 250);
    assert_eq!(entries[0].kind, "earn");

    // The denormalized balance matches the ledger sum.
    assert_eq!(LedgerRepo::balance(&pool, profile.id).await.unwrap(), Some(250));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn credit_to_missing_profile_is_a_noop(pool: PgPool) {
    let result = LedgerRepo::credit(&pool, 9999, 100, TransactionKind::Earn, "ghost", None)
        .await
        .unwrap();
    assert_eq!(result, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_external_ref_is_rejected_without_crediting(pool: PgPool) {
    let profile = seed_profile(&pool).await;

    LedgerRepo::credit(
        &pool,
        profile.id,
        500,
        TransactionKind::Purchase,
        "Purchased 500 coins",
        Some("cs_test_123"),
    )
    .await
    .unwrap();

    let err = LedgerRepo::credit(
        &pool,
        profile.id,
        500,
        TransactionKind::Purchase,
        "Purchased 500 coins",
        Some("cs_test_123"),
    )
    .await
    .expect_err("second insert with the same session id must fail");

    assert!(lingua_db::is_unique_violation(
        &err,
        "uq_coin_transactions_external_ref"
    ));

    // The failed transaction must not have touched the balance, and only
    // the first ledger row with that reference exists.
    assert_eq!(LedgerRepo::balance(&pool, profile.id).await.unwrap(), Some(500));
    let (count,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM coin_transactions WHERE external_ref = $1")
            .bind("cs_test_123")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_kind(pool: PgPool) {
    let profile = seed_profile(&pool).await;

    LedgerRepo::credit(&pool, profile.id, 100, TransactionKind::Earn, "a", None)
        .await
        .unwrap();
    LedgerRepo::credit(
        &pool,
        profile.id,
        500,
        TransactionKind::Purchase,
        "b",
        Some("cs_x"),
    )
    .await
    .unwrap();

    let filter = TransactionFilter {
        profile_id: Some(profile.id),
        kind: Some(TransactionKind::Purchase),
        ..Default::default()
    };
    let entries = LedgerRepo::list(&pool, &filter, 50, 0).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, "purchase");
    assert_eq!(LedgerRepo::count(&pool, &filter).await.unwrap(), 1);
}
