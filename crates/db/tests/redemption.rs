//! Integration tests for the redemption workflow: atomic debit, stock
//! handling, status transitions, and cancellation refunds.

use assert_matches::assert_matches;
use lingua_core::economy::{RedemptionStatus, TransactionKind};
use lingua_db::models::gift::{CreateGift, Gift};
use lingua_db::models::profile::{CreateProfile, Profile};
use lingua_db::repositories::ledger_repo::TransactionFilter;
use lingua_db::repositories::redemption_repo::{RedeemOutcome, TransitionOutcome};
use lingua_db::repositories::{GiftRepo, LedgerRepo, ProfileRepo, RedemptionRepo};
use sqlx::PgPool;
use uuid::Uuid;

async fn seed_profile_with_balance(pool: &PgPool, balance: i64) -> Profile {
    let profile = ProfileRepo::create(
        pool,
        &CreateProfile {
            auth_subject: Uuid::new_v4(),
            display_name: "Learner".to_string(),
            email: None,
        },
    )
    .await
    .unwrap();
    if balance > 0 {
        LedgerRepo::credit(pool, profile.id, balance, TransactionKind::Earn, "seed", None)
            .await
            .unwrap();
    }
    profile
}

async fn seed_gift(pool: &PgPool, price: i64, stock: i32) -> Gift {
    GiftRepo::create(
        pool,
        &CreateGift {
            name_en: "Notebook".to_string(),
            name_zh: "笔记本".to_string(),
            description_en: String::new(),
            description_zh: String::new(),
            price_coins: price,
            category: "physical".to_string(),
            stock,
        },
    )
    .await
    .unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn successful_redemption_debits_and_records(pool: PgPool) {
    let profile = seed_profile_with_balance(&pool, 500).await;
    let gift = seed_gift(&pool, 300, 5).await;

    let outcome = RedemptionRepo::redeem(&pool, profile.id, gift.id, None)
        .await
        .unwrap();

    let redemption = match outcome {
        RedeemOutcome::Redeemed {
            redemption,
            new_balance,
        } => {
            assert_eq!(new_balance, 200);
            redemption
        }
        other => panic!("expected Redeemed, got {other:?}"),
    };

    assert_eq!(redemption.status, "pending");
    assert_eq!(redemption.coins_spent, 300);

    // Exactly one spend row of -300 alongside the seed credit.
    let spends = LedgerRepo::list(
        &pool,
        &TransactionFilter {
            profile_id: Some(profile.id),
            kind: Some(TransactionKind::Spend),
            ..Default::default()
        },
        50,
        0,
    )
    .await
    .unwrap();
    assert_eq!(spends.len(), 1);
    assert_eq!(spends[0].amount, -300);

    // Stock decremented.
    let gift = GiftRepo::find_by_id(&pool, gift.id).await.unwrap().unwrap();
    assert_eq!(gift.stock, 4);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn insufficient_funds_has_no_side_effects(pool: PgPool) {
    let profile = seed_profile_with_balance(&pool, 100).await;
    let gift = seed_gift(&pool, 300, 5).await;

    let outcome = RedemptionRepo::redeem(&pool, profile.id, gift.id, None)
        .await
        .unwrap();
    assert_matches!(
        outcome,
        RedeemOutcome::InsufficientFunds {
            required: 300,
            available: 100
        }
    );

    // Balance, stock, and ledger untouched.
    assert_eq!(LedgerRepo::balance(&pool, profile.id).await.unwrap(), Some(100));
    let gift = GiftRepo::find_by_id(&pool, gift.id).await.unwrap().unwrap();
    assert_eq!(gift.stock, 5);
    let redemptions = RedemptionRepo::list(&pool, &Default::default(), 50, 0)
        .await
        .unwrap();
    assert!(redemptions.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inactive_or_out_of_stock_gift_is_unavailable(pool: PgPool) {
    let profile = seed_profile_with_balance(&pool, 1000).await;

    let empty = seed_gift(&pool, 100, 0).await;
    let outcome = RedemptionRepo::redeem(&pool, profile.id, empty.id, None)
        .await
        .unwrap();
    assert_matches!(outcome, RedeemOutcome::GiftUnavailable);

    let retired = seed_gift(&pool, 100, 5).await;
    GiftRepo::deactivate(&pool, retired.id).await.unwrap();
    let outcome = RedemptionRepo::redeem(&pool, profile.id, retired.id, None)
        .await
        .unwrap();
    assert_matches!(outcome, RedeemOutcome::GiftUnavailable);

    let outcome = RedemptionRepo::redeem(&pool, profile.id, 9999, None)
        .await
        .unwrap();
    assert_matches!(outcome, RedeemOutcome::GiftNotFound);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn status_transitions_follow_the_lifecycle(pool: PgPool) {
    let profile = seed_profile_with_balance(&pool, 500).await;
    let gift = seed_gift(&pool, 300, 5).await;
    let outcome = RedemptionRepo::redeem(&pool, profile.id, gift.id, None)
        .await
        .unwrap();
    let RedeemOutcome::Redeemed { redemption, .. } = outcome else {
        panic!("redeem failed");
    };

    // pending -> completed skips processing and is rejected.
    let result = RedemptionRepo::update_status(&pool, redemption.id, RedemptionStatus::Completed)
        .await
        .unwrap()
        .unwrap();
    assert_matches!(result, TransitionOutcome::InvalidTransition { .. });

    // pending -> processing -> completed is allowed.
    let result = RedemptionRepo::update_status(&pool, redemption.id, RedemptionStatus::Processing)
        .await
        .unwrap()
        .unwrap();
    assert_matches!(result, TransitionOutcome::Updated(ref r) if r.status == "processing");

    let result = RedemptionRepo::update_status(&pool, redemption.id, RedemptionStatus::Completed)
        .await
        .unwrap()
        .unwrap();
    assert_matches!(result, TransitionOutcome::Updated(ref r) if r.status == "completed");

    // Terminal.
    let result = RedemptionRepo::update_status(&pool, redemption.id, RedemptionStatus::Cancelled)
        .await
        .unwrap()
        .unwrap();
    assert_matches!(result, TransitionOutcome::InvalidTransition { .. });

    // Unknown id.
    let result = RedemptionRepo::update_status(&pool, 9999, RedemptionStatus::Processing)
        .await
        .unwrap();
    assert!(result.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancellation_refunds_coins_and_restores_stock(pool: PgPool) {
    let profile = seed_profile_with_balance(&pool, 500).await;
    let gift = seed_gift(&pool, 300, 5).await;
    let RedeemOutcome::Redeemed { redemption, .. } =
        RedemptionRepo::redeem(&pool, profile.id, gift.id, None)
            .await
            .unwrap()
    else {
        panic!("redeem failed");
    };

    RedemptionRepo::update_status(&pool, redemption.id, RedemptionStatus::Cancelled)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(LedgerRepo::balance(&pool, profile.id).await.unwrap(), Some(500));
    let gift = GiftRepo::find_by_id(&pool, gift.id).await.unwrap().unwrap();
    assert_eq!(gift.stock, 5);

    // The refund is its own ledger entry; the spend row stays immutable.
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
    let sum: i64 = entries.iter().map(|e| e.amount).sum();
    assert_eq!(sum, 500);
    assert_eq!(entries.len(), 3); // seed earn, spend, refund earn
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cancelled_last_unit_can_be_redeemed_again(pool: PgPool) {
    let profile = seed_profile_with_balance(&pool, 500).await;
    let gift = seed_gift(&pool, 200, 1).await;

    // Take the last unit.
    let RedeemOutcome::Redeemed { redemption, .. } =
        RedemptionRepo::redeem(&pool, profile.id, gift.id, None)
            .await
            .unwrap()
    else {
        panic!("redeem failed");
    };
    let outcome = RedemptionRepo::redeem(&pool, profile.id, gift.id, None)
        .await
        .unwrap();
    assert_matches!(outcome, RedeemOutcome::GiftUnavailable);

    // Cancelling restocks the gift and refunds, and the restocked unit is
    // immediately redeemable again.
    RedemptionRepo::update_status(&pool, redemption.id, RedemptionStatus::Cancelled)
        .await
        .unwrap()
        .unwrap();

    let RedeemOutcome::Redeemed { new_balance, .. } =
        RedemptionRepo::redeem(&pool, profile.id, gift.id, None)
            .await
            .unwrap()
    else {
        panic!("redeem after cancellation failed");
    };
    assert_eq!(new_balance, 300);

    let gift = GiftRepo::find_by_id(&pool, gift.id).await.unwrap().unwrap();
    assert_eq!(gift.stock, 0);
}
