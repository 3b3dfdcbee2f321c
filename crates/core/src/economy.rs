//! Coin-economy rules: earning thresholds, reward amounts, purchasable coin
//! packs, transaction kinds, and redemption status transitions.
//!
//! Everything here is pure logic so the repository layer and the API server
//! share one source of truth for the bookkeeping rules.

use chrono::NaiveDate;

// ---------------------------------------------------------------------------
// Earning rules
// ---------------------------------------------------------------------------

/// Cumulative daily practice (in seconds) that triggers the practice bonus.
pub const PRACTICE_BONUS_THRESHOLD_SECS: i64 = 30 * 60;

/// Coins granted the first time a day's practice crosses the threshold.
pub const PRACTICE_BONUS_COINS: i64 = 100;

/// Coins granted for the daily check-in.
pub const CHECK_IN_REWARD_COINS: i64 = 10;

/// Upper bound on a single practice submission (one day of seconds).
pub const MAX_PRACTICE_SECS_PER_SUBMISSION: i64 = 86_400;

// ---------------------------------------------------------------------------
// Transaction kinds
// ---------------------------------------------------------------------------

/// Ledger entry classification. Stored as TEXT in `coin_transactions.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Coins earned through platform activity (practice, check-in).
    Earn,
    /// Coins spent on a redemption. Amounts are negative.
    Spend,
    /// Coins bought through the payment provider.
    Purchase,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Earn => "earn",
            Self::Spend => "spend",
            Self::Purchase => "purchase",
        }
    }

    /// Parse a stored kind string. Returns `None` for unknown values.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "earn" => Some(Self::Earn),
            "spend" => Some(Self::Spend),
            "purchase" => Some(Self::Purchase),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Redemption statuses
// ---------------------------------------------------------------------------

/// Lifecycle of a gift redemption. Transitions are admin-driven only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedemptionStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl RedemptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "processing" => Some(Self::Processing),
            "completed" => Some(Self::Completed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether an admin may move a redemption from `self` to `next`.
    ///
    /// Allowed: pending -> processing | cancelled,
    /// processing -> completed | cancelled. Completed and cancelled are
    /// terminal.
    pub fn can_transition_to(self, next: RedemptionStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Processing)
                | (Self::Pending, Self::Cancelled)
                | (Self::Processing, Self::Completed)
                | (Self::Processing, Self::Cancelled)
        )
    }
}

// ---------------------------------------------------------------------------
// Gift categories
// ---------------------------------------------------------------------------

/// Catalog item classification. Stored as TEXT in `gifts.category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GiftCategory {
    Physical,
    Digital,
    Privilege,
}

impl GiftCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Physical => "physical",
            Self::Digital => "digital",
            Self::Privilege => "privilege",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "physical" => Some(Self::Physical),
            "digital" => Some(Self::Digital),
            "privilege" => Some(Self::Privilege),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Coin packs
// ---------------------------------------------------------------------------

/// A purchasable bundle of coins. Prices are minor units (cents).
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct CoinPack {
    pub id: &'static str,
    pub coins: i64,
    pub amount_cents: i64,
    pub currency: &'static str,
}

/// The fixed set of packs offered at checkout.
pub const COIN_PACKS: &[CoinPack] = &[
    CoinPack {
        id: "starter",
        coins: 500,
        amount_cents: 499,
        currency: "usd",
    },
    CoinPack {
        id: "standard",
        coins: 1200,
        amount_cents: 999,
        currency: "usd",
    },
    CoinPack {
        id: "premium",
        coins: 2800,
        amount_cents: 1999,
        currency: "usd",
    },
];

/// Look up a coin pack by its public id.
pub fn find_pack(id: &str) -> Option<&'static CoinPack> {
    COIN_PACKS.iter().find(|p| p.id == id)
}

// ---------------------------------------------------------------------------
// Ledger descriptions
// ---------------------------------------------------------------------------

/// Description for the daily practice bonus transaction.
pub fn practice_bonus_description(day: NaiveDate) -> String {
    format!("Daily practice bonus ({day})")
}

/// Description for the daily check-in transaction.
pub fn check_in_description(day: NaiveDate) -> String {
    format!("Daily check-in ({day})")
}

/// Description for a coin purchase credited from the payment provider.
pub fn purchase_description(coins: i64) -> String {
    format!("Purchased {coins} coins")
}

/// Description for a gift redemption debit.
pub fn redemption_description(gift_name: &str) -> String {
    format!("Redeemed gift: {gift_name}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_roundtrip() {
        for kind in [
            TransactionKind::Earn,
            TransactionKind::Spend,
            TransactionKind::Purchase,
        ] {
            assert_eq!(TransactionKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(TransactionKind::parse("refund"), None);
    }

    #[test]
    fn status_transitions() {
        use RedemptionStatus::*;

        assert!(Pending.can_transition_to(Processing));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Processing.can_transition_to(Completed));
        assert!(Processing.can_transition_to(Cancelled));

        // No skipping and no leaving terminal states.
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Processing.can_transition_to(Pending));
    }

    #[test]
    fn pack_lookup() {
        let pack = find_pack("starter").expect("starter pack must exist");
        assert_eq!(pack.coins, 500);
        assert!(find_pack("nonexistent").is_none());
    }

    #[test]
    fn descriptions_include_context() {
        let day = NaiveDate::from_ymd_opt(2026, 8, 25).unwrap();
        assert_eq!(
            practice_bonus_description(day),
            "Daily practice bonus (2026-08-25)"
        );
        assert_eq!(purchase_description(500), "Purchased 500 coins");
        assert_eq!(
            redemption_description("Notebook"),
            "Redeemed gift: Notebook"
        );
    }
}
