//! Loyalty ledger types.
//!
//! Accounts cache a balance for read performance; the append-only
//! transaction log is the source of truth and the cache must always equal
//! the fold of the log. The store layer exposes a recompute path for when
//! drift is ever detected.

use crate::error::CommerceError;
use crate::ids::CustomerId;
use serde::{Deserialize, Serialize};

/// Loyalty tier, derived from lifetime points earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum LoyaltyTier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyTier {
    /// Tier for a lifetime-earned total.
    pub fn from_lifetime_earned(points: i64) -> Self {
        if points >= 200_000 {
            LoyaltyTier::Platinum
        } else if points >= 50_000 {
            LoyaltyTier::Gold
        } else if points >= 10_000 {
            LoyaltyTier::Silver
        } else {
            LoyaltyTier::Bronze
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoyaltyTier::Bronze => "bronze",
            LoyaltyTier::Silver => "silver",
            LoyaltyTier::Gold => "gold",
            LoyaltyTier::Platinum => "platinum",
        }
    }
}

/// Direction of a point movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Earned,
    Redeemed,
}

/// What produced a point movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionSource {
    Order,
    Referral,
    Manual,
}

/// An immutable, append-only ledger record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoyaltyTransaction {
    /// Account the movement belongs to.
    pub customer_id: CustomerId,
    /// Signed point delta: positive for earned, negative for redeemed.
    pub delta: i64,
    /// Direction.
    pub kind: TransactionKind,
    /// Origin.
    pub source: TransactionSource,
    /// Linked order, when the source is an order.
    pub order_number: Option<String>,
    /// Free-form note (manual grants).
    pub note: Option<String>,
    /// Unix timestamp.
    pub timestamp: i64,
}

/// A customer's loyalty account.
///
/// Invariant: `balance == lifetime_earned - lifetime_redeemed`, never
/// negative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoyaltyAccount {
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Cached current balance.
    pub balance: i64,
    /// Total points ever earned.
    pub lifetime_earned: i64,
    /// Total points ever redeemed.
    pub lifetime_redeemed: i64,
    /// Tier derived from lifetime earned.
    pub tier: LoyaltyTier,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl LoyaltyAccount {
    /// Create a fresh account.
    pub fn new(customer_id: CustomerId, now: i64) -> Self {
        Self {
            customer_id,
            balance: 0,
            lifetime_earned: 0,
            lifetime_redeemed: 0,
            tier: LoyaltyTier::Bronze,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an earn of `points` (positive).
    pub fn earn(&mut self, points: i64, now: i64) -> Result<(), CommerceError> {
        if points <= 0 {
            return Err(CommerceError::Validation(format!(
                "earn amount must be positive, got {}",
                points
            )));
        }
        self.balance += points;
        self.lifetime_earned += points;
        self.tier = LoyaltyTier::from_lifetime_earned(self.lifetime_earned);
        self.updated_at = now;
        Ok(())
    }

    /// Apply a redemption of `points` (positive). Fails rather than let the
    /// balance go negative.
    pub fn redeem(&mut self, points: i64, now: i64) -> Result<(), CommerceError> {
        if points <= 0 {
            return Err(CommerceError::Validation(format!(
                "redeem amount must be positive, got {}",
                points
            )));
        }
        if points > self.balance {
            return Err(CommerceError::InsufficientPoints {
                requested: points,
                available: self.balance,
            });
        }
        self.balance -= points;
        self.lifetime_redeemed += points;
        self.updated_at = now;
        Ok(())
    }

    /// Check the cached balance against the account's own totals.
    pub fn is_consistent(&self) -> bool {
        self.balance == self.lifetime_earned - self.lifetime_redeemed && self.balance >= 0
    }
}

/// Fold a transaction log into (lifetime_earned, lifetime_redeemed).
pub fn fold_transactions<'a>(
    transactions: impl Iterator<Item = &'a LoyaltyTransaction>,
) -> (i64, i64) {
    let mut earned = 0;
    let mut redeemed = 0;
    for txn in transactions {
        match txn.kind {
            TransactionKind::Earned => earned += txn.delta,
            TransactionKind::Redeemed => redeemed += -txn.delta,
        }
    }
    (earned, redeemed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(LoyaltyTier::from_lifetime_earned(0), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::from_lifetime_earned(9_999), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::from_lifetime_earned(10_000), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::from_lifetime_earned(50_000), LoyaltyTier::Gold);
        assert_eq!(LoyaltyTier::from_lifetime_earned(200_000), LoyaltyTier::Platinum);
    }

    #[test]
    fn test_earn_updates_balance_and_tier() {
        let mut account = LoyaltyAccount::new(CustomerId::new("c1"), NOW);
        account.earn(12_000, NOW).unwrap();
        assert_eq!(account.balance, 12_000);
        assert_eq!(account.tier, LoyaltyTier::Silver);
        assert!(account.is_consistent());
    }

    #[test]
    fn test_redeem_cannot_go_negative() {
        let mut account = LoyaltyAccount::new(CustomerId::new("c1"), NOW);
        account.earn(500, NOW).unwrap();
        let err = account.redeem(600, NOW).unwrap_err();
        assert_eq!(
            err,
            CommerceError::InsufficientPoints {
                requested: 600,
                available: 500,
            }
        );
        assert_eq!(account.balance, 500);
    }

    #[test]
    fn test_tier_survives_redemption() {
        // Tier follows lifetime earned, not current balance.
        let mut account = LoyaltyAccount::new(CustomerId::new("c1"), NOW);
        account.earn(60_000, NOW).unwrap();
        account.redeem(55_000, NOW).unwrap();
        assert_eq!(account.tier, LoyaltyTier::Gold);
        assert_eq!(account.balance, 5_000);
        assert!(account.is_consistent());
    }

    #[test]
    fn test_fold_matches_account() {
        let c = CustomerId::new("c1");
        let txns = vec![
            LoyaltyTransaction {
                customer_id: c.clone(),
                delta: 1_000,
                kind: TransactionKind::Earned,
                source: TransactionSource::Order,
                order_number: Some("ORD-1".into()),
                note: None,
                timestamp: NOW,
            },
            LoyaltyTransaction {
                customer_id: c.clone(),
                delta: -400,
                kind: TransactionKind::Redeemed,
                source: TransactionSource::Order,
                order_number: Some("ORD-2".into()),
                note: None,
                timestamp: NOW + 10,
            },
        ];
        let (earned, redeemed) = fold_transactions(txns.iter());
        assert_eq!(earned, 1_000);
        assert_eq!(redeemed, 400);
    }
}
