//! Loyalty ledger storage.
//!
//! The transaction log is the source of truth; the per-account balance is
//! a cache kept in lockstep. Order credits are idempotent, keyed by order
//! number, so a retried delivery transition never double-credits.

use atelier_commerce::error::CommerceError;
use atelier_commerce::ids::CustomerId;
use atelier_commerce::loyalty::{
    fold_transactions, LoyaltyAccount, LoyaltyTransaction, TransactionKind, TransactionSource,
};
use dashmap::{DashMap, DashSet};
use parking_lot::RwLock;

/// Outcome of an order credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditOutcome {
    /// Points were credited; carries the new balance.
    Credited(i64),
    /// This order was already credited; no points moved.
    AlreadyCredited,
}

/// Loyalty accounts plus their append-only transaction log.
///
/// Lock order: the account entry guard is always taken before the
/// transaction log lock, never the reverse. Every write path (earn,
/// redeem, recompute) touches the account and the log inside one entry
/// guard, so a recompute can never fold the log between an account
/// update and its matching log append.
#[derive(Debug, Default)]
pub struct LoyaltyStore {
    accounts: DashMap<CustomerId, LoyaltyAccount>,
    transactions: RwLock<Vec<LoyaltyTransaction>>,
    credited_orders: DashSet<String>,
}

impl LoyaltyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an account.
    pub fn account(&self, customer_id: &CustomerId) -> Option<LoyaltyAccount> {
        self.accounts.get(customer_id).map(|e| e.value().clone())
    }

    /// Transactions for one account, oldest first.
    pub fn transactions_for(&self, customer_id: &CustomerId) -> Vec<LoyaltyTransaction> {
        self.transactions
            .read()
            .iter()
            .filter(|t| &t.customer_id == customer_id)
            .cloned()
            .collect()
    }

    /// Credit points for a delivered order, idempotently.
    ///
    /// The order number is claimed first; a repeat call (retried request,
    /// double-fired transition) finds it claimed and is a no-op.
    pub fn credit_for_order(
        &self,
        customer_id: &CustomerId,
        order_number: &str,
        points: i64,
        now: i64,
    ) -> Result<CreditOutcome, CommerceError> {
        if points <= 0 {
            return Err(CommerceError::Validation(format!(
                "credit must be positive, got {}",
                points
            )));
        }
        if !self.credited_orders.insert(order_number.to_string()) {
            return Ok(CreditOutcome::AlreadyCredited);
        }

        let balance = self.apply_earn(
            customer_id,
            points,
            TransactionSource::Order,
            Some(order_number.to_string()),
            None,
            now,
        )?;
        Ok(CreditOutcome::Credited(balance))
    }

    /// Grant referral points.
    pub fn grant_referral(
        &self,
        customer_id: &CustomerId,
        points: i64,
        now: i64,
    ) -> Result<i64, CommerceError> {
        self.apply_earn(customer_id, points, TransactionSource::Referral, None, None, now)
    }

    /// Grant points manually, with a note for the audit trail.
    pub fn grant_manual(
        &self,
        customer_id: &CustomerId,
        points: i64,
        note: impl Into<String>,
        now: i64,
    ) -> Result<i64, CommerceError> {
        self.apply_earn(
            customer_id,
            points,
            TransactionSource::Manual,
            None,
            Some(note.into()),
            now,
        )
    }

    /// Redeem points. Fails rather than drive the balance negative.
    pub fn redeem(
        &self,
        customer_id: &CustomerId,
        points: i64,
        order_number: Option<String>,
        now: i64,
    ) -> Result<i64, CommerceError> {
        let mut entry = self
            .accounts
            .get_mut(customer_id)
            .ok_or_else(|| CommerceError::AccountNotFound(customer_id.to_string()))?;
        let account = entry.value_mut();
        account.redeem(points, now)?;
        // Log append happens under the entry guard; see the lock-order
        // note on the struct.
        self.transactions.write().push(LoyaltyTransaction {
            customer_id: customer_id.clone(),
            delta: -points,
            kind: TransactionKind::Redeemed,
            source: TransactionSource::Order,
            order_number,
            note: None,
            timestamp: now,
        });
        Ok(account.balance)
    }

    /// Check the cached balance against the fold of the transaction log.
    pub fn is_consistent(&self, customer_id: &CustomerId) -> bool {
        let Some(account) = self.account(customer_id) else {
            return true;
        };
        let log = self.transactions_for(customer_id);
        let (earned, redeemed) = fold_transactions(log.iter());
        account.lifetime_earned == earned
            && account.lifetime_redeemed == redeemed
            && account.is_consistent()
    }

    /// Rebuild the cached account from the transaction log.
    ///
    /// The escape hatch for cache drift: the fold result replaces the
    /// cached totals. Returns the healed account.
    pub fn recompute(&self, customer_id: &CustomerId) -> Result<LoyaltyAccount, CommerceError> {
        // Entry guard first, then the log, matching every other write
        // path: an earn or redeem in flight has either fully landed in
        // both places or not started, so the fold can never be stale
        // relative to the account it overwrites.
        let mut entry = self
            .accounts
            .get_mut(customer_id)
            .ok_or_else(|| CommerceError::AccountNotFound(customer_id.to_string()))?;
        let (earned, redeemed) = {
            let log = self.transactions.read();
            fold_transactions(log.iter().filter(|t| &t.customer_id == customer_id))
        };
        let account = entry.value_mut();
        account.lifetime_earned = earned;
        account.lifetime_redeemed = redeemed;
        account.balance = earned - redeemed;
        account.tier = atelier_commerce::loyalty::LoyaltyTier::from_lifetime_earned(earned);
        Ok(account.clone())
    }

    fn apply_earn(
        &self,
        customer_id: &CustomerId,
        points: i64,
        source: TransactionSource,
        order_number: Option<String>,
        note: Option<String>,
        now: i64,
    ) -> Result<i64, CommerceError> {
        let mut entry = self
            .accounts
            .entry(customer_id.clone())
            .or_insert_with(|| LoyaltyAccount::new(customer_id.clone(), now));
        let account = entry.value_mut();
        account.earn(points, now)?;
        // Log append happens under the entry guard; see the lock-order
        // note on the struct.
        self.transactions.write().push(LoyaltyTransaction {
            customer_id: customer_id.clone(),
            delta: points,
            kind: TransactionKind::Earned,
            source,
            order_number,
            note,
            timestamp: now,
        });
        Ok(account.balance)
    }
}
