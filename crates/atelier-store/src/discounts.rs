//! Discount code storage with atomic usage consumption.

use atelier_commerce::discount::DiscountCode;
use atelier_commerce::error::CommerceError;
use atelier_commerce::money::Money;
use dashmap::DashMap;

/// Discount storage keyed by uppercase code.
///
/// `consume` is the only path that spends a usage slot: it revalidates and
/// increments `used_count` under the entry lock in one step, so two
/// concurrent orders can never both take the last unit of a limited code.
#[derive(Debug, Default)]
pub struct DiscountStore {
    inner: DashMap<String, DiscountCode>,
}

impl DiscountStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a code definition.
    pub fn insert(&self, code: DiscountCode) {
        self.inner.insert(code.code.clone(), code);
    }

    /// Case-insensitive lookup.
    pub fn get(&self, code: &str) -> Option<DiscountCode> {
        self.inner.get(&code.to_uppercase()).map(|e| e.value().clone())
    }

    /// Validate without spending a slot (cart preview).
    pub fn validate(&self, code: &str, subtotal: Money, now: i64) -> Result<Money, CommerceError> {
        let key = code.to_uppercase();
        match self.inner.get(&key) {
            Some(entry) => entry.value().validate(subtotal, now),
            None => Err(CommerceError::InvalidDiscountCode(key)),
        }
    }

    /// Validate and spend one usage slot as a single atomic step.
    ///
    /// Returns the computed discount amount. The loser of a race on the
    /// last unit of a limited code gets `DiscountUsageExceeded`.
    pub fn consume(&self, code: &str, subtotal: Money, now: i64) -> Result<Money, CommerceError> {
        let key = code.to_uppercase();
        match self.inner.get_mut(&key) {
            Some(mut entry) => {
                let discount = entry.value_mut();
                let amount = discount.validate(subtotal, now)?;
                discount.record_usage();
                Ok(amount)
            }
            None => Err(CommerceError::InvalidDiscountCode(key)),
        }
    }

    /// Give back one usage slot (cancel-refund policy).
    ///
    /// Returns false for an unknown code.
    pub fn release(&self, code: &str) -> bool {
        match self.inner.get_mut(&code.to_uppercase()) {
            Some(mut entry) => {
                entry.value_mut().release_usage();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let store = DiscountStore::new();
        store.insert(DiscountCode::percentage("Welcome10", 10));
        assert!(store.get("welcome10").is_some());
        assert!(store.get("WELCOME10").is_some());
        assert!(store.get("NOPE").is_none());
    }

    #[test]
    fn test_validate_does_not_spend() {
        let store = DiscountStore::new();
        store.insert(DiscountCode::percentage("W10", 10).with_usage_limit(1));

        store.validate("W10", Money::new(10_000), NOW).unwrap();
        store.validate("W10", Money::new(10_000), NOW).unwrap();
        assert_eq!(store.get("W10").unwrap().used_count, 0);
    }

    #[test]
    fn test_consume_spends_exactly_one() {
        let store = DiscountStore::new();
        store.insert(DiscountCode::percentage("W10", 10).with_usage_limit(2));

        let amount = store.consume("w10", Money::new(10_000), NOW).unwrap();
        assert_eq!(amount.amount, 1_000);
        assert_eq!(store.get("W10").unwrap().used_count, 1);
    }

    #[test]
    fn test_release_gives_back_slot() {
        let store = DiscountStore::new();
        store.insert(DiscountCode::percentage("W10", 10).with_usage_limit(1));

        store.consume("W10", Money::new(10_000), NOW).unwrap();
        assert!(store.consume("W10", Money::new(10_000), NOW).is_err());

        assert!(store.release("W10"));
        assert!(store.consume("W10", Money::new(10_000), NOW).is_ok());
    }

    #[test]
    fn test_last_unit_single_winner_under_contention() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(DiscountStore::new());
        store.insert(DiscountCode::percentage("LAST1", 10).with_usage_limit(1));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.consume("LAST1", Money::new(10_000), NOW).is_ok())
            })
            .collect();

        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&won| won)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(store.get("LAST1").unwrap().used_count, 1);
    }
}
