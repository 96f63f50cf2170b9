//! Versioned order storage.

use crate::error::StoreError;
use atelier_commerce::order::Order;
use dashmap::DashMap;

/// An order with its optimistic-concurrency version.
#[derive(Debug, Clone)]
pub struct VersionedOrder {
    /// The order.
    pub order: Order,
    /// Version, bumped on every successful write.
    pub version: u64,
}

/// Order storage keyed by order number.
///
/// Every mutation is a compare-and-swap against the version read earlier;
/// a stale write gets `VersionConflict` instead of clobbering a concurrent
/// update. Orders are never deleted.
#[derive(Debug, Default)]
pub struct OrderStore {
    inner: DashMap<String, VersionedOrder>,
}

impl OrderStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created order at version 1.
    pub fn insert(&self, order: Order) -> Result<(), StoreError> {
        let key = order.order_number.clone();
        match self.inner.entry(key.clone()) {
            dashmap::Entry::Occupied(_) => Err(StoreError::Duplicate(key)),
            dashmap::Entry::Vacant(slot) => {
                slot.insert(VersionedOrder { order, version: 1 });
                Ok(())
            }
        }
    }

    /// Read an order with its current version.
    pub fn get(&self, order_number: &str) -> Result<VersionedOrder, StoreError> {
        self.inner
            .get(order_number)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::NotFound(order_number.to_string()))
    }

    /// Write back an order read at `expected_version`.
    ///
    /// Succeeds and returns the new version only if nobody else has written
    /// in between; otherwise `VersionConflict`.
    pub fn update(
        &self,
        order: Order,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        let key = order.order_number.clone();
        let mut entry = self
            .inner
            .get_mut(&key)
            .ok_or(StoreError::NotFound(key))?;
        if entry.version != expected_version {
            return Err(StoreError::VersionConflict {
                expected: expected_version,
                actual: entry.version,
            });
        }
        entry.order = order;
        entry.version += 1;
        Ok(entry.version)
    }

    /// Number of stored orders.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
