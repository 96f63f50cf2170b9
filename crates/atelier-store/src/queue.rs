//! Production queue storage.

use crate::error::StoreError;
use atelier_commerce::error::CommerceError;
use atelier_commerce::ids::QueueItemId;
use atelier_commerce::production::ProductionQueueItem;
use dashmap::DashMap;

/// Production queue items keyed by item ID.
///
/// Mutations run under the per-entry lock. Delivered orders get their items
/// archived (kept for the audit trail, out of the active queue); cancelled
/// orders keep theirs in the queue, marked cancelled.
#[derive(Debug, Default)]
pub struct QueueStore {
    active: DashMap<QueueItemId, ProductionQueueItem>,
    archived: DashMap<QueueItemId, ProductionQueueItem>,
}

impl QueueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new queue item.
    pub fn insert(&self, item: ProductionQueueItem) {
        self.active.insert(item.id.clone(), item);
    }

    /// Read an active item.
    pub fn get(&self, id: &QueueItemId) -> Result<ProductionQueueItem, StoreError> {
        self.active
            .get(id)
            .map(|e| e.value().clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    /// Mutate one item under its entry lock.
    ///
    /// The closure's error aborts the mutation for this item only.
    pub fn with_item_mut<T>(
        &self,
        id: &QueueItemId,
        f: impl FnOnce(&mut ProductionQueueItem) -> Result<T, CommerceError>,
    ) -> Result<T, CommerceError> {
        match self.active.get_mut(id) {
            Some(mut entry) => f(entry.value_mut()),
            None => Err(CommerceError::QueueItemNotFound(id.to_string())),
        }
    }

    /// Active items for one order.
    pub fn items_for_order(&self, order_number: &str) -> Vec<ProductionQueueItem> {
        self.active
            .iter()
            .filter(|e| e.value().order_number == order_number)
            .map(|e| e.value().clone())
            .collect()
    }

    /// All active items, rush and high priority first.
    pub fn work_queue(&self) -> Vec<ProductionQueueItem> {
        let mut items: Vec<_> = self
            .active
            .iter()
            .filter(|e| !e.value().is_cancelled())
            .map(|e| e.value().clone())
            .collect();
        items.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        items
    }

    /// Move an order's items out of the active queue into the archive.
    ///
    /// Returns how many items were archived.
    pub fn archive_for_order(&self, order_number: &str) -> usize {
        let ids: Vec<QueueItemId> = self
            .active
            .iter()
            .filter(|e| e.value().order_number == order_number)
            .map(|e| e.key().clone())
            .collect();
        let mut moved = 0;
        for id in ids {
            if let Some((id, item)) = self.active.remove(&id) {
                self.archived.insert(id, item);
                moved += 1;
            }
        }
        moved
    }

    /// Read an archived item.
    pub fn get_archived(&self, id: &QueueItemId) -> Option<ProductionQueueItem> {
        self.archived.get(id).map(|e| e.value().clone())
    }

    /// Number of active items.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether the active queue is empty.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
