//! In-memory catalog backed by a snapshot table.
//!
//! Stands in for the real catalog service at the `Catalog` seam; the
//! engine only ever asks for price snapshots.

use atelier_commerce::catalog::{Catalog, ProductSnapshot};
use atelier_commerce::error::CommerceError;
use atelier_commerce::ids::ProductId;
use atelier_commerce::money::Money;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A catalog holding snapshots in memory.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, ProductSnapshot>>,
}

impl InMemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a product.
    pub fn add(&self, product_id: ProductId, sku: impl Into<String>, name: impl Into<String>, base_price: Money) {
        let snapshot = ProductSnapshot {
            product_id: product_id.clone(),
            sku: sku.into(),
            name: name.into(),
            base_price,
        };
        self.products.write().insert(product_id, snapshot);
    }
}

impl Catalog for InMemoryCatalog {
    fn snapshot(&self, product_id: &ProductId) -> Result<ProductSnapshot, CommerceError> {
        self.products
            .read()
            .get(product_id)
            .cloned()
            .ok_or_else(|| CommerceError::ProductNotFound(product_id.to_string()))
    }
}
