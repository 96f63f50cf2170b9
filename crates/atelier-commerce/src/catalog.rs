//! Catalog collaborator interface.
//!
//! The catalog service itself (product browsing, media, SEO) lives outside
//! this engine; the order workflow only needs a price snapshot per product
//! at creation time. Snapshots are frozen into the order so later catalog
//! edits never retroactively change existing orders.

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A point-in-time view of a product, frozen into order lines.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductSnapshot {
    /// Product identifier.
    pub product_id: ProductId,
    /// SKU at snapshot time.
    pub sku: String,
    /// Product name at snapshot time.
    pub name: String,
    /// Base price at snapshot time.
    pub base_price: Money,
}

/// Read-only view over the product catalog.
pub trait Catalog {
    /// Current snapshot for a product, or `ProductNotFound`.
    fn snapshot(&self, product_id: &ProductId) -> Result<ProductSnapshot, CommerceError>;
}
