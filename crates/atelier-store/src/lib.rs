//! In-memory persistence for the Atelier order workflow.
//!
//! Each store owns one aggregate family and enforces the concurrency
//! contract the workflow depends on:
//!
//! - **Orders**: per-order optimistic versioning; a write against a stale
//!   version is rejected, never silently overwritten
//! - **Discounts**: usage increments are conditional on remaining capacity
//!   and happen atomically with validation (no validate-then-increment race)
//! - **Loyalty**: order credits are idempotent, keyed by order number, and
//!   the cached balance can be recomputed from the transaction log
//! - **Queue**: per-item mutation under the entry lock

pub mod error;

mod discounts;
mod loyalty;
mod orders;
mod queue;

pub use discounts::DiscountStore;
pub use error::StoreError;
pub use loyalty::{CreditOutcome, LoyaltyStore};
pub use orders::{OrderStore, VersionedOrder};
pub use queue::QueueStore;
