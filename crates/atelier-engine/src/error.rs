//! Engine error types.

use atelier_commerce::CommerceError;
use atelier_store::StoreError;
use thiserror::Error;

/// Errors surfaced by orchestration operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Domain validation or rule violation.
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A write lost the per-order race twice; the caller should re-read
    /// and retry explicitly.
    #[error("Concurrent update on order {0}, please retry")]
    ConcurrencyConflict(String),

    /// Discount usage race loser.
    #[error("Discount code capacity exhausted: {0}")]
    CapacityExceeded(String),

    /// Role check failure on an admin-gated operation.
    #[error("Role {role} is not allowed to {action}")]
    Unauthorized { role: String, action: String },
}
