//! Store error types.

use thiserror::Error;

/// Errors that can occur in the persistence layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Unknown key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Key already present on insert.
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    /// Write attempted against a stale version.
    #[error("Version conflict: expected {expected}, found {actual}")]
    VersionConflict { expected: u64, actual: u64 },
}
