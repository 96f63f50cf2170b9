//! Commerce error types.

use crate::money::Money;
use thiserror::Error;

/// Errors that can occur in order and production workflow operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Malformed or contradictory input, rejected before any persistence.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Product not found in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Production queue item not found.
    #[error("Queue item not found: {0}")]
    QueueItemNotFound(String),

    /// Loyalty account not found.
    #[error("Loyalty account not found: {0}")]
    AccountNotFound(String),

    /// A required embroidery axis is missing for a non-none embroidery kind.
    #[error("Embroidery {0} is required when an embroidery kind is selected")]
    MissingEmbroideryDetail(&'static str),

    /// Customer-supplied fabric combined with a store fabric quality/meters.
    #[error("Customer-supplied fabric cannot also specify a fabric quality or meters")]
    FabricContradiction,

    /// Store-sourced fabric missing its quality or meters.
    #[error("Store-sourced fabric requires both quality and meters")]
    MissingFabricDetail,

    /// Unknown or inactive discount code.
    #[error("Invalid discount code: {0}")]
    InvalidDiscountCode(String),

    /// Order subtotal below the code's minimum.
    #[error("Order subtotal {subtotal} is below the {required} minimum for this code")]
    DiscountBelowMinimum { required: Money, subtotal: Money },

    /// Discount code validity window has passed.
    #[error("Discount code expired: {0}")]
    DiscountExpired(String),

    /// Discount code usage limit reached.
    #[error("Discount code usage limit reached: {0}")]
    DiscountUsageExceeded(String),

    /// State machine rule violation.
    #[error("Illegal order transition from {from} to {to}")]
    IllegalTransition { from: String, to: String },

    /// Production stage rule violation.
    #[error("Illegal stage change from {from} to {to}")]
    IllegalStageChange { from: String, to: String },

    /// Redemption would drive the point balance negative.
    #[error("Insufficient points: requested {requested}, available {available}")]
    InsufficientPoints { requested: i64, available: i64 },

    /// Arithmetic overflow in money calculation.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::Validation(e.to_string())
    }
}
