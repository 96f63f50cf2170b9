//! Notification dispatch.
//!
//! Delivery (email/WhatsApp/etc.) belongs to an external dispatcher that
//! retries on its own schedule; the engine fires best-effort after a
//! transition commits. A sink failure is logged and never surfaced as an
//! order failure.

use atelier_commerce::money::Money;
use atelier_commerce::order::OrderStatus;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// A customer-facing notification event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Notification {
    /// Order placed.
    OrderConfirmed {
        order_number: String,
        email: String,
        total: Money,
    },
    /// Order status changed.
    StatusChanged {
        order_number: String,
        email: String,
        status: OrderStatus,
    },
}

impl Notification {
    /// Order the event belongs to.
    pub fn order_number(&self) -> &str {
        match self {
            Notification::OrderConfirmed { order_number, .. } => order_number,
            Notification::StatusChanged { order_number, .. } => order_number,
        }
    }
}

/// Sink delivery failure.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Notification delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Where notifications go.
pub trait NotificationSink: Send + Sync {
    /// Deliver one event; best-effort, idempotent downstream.
    fn deliver(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// A sink that drops everything (tests, headless deployments).
#[derive(Debug, Default)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn deliver(&self, _notification: &Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Fire a notification after a commit. Failures are logged, never returned.
pub fn dispatch(sink: &dyn NotificationSink, notification: &Notification) {
    if let Err(e) = sink.deliver(notification) {
        warn!(
            order_number = notification.order_number(),
            error = %e,
            "notification delivery failed"
        );
    }
}
