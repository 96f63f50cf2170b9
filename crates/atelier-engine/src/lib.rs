//! Order and production workflow orchestration.
//!
//! The engine wires the domain crate to the stores and owns every side
//! effect of the order lifecycle:
//!
//! - order creation: per-line pricing, atomic discount consumption,
//!   atomic persistence
//! - status transitions: per-order serialization via optimistic versions,
//!   with a single automatic retry on conflict
//! - transition side effects: queue item creation on payment-verified,
//!   idempotent loyalty credit on delivery, queue cancellation on cancel
//! - the production queue manager, with partial-success bulk operations
//! - the public tracking view with masked customer details
//!
//! Notifications are dispatched after a transition commits; a sink failure
//! is logged and never undoes the transition.

pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod orders;
pub mod queue;
pub mod tracking;

pub use auth::Role;
pub use catalog::InMemoryCatalog;
pub use config::EngineConfig;
pub use error::EngineError;
pub use notify::{NoopSink, Notification, NotificationSink, NotifyError};
pub use orders::{OrderReceipt, OrderService};
pub use queue::{AssignOutcome, ProductionQueueManager, StageUpdateOutcome};
pub use tracking::TrackingView;
