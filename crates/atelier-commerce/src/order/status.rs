//! Order lifecycle status.

use serde::{Deserialize, Serialize};

/// Order status.
///
/// The happy path runs strictly forward; `Cancelled` is reachable from any
/// state before `Delivered`. Transitions are admin- or system-triggered,
/// never a free-form client call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order placed, awaiting payment verification.
    #[default]
    PendingPayment,
    /// Payment verified; production may begin.
    PaymentVerified,
    /// Tailoring in progress.
    InProgress,
    /// Finished work under quality check.
    QualityCheck,
    /// Packed and ready for dispatch.
    ReadyDispatch,
    /// Handed to the courier.
    OutForDelivery,
    /// Delivered to the customer.
    Delivered,
    /// Cancelled.
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "pending-payment",
            OrderStatus::PaymentVerified => "payment-verified",
            OrderStatus::InProgress => "in-progress",
            OrderStatus::QualityCheck => "quality-check",
            OrderStatus::ReadyDispatch => "ready-dispatch",
            OrderStatus::OutForDelivery => "out-for-delivery",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "Pending Payment",
            OrderStatus::PaymentVerified => "Payment Verified",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::QualityCheck => "Quality Check",
            OrderStatus::ReadyDispatch => "Ready for Dispatch",
            OrderStatus::OutForDelivery => "Out for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Check if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Check if the order can still be cancelled.
    pub fn can_cancel(&self) -> bool {
        !self.is_terminal()
    }

    /// Check if `target` is a legal next status from here.
    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        use OrderStatus::*;
        match (self, target) {
            (PendingPayment, PaymentVerified) => true,
            (PaymentVerified, InProgress) => true,
            (InProgress, QualityCheck) => true,
            (QualityCheck, ReadyDispatch) => true,
            (ReadyDispatch, OutForDelivery) => true,
            (OutForDelivery, Delivered) => true,
            (from, Cancelled) => from.can_cancel(),
            _ => false,
        }
    }
}
