//! Customer-facing order tracking.
//!
//! The tracking view is what an unauthenticated lookup by order number may
//! see: status, history and the delivery estimate. Contact details are
//! masked and payment details never leave the engine.

use atelier_commerce::order::{Order, OrderStatus, StatusEntry};
use serde::{Deserialize, Serialize};

/// Public projection of an order for tracking pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackingView {
    /// Order number.
    pub order_number: String,
    /// Current status.
    pub status: OrderStatus,
    /// Human-readable status label.
    pub status_label: String,
    /// Transition history, oldest first.
    pub history: Vec<StatusEntry>,
    /// Estimated delivery (Unix timestamp).
    pub estimated_delivery: Option<i64>,
    /// Unix timestamp of order creation.
    pub created_at: i64,
    /// Masked contact email.
    pub email: String,
    /// Masked contact phone.
    pub phone: String,
    /// Total item count.
    pub item_count: i64,
}

impl TrackingView {
    /// Project an order into its public tracking shape.
    pub fn from_order(order: &Order) -> Self {
        Self {
            order_number: order.order_number.clone(),
            status: order.status,
            status_label: order.status.display_name().to_string(),
            history: order.history.clone(),
            estimated_delivery: order.estimated_delivery,
            created_at: order.created_at,
            email: mask_email(&order.email),
            phone: mask_phone(&order.phone),
            item_count: order.lines.iter().map(|l| l.quantity).sum(),
        }
    }
}

/// Keep the first character of the local part and the full domain.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first = local.chars().next().map(String::from).unwrap_or_default();
            format!("{}****@{}", first, domain)
        }
        None => "****".to_string(),
    }
}

/// Keep only the last four digits.
fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() <= 4 {
        return "*".repeat(digits.len());
    }
    let tail: String = digits[digits.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(digits.len() - 4), tail)
}
