//! Engine configuration.

use atelier_commerce::pricing::RateCard;
use serde::{Deserialize, Serialize};

/// Configuration for the order workflow engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pricing rates.
    pub rates: RateCard,
    /// Whether cancelling an order gives back its consumed discount-code
    /// usage slot. Policy is deliberately configurable; default off.
    pub refund_discount_on_cancel: bool,
    /// Delivery estimate for standard orders, in days from creation.
    pub standard_lead_days: i64,
    /// Delivery estimate for rush orders, in days from creation.
    pub rush_lead_days: i64,
}

impl EngineConfig {
    /// Set the cancel-refund policy.
    pub fn with_refund_on_cancel(mut self, refund: bool) -> Self {
        self.refund_discount_on_cancel = refund;
        self
    }

    /// Replace the rate card.
    pub fn with_rates(mut self, rates: RateCard) -> Self {
        self.rates = rates;
        self
    }

    /// Delivery estimate in seconds from creation for an order.
    pub fn lead_seconds(&self, rush: bool) -> i64 {
        let days = if rush {
            self.rush_lead_days
        } else {
            self.standard_lead_days
        };
        days * 86_400
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rates: RateCard::default(),
            refund_discount_on_cancel: false,
            standard_lead_days: 14,
            rush_lead_days: 5,
        }
    }
}
