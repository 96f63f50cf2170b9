//! Discount code types and validation.
//!
//! Validation here is pure; the coupled "validate and increment usage in
//! one step" lives in the store layer so two concurrent orders can never
//! double-spend the last unit of a limited code.

use crate::error::CommerceError;
use crate::ids::DiscountId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Type of discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscountKind {
    /// Percentage off the subtotal.
    Percentage,
    /// Fixed amount off.
    Fixed,
}

/// A discount code definition.
///
/// `code` is stored uppercase; lookups are case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiscountCode {
    /// Unique discount identifier.
    pub id: DiscountId,
    /// Code string, normalized to uppercase.
    pub code: String,
    /// Percentage or fixed.
    pub kind: DiscountKind,
    /// Percent (0-100) for percentage codes, paise for fixed codes.
    pub value: i64,
    /// Minimum order subtotal for the code to apply.
    pub minimum_order: Money,
    /// Cap on the computed discount (percentage codes only).
    pub maximum_discount: Option<Money>,
    /// Validity window start (Unix seconds, open if None).
    pub valid_from: Option<i64>,
    /// Validity window end (Unix seconds, open if None).
    pub valid_until: Option<i64>,
    /// Maximum number of uses (None = unlimited).
    pub usage_limit: Option<i64>,
    /// Current usage count.
    pub used_count: i64,
    /// Whether the code is active.
    pub active: bool,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl DiscountCode {
    /// Create a new percentage code.
    pub fn percentage(code: impl Into<String>, percent: i64) -> Self {
        Self::new(code, DiscountKind::Percentage, percent)
    }

    /// Create a new fixed-amount code.
    pub fn fixed(code: impl Into<String>, amount: Money) -> Self {
        Self::new(code, DiscountKind::Fixed, amount.amount)
    }

    fn new(code: impl Into<String>, kind: DiscountKind, value: i64) -> Self {
        let now = current_timestamp();
        Self {
            id: DiscountId::generate(),
            code: code.into().to_uppercase(),
            kind,
            value,
            minimum_order: Money::zero(),
            maximum_discount: None,
            valid_from: None,
            valid_until: None,
            usage_limit: None,
            used_count: 0,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Require a minimum order subtotal.
    pub fn with_minimum_order(mut self, amount: Money) -> Self {
        self.minimum_order = amount;
        self
    }

    /// Cap the computed discount (percentage codes).
    pub fn with_maximum_discount(mut self, cap: Money) -> Self {
        self.maximum_discount = Some(cap);
        self
    }

    /// Limit total uses.
    pub fn with_usage_limit(mut self, limit: i64) -> Self {
        self.usage_limit = Some(limit);
        self
    }

    /// Set the validity window (either bound may stay open).
    pub fn with_window(mut self, from: Option<i64>, until: Option<i64>) -> Self {
        self.valid_from = from;
        self.valid_until = until;
        self
    }

    /// Check remaining capacity against the usage limit.
    pub fn has_capacity(&self) -> bool {
        self.usage_limit
            .map(|limit| self.used_count < limit)
            .unwrap_or(true)
    }

    /// Validate against a subtotal at a point in time and compute the
    /// discount amount.
    ///
    /// Check order: active, window, capacity, minimum. The returned amount
    /// never exceeds the subtotal.
    pub fn validate(&self, subtotal: Money, now: i64) -> Result<Money, CommerceError> {
        if !self.active {
            return Err(CommerceError::InvalidDiscountCode(self.code.clone()));
        }
        if let Some(from) = self.valid_from {
            if now < from {
                return Err(CommerceError::InvalidDiscountCode(self.code.clone()));
            }
        }
        if let Some(until) = self.valid_until {
            if now > until {
                return Err(CommerceError::DiscountExpired(self.code.clone()));
            }
        }
        if !self.has_capacity() {
            return Err(CommerceError::DiscountUsageExceeded(self.code.clone()));
        }
        if subtotal < self.minimum_order {
            return Err(CommerceError::DiscountBelowMinimum {
                required: self.minimum_order,
                subtotal,
            });
        }

        let amount = match self.kind {
            DiscountKind::Percentage => {
                let raw = subtotal
                    .try_percent(self.value)
                    .ok_or(CommerceError::Overflow)?;
                match self.maximum_discount {
                    Some(cap) => raw.min(cap),
                    None => raw,
                }
            }
            DiscountKind::Fixed => Money::new(self.value).min(subtotal),
        };

        Ok(amount)
    }

    /// Record one use. Callers must have checked capacity under a lock.
    pub fn record_usage(&mut self) {
        self.used_count += 1;
        self.updated_at = current_timestamp();
    }

    /// Give back one use (cancel-refund policy).
    pub fn release_usage(&mut self) {
        if self.used_count > 0 {
            self.used_count -= 1;
            self.updated_at = current_timestamp();
        }
    }
}

/// Get current Unix timestamp.
fn current_timestamp() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
