//! Money type for representing monetary values.
//!
//! Uses an integer amount in the smallest currency unit (paise) to avoid
//! floating-point precision issues. The storefront trades in a single
//! currency, so no currency tag is carried.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// A monetary value in the smallest currency unit (paise).
///
/// 100 paise = 1 rupee, so `Money::new(4999)` displays as `Rs 49.99`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Money {
    /// Amount in paise.
    pub amount: i64,
}

impl Money {
    /// Create a new Money value from paise.
    pub fn new(amount: i64) -> Self {
        Self { amount }
    }

    /// Create a Money value from whole rupees.
    pub fn from_rupees(rupees: i64) -> Self {
        Self::new(rupees * 100)
    }

    /// Zero amount.
    pub fn zero() -> Self {
        Self::new(0)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }

    /// Whole-rupee part of the amount, truncated toward zero.
    pub fn whole_units(&self) -> i64 {
        self.amount / 100
    }

    /// Checked addition.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        self.amount.checked_add(other.amount).map(Money::new)
    }

    /// Checked subtraction.
    pub fn try_subtract(&self, other: &Money) -> Option<Money> {
        self.amount.checked_sub(other.amount).map(Money::new)
    }

    /// Checked multiplication by a scalar.
    pub fn try_multiply(&self, factor: i64) -> Option<Money> {
        self.amount.checked_mul(factor).map(Money::new)
    }

    /// Checked scale by a rational `numerator / denominator`, rounding
    /// half up. This is the one place division enters monetary math
    /// (percentage discounts, per-meter fabric rates, multiplier stacks).
    ///
    /// Amounts and numerators are expected to be non-negative; the
    /// denominator must be positive.
    pub fn try_scale(&self, numerator: i64, denominator: i64) -> Option<Money> {
        if denominator <= 0 {
            return None;
        }
        let scaled = self.amount.checked_mul(numerator)?;
        let rounded = scaled.checked_add(denominator / 2)?.div_euclid(denominator);
        Some(Money::new(rounded))
    }

    /// Percentage of this amount, rounding half up.
    pub fn try_percent(&self, percent: i64) -> Option<Money> {
        self.try_scale(percent, 100)
    }

    /// The smaller of two amounts.
    pub fn min(self, other: Money) -> Money {
        Money::new(self.amount.min(other.amount))
    }

    /// Checked sum of an iterator of Money values.
    pub fn try_sum<'a>(iter: impl Iterator<Item = &'a Money>) -> Option<Money> {
        let mut total = Money::zero();
        for m in iter {
            total = total.try_add(m)?;
        }
        Some(total)
    }

    /// Format as a display string (e.g., "Rs 49.99").
    pub fn display(&self) -> String {
        let sign = if self.amount < 0 { "-" } else { "" };
        let abs = self.amount.abs();
        format!("{}Rs {}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::new(self.amount + other.amount)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::new(self.amount - other.amount)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, factor: i64) -> Money {
        Money::new(self.amount * factor)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
