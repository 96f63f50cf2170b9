//! The order aggregate.
//!
//! Orders are created atomically with all lines priced and the breakdown
//! resolved; after creation they change only through state-machine
//! transitions. Orders are never deleted, only cancelled.

use crate::cart::Address;
use crate::error::CommerceError;
use crate::ids::{CustomerId, LineId, ProductId};
use crate::money::Money;
use crate::order::status::OrderStatus;
use crate::pricing::{Customization, LineQuote};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One entry in the order's append-only status history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusEntry {
    /// Status entered.
    pub status: OrderStatus,
    /// Unix timestamp of the transition.
    pub timestamp: i64,
    /// Optional admin/system note.
    pub note: Option<String>,
}

/// Payment details attached to an order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PaymentRecord {
    /// Payment method label (upi, card, cod, ...).
    pub method: String,
    /// Gateway reference, when one exists.
    pub reference: Option<String>,
    /// Unix timestamp of payment verification.
    pub verified_at: Option<i64>,
}

/// The order's resolved pricing.
///
/// Invariant: `total == subtotal + shipping_fee + stitching_fee -
/// discount_amount`, and total is never negative.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PricingBreakdown {
    /// Sum of base price x quantity over all lines.
    pub subtotal: Money,
    /// Flat shipping fee.
    pub shipping_fee: Money,
    /// Customization costs over all lines plus the once-per-order rush fee.
    pub stitching_fee: Money,
    /// Discount applied to the subtotal.
    pub discount_amount: Money,
    /// Amount charged.
    pub total: Money,
}

impl PricingBreakdown {
    /// Assemble the breakdown from priced lines.
    ///
    /// `rush_fee` is the once-per-order fee (zero when the order is not
    /// rushed); per-line quotes surface it for transparency but it is
    /// deduplicated here.
    pub fn assemble(
        lines: &[OrderLine],
        rush_fee: Money,
        shipping_fee: Money,
        discount_amount: Money,
    ) -> Result<Self, CommerceError> {
        let mut subtotal = Money::zero();
        let mut stitching = rush_fee;
        for line in lines {
            let base = line
                .quote
                .base_price
                .try_multiply(line.quantity)
                .ok_or(CommerceError::Overflow)?;
            subtotal = subtotal.try_add(&base).ok_or(CommerceError::Overflow)?;
            let extras = line
                .quote
                .line_total
                .try_subtract(&base)
                .ok_or(CommerceError::Overflow)?;
            stitching = stitching.try_add(&extras).ok_or(CommerceError::Overflow)?;
        }

        let total = subtotal
            .try_add(&shipping_fee)
            .and_then(|m| m.try_add(&stitching))
            .and_then(|m| m.try_subtract(&discount_amount))
            .ok_or(CommerceError::Overflow)?;
        if total.is_negative() {
            return Err(CommerceError::Validation(format!(
                "order total would be negative: {}",
                total
            )));
        }

        Ok(Self {
            subtotal,
            shipping_fee,
            stitching_fee: stitching,
            discount_amount,
            total,
        })
    }

    /// Check the pricing invariant.
    pub fn is_consistent(&self) -> bool {
        let expected = self.subtotal + self.shipping_fee + self.stitching_fee - self.discount_amount;
        self.total == expected && !self.total.is_negative()
    }
}

/// Standard vs custom-stitched line content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum OrderLineDetail {
    /// Off-the-rack item.
    Standard,
    /// Tailored item: measurements plus validated customization.
    CustomStitched {
        /// Measurement name -> value in centimeters.
        measurements: BTreeMap<String, f64>,
        /// Validated customization choices.
        customization: Customization,
    },
}

/// A line within an order.
///
/// The product snapshot (sku, name, quote) is frozen at order time and
/// immune to later catalog edits. Lines are owned exclusively by their
/// order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    /// Unique line identifier.
    pub id: LineId,
    /// Product ordered.
    pub product_id: ProductId,
    /// SKU at order time.
    pub sku: String,
    /// Product name at order time.
    pub name: String,
    /// Quantity ordered.
    pub quantity: i64,
    /// Frozen price breakdown for this line.
    pub quote: LineQuote,
    /// Standard or custom-stitched content.
    pub detail: OrderLineDetail,
}

impl OrderLine {
    /// Whether this line needs tailoring.
    pub fn is_custom_stitched(&self) -> bool {
        matches!(self.detail, OrderLineDetail::CustomStitched { .. })
    }
}

/// An order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    /// Human-readable order number; unique, assigned at creation, immutable.
    pub order_number: String,
    /// Customer reference (None for guest orders).
    pub customer_id: Option<CustomerId>,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Shipping address snapshot.
    pub shipping_address: Address,
    /// Order lines.
    pub lines: Vec<OrderLine>,
    /// Resolved pricing.
    pub pricing: PricingBreakdown,
    /// Payment record.
    pub payment: PaymentRecord,
    /// Discount code consumed at creation, if any.
    pub discount_code: Option<String>,
    /// Expedited production flag.
    pub rush_order: bool,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Append-only transition history; one entry per transition performed.
    pub history: Vec<StatusEntry>,
    /// Estimated delivery (Unix timestamp).
    pub estimated_delivery: Option<i64>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl Order {
    /// Transition to `target`, appending a history entry.
    ///
    /// Fails with `IllegalTransition` and leaves the order untouched when
    /// `target` is not a legal successor of the current status.
    pub fn transition(
        &mut self,
        target: OrderStatus,
        now: i64,
        note: Option<String>,
    ) -> Result<(), CommerceError> {
        if !self.status.can_transition_to(target) {
            return Err(CommerceError::IllegalTransition {
                from: self.status.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }
        self.status = target;
        self.history.push(StatusEntry {
            status: target,
            timestamp: now,
            note,
        });
        if target == OrderStatus::PaymentVerified {
            self.payment.verified_at = Some(now);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Lines that need tailoring.
    pub fn custom_lines(&self) -> impl Iterator<Item = &OrderLine> {
        self.lines.iter().filter(|l| l.is_custom_stitched())
    }

    /// Whether any line needs tailoring.
    pub fn has_custom_lines(&self) -> bool {
        self.lines.iter().any(|l| l.is_custom_stitched())
    }

    /// Points to credit on delivery: the whole-unit floor of the total.
    pub fn loyalty_points(&self) -> i64 {
        self.pricing.total.whole_units()
    }
}

/// Generate a new order number.
pub fn generate_order_number() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let counter = COUNTER.fetch_add(1, Ordering::SeqCst);

    format!("ORD-{}-{:04}", ts, counter % 10_000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{price_line, PriceRequest, RateCard};

    const NOW: i64 = 1_700_000_000;

    fn line(base: i64, quantity: i64) -> OrderLine {
        let quote = price_line(
            &PriceRequest {
                quantity,
                base_price: Money::new(base),
                customization: None,
                rush: false,
            },
            &RateCard::default(),
        )
        .unwrap();
        OrderLine {
            id: LineId::generate(),
            product_id: ProductId::new("prod-1"),
            sku: "KURTA-01".into(),
            name: "Silk Kurta".into(),
            quantity,
            quote,
            detail: OrderLineDetail::Standard,
        }
    }

    fn order(lines: Vec<OrderLine>, pricing: PricingBreakdown) -> Order {
        Order {
            order_number: generate_order_number(),
            customer_id: None,
            email: "a@example.com".into(),
            phone: "9876543210".into(),
            shipping_address: Address::new("A", "12 MG Road", "Bengaluru", "560001"),
            lines,
            pricing,
            payment: PaymentRecord::default(),
            discount_code: None,
            rush_order: false,
            status: OrderStatus::PendingPayment,
            history: Vec::new(),
            estimated_delivery: None,
            created_at: NOW,
            updated_at: NOW,
        }
    }

    #[test]
    fn test_breakdown_invariant() {
        let lines = vec![line(100_000, 2), line(50_000, 1)];
        let breakdown = PricingBreakdown::assemble(
            &lines,
            Money::zero(),
            Money::new(9_900),
            Money::new(10_000),
        )
        .unwrap();

        assert_eq!(breakdown.subtotal.amount, 250_000);
        assert_eq!(breakdown.total.amount, 250_000 + 9_900 - 10_000);
        assert!(breakdown.is_consistent());
    }

    #[test]
    fn test_rush_fee_applied_once() {
        let lines = vec![line(100_000, 1), line(100_000, 1)];
        let breakdown = PricingBreakdown::assemble(
            &lines,
            Money::new(150_000),
            Money::zero(),
            Money::zero(),
        )
        .unwrap();
        assert_eq!(breakdown.stitching_fee.amount, 150_000);
        assert!(breakdown.is_consistent());
    }

    #[test]
    fn test_transition_appends_history() {
        let lines = vec![line(100_000, 1)];
        let pricing =
            PricingBreakdown::assemble(&lines, Money::zero(), Money::zero(), Money::zero())
                .unwrap();
        let mut order = order(lines, pricing);

        order
            .transition(OrderStatus::PaymentVerified, NOW + 10, None)
            .unwrap();
        order
            .transition(OrderStatus::InProgress, NOW + 20, Some("cutting started".into()))
            .unwrap();

        assert_eq!(order.history.len(), 2);
        assert_eq!(order.history[0].status, OrderStatus::PaymentVerified);
        assert_eq!(order.history[1].note.as_deref(), Some("cutting started"));
        assert!(order.history.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(order.payment.verified_at, Some(NOW + 10));
    }

    #[test]
    fn test_illegal_transition_leaves_state_unchanged() {
        let lines = vec![line(100_000, 1)];
        let pricing =
            PricingBreakdown::assemble(&lines, Money::zero(), Money::zero(), Money::zero())
                .unwrap();
        let mut order = order(lines, pricing);

        let err = order
            .transition(OrderStatus::Delivered, NOW + 10, None)
            .unwrap_err();
        assert_eq!(
            err,
            CommerceError::IllegalTransition {
                from: "pending-payment".into(),
                to: "delivered".into(),
            }
        );
        assert_eq!(order.status, OrderStatus::PendingPayment);
        assert!(order.history.is_empty());
    }

    #[test]
    fn test_loyalty_points_floor_of_total() {
        let lines = vec![line(100_050, 1)];
        let pricing =
            PricingBreakdown::assemble(&lines, Money::zero(), Money::zero(), Money::zero())
                .unwrap();
        let order = order(lines, pricing);
        // Rs 1000.50 -> 1000 points
        assert_eq!(order.loyalty_points(), 1_000);
    }

    #[test]
    fn test_order_number_format() {
        let n = generate_order_number();
        assert!(n.starts_with("ORD-"));
        assert_ne!(n, generate_order_number());
    }
}
