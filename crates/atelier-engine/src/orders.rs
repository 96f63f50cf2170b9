//! Order service: creation and lifecycle transitions.

use crate::auth::{require_staff, Role};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::notify::{dispatch, Notification, NotificationSink};
use crate::tracking::TrackingView;
use atelier_commerce::cart::{Cart, CartItemKind};
use atelier_commerce::catalog::Catalog;
use atelier_commerce::error::CommerceError;
use atelier_commerce::money::Money;
use atelier_commerce::order::{
    generate_order_number, Order, OrderLine, OrderLineDetail, OrderStatus, PaymentRecord,
    PricingBreakdown,
};
use atelier_commerce::pricing::{price_line, PriceRequest};
use atelier_commerce::production::{Priority, ProductionQueueItem, ProductionStage};
use atelier_commerce::ids::LineId;
use atelier_store::{DiscountStore, LoyaltyStore, OrderStore, QueueStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// What the storefront gets back from order creation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderReceipt {
    /// Assigned order number.
    pub order_number: String,
    /// Amount charged.
    pub total: Money,
    /// Entry status.
    pub status: OrderStatus,
}

/// Orchestrates order creation and status transitions.
pub struct OrderService {
    orders: Arc<OrderStore>,
    discounts: Arc<DiscountStore>,
    loyalty: Arc<LoyaltyStore>,
    queue: Arc<QueueStore>,
    catalog: Arc<dyn Catalog + Send + Sync>,
    sink: Arc<dyn NotificationSink>,
    config: EngineConfig,
}

impl OrderService {
    /// Wire up the service.
    pub fn new(
        orders: Arc<OrderStore>,
        discounts: Arc<DiscountStore>,
        loyalty: Arc<LoyaltyStore>,
        queue: Arc<QueueStore>,
        catalog: Arc<dyn Catalog + Send + Sync>,
        sink: Arc<dyn NotificationSink>,
        config: EngineConfig,
    ) -> Self {
        Self {
            orders,
            discounts,
            loyalty,
            queue,
            catalog,
            sink,
            config,
        }
    }

    /// Create an order from a cart.
    ///
    /// Prices every line against current catalog snapshots, consumes the
    /// discount code atomically (the usage increment and the order commit
    /// are one unit: if persistence fails the slot is given back), and
    /// persists the order with all lines. The order enters
    /// `PendingPayment`.
    pub fn create_order(&self, cart: Cart, now: i64) -> Result<OrderReceipt, EngineError> {
        cart.validate()?;

        let mut lines = Vec::with_capacity(cart.items.len());
        for item in &cart.items {
            let snapshot = self.catalog.snapshot(&item.product_id)?;
            let (customization, detail) = match &item.kind {
                CartItemKind::Standard => (None, OrderLineDetail::Standard),
                CartItemKind::CustomStitched {
                    measurements,
                    customization,
                } => {
                    let validated = customization.clone().into_customization()?;
                    (
                        Some(validated.clone()),
                        OrderLineDetail::CustomStitched {
                            measurements: measurements.clone(),
                            customization: validated,
                        },
                    )
                }
            };
            let quote = price_line(
                &PriceRequest {
                    quantity: item.quantity,
                    base_price: snapshot.base_price,
                    customization: customization.as_ref(),
                    rush: cart.rush_order,
                },
                &self.config.rates,
            )?;
            lines.push(OrderLine {
                id: LineId::generate(),
                product_id: item.product_id.clone(),
                sku: snapshot.sku,
                name: snapshot.name,
                quantity: item.quantity,
                quote,
                detail,
            });
        }

        let mut subtotal = Money::zero();
        for line in &lines {
            let base = line
                .quote
                .base_price
                .try_multiply(line.quantity)
                .ok_or(CommerceError::Overflow)?;
            subtotal = subtotal.try_add(&base).ok_or(CommerceError::Overflow)?;
        }

        // Validate-and-increment is a single atomic step in the store; the
        // loser of a race on the last unit gets CapacityExceeded here.
        let discount_amount = match &cart.discount_code {
            Some(code) => match self.discounts.consume(code, subtotal, now) {
                Ok(amount) => amount,
                Err(CommerceError::DiscountUsageExceeded(code)) => {
                    return Err(EngineError::CapacityExceeded(code))
                }
                Err(e) => return Err(e.into()),
            },
            None => Money::zero(),
        };

        let rush_fee = if cart.rush_order {
            self.config.rates.rush_fee
        } else {
            Money::zero()
        };

        let commit = || -> Result<OrderReceipt, EngineError> {
            let pricing = PricingBreakdown::assemble(
                &lines,
                rush_fee,
                self.config.rates.shipping_fee,
                discount_amount,
            )?;

            let order = Order {
                order_number: generate_order_number(),
                customer_id: cart.customer_id.clone(),
                email: cart.email.clone(),
                phone: cart.phone.clone(),
                shipping_address: cart.shipping_address.clone(),
                lines: lines.clone(),
                pricing,
                payment: PaymentRecord::default(),
                discount_code: cart.discount_code.clone(),
                rush_order: cart.rush_order,
                status: OrderStatus::PendingPayment,
                history: Vec::new(),
                estimated_delivery: Some(now + self.config.lead_seconds(cart.rush_order)),
                created_at: now,
                updated_at: now,
            };
            let receipt = OrderReceipt {
                order_number: order.order_number.clone(),
                total: order.pricing.total,
                status: order.status,
            };
            self.orders.insert(order)?;
            Ok(receipt)
        };

        let receipt = match commit() {
            Ok(receipt) => receipt,
            Err(e) => {
                // Give the usage slot back if the order never persisted.
                if let Some(code) = &cart.discount_code {
                    self.discounts.release(code);
                }
                return Err(e);
            }
        };

        info!(
            order_number = %receipt.order_number,
            total = %receipt.total,
            items = cart.items.len(),
            "order created"
        );
        dispatch(
            self.sink.as_ref(),
            &Notification::OrderConfirmed {
                order_number: receipt.order_number.clone(),
                email: cart.email.clone(),
                total: receipt.total,
            },
        );
        Ok(receipt)
    }

    /// Read an order.
    pub fn order(&self, order_number: &str) -> Result<Order, EngineError> {
        Ok(self.orders.get(order_number)?.order)
    }

    /// Public tracking projection for an order. No authentication; the
    /// order number is the lookup key and the view is already masked.
    pub fn tracking(&self, order_number: &str) -> Result<TrackingView, EngineError> {
        Ok(TrackingView::from_order(&self.orders.get(order_number)?.order))
    }

    /// Run a status transition (admin- or system-triggered).
    ///
    /// Mutations on the same order are serialized through the store's
    /// version check; a conflicted write is retried once against a fresh
    /// read before `ConcurrencyConflict` surfaces. Side effects run after
    /// the write commits and never roll it back.
    pub fn transition(
        &self,
        role: Role,
        order_number: &str,
        target: OrderStatus,
        note: Option<String>,
        now: i64,
    ) -> Result<(), EngineError> {
        require_staff(role, "update order status")?;

        let mut attempts = 0;
        let committed = loop {
            attempts += 1;
            let versioned = self.orders.get(order_number)?;
            let mut order = versioned.order;
            order.transition(target, now, note.clone())?;
            match self.orders.update(order.clone(), versioned.version) {
                Ok(_) => break order,
                Err(StoreError::VersionConflict { .. }) if attempts < 2 => {
                    info!(order_number, "version conflict, retrying transition");
                    continue;
                }
                Err(StoreError::VersionConflict { .. }) => {
                    return Err(EngineError::ConcurrencyConflict(order_number.to_string()))
                }
                Err(e) => return Err(e.into()),
            }
        };

        info!(order_number, status = target.as_str(), "order transitioned");
        self.run_side_effects(&committed, target, now);
        dispatch(
            self.sink.as_ref(),
            &Notification::StatusChanged {
                order_number: committed.order_number.clone(),
                email: committed.email.clone(),
                status: target,
            },
        );
        Ok(())
    }

    fn run_side_effects(&self, order: &Order, target: OrderStatus, now: i64) {
        match target {
            OrderStatus::PaymentVerified => {
                let priority = if order.rush_order {
                    Priority::Rush
                } else {
                    Priority::Normal
                };
                let mut created = 0;
                for line in order.custom_lines() {
                    self.queue.insert(ProductionQueueItem::new(
                        order.order_number.clone(),
                        line.id.clone(),
                        priority,
                        now,
                    ));
                    created += 1;
                }
                if created > 0 {
                    info!(
                        order_number = %order.order_number,
                        items = created,
                        "production queue items created"
                    );
                }
            }
            OrderStatus::Delivered => {
                if let Some(customer_id) = &order.customer_id {
                    match self.loyalty.credit_for_order(
                        customer_id,
                        &order.order_number,
                        order.loyalty_points(),
                        now,
                    ) {
                        Ok(outcome) => info!(
                            order_number = %order.order_number,
                            ?outcome,
                            "loyalty credit"
                        ),
                        Err(e) => warn!(
                            order_number = %order.order_number,
                            error = %e,
                            "loyalty credit failed"
                        ),
                    }
                }
                self.queue.archive_for_order(&order.order_number);
            }
            OrderStatus::Cancelled => {
                for item in self.queue.items_for_order(&order.order_number) {
                    // Already-terminal items stay as they are.
                    let _ = self.queue.with_item_mut(&item.id, |i| {
                        i.set_stage(
                            ProductionStage::Cancelled,
                            Some("order cancelled".to_string()),
                            now,
                        )
                    });
                }
                if self.config.refund_discount_on_cancel {
                    if let Some(code) = &order.discount_code {
                        self.discounts.release(code);
                        info!(
                            order_number = %order.order_number,
                            code,
                            "discount usage released on cancel"
                        );
                    }
                }
            }
            _ => {}
        }
    }
}
