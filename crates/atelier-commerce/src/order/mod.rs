//! Order module.
//!
//! Contains the order aggregate, its lines, the pricing breakdown and the
//! lifecycle state machine.

mod order;
mod status;

pub use order::{
    generate_order_number, Order, OrderLine, OrderLineDetail, PaymentRecord, PricingBreakdown,
    StatusEntry,
};
pub use status::OrderStatus;
