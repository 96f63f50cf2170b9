//! Order and production workflow domain logic for Atelier.
//!
//! This crate provides the core types for a made-to-measure tailoring
//! storefront:
//!
//! - **Pricing**: per-line quotes from base price, fabric, embroidery,
//!   add-ons and rush fees
//! - **Cart**: the order-creation input aggregate
//! - **Discount**: discount codes with eligibility rules and usage caps
//! - **Loyalty**: point ledger with tiers and an append-only transaction log
//! - **Order**: the order aggregate and its lifecycle state machine
//! - **Production**: the shop-floor queue derived from custom-stitched lines
//!
//! All monetary values are integers in the smallest currency unit; rounding,
//! where a division is unavoidable, rounds half up.
//!
//! # Example
//!
//! ```rust,ignore
//! use atelier_commerce::prelude::*;
//!
//! let rates = RateCard::default();
//! let quote = price_line(&PriceRequest {
//!     quantity: 1,
//!     base_price: Money::new(350_000),
//!     customization: None,
//!     rush: false,
//! }, &rates)?;
//! println!("Line total: {}", quote.line_total);
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod cart;
pub mod catalog;
pub mod discount;
pub mod loyalty;
pub mod order;
pub mod pricing;
pub mod production;

pub use error::CommerceError;
pub use ids::*;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::Money;

    // Cart
    pub use crate::cart::{Address, Cart, CartItem, CartItemKind};

    // Catalog
    pub use crate::catalog::{Catalog, ProductSnapshot};

    // Pricing
    pub use crate::pricing::{
        price_line, AddOn, Complexity, Coverage, Customization, CustomizationInput,
        EmbroideryKind, EmbroiderySpec, FabricQuality, FabricSource, LineQuote, PriceRequest,
        RateCard,
    };

    // Discount
    pub use crate::discount::{DiscountCode, DiscountKind};

    // Loyalty
    pub use crate::loyalty::{
        LoyaltyAccount, LoyaltyTier, LoyaltyTransaction, TransactionKind, TransactionSource,
    };

    // Order
    pub use crate::order::{
        Order, OrderLine, OrderLineDetail, OrderStatus, PaymentRecord, PricingBreakdown,
        StatusEntry,
    };

    // Production
    pub use crate::production::{
        AssignmentRecord, CuttingSheet, CuttingSheetRow, Priority, ProductionQueueItem,
        ProductionStage, StageEntry,
    };
}
