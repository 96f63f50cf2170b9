//! Pricing engine module.
//!
//! Contains the rate card configuration and the pure per-line pricing
//! function.

mod engine;
mod rates;

pub use engine::{
    price_line, AddOn, Complexity, Coverage, Customization, CustomizationInput, EmbroideryKind,
    EmbroiderySpec, FabricQuality, FabricSource, LineQuote, PriceRequest,
};
pub use rates::RateCard;
