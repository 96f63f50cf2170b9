//! Rate card configuration for the pricing engine.

use crate::money::Money;
use crate::pricing::engine::{Complexity, Coverage, EmbroideryKind, FabricQuality};
use serde::{Deserialize, Serialize};

/// Configured rates the pricing engine prices against.
///
/// Multipliers are integer percents (100 = x1.0) so the whole multiplier
/// stack stays in integer math.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateCard {
    /// Per-meter fabric rate, standard quality.
    pub fabric_standard_per_meter: Money,
    /// Per-meter fabric rate, premium quality.
    pub fabric_premium_per_meter: Money,
    /// Per-meter fabric rate, luxury quality.
    pub fabric_luxury_per_meter: Money,

    /// Base embroidery rate for thread work.
    pub embroidery_thread_base: Money,
    /// Base embroidery rate for zardozi work.
    pub embroidery_zardozi_base: Money,
    /// Base embroidery rate for sequin work.
    pub embroidery_sequin_base: Money,
    /// Base embroidery rate for mirror work.
    pub embroidery_mirror_base: Money,

    /// Complexity multiplier for simple work, in percent.
    pub complexity_simple_pct: i64,
    /// Complexity multiplier for moderate work, in percent.
    pub complexity_moderate_pct: i64,
    /// Complexity multiplier for intricate work, in percent.
    pub complexity_intricate_pct: i64,

    /// Coverage multiplier for minimal coverage, in percent.
    pub coverage_minimal_pct: i64,
    /// Coverage multiplier for medium coverage, in percent.
    pub coverage_medium_pct: i64,
    /// Coverage multiplier for heavy coverage, in percent.
    pub coverage_heavy_pct: i64,

    /// Flat rush fee, applied once per order.
    pub rush_fee: Money,
    /// Flat shipping fee per order.
    pub shipping_fee: Money,
}

impl RateCard {
    /// Per-meter rate for a fabric quality.
    pub fn fabric_rate(&self, quality: FabricQuality) -> Money {
        match quality {
            FabricQuality::Standard => self.fabric_standard_per_meter,
            FabricQuality::Premium => self.fabric_premium_per_meter,
            FabricQuality::Luxury => self.fabric_luxury_per_meter,
        }
    }

    /// Base rate for an embroidery kind.
    pub fn embroidery_base(&self, kind: EmbroideryKind) -> Money {
        match kind {
            EmbroideryKind::Thread => self.embroidery_thread_base,
            EmbroideryKind::Zardozi => self.embroidery_zardozi_base,
            EmbroideryKind::Sequin => self.embroidery_sequin_base,
            EmbroideryKind::Mirror => self.embroidery_mirror_base,
        }
    }

    /// Multiplier percent for a complexity level.
    pub fn complexity_pct(&self, complexity: Complexity) -> i64 {
        match complexity {
            Complexity::Simple => self.complexity_simple_pct,
            Complexity::Moderate => self.complexity_moderate_pct,
            Complexity::Intricate => self.complexity_intricate_pct,
        }
    }

    /// Multiplier percent for a coverage level.
    pub fn coverage_pct(&self, coverage: Coverage) -> i64 {
        match coverage {
            Coverage::Minimal => self.coverage_minimal_pct,
            Coverage::Medium => self.coverage_medium_pct,
            Coverage::Heavy => self.coverage_heavy_pct,
        }
    }
}

impl Default for RateCard {
    fn default() -> Self {
        Self {
            fabric_standard_per_meter: Money::new(45_000),
            fabric_premium_per_meter: Money::new(90_000),
            fabric_luxury_per_meter: Money::new(180_000),

            embroidery_thread_base: Money::new(80_000),
            embroidery_zardozi_base: Money::new(250_000),
            embroidery_sequin_base: Money::new(120_000),
            embroidery_mirror_base: Money::new(100_000),

            complexity_simple_pct: 100,
            complexity_moderate_pct: 150,
            complexity_intricate_pct: 220,

            coverage_minimal_pct: 100,
            coverage_medium_pct: 140,
            coverage_heavy_pct: 200,

            rush_fee: Money::new(150_000),
            shipping_fee: Money::new(9_900),
        }
    }
}
