//! Per-line price computation.
//!
//! `price_line` is a pure function of its inputs: no I/O, no clock, no
//! catalog access. The caller snapshots the base price before calling.

use crate::error::CommerceError;
use crate::money::Money;
use crate::pricing::rates::RateCard;
use serde::{Deserialize, Serialize};

/// Fabric quality tiers for store-sourced fabric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FabricQuality {
    Standard,
    Premium,
    Luxury,
}

impl FabricQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            FabricQuality::Standard => "standard",
            FabricQuality::Premium => "premium",
            FabricQuality::Luxury => "luxury",
        }
    }
}

/// Where the fabric comes from.
///
/// The tagged representation makes "customer-supplied fabric with a store
/// quality attached" unrepresentable; the contradiction is rejected once,
/// at the wire boundary in [`CustomizationInput::into_customization`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FabricSource {
    /// Customer brings their own fabric; fabric cost is zero.
    CustomerSupplied,
    /// Store sources the fabric at the quality's per-meter rate.
    StoreSourced {
        quality: FabricQuality,
        /// Meters required, in hundredths (250 = 2.5 m).
        meters_hundredths: i64,
    },
}

/// Embroidery technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmbroideryKind {
    Thread,
    Zardozi,
    Sequin,
    Mirror,
}

impl EmbroideryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbroideryKind::Thread => "thread",
            EmbroideryKind::Zardozi => "zardozi",
            EmbroideryKind::Sequin => "sequin",
            EmbroideryKind::Mirror => "mirror",
        }
    }
}

/// Embroidery complexity axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Complexity {
    Simple,
    Moderate,
    Intricate,
}

/// Embroidery coverage axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Coverage {
    Minimal,
    Medium,
    Heavy,
}

/// A fully specified embroidery choice.
///
/// The three axes combine multiplicatively against the kind's base rate,
/// never additively, so heavily covered intricate work is never under-priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbroiderySpec {
    pub kind: EmbroideryKind,
    pub complexity: Complexity,
    pub coverage: Coverage,
}

/// A fixed-price add-on (lining, tassels, piping, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddOn {
    pub name: String,
    pub price: Money,
}

/// Validated customization choices for a custom-stitched line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customization {
    pub fabric: FabricSource,
    pub embroidery: Option<EmbroiderySpec>,
    pub add_ons: Vec<AddOn>,
}

/// Wire-shaped customization input with optional fields.
///
/// Converted into the typed [`Customization`] before pricing; conversion is
/// where contradictory or incomplete input is rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomizationInput {
    /// Customer supplies their own fabric.
    pub customer_fabric: bool,
    /// Store fabric quality (required unless customer_fabric).
    pub fabric_quality: Option<FabricQuality>,
    /// Meters required in hundredths (required unless customer_fabric).
    pub fabric_meters_hundredths: Option<i64>,
    /// Embroidery kind; None means no embroidery.
    pub embroidery_kind: Option<EmbroideryKind>,
    /// Embroidery complexity (required when a kind is set).
    pub embroidery_complexity: Option<Complexity>,
    /// Embroidery coverage (required when a kind is set).
    pub embroidery_coverage: Option<Coverage>,
    /// Fixed-price add-ons.
    pub add_ons: Vec<AddOn>,
}

impl CustomizationInput {
    /// Validate and convert into the typed representation.
    ///
    /// Rejects:
    /// - customer-supplied fabric combined with a quality or meters value
    /// - store-sourced fabric missing quality or meters, or non-positive meters
    /// - an embroidery kind missing either remaining axis
    pub fn into_customization(self) -> Result<Customization, CommerceError> {
        let fabric = if self.customer_fabric {
            if self.fabric_quality.is_some() || self.fabric_meters_hundredths.is_some() {
                return Err(CommerceError::FabricContradiction);
            }
            FabricSource::CustomerSupplied
        } else {
            let quality = self.fabric_quality.ok_or(CommerceError::MissingFabricDetail)?;
            let meters = self
                .fabric_meters_hundredths
                .ok_or(CommerceError::MissingFabricDetail)?;
            if meters <= 0 {
                return Err(CommerceError::Validation(format!(
                    "fabric meters must be positive, got {}",
                    meters
                )));
            }
            FabricSource::StoreSourced {
                quality,
                meters_hundredths: meters,
            }
        };

        let embroidery = match self.embroidery_kind {
            None => None,
            Some(kind) => {
                let complexity = self
                    .embroidery_complexity
                    .ok_or(CommerceError::MissingEmbroideryDetail("complexity"))?;
                let coverage = self
                    .embroidery_coverage
                    .ok_or(CommerceError::MissingEmbroideryDetail("coverage"))?;
                Some(EmbroiderySpec {
                    kind,
                    complexity,
                    coverage,
                })
            }
        };

        Ok(Customization {
            fabric,
            embroidery,
            add_ons: self.add_ons,
        })
    }
}

/// Input to the pricing function for one order line.
#[derive(Debug, Clone)]
pub struct PriceRequest<'a> {
    /// Quantity ordered.
    pub quantity: i64,
    /// Base price snapshotted from the catalog.
    pub base_price: Money,
    /// Customization choices; None for a standard (non-custom) line.
    pub customization: Option<&'a Customization>,
    /// Rush flag of the parent order.
    pub rush: bool,
}

/// Per-line price breakdown.
///
/// `rush_fee` is surfaced here for transparency but is not folded into
/// `line_total`; the order applies it once per order, not per line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LineQuote {
    pub base_price: Money,
    pub fabric_cost: Money,
    pub embroidery_cost: Money,
    pub add_ons_cost: Money,
    pub rush_fee: Money,
    pub line_total: Money,
}

impl LineQuote {
    /// Customization cost per unit (everything above the base price).
    pub fn customization_cost(&self) -> Money {
        self.fabric_cost + self.embroidery_cost + self.add_ons_cost
    }
}

/// Price one order line against the rate card.
///
/// Pure and deterministic. `line_total` is
/// `(base + fabric + embroidery + add-ons) * quantity`.
pub fn price_line(request: &PriceRequest<'_>, rates: &RateCard) -> Result<LineQuote, CommerceError> {
    if request.quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(request.quantity));
    }

    let (fabric_cost, embroidery_cost, add_ons_cost) = match request.customization {
        None => (Money::zero(), Money::zero(), Money::zero()),
        Some(c) => (
            fabric_cost(&c.fabric, rates)?,
            embroidery_cost(c.embroidery.as_ref(), rates)?,
            Money::try_sum(c.add_ons.iter().map(|a| &a.price)).ok_or(CommerceError::Overflow)?,
        ),
    };

    let unit = request
        .base_price
        .try_add(&fabric_cost)
        .and_then(|m| m.try_add(&embroidery_cost))
        .and_then(|m| m.try_add(&add_ons_cost))
        .ok_or(CommerceError::Overflow)?;

    let line_total = unit
        .try_multiply(request.quantity)
        .ok_or(CommerceError::Overflow)?;

    let rush_fee = if request.rush {
        rates.rush_fee
    } else {
        Money::zero()
    };

    Ok(LineQuote {
        base_price: request.base_price,
        fabric_cost,
        embroidery_cost,
        add_ons_cost,
        rush_fee,
        line_total,
    })
}

fn fabric_cost(fabric: &FabricSource, rates: &RateCard) -> Result<Money, CommerceError> {
    match fabric {
        FabricSource::CustomerSupplied => Ok(Money::zero()),
        FabricSource::StoreSourced {
            quality,
            meters_hundredths,
        } => rates
            .fabric_rate(*quality)
            .try_scale(*meters_hundredths, 100)
            .ok_or(CommerceError::Overflow),
    }
}

fn embroidery_cost(
    embroidery: Option<&EmbroiderySpec>,
    rates: &RateCard,
) -> Result<Money, CommerceError> {
    match embroidery {
        None => Ok(Money::zero()),
        Some(spec) => {
            let base = rates.embroidery_base(spec.kind);
            let multiplier = rates.complexity_pct(spec.complexity) * rates.coverage_pct(spec.coverage);
            base.try_scale(multiplier, 100 * 100)
                .ok_or(CommerceError::Overflow)
        }
    }
}
