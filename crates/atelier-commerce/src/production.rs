//! Production queue types.
//!
//! The shop-floor work list derived from custom-stitched order lines. The
//! production stage is a finer-grained state machine than the order status;
//! the two are correlated by convention but deliberately decoupled, and the
//! queue never auto-advances the parent order.

use crate::ids::{LineId, QueueItemId, TailorId};
use crate::money::Money;
use crate::error::CommerceError;
use crate::pricing::FabricSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Work priority within the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    /// Rush orders jump the queue.
    Rush,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Rush => "rush",
        }
    }
}

/// Production stage for one queue item.
///
/// Forward-only: work may skip ahead (a lining-only job has no embroidery
/// stage) but never moves backwards. `Ready` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ProductionStage {
    #[default]
    Queued,
    Cutting,
    Stitching,
    Finishing,
    QualityCheck,
    Ready,
    Cancelled,
}

impl ProductionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductionStage::Queued => "queued",
            ProductionStage::Cutting => "cutting",
            ProductionStage::Stitching => "stitching",
            ProductionStage::Finishing => "finishing",
            ProductionStage::QualityCheck => "qc",
            ProductionStage::Ready => "ready",
            ProductionStage::Cancelled => "cancelled",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            ProductionStage::Queued => 0,
            ProductionStage::Cutting => 1,
            ProductionStage::Stitching => 2,
            ProductionStage::Finishing => 3,
            ProductionStage::QualityCheck => 4,
            ProductionStage::Ready => 5,
            ProductionStage::Cancelled => 6,
        }
    }

    /// Check if the stage is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProductionStage::Ready | ProductionStage::Cancelled)
    }

    /// Check if `target` is a legal next stage from here.
    pub fn can_advance_to(&self, target: ProductionStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        if target == ProductionStage::Cancelled {
            return true;
        }
        target.rank() > self.rank() && target != ProductionStage::Cancelled
    }
}

/// One tailor assignment, kept for the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignmentRecord {
    /// Tailor assigned.
    pub tailor: TailorId,
    /// Unix timestamp of the assignment.
    pub assigned_at: i64,
    /// Estimated completion at assignment time.
    pub estimated_completion: Option<i64>,
}

/// One entry in the item's stage history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageEntry {
    /// Stage entered.
    pub stage: ProductionStage,
    /// Unix timestamp.
    pub timestamp: i64,
    /// Optional shop-floor note.
    pub note: Option<String>,
}

/// One production queue item per custom-stitched order line.
///
/// Created when the parent order reaches payment-verified; marked cancelled
/// (never deleted) when the order is cancelled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductionQueueItem {
    /// Unique queue item identifier.
    pub id: QueueItemId,
    /// Parent order number.
    pub order_number: String,
    /// Order line this item produces.
    pub line_id: LineId,
    /// Assigned tailor (None until assigned).
    pub tailor: Option<TailorId>,
    /// Work priority.
    pub priority: Priority,
    /// Current production stage.
    pub stage: ProductionStage,
    /// Estimated completion (Unix timestamp).
    pub estimated_completion: Option<i64>,
    /// Stage history, append-only.
    pub stage_log: Vec<StageEntry>,
    /// Assignment history, append-only.
    pub assignment_log: Vec<AssignmentRecord>,
    /// Unix timestamp of creation.
    pub created_at: i64,
    /// Unix timestamp of last update.
    pub updated_at: i64,
}

impl ProductionQueueItem {
    /// Create a new unassigned item at the back of the queue.
    pub fn new(order_number: impl Into<String>, line_id: LineId, priority: Priority, now: i64) -> Self {
        Self {
            id: QueueItemId::generate(),
            order_number: order_number.into(),
            line_id,
            tailor: None,
            priority,
            stage: ProductionStage::Queued,
            estimated_completion: None,
            stage_log: Vec::new(),
            assignment_log: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Assign (or reassign) a tailor.
    ///
    /// Reassignment is allowed but recorded in the assignment log, never a
    /// silent overwrite. Returns the previously assigned tailor, if any.
    pub fn assign(
        &mut self,
        tailor: TailorId,
        estimated_completion: Option<i64>,
        now: i64,
    ) -> Option<TailorId> {
        let previous = self.tailor.replace(tailor.clone());
        self.assignment_log.push(AssignmentRecord {
            tailor,
            assigned_at: now,
            estimated_completion,
        });
        if estimated_completion.is_some() {
            self.estimated_completion = estimated_completion;
        }
        self.updated_at = now;
        previous
    }

    /// Move to a new stage, appending to the stage log.
    ///
    /// Fails with `IllegalStageChange` and leaves the item untouched when
    /// the move is backwards or out of a terminal stage.
    pub fn set_stage(
        &mut self,
        target: ProductionStage,
        note: Option<String>,
        now: i64,
    ) -> Result<(), CommerceError> {
        if !self.stage.can_advance_to(target) {
            return Err(CommerceError::IllegalStageChange {
                from: self.stage.as_str().to_string(),
                to: target.as_str().to_string(),
            });
        }
        self.stage = target;
        self.stage_log.push(StageEntry {
            stage: target,
            timestamp: now,
            note,
        });
        self.updated_at = now;
        Ok(())
    }

    /// Whether the item has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.stage == ProductionStage::Cancelled
    }
}

/// One row of a cutting sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CuttingSheetRow {
    /// Parent order number.
    pub order_number: String,
    /// Queue item.
    pub item_id: QueueItemId,
    /// Product name at order time.
    pub product_name: String,
    /// Quantity to cut.
    pub quantity: i64,
    /// Fabric description ("customer-supplied" or "premium, 2.50 m").
    pub fabric: String,
    /// Fabric cost for reference.
    pub fabric_cost: Money,
    /// Measurement name -> value in centimeters.
    pub measurements: BTreeMap<String, f64>,
}

impl CuttingSheetRow {
    /// Describe a fabric source for the printed sheet.
    pub fn describe_fabric(fabric: &FabricSource) -> String {
        match fabric {
            FabricSource::CustomerSupplied => "customer-supplied".to_string(),
            FabricSource::StoreSourced {
                quality,
                meters_hundredths,
            } => format!(
                "{}, {}.{:02} m",
                quality.as_str(),
                meters_hundredths / 100,
                meters_hundredths % 100
            ),
        }
    }
}

/// A printable manifest of fabric and measurement data.
///
/// Pure aggregation; building one mutates nothing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CuttingSheet {
    /// Unix timestamp of generation.
    pub generated_at: i64,
    /// Rows, one per queue item.
    pub rows: Vec<CuttingSheetRow>,
}

impl CuttingSheet {
    /// Build a sheet from assembled rows.
    pub fn new(rows: Vec<CuttingSheetRow>, now: i64) -> Self {
        Self {
            generated_at: now,
            rows,
        }
    }

    /// Total units to cut across all rows.
    pub fn total_units(&self) -> i64 {
        self.rows.iter().map(|r| r.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::FabricQuality;

    const NOW: i64 = 1_700_000_000;

    fn item() -> ProductionQueueItem {
        ProductionQueueItem::new("ORD-1", LineId::generate(), Priority::Normal, NOW)
    }

    #[test]
    fn test_new_item_is_queued_and_unassigned() {
        let item = item();
        assert_eq!(item.stage, ProductionStage::Queued);
        assert!(item.tailor.is_none());
    }

    #[test]
    fn test_stage_forward_only() {
        let mut item = item();
        item.set_stage(ProductionStage::Cutting, None, NOW + 1).unwrap();
        item.set_stage(ProductionStage::Stitching, None, NOW + 2).unwrap();

        let err = item
            .set_stage(ProductionStage::Cutting, None, NOW + 3)
            .unwrap_err();
        assert_eq!(
            err,
            CommerceError::IllegalStageChange {
                from: "stitching".into(),
                to: "cutting".into(),
            }
        );
        assert_eq!(item.stage, ProductionStage::Stitching);
        assert_eq!(item.stage_log.len(), 2);
    }

    #[test]
    fn test_stage_may_skip_ahead() {
        let mut item = item();
        item.set_stage(ProductionStage::QualityCheck, None, NOW + 1).unwrap();
        assert_eq!(item.stage, ProductionStage::QualityCheck);
    }

    #[test]
    fn test_terminal_stages_frozen() {
        let mut item = item();
        item.set_stage(ProductionStage::Ready, None, NOW + 1).unwrap();
        assert!(item.set_stage(ProductionStage::Cancelled, None, NOW + 2).is_err());

        let mut cancelled = self::item();
        cancelled
            .set_stage(ProductionStage::Cancelled, Some("order cancelled".into()), NOW + 1)
            .unwrap();
        assert!(cancelled.set_stage(ProductionStage::Cutting, None, NOW + 2).is_err());
    }

    #[test]
    fn test_cancel_from_any_active_stage() {
        for stage in [
            ProductionStage::Queued,
            ProductionStage::Cutting,
            ProductionStage::Stitching,
            ProductionStage::Finishing,
            ProductionStage::QualityCheck,
        ] {
            assert!(stage.can_advance_to(ProductionStage::Cancelled), "{:?}", stage);
        }
    }

    #[test]
    fn test_reassignment_is_logged() {
        let mut item = item();
        let first = item.assign(TailorId::new("t1"), Some(NOW + 86_400), NOW);
        assert!(first.is_none());

        let previous = item.assign(TailorId::new("t2"), None, NOW + 10);
        assert_eq!(previous, Some(TailorId::new("t1")));
        assert_eq!(item.tailor, Some(TailorId::new("t2")));
        assert_eq!(item.assignment_log.len(), 2);
        // estimate from the first assignment survives a reassignment without one
        assert_eq!(item.estimated_completion, Some(NOW + 86_400));
    }

    #[test]
    fn test_fabric_description() {
        assert_eq!(
            CuttingSheetRow::describe_fabric(&FabricSource::CustomerSupplied),
            "customer-supplied"
        );
        assert_eq!(
            CuttingSheetRow::describe_fabric(&FabricSource::StoreSourced {
                quality: FabricQuality::Premium,
                meters_hundredths: 250,
            }),
            "premium, 2.50 m"
        );
    }

    #[test]
    fn test_cutting_sheet_totals() {
        let rows = vec![
            CuttingSheetRow {
                order_number: "ORD-1".into(),
                item_id: QueueItemId::generate(),
                product_name: "Sherwani".into(),
                quantity: 1,
                fabric: "luxury, 3.00 m".into(),
                fabric_cost: Money::new(540_000),
                measurements: BTreeMap::new(),
            },
            CuttingSheetRow {
                order_number: "ORD-2".into(),
                item_id: QueueItemId::generate(),
                product_name: "Kurta".into(),
                quantity: 2,
                fabric: "customer-supplied".into(),
                fabric_cost: Money::zero(),
                measurements: BTreeMap::new(),
            },
        ];
        let sheet = CuttingSheet::new(rows, NOW);
        assert_eq!(sheet.total_units(), 3);
    }
}
