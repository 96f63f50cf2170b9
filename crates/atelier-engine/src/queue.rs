//! Production queue orchestration.
//!
//! Admin-gated operations over the shop-floor queue: tailor assignment,
//! stage updates (single and bulk), the prioritized work list and the
//! printable cutting sheet.

use crate::auth::{require_staff, Role};
use crate::error::EngineError;
use atelier_commerce::ids::{QueueItemId, TailorId};
use atelier_commerce::order::OrderLineDetail;
use atelier_commerce::production::{
    CuttingSheet, CuttingSheetRow, ProductionQueueItem, ProductionStage,
};
use atelier_store::{OrderStore, QueueStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a tailor assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOutcome {
    /// First assignment on this item.
    Assigned,
    /// The item already had a tailor; carries who was displaced.
    Reassigned { previous: TailorId },
}

/// Per-item result of a bulk stage update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StageUpdateOutcome {
    /// Item the update targeted.
    pub item_id: QueueItemId,
    /// Whether this item was updated.
    pub ok: bool,
    /// Why the update failed; None on success.
    pub error: Option<String>,
}

impl StageUpdateOutcome {
    /// Whether this item was updated.
    pub fn succeeded(&self) -> bool {
        self.ok
    }
}

/// Admin-facing queue operations.
pub struct ProductionQueueManager {
    queue: Arc<QueueStore>,
    orders: Arc<OrderStore>,
}

impl ProductionQueueManager {
    /// Wire up the manager.
    pub fn new(queue: Arc<QueueStore>, orders: Arc<OrderStore>) -> Self {
        Self { queue, orders }
    }

    /// Read one item.
    pub fn item(&self, role: Role, item_id: &QueueItemId) -> Result<ProductionQueueItem, EngineError> {
        require_staff(role, "view production queue")?;
        Ok(self.queue.get(item_id)?)
    }

    /// The active queue, highest priority first, oldest first within a
    /// priority.
    pub fn work_queue(&self, role: Role) -> Result<Vec<ProductionQueueItem>, EngineError> {
        require_staff(role, "view production queue")?;
        Ok(self.queue.work_queue())
    }

    /// Assign (or reassign) a tailor to an item.
    pub fn assign(
        &self,
        role: Role,
        item_id: &QueueItemId,
        tailor: TailorId,
        estimated_completion: Option<i64>,
        now: i64,
    ) -> Result<AssignOutcome, EngineError> {
        require_staff(role, "assign tailors")?;

        let previous = self.queue.with_item_mut(item_id, |item| {
            Ok(item.assign(tailor.clone(), estimated_completion, now))
        })?;
        match previous {
            Some(previous) => {
                warn!(
                    item_id = %item_id,
                    from = %previous,
                    to = %tailor,
                    "work item reassigned"
                );
                Ok(AssignOutcome::Reassigned { previous })
            }
            None => {
                info!(item_id = %item_id, tailor = %tailor, "work item assigned");
                Ok(AssignOutcome::Assigned)
            }
        }
    }

    /// Move one item to a new stage.
    pub fn update_stage(
        &self,
        role: Role,
        item_id: &QueueItemId,
        target: ProductionStage,
        note: Option<String>,
        now: i64,
    ) -> Result<(), EngineError> {
        require_staff(role, "update production stage")?;
        self.queue
            .with_item_mut(item_id, |item| item.set_stage(target, note, now))?;
        info!(item_id = %item_id, stage = target.as_str(), "stage updated");
        Ok(())
    }

    /// Move a batch of items to a new stage.
    ///
    /// Partial success: each item is attempted independently, and a failed
    /// item (unknown, terminal, backwards move) never blocks the rest. The
    /// caller gets one outcome per requested item, in request order.
    pub fn bulk_update_stage(
        &self,
        role: Role,
        item_ids: &[QueueItemId],
        target: ProductionStage,
        note: Option<String>,
        now: i64,
    ) -> Result<Vec<StageUpdateOutcome>, EngineError> {
        require_staff(role, "update production stage")?;

        let mut outcomes = Vec::with_capacity(item_ids.len());
        for item_id in item_ids {
            let result = self
                .queue
                .with_item_mut(item_id, |item| item.set_stage(target, note.clone(), now));
            if let Err(e) = &result {
                warn!(item_id = %item_id, error = %e, "bulk stage update skipped item");
            }
            let error = result.err().map(|e| e.to_string());
            outcomes.push(StageUpdateOutcome {
                item_id: item_id.clone(),
                ok: error.is_none(),
                error,
            });
        }
        info!(
            requested = item_ids.len(),
            updated = outcomes.iter().filter(|o| o.succeeded()).count(),
            stage = target.as_str(),
            "bulk stage update"
        );
        Ok(outcomes)
    }

    /// Build a cutting sheet for the given items: fabric and measurements
    /// joined from each item's order line.
    ///
    /// Pure read; generating a sheet changes nothing. Unknown items are
    /// skipped (logged) rather than failing the whole sheet.
    pub fn cutting_sheet(
        &self,
        role: Role,
        item_ids: &[QueueItemId],
        now: i64,
    ) -> Result<CuttingSheet, EngineError> {
        require_staff(role, "generate cutting sheet")?;

        let mut rows = Vec::new();
        for item_id in item_ids {
            let Ok(item) = self.queue.get(item_id) else {
                warn!(item_id = %item_id, "cutting sheet skipped unknown item");
                continue;
            };
            let order = self.orders.get(&item.order_number)?.order;
            let Some(line) = order.lines.iter().find(|l| l.id == item.line_id) else {
                // A queue item always points at a line of its own order.
                warn!(item_id = %item.id, line_id = %item.line_id, "queue item references missing line");
                continue;
            };
            let OrderLineDetail::CustomStitched {
                measurements,
                customization,
            } = &line.detail
            else {
                continue;
            };
            rows.push(CuttingSheetRow {
                order_number: item.order_number.clone(),
                item_id: item.id.clone(),
                product_name: line.name.clone(),
                quantity: line.quantity,
                fabric: CuttingSheetRow::describe_fabric(&customization.fabric),
                fabric_cost: line.quote.fabric_cost,
                measurements: measurements.clone(),
            });
        }
        Ok(CuttingSheet::new(rows, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::config::EngineConfig;
    use crate::notify::NoopSink;
    use crate::orders::OrderService;
    use atelier_commerce::cart::{Address, Cart};
    use atelier_commerce::ids::ProductId;
    use atelier_commerce::money::Money;
    use atelier_commerce::order::OrderStatus;
    use atelier_commerce::pricing::{CustomizationInput, FabricQuality};
    use atelier_commerce::production::Priority;
    use atelier_store::{DiscountStore, LoyaltyStore};
    use std::collections::BTreeMap;

    const NOW: i64 = 1_700_000_000;

    struct Fixture {
        queue: Arc<QueueStore>,
        orders: Arc<OrderStore>,
        service: OrderService,
        manager: ProductionQueueManager,
    }

    fn fixture() -> Fixture {
        let orders = Arc::new(OrderStore::new());
        let queue = Arc::new(QueueStore::new());
        let catalog = Arc::new(InMemoryCatalog::new());
        catalog.add(ProductId::new("sherwani"), "SHER-01", "Sherwani", Money::new(50_000));

        let service = OrderService::new(
            Arc::clone(&orders),
            Arc::new(DiscountStore::new()),
            Arc::new(LoyaltyStore::new()),
            Arc::clone(&queue),
            catalog,
            Arc::new(NoopSink),
            EngineConfig::default(),
        );
        let manager = ProductionQueueManager::new(Arc::clone(&queue), Arc::clone(&orders));
        Fixture {
            queue,
            orders,
            service,
            manager,
        }
    }

    fn measurements() -> BTreeMap<String, f64> {
        let mut m = BTreeMap::new();
        m.insert("chest".to_string(), 96.0);
        m
    }

    fn store_fabric_input() -> CustomizationInput {
        CustomizationInput {
            fabric_quality: Some(FabricQuality::Premium),
            fabric_meters_hundredths: Some(250),
            ..Default::default()
        }
    }

    /// Create a verified order with one custom line and return its queue
    /// item id.
    fn verified_item(f: &Fixture) -> QueueItemId {
        let mut cart = Cart::new(
            "a@example.com",
            "9876543210",
            Address::new("Ayesha Khan", "12 MG Road", "Bengaluru", "560001"),
        );
        cart.add_custom_item(
            ProductId::new("sherwani"),
            1,
            measurements(),
            store_fabric_input(),
        )
        .unwrap();
        let receipt = f.service.create_order(cart, NOW).unwrap();
        f.service
            .transition(
                Role::Admin,
                &receipt.order_number,
                OrderStatus::PaymentVerified,
                None,
                NOW + 10,
            )
            .unwrap();
        f.queue.items_for_order(&receipt.order_number)[0].id.clone()
    }

    #[test]
    fn test_customer_role_rejected() {
        let f = fixture();
        assert!(f.manager.work_queue(Role::Customer).is_err());
    }

    #[test]
    fn test_assign_then_reassign() {
        let f = fixture();
        let id = verified_item(&f);

        let first = f
            .manager
            .assign(Role::Staff, &id, TailorId::new("t1"), Some(NOW + 86_400), NOW + 20)
            .unwrap();
        assert_eq!(first, AssignOutcome::Assigned);

        let second = f
            .manager
            .assign(Role::Staff, &id, TailorId::new("t2"), None, NOW + 30)
            .unwrap();
        assert_eq!(
            second,
            AssignOutcome::Reassigned {
                previous: TailorId::new("t1")
            }
        );

        let item = f.manager.item(Role::Staff, &id).unwrap();
        assert_eq!(item.tailor, Some(TailorId::new("t2")));
        assert_eq!(item.assignment_log.len(), 2);
    }

    #[test]
    fn test_update_stage_forward_only() {
        let f = fixture();
        let id = verified_item(&f);

        f.manager
            .update_stage(Role::Staff, &id, ProductionStage::Cutting, None, NOW + 20)
            .unwrap();
        let err = f
            .manager
            .update_stage(Role::Staff, &id, ProductionStage::Queued, None, NOW + 30)
            .unwrap_err();
        assert!(matches!(err, EngineError::Commerce(_)));
    }

    #[test]
    fn test_bulk_update_partial_success() {
        let f = fixture();
        let ids: Vec<_> = (0..5).map(|_| verified_item(&f)).collect();

        // Drive one item to a terminal stage first.
        f.manager
            .update_stage(Role::Staff, &ids[2], ProductionStage::Ready, None, NOW + 20)
            .unwrap();

        let outcomes = f
            .manager
            .bulk_update_stage(
                Role::Staff,
                &ids,
                ProductionStage::Cutting,
                Some("batch 7".into()),
                NOW + 30,
            )
            .unwrap();

        assert_eq!(outcomes.len(), 5);
        assert_eq!(outcomes.iter().filter(|o| o.succeeded()).count(), 4);
        assert!(!outcomes[2].succeeded());
        assert!(outcomes[2].error.as_deref().unwrap().contains("ready"));

        // The failed item kept its stage; the rest moved.
        assert_eq!(
            f.manager.item(Role::Staff, &ids[2]).unwrap().stage,
            ProductionStage::Ready
        );
        assert_eq!(
            f.manager.item(Role::Staff, &ids[0]).unwrap().stage,
            ProductionStage::Cutting
        );
    }

    #[test]
    fn test_bulk_outcome_wire_shape() {
        let f = fixture();
        let id = verified_item(&f);
        f.manager
            .update_stage(Role::Staff, &id, ProductionStage::Ready, None, NOW + 20)
            .unwrap();

        let outcomes = f
            .manager
            .bulk_update_stage(Role::Staff, &[id], ProductionStage::Cutting, None, NOW + 30)
            .unwrap();

        let json = serde_json::to_value(&outcomes[0]).unwrap();
        assert_eq!(json["ok"], serde_json::Value::Bool(false));
        assert!(json["error"].is_string());
        assert!(json["item_id"].is_string());
    }

    #[test]
    fn test_bulk_update_unknown_item_reported() {
        let f = fixture();
        let known = verified_item(&f);
        let unknown = QueueItemId::generate();

        let outcomes = f
            .manager
            .bulk_update_stage(
                Role::Staff,
                &[known.clone(), unknown.clone()],
                ProductionStage::Cutting,
                None,
                NOW + 20,
            )
            .unwrap();
        assert!(outcomes[0].succeeded());
        assert!(!outcomes[1].succeeded());
    }

    #[test]
    fn test_work_queue_ordering() {
        let f = fixture();
        let slow = verified_item(&f);

        let mut rush_cart = Cart::new(
            "b@example.com",
            "9876500000",
            Address::new("Rohan Mehta", "4 Park St", "Kolkata", "700016"),
        );
        rush_cart.rush_order = true;
        rush_cart
            .add_custom_item(
                ProductId::new("sherwani"),
                1,
                measurements(),
                store_fabric_input(),
            )
            .unwrap();
        let receipt = f.service.create_order(rush_cart, NOW + 100).unwrap();
        f.service
            .transition(
                Role::Admin,
                &receipt.order_number,
                OrderStatus::PaymentVerified,
                None,
                NOW + 110,
            )
            .unwrap();

        let queue = f.manager.work_queue(Role::Staff).unwrap();
        assert_eq!(queue.len(), 2);
        // Rush item jumps ahead despite being created later.
        assert_eq!(queue[0].priority, Priority::Rush);
        assert_eq!(queue[1].id, slow);
    }

    #[test]
    fn test_cutting_sheet_rows_and_fabric() {
        let f = fixture();
        let id = verified_item(&f);

        let sheet = f
            .manager
            .cutting_sheet(Role::Staff, &[id.clone()], NOW + 50)
            .unwrap();
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.total_units(), 1);
        let row = &sheet.rows[0];
        assert_eq!(row.item_id, id);
        assert_eq!(row.product_name, "Sherwani");
        assert_eq!(row.fabric, "premium, 2.50 m");
        assert_eq!(row.measurements.get("chest"), Some(&96.0));
        assert!(row.fabric_cost.amount > 0);
    }

    #[test]
    fn test_cutting_sheet_skips_unknown_items() {
        let f = fixture();
        let id = verified_item(&f);

        let sheet = f
            .manager
            .cutting_sheet(Role::Staff, &[QueueItemId::generate(), id], NOW + 50)
            .unwrap();
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.generated_at, NOW + 50);
    }
}
