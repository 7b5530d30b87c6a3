//! Per-item operations: decide on the aggregate, apply through the list service, publish.
//!
//! ```text
//! item (current state, read by the caller or loaded here)
//!   ↓
//! 1. Decide: `InventoryItem::transition` (pure, validates preconditions)
//!   ↓
//! 2. Apply: update / remove / create through the collaborators
//!   ↓
//! 3. Publish: one envelope per event (failures are logged, never undone)
//! ```
//!
//! Nothing is sent to a collaborator unless the decision succeeded. Multi-call
//! outcomes (split, breakdown, throw out with re-queue) are not atomic; the order of
//! calls is chosen so that a failure part-way leaves the parent in place.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as JsonValue;

use larder_core::{AggregateId, AggregateRoot, ListId, PodId};
use larder_events::{Event, EventBus, EventEnvelope};
use larder_inventory::{
    BreakDown, CatalogItem, ConsumeUses, DiscardReason, InventoryCommand, InventoryEvent,
    InventoryItem, ItemId, ItemOutcome, Location, MoveItem, NewCatalogItem, NewItem, OpenItem,
    RemovalReason, SplitContainer, StorageSize, ThrowOut,
};
use larder_shopping::{GroceryLine, NewGroceryLine};

use crate::collaborators::{CatalogService, ListService};
use crate::error::EngineError;

pub const ITEM_AGGREGATE_TYPE: &str = "inventory.item";

/// What an applied operation did to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppliedOutcome {
    /// The item is still on its list (possibly unchanged).
    Updated(InventoryItem),
    /// The item left its list.
    Removed {
        item_id: ItemId,
        reason: RemovalReason,
        requeued: Option<GroceryLine>,
    },
    /// The item was replaced by new items (split children or breakdown components).
    Replaced {
        removed: ItemId,
        created: Vec<InventoryItem>,
    },
}

impl AppliedOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, AppliedOutcome::Removed { .. })
    }
}

/// Inventory operations over the list and catalog services.
#[derive(Debug)]
pub struct InventoryOperations<L, C, B> {
    lists: L,
    catalog: C,
    bus: B,
}

impl<L, C, B> InventoryOperations<L, C, B> {
    pub fn new(lists: L, catalog: C, bus: B) -> Self {
        Self { lists, catalog, bus }
    }

    pub fn lists(&self) -> &L {
        &self.lists
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn into_parts(self) -> (L, C, B) {
        (self.lists, self.catalog, self.bus)
    }
}

impl<L, C, B> InventoryOperations<L, C, B>
where
    L: ListService,
    C: CatalogService,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Add `quantity` purchase units of a catalog item to a pantry list, unopened.
    pub fn add_to_pantry(
        &self,
        pod_id: PodId,
        list_id: ListId,
        catalog: &CatalogItem,
        quantity: u32,
        location: Option<Location>,
        now: DateTime<Utc>,
    ) -> Result<InventoryItem, EngineError> {
        let draft = NewItem::acquire(list_id, catalog, quantity, location, now)?;
        draft.validate(now)?;
        self.add_item(pod_id, draft)
    }

    /// Add a fully-specified draft (explicit uses, kind, or opened state).
    pub fn add_item(&self, pod_id: PodId, draft: NewItem) -> Result<InventoryItem, EngineError> {
        let item = self.lists.add_item(pod_id, draft)?;
        tracing::info!(
            pod_id = %pod_id,
            item_id = %item.id_typed(),
            name = item.name(),
            uses = item.uses_remaining(),
            "item added to pantry"
        );
        Ok(item)
    }

    pub fn add_to_grocery(
        &self,
        pod_id: PodId,
        list_id: ListId,
        catalog: &CatalogItem,
        quantity: u32,
    ) -> Result<GroceryLine, EngineError> {
        let draft = NewGroceryLine::new(list_id, catalog.clone(), quantity)?;
        let line = self.lists.add_grocery_line(pod_id, draft)?;
        tracing::info!(pod_id = %pod_id, line_id = %line.id, name = %line.catalog.name, "grocery line added");
        Ok(line)
    }

    pub fn mark_open(&self, pod_id: PodId, item_id: ItemId, now: DateTime<Utc>) -> Result<AppliedOutcome, EngineError> {
        let item = self.load(pod_id, item_id)?;
        self.execute(
            pod_id,
            &item,
            &InventoryCommand::OpenItem(OpenItem {
                item_id,
                occurred_at: now,
            }),
        )
    }

    pub fn use_one(&self, pod_id: PodId, item_id: ItemId, now: DateTime<Utc>) -> Result<AppliedOutcome, EngineError> {
        let item = self.load(pod_id, item_id)?;
        self.execute(pod_id, &item, &InventoryCommand::use_one(item_id, now))
    }

    /// Deduct `amount` uses at once; rejected (not truncated) beyond what is left.
    pub fn consume(
        &self,
        pod_id: PodId,
        item_id: ItemId,
        amount: u32,
        now: DateTime<Utc>,
    ) -> Result<AppliedOutcome, EngineError> {
        let item = self.load(pod_id, item_id)?;
        self.execute(
            pod_id,
            &item,
            &InventoryCommand::ConsumeUses(ConsumeUses {
                item_id,
                amount,
                occurred_at: now,
            }),
        )
    }

    pub fn move_location(
        &self,
        pod_id: PodId,
        item_id: ItemId,
        location: Location,
        now: DateTime<Utc>,
    ) -> Result<AppliedOutcome, EngineError> {
        let item = self.load(pod_id, item_id)?;
        self.execute(
            pod_id,
            &item,
            &InventoryCommand::MoveItem(MoveItem {
                item_id,
                location,
                occurred_at: now,
            }),
        )
    }

    /// Remove an item, optionally putting it back on a grocery list.
    pub fn throw_out(
        &self,
        pod_id: PodId,
        item_id: ItemId,
        reason: DiscardReason,
        requeue_to: Option<ListId>,
        now: DateTime<Utc>,
    ) -> Result<AppliedOutcome, EngineError> {
        let item = self.load(pod_id, item_id)?;
        self.execute(
            pod_id,
            &item,
            &InventoryCommand::ThrowOut(ThrowOut {
                item_id,
                reason,
                requeue_to,
                occurred_at: now,
            }),
        )
    }

    pub fn split(
        &self,
        pod_id: PodId,
        item_id: ItemId,
        target_size: StorageSize,
        count: u32,
        now: DateTime<Utc>,
    ) -> Result<AppliedOutcome, EngineError> {
        let item = self.load(pod_id, item_id)?;
        self.execute(
            pod_id,
            &item,
            &InventoryCommand::SplitContainer(SplitContainer {
                item_id,
                target_size,
                count,
                occurred_at: now,
            }),
        )
    }

    /// Irreversibly replace an item with its components; `confirmed` must be set.
    pub fn break_down(
        &self,
        pod_id: PodId,
        item_id: ItemId,
        confirmed: bool,
        now: DateTime<Utc>,
    ) -> Result<AppliedOutcome, EngineError> {
        let item = self.load(pod_id, item_id)?;
        self.execute(
            pod_id,
            &item,
            &InventoryCommand::BreakDown(BreakDown {
                item_id,
                confirmed,
                occurred_at: now,
            }),
        )
    }

    /// Run `command` against `item` as the caller last saw it.
    pub fn execute(
        &self,
        pod_id: PodId,
        item: &InventoryItem,
        command: &InventoryCommand,
    ) -> Result<AppliedOutcome, EngineError> {
        let transition = item.transition(command)?;

        let Some(now) = transition.events.last().map(Event::occurred_at) else {
            tracing::debug!(item_id = %item.id_typed(), "command produced no change");
            return Ok(AppliedOutcome::Updated(item.clone()));
        };

        let applied = match transition.outcome {
            ItemOutcome::Updated(next) => {
                self.lists.update_item(pod_id, &next)?;
                AppliedOutcome::Updated(next)
            }
            ItemOutcome::Removed(removal) => {
                // Re-queue first: if it fails the item is still on its list.
                let requeued = match removal.requeue {
                    Some(requeue) => {
                        let draft = NewGroceryLine::new(requeue.list_id, item.catalog().clone(), requeue.quantity)?;
                        Some(self.lists.add_grocery_line(pod_id, draft)?)
                    }
                    None => None,
                };
                if let Err(err) = self.lists.remove_item(pod_id, removal.item_id) {
                    if let Some(line) = &requeued {
                        tracing::warn!(
                            pod_id = %pod_id,
                            item_id = %removal.item_id,
                            line_id = %line.id,
                            error = %err,
                            "item kept after its grocery line was added"
                        );
                    }
                    return Err(err.into());
                }
                AppliedOutcome::Removed {
                    item_id: removal.item_id,
                    reason: removal.reason,
                    requeued,
                }
            }
            ItemOutcome::Replaced(replacement) => {
                let created = self.create_all(pod_id, item, replacement.children)?;
                self.lists.remove_item(pod_id, replacement.removed)?;
                AppliedOutcome::Replaced {
                    removed: replacement.removed,
                    created,
                }
            }
            ItemOutcome::Transformed(transformation) => {
                let mut drafts = Vec::with_capacity(transformation.components.len());
                for component in &transformation.components {
                    let entry = self.catalog.find_or_create(
                        pod_id,
                        NewCatalogItem::named(component.as_str(), item.catalog().category),
                    )?;
                    drafts.push(NewItem::acquire(transformation.list_id, &entry, 1, None, now)?);
                }
                let created = self.create_all(pod_id, item, drafts)?;
                self.lists.remove_item(pod_id, transformation.removed)?;
                AppliedOutcome::Replaced {
                    removed: transformation.removed,
                    created,
                }
            }
        };

        self.publish(pod_id, item, &transition.events);
        Ok(applied)
    }

    fn load(&self, pod_id: PodId, item_id: ItemId) -> Result<InventoryItem, EngineError> {
        self.lists
            .get_item(pod_id, item_id)?
            .ok_or_else(|| EngineError::NotFound(format!("item {item_id} is not on any list")))
    }

    /// Create replacement items one by one; the parent is only removed once all exist.
    fn create_all(
        &self,
        pod_id: PodId,
        parent: &InventoryItem,
        drafts: Vec<NewItem>,
    ) -> Result<Vec<InventoryItem>, EngineError> {
        let total = drafts.len();
        let mut created = Vec::with_capacity(total);
        for draft in drafts {
            match self.lists.add_item(pod_id, draft) {
                Ok(item) => created.push(item),
                Err(err) => {
                    tracing::warn!(
                        pod_id = %pod_id,
                        parent_id = %parent.id_typed(),
                        created = created.len(),
                        total,
                        error = %err,
                        "replacement interrupted; parent kept"
                    );
                    return Err(err.into());
                }
            }
        }
        Ok(created)
    }

    fn publish(&self, pod_id: PodId, item: &InventoryItem, events: &[InventoryEvent]) {
        publish_all(
            &self.bus,
            pod_id,
            item.id_typed().0,
            ITEM_AGGREGATE_TYPE,
            item.version(),
            events,
        );
    }
}

/// Publish `events` of one aggregate, numbered from `base_version + 1`.
///
/// Best-effort: the mutation is already stored, so failures are only logged.
pub(crate) fn publish_all<B, E>(
    bus: &B,
    pod_id: PodId,
    aggregate_id: AggregateId,
    aggregate_type: &str,
    base_version: u64,
    events: &[E],
) where
    B: EventBus<EventEnvelope<JsonValue>>,
    E: Event + Serialize,
{
    for (offset, event) in (1u64..).zip(events) {
        let envelope = match EventEnvelope::from_typed(
            pod_id,
            aggregate_id,
            aggregate_type,
            base_version + offset,
            event,
        ) {
            Ok(envelope) => envelope,
            Err(err) => {
                tracing::warn!(event_type = event.event_type(), error = %err, "event serialization failed");
                continue;
            }
        };
        if let Err(err) = bus.publish(envelope) {
            tracing::warn!(event_type = event.event_type(), error = ?err, "event publish failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use larder_events::InMemoryEventBus;
    use larder_inventory::Category;

    use crate::collaborators::{Fault, InMemoryBackend};

    type Ops = InventoryOperations<Arc<InMemoryBackend>, Arc<InMemoryBackend>, Arc<InMemoryEventBus<EventEnvelope<JsonValue>>>>;

    fn setup() -> (Ops, Arc<InMemoryBackend>, PodId, ListId) {
        let backend = Arc::new(InMemoryBackend::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let ops = InventoryOperations::new(backend.clone(), backend.clone(), bus);
        (ops, backend, PodId::new(), ListId::new())
    }

    fn yogurt(backend: &InMemoryBackend, pod: PodId) -> CatalogItem {
        backend
            .create(pod, NewCatalogItem::named("Yogurt", Category::Dairy).with_units("tub", "cup", 3))
            .unwrap()
    }

    #[test]
    fn add_to_pantry_derives_uses_and_default_location() {
        let (ops, backend, pod, pantry) = setup();
        let catalog = yogurt(&backend, pod);

        let item = ops.add_to_pantry(pod, pantry, &catalog, 2, None, Utc::now()).unwrap();
        assert_eq!(item.uses_remaining(), 6);
        assert_eq!(item.location(), Location::Fridge);
        assert!(!item.is_open());
    }

    #[test]
    fn failed_decision_sends_nothing_to_the_store() {
        let (ops, backend, pod, pantry) = setup();
        let catalog = yogurt(&backend, pod);
        let item = ops.add_to_pantry(pod, pantry, &catalog, 1, None, Utc::now()).unwrap();

        backend.fail_on(Fault::UpdateItem);
        let err = ops.consume(pod, item.id_typed(), 4, Utc::now()).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn events_are_published_with_item_versions() {
        let (ops, backend, pod, pantry) = setup();
        let subscription = ops.bus().subscribe();
        let catalog = yogurt(&backend, pod);
        let item = ops.add_to_pantry(pod, pantry, &catalog, 1, None, Utc::now()).unwrap();

        ops.mark_open(pod, item.id_typed(), Utc::now()).unwrap();
        ops.use_one(pod, item.id_typed(), Utc::now()).unwrap();

        let published = subscription.drain();
        assert_eq!(published.len(), 2);
        assert_eq!(published[0].event_type(), "inventory.item.opened");
        assert_eq!(published[0].sequence_number(), 1);
        assert_eq!(published[1].sequence_number(), 2);
        assert_eq!(published[1].aggregate_type(), ITEM_AGGREGATE_TYPE);
        assert_eq!(published[1].pod_id(), pod);
    }

    #[test]
    fn unchanged_move_skips_the_store() {
        let (ops, backend, pod, pantry) = setup();
        let catalog = yogurt(&backend, pod);
        let item = ops.add_to_pantry(pod, pantry, &catalog, 1, None, Utc::now()).unwrap();

        backend.fail_on(Fault::UpdateItem);
        let outcome = ops
            .move_location(pod, item.id_typed(), Location::Fridge, Utc::now())
            .unwrap();
        assert_eq!(outcome, AppliedOutcome::Updated(item));
    }

    #[test]
    fn missing_item_is_not_found() {
        let (ops, _backend, pod, _pantry) = setup();
        let err = ops
            .use_one(pod, ItemId::new(larder_core::AggregateId::new()), Utc::now())
            .unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
    }
}
