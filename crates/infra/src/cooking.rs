//! Cooking a dish: record it, deduct pantry ingredients, store leftovers.
//!
//! Steps (each an independent collaborator call, no rollback):
//! 1. Pre-flight validation of the dish and ingredient specs (no side effects on failure)
//! 2. Find-or-create the dish, record the cook, save it
//! 3. Per pantry ingredient: re-read the item, deduct, update or remove
//! 4. Store leftovers as an opened pantry item, if asked to
//! 5. Append a cook record to the history (failure is only logged)
//!
//! One ingredient failing does not stop the others, and a failed leftover never
//! undoes the deductions already made. Every partial result is in [`CookResult`].

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use larder_cooking::{
    CookRecord, CreateDish, Dish, DishCommand, DishId, DishSpec, IngredientSpec, PantryIngredient,
    RecordCook, leftover_name,
};
use larder_core::{Aggregate, AggregateId, AggregateRoot, ListId, PodId};
use larder_events::{EventBus, EventEnvelope};
use larder_inventory::{
    Category, ConsumeUses, InventoryCommand, InventoryItem, ItemId, Location, NewCatalogItem,
    NewItem, ShelfLife,
};

use crate::collaborators::{CatalogService, DishService, ListService};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::operations::{AppliedOutcome, InventoryOperations, publish_all};

pub const DISH_AGGREGATE_TYPE: &str = "cooking.dish";

/// Why a pantry ingredient could not be deducted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unavailable {
    /// The item is no longer on any list.
    Missing,
    /// The item has fewer uses left than the recipe asked for.
    Insufficient { requested: u32, available: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientOutcome {
    Deducted { item_id: ItemId, uses_remaining: u32 },
    /// The last uses were taken; the item left the pantry.
    UsedUp { item_id: ItemId },
    /// Adhoc ingredient, kept on the dish only.
    Recorded,
    Unavailable { item_id: ItemId, reason: Unavailable },
    Failed { item_id: ItemId, error: EngineError },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientResult {
    pub name: String,
    pub outcome: IngredientOutcome,
}

impl IngredientResult {
    pub fn is_ok(&self) -> bool {
        matches!(
            self.outcome,
            IngredientOutcome::Deducted { .. } | IngredientOutcome::UsedUp { .. } | IngredientOutcome::Recorded
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeftoverOutcome {
    NotRequested,
    Created(InventoryItem),
    Failed(EngineError),
}

/// Everything a cook did, including the parts that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookResult {
    pub dish: Dish,
    pub ingredients: Vec<IngredientResult>,
    pub leftover: LeftoverOutcome,
}

impl CookResult {
    pub fn failures(&self) -> impl Iterator<Item = &IngredientResult> {
        self.ingredients.iter().filter(|r| !r.is_ok())
    }

    /// Every ingredient went through and the leftover (if any) was stored.
    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none() && !matches!(self.leftover, LeftoverOutcome::Failed(_))
    }
}

/// The cook-a-dish transaction.
#[derive(Debug)]
pub struct CookingTransaction<L, C, D, B> {
    ops: InventoryOperations<L, C, B>,
    dishes: D,
    config: EngineConfig,
}

impl<L, C, D, B> CookingTransaction<L, C, D, B> {
    pub fn new(ops: InventoryOperations<L, C, B>, dishes: D, config: EngineConfig) -> Self {
        Self { ops, dishes, config }
    }

    pub fn operations(&self) -> &InventoryOperations<L, C, B> {
        &self.ops
    }

    pub fn dishes(&self) -> &D {
        &self.dishes
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl<L, C, D, B> CookingTransaction<L, C, D, B>
where
    L: ListService,
    C: CatalogService,
    D: DishService,
    B: EventBus<EventEnvelope<JsonValue>>,
{
    /// Cook `spec` from `ingredients`, storing leftovers on `pantry_list`.
    ///
    /// Returns `Err` only when nothing was deducted yet: pre-flight validation, or
    /// the dish itself could not be recorded.
    pub fn cook_dish(
        &self,
        pod_id: PodId,
        pantry_list: ListId,
        spec: &DishSpec,
        ingredients: &[IngredientSpec],
        now: DateTime<Utc>,
    ) -> Result<CookResult, EngineError> {
        spec.validate(ingredients)?;

        let dish = self.record_dish(pod_id, spec, ingredients, now)?;
        tracing::info!(
            pod_id = %pod_id,
            dish_id = %dish.id_typed(),
            dish = dish.name(),
            times_made = dish.times_made(),
            "cooking dish"
        );

        let results: Vec<IngredientResult> = ingredients
            .iter()
            .map(|ingredient| IngredientResult {
                name: ingredient.name().to_string(),
                outcome: match ingredient {
                    IngredientSpec::Pantry(pantry) => self.deduct(pod_id, pantry, now),
                    IngredientSpec::Adhoc(_) => IngredientOutcome::Recorded,
                },
            })
            .collect();

        for failed in results.iter().filter(|r| !r.is_ok()) {
            tracing::warn!(dish = dish.name(), ingredient = %failed.name, outcome = ?failed.outcome, "ingredient not deducted");
        }

        let leftover = match spec.leftover_storage.location() {
            None => LeftoverOutcome::NotRequested,
            Some(location) => match self.store_leftover(pod_id, pantry_list, spec, location, now) {
                Ok(item) => LeftoverOutcome::Created(item),
                Err(err) => {
                    tracing::warn!(dish = dish.name(), error = %err, "leftover not stored; deductions kept");
                    LeftoverOutcome::Failed(err)
                }
            },
        };

        let record = CookRecord {
            dish_id: dish.id_typed(),
            dish_name: dish.name().to_string(),
            servings: spec.servings,
            ingredients: ingredients.to_vec(),
            leftover_created: matches!(leftover, LeftoverOutcome::Created(_)),
            cooked_at: now,
        };
        if let Err(err) = self.dishes.record_cook(pod_id, record) {
            tracing::warn!(dish = dish.name(), error = %err, "cook history not recorded");
        }

        Ok(CookResult {
            dish,
            ingredients: results,
            leftover,
        })
    }

    /// Opened pantry items that expire within the configured window, soonest first.
    pub fn expiring_soon(&self, pod_id: PodId, now: DateTime<Utc>) -> Result<Vec<InventoryItem>, EngineError> {
        Ok(self
            .dishes
            .expiring_within(pod_id, self.config.expiring_window_days, now)?)
    }

    fn record_dish(
        &self,
        pod_id: PodId,
        spec: &DishSpec,
        ingredients: &[IngredientSpec],
        now: DateTime<Utc>,
    ) -> Result<Dish, EngineError> {
        let (mut dish, base_version, mut events) = match self.dishes.find_dish_by_name(pod_id, &spec.name)? {
            Some(existing) => {
                let version = existing.version();
                (existing, version, Vec::new())
            }
            None => {
                let dish_id = DishId::new(AggregateId::new());
                let mut dish = Dish::empty(dish_id);
                let created = dish.execute(&DishCommand::CreateDish(CreateDish {
                    dish_id,
                    spec: spec.clone(),
                    occurred_at: now,
                }))?;
                (dish, 0, created)
            }
        };

        events.extend(dish.execute(&DishCommand::RecordCook(RecordCook {
            dish_id: dish.id_typed(),
            spec: spec.clone(),
            ingredients: ingredients.to_vec(),
            occurred_at: now,
        }))?);

        self.dishes.save_dish(pod_id, &dish)?;
        publish_all(
            self.ops.bus(),
            pod_id,
            dish.id_typed().0,
            DISH_AGGREGATE_TYPE,
            base_version,
            &events,
        );
        Ok(dish)
    }

    fn deduct(&self, pod_id: PodId, ingredient: &PantryIngredient, now: DateTime<Utc>) -> IngredientOutcome {
        let item_id = ingredient.item_id;

        // Always the current state: an earlier ingredient may have used the same item.
        let current = match self.ops.lists().get_item(pod_id, item_id) {
            Ok(Some(item)) => item,
            Ok(None) => {
                return IngredientOutcome::Unavailable {
                    item_id,
                    reason: Unavailable::Missing,
                };
            }
            Err(err) => {
                return IngredientOutcome::Failed {
                    item_id,
                    error: err.into(),
                };
            }
        };

        if current.uses_remaining() < ingredient.amount_used {
            return IngredientOutcome::Unavailable {
                item_id,
                reason: Unavailable::Insufficient {
                    requested: ingredient.amount_used,
                    available: current.uses_remaining(),
                },
            };
        }

        let command = InventoryCommand::ConsumeUses(ConsumeUses {
            item_id,
            amount: ingredient.amount_used,
            occurred_at: now,
        });
        match self.ops.execute(pod_id, &current, &command) {
            Ok(AppliedOutcome::Updated(item)) => IngredientOutcome::Deducted {
                item_id,
                uses_remaining: item.uses_remaining(),
            },
            Ok(AppliedOutcome::Removed { .. }) => IngredientOutcome::UsedUp { item_id },
            Ok(other) => IngredientOutcome::Failed {
                item_id,
                error: EngineError::InvariantViolation(format!("deduction produced {other:?}")),
            },
            Err(error) => IngredientOutcome::Failed { item_id, error },
        }
    }

    fn store_leftover(
        &self,
        pod_id: PodId,
        pantry_list: ListId,
        spec: &DishSpec,
        location: Location,
        now: DateTime<Utc>,
    ) -> Result<InventoryItem, EngineError> {
        let shelf_life = ShelfLife::Days(self.config.leftover_shelf_life_days);
        let catalog = self.ops.catalog().find_or_create(
            pod_id,
            NewCatalogItem::named(leftover_name(&spec.name), Category::Leftovers)
                .with_location(location)
                .with_shelf_life(shelf_life),
        )?;

        let draft = NewItem::acquire(pantry_list, &catalog, 1, Some(location), now)?
            .with_shelf_life(shelf_life)
            .opened(now);
        self.ops.add_item(pod_id, draft)
    }
}
