use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use larder_cooking::{CookRecord, Dish};
use larder_core::{ListId, PodId};
use larder_inventory::{CatalogItem, InventoryItem, ItemId, NewCatalogItem, NewItem};
use larder_shopping::{GroceryLine, NewGroceryLine};

/// Failure of a call to a collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("collaborator rejected the request: {0}")]
    Rejected(String),

    #[error("record not found: {0}")]
    NotFound(String),
}

/// Catalog of named goods, pod-scoped.
pub trait CatalogService: Send + Sync {
    /// Case-insensitive substring search, ordered by name.
    fn search(&self, pod_id: PodId, query: &str) -> Result<Vec<CatalogItem>, TransportError>;

    /// Exact (case-insensitive, trimmed) name lookup.
    fn find_by_name(&self, pod_id: PodId, name: &str) -> Result<Option<CatalogItem>, TransportError>;

    fn create(&self, pod_id: PodId, item: NewCatalogItem) -> Result<CatalogItem, TransportError>;

    /// Reuse the entry named like `draft`, or create it.
    fn find_or_create(&self, pod_id: PodId, draft: NewCatalogItem) -> Result<CatalogItem, TransportError> {
        if let Some(existing) = self.find_by_name(pod_id, &draft.name)? {
            return Ok(existing);
        }
        self.create(pod_id, draft)
    }
}

/// Pantry items and grocery lines, pod-scoped.
pub trait ListService: Send + Sync {
    fn get_item(&self, pod_id: PodId, item_id: ItemId) -> Result<Option<InventoryItem>, TransportError>;

    fn list_items(&self, pod_id: PodId, list_id: ListId) -> Result<Vec<InventoryItem>, TransportError>;

    fn add_item(&self, pod_id: PodId, item: NewItem) -> Result<InventoryItem, TransportError>;

    /// Overwrite a stored item with its new state.
    fn update_item(&self, pod_id: PodId, item: &InventoryItem) -> Result<(), TransportError>;

    fn remove_item(&self, pod_id: PodId, item_id: ItemId) -> Result<(), TransportError>;

    fn list_grocery_lines(&self, pod_id: PodId, list_id: ListId) -> Result<Vec<GroceryLine>, TransportError>;

    fn add_grocery_line(&self, pod_id: PodId, line: NewGroceryLine) -> Result<GroceryLine, TransportError>;

    fn update_grocery_line(&self, pod_id: PodId, line: &GroceryLine) -> Result<(), TransportError>;

    /// Move every checked line of `grocery_list` into `pantry_list` and clear the grocery list.
    ///
    /// Returns the pantry items that were created.
    fn checkout(
        &self,
        pod_id: PodId,
        grocery_list: ListId,
        pantry_list: ListId,
        now: DateTime<Utc>,
    ) -> Result<Vec<InventoryItem>, TransportError>;
}

/// Dishes and cook history, pod-scoped.
pub trait DishService: Send + Sync {
    fn find_dish_by_name(&self, pod_id: PodId, name: &str) -> Result<Option<Dish>, TransportError>;

    fn save_dish(&self, pod_id: PodId, dish: &Dish) -> Result<(), TransportError>;

    fn record_cook(&self, pod_id: PodId, record: CookRecord) -> Result<(), TransportError>;

    /// Opened items of the pod whose expiry falls within `days` of `now`, soonest first.
    fn expiring_within(
        &self,
        pod_id: PodId,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<InventoryItem>, TransportError>;
}

impl<S> CatalogService for Arc<S>
where
    S: CatalogService + ?Sized,
{
    fn search(&self, pod_id: PodId, query: &str) -> Result<Vec<CatalogItem>, TransportError> {
        (**self).search(pod_id, query)
    }

    fn find_by_name(&self, pod_id: PodId, name: &str) -> Result<Option<CatalogItem>, TransportError> {
        (**self).find_by_name(pod_id, name)
    }

    fn create(&self, pod_id: PodId, item: NewCatalogItem) -> Result<CatalogItem, TransportError> {
        (**self).create(pod_id, item)
    }
}

impl<S> ListService for Arc<S>
where
    S: ListService + ?Sized,
{
    fn get_item(&self, pod_id: PodId, item_id: ItemId) -> Result<Option<InventoryItem>, TransportError> {
        (**self).get_item(pod_id, item_id)
    }

    fn list_items(&self, pod_id: PodId, list_id: ListId) -> Result<Vec<InventoryItem>, TransportError> {
        (**self).list_items(pod_id, list_id)
    }

    fn add_item(&self, pod_id: PodId, item: NewItem) -> Result<InventoryItem, TransportError> {
        (**self).add_item(pod_id, item)
    }

    fn update_item(&self, pod_id: PodId, item: &InventoryItem) -> Result<(), TransportError> {
        (**self).update_item(pod_id, item)
    }

    fn remove_item(&self, pod_id: PodId, item_id: ItemId) -> Result<(), TransportError> {
        (**self).remove_item(pod_id, item_id)
    }

    fn list_grocery_lines(&self, pod_id: PodId, list_id: ListId) -> Result<Vec<GroceryLine>, TransportError> {
        (**self).list_grocery_lines(pod_id, list_id)
    }

    fn add_grocery_line(&self, pod_id: PodId, line: NewGroceryLine) -> Result<GroceryLine, TransportError> {
        (**self).add_grocery_line(pod_id, line)
    }

    fn update_grocery_line(&self, pod_id: PodId, line: &GroceryLine) -> Result<(), TransportError> {
        (**self).update_grocery_line(pod_id, line)
    }

    fn checkout(
        &self,
        pod_id: PodId,
        grocery_list: ListId,
        pantry_list: ListId,
        now: DateTime<Utc>,
    ) -> Result<Vec<InventoryItem>, TransportError> {
        (**self).checkout(pod_id, grocery_list, pantry_list, now)
    }
}

impl<S> DishService for Arc<S>
where
    S: DishService + ?Sized,
{
    fn find_dish_by_name(&self, pod_id: PodId, name: &str) -> Result<Option<Dish>, TransportError> {
        (**self).find_dish_by_name(pod_id, name)
    }

    fn save_dish(&self, pod_id: PodId, dish: &Dish) -> Result<(), TransportError> {
        (**self).save_dish(pod_id, dish)
    }

    fn record_cook(&self, pod_id: PodId, record: CookRecord) -> Result<(), TransportError> {
        (**self).record_cook(pod_id, record)
    }

    fn expiring_within(
        &self,
        pod_id: PodId,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<InventoryItem>, TransportError> {
        (**self).expiring_within(pod_id, days, now)
    }
}
