use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use chrono::{DateTime, Utc};

use larder_cooking::{CookRecord, Dish};
use larder_core::{AggregateId, CatalogItemId, ListId, PodId};
use larder_inventory::{self as inventory, CatalogItem, InventoryItem, ItemId, NewCatalogItem, NewItem};
use larder_shopping::{GroceryLine, LineId, NewGroceryLine};

use super::r#trait::{CatalogService, DishService, ListService, TransportError};

/// A collaborator call that can be made to fail.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Fault {
    SearchCatalog,
    FindCatalogItem,
    CreateCatalogItem,
    GetItem,
    ListItems,
    AddItem,
    UpdateItem,
    RemoveItem,
    ListGroceryLines,
    AddGroceryLine,
    UpdateGroceryLine,
    Checkout,
    FindDish,
    SaveDish,
    RecordCook,
    ExpiringWithin,
}

#[derive(Debug, Default)]
struct PodState {
    catalog: Vec<CatalogItem>,
    items: Vec<InventoryItem>,
    grocery: Vec<GroceryLine>,
    dishes: Vec<Dish>,
    cook_log: Vec<CookRecord>,
}

/// In-memory household store implementing every collaborator trait.
///
/// Intended for tests/dev. Pods are fully isolated from each other. Calls can be
/// made to fail with [`InMemoryBackend::fail_on`] / [`InMemoryBackend::fail_after`].
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    pods: RwLock<HashMap<PodId, PodState>>,
    /// Successful calls still allowed per armed fault.
    faults: Mutex<HashMap<Fault, u32>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every subsequent `fault` call.
    pub fn fail_on(&self, fault: Fault) {
        self.fail_after(fault, 0);
    }

    /// Let `successes` more `fault` calls through, then fail the rest.
    pub fn fail_after(&self, fault: Fault, successes: u32) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.insert(fault, successes);
        }
    }

    pub fn clear_faults(&self) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.clear();
        }
    }

    /// Cook history of a pod, oldest first.
    pub fn cook_log(&self, pod_id: PodId) -> Result<Vec<CookRecord>, TransportError> {
        self.read(pod_id, |state| state.cook_log.clone())
    }

    fn check(&self, fault: Fault) -> Result<(), TransportError> {
        let mut faults = self.faults.lock().map_err(|_| poisoned())?;
        match faults.get_mut(&fault) {
            Some(remaining) if *remaining == 0 => Err(TransportError::Unavailable(format!(
                "injected {fault:?} failure"
            ))),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn read<T>(&self, pod_id: PodId, f: impl FnOnce(&PodState) -> T) -> Result<T, TransportError> {
        let pods = self.pods.read().map_err(|_| poisoned())?;
        match pods.get(&pod_id) {
            Some(state) => Ok(f(state)),
            None => Ok(f(&PodState::default())),
        }
    }

    fn write<T>(&self, pod_id: PodId, f: impl FnOnce(&mut PodState) -> T) -> Result<T, TransportError> {
        let mut pods = self.pods.write().map_err(|_| poisoned())?;
        Ok(f(pods.entry(pod_id).or_default()))
    }
}

fn poisoned() -> TransportError {
    TransportError::Unavailable("backend lock poisoned".to_string())
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

impl CatalogService for InMemoryBackend {
    fn search(&self, pod_id: PodId, query: &str) -> Result<Vec<CatalogItem>, TransportError> {
        self.check(Fault::SearchCatalog)?;
        let needle = query.trim().to_lowercase();
        self.read(pod_id, |state| {
            let mut hits: Vec<CatalogItem> = state
                .catalog
                .iter()
                .filter(|item| item.name.to_lowercase().contains(&needle))
                .cloned()
                .collect();
            hits.sort_by(|a, b| a.name.cmp(&b.name));
            hits
        })
    }

    fn find_by_name(&self, pod_id: PodId, name: &str) -> Result<Option<CatalogItem>, TransportError> {
        self.check(Fault::FindCatalogItem)?;
        self.read(pod_id, |state| {
            state
                .catalog
                .iter()
                .find(|item| same_name(&item.name, name))
                .cloned()
        })
    }

    fn create(&self, pod_id: PodId, item: NewCatalogItem) -> Result<CatalogItem, TransportError> {
        self.check(Fault::CreateCatalogItem)?;
        item.validate()
            .map_err(|e| TransportError::Rejected(e.to_string()))?;

        self.write(pod_id, |state| {
            if state.catalog.iter().any(|c| same_name(&c.name, &item.name)) {
                return Err(TransportError::Rejected(format!(
                    "catalog item {:?} already exists",
                    item.name
                )));
            }
            let created = CatalogItem::from_new(CatalogItemId::new(), item);
            state.catalog.push(created.clone());
            Ok(created)
        })?
    }
}

impl ListService for InMemoryBackend {
    fn get_item(&self, pod_id: PodId, item_id: ItemId) -> Result<Option<InventoryItem>, TransportError> {
        self.check(Fault::GetItem)?;
        self.read(pod_id, |state| {
            state.items.iter().find(|i| i.id_typed() == item_id).cloned()
        })
    }

    fn list_items(&self, pod_id: PodId, list_id: ListId) -> Result<Vec<InventoryItem>, TransportError> {
        self.check(Fault::ListItems)?;
        self.read(pod_id, |state| {
            state
                .items
                .iter()
                .filter(|i| i.list_id() == list_id)
                .cloned()
                .collect()
        })
    }

    fn add_item(&self, pod_id: PodId, item: NewItem) -> Result<InventoryItem, TransportError> {
        self.check(Fault::AddItem)?;
        let created = InventoryItem::from_new(ItemId::new(AggregateId::new()), item);
        self.write(pod_id, |state| state.items.push(created.clone()))?;
        Ok(created)
    }

    fn update_item(&self, pod_id: PodId, item: &InventoryItem) -> Result<(), TransportError> {
        self.check(Fault::UpdateItem)?;
        self.write(pod_id, |state| {
            match state.items.iter_mut().find(|i| i.id_typed() == item.id_typed()) {
                Some(slot) => {
                    *slot = item.clone();
                    Ok(())
                }
                None => Err(TransportError::NotFound(format!("item {}", item.id_typed()))),
            }
        })?
    }

    fn remove_item(&self, pod_id: PodId, item_id: ItemId) -> Result<(), TransportError> {
        self.check(Fault::RemoveItem)?;
        self.write(pod_id, |state| {
            let before = state.items.len();
            state.items.retain(|i| i.id_typed() != item_id);
            if state.items.len() == before {
                return Err(TransportError::NotFound(format!("item {item_id}")));
            }
            Ok(())
        })?
    }

    fn list_grocery_lines(&self, pod_id: PodId, list_id: ListId) -> Result<Vec<GroceryLine>, TransportError> {
        self.check(Fault::ListGroceryLines)?;
        self.read(pod_id, |state| {
            state
                .grocery
                .iter()
                .filter(|line| line.list_id == list_id)
                .cloned()
                .collect()
        })
    }

    fn add_grocery_line(&self, pod_id: PodId, line: NewGroceryLine) -> Result<GroceryLine, TransportError> {
        self.check(Fault::AddGroceryLine)?;
        let created = GroceryLine::from_new(LineId::new(AggregateId::new()), line);
        self.write(pod_id, |state| state.grocery.push(created.clone()))?;
        Ok(created)
    }

    fn update_grocery_line(&self, pod_id: PodId, line: &GroceryLine) -> Result<(), TransportError> {
        self.check(Fault::UpdateGroceryLine)?;
        self.write(pod_id, |state| {
            match state.grocery.iter_mut().find(|l| l.id == line.id) {
                Some(slot) => {
                    *slot = line.clone();
                    Ok(())
                }
                None => Err(TransportError::NotFound(format!("grocery line {}", line.id))),
            }
        })?
    }

    fn checkout(
        &self,
        pod_id: PodId,
        grocery_list: ListId,
        pantry_list: ListId,
        now: DateTime<Utc>,
    ) -> Result<Vec<InventoryItem>, TransportError> {
        self.check(Fault::Checkout)?;
        self.write(pod_id, |state| {
            // Build every pantry draft before touching the lists.
            let drafts = state
                .grocery
                .iter()
                .filter(|line| line.list_id == grocery_list && line.checked)
                .map(|line| line.to_pantry_item(pantry_list, now))
                .collect::<Result<Vec<NewItem>, _>>()
                .map_err(|e| TransportError::Rejected(e.to_string()))?;

            state.grocery.retain(|line| line.list_id != grocery_list);

            let moved: Vec<InventoryItem> = drafts
                .into_iter()
                .map(|draft| InventoryItem::from_new(ItemId::new(AggregateId::new()), draft))
                .collect();
            state.items.extend(moved.iter().cloned());
            Ok(moved)
        })?
    }
}

impl DishService for InMemoryBackend {
    fn find_dish_by_name(&self, pod_id: PodId, name: &str) -> Result<Option<Dish>, TransportError> {
        self.check(Fault::FindDish)?;
        self.read(pod_id, |state| {
            state.dishes.iter().find(|d| d.matches_name(name)).cloned()
        })
    }

    fn save_dish(&self, pod_id: PodId, dish: &Dish) -> Result<(), TransportError> {
        self.check(Fault::SaveDish)?;
        self.write(pod_id, |state| {
            match state.dishes.iter_mut().find(|d| d.id_typed() == dish.id_typed()) {
                Some(slot) => *slot = dish.clone(),
                None => state.dishes.push(dish.clone()),
            }
        })
    }

    fn record_cook(&self, pod_id: PodId, record: CookRecord) -> Result<(), TransportError> {
        self.check(Fault::RecordCook)?;
        self.write(pod_id, |state| state.cook_log.push(record))
    }

    fn expiring_within(
        &self,
        pod_id: PodId,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<InventoryItem>, TransportError> {
        self.check(Fault::ExpiringWithin)?;
        self.read(pod_id, |state| {
            inventory::expiring_within(&state.items, days, now)
                .into_iter()
                .cloned()
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use larder_inventory::Category;

    fn catalog_draft(name: &str) -> NewCatalogItem {
        NewCatalogItem::named(name, Category::Dairy).with_units("carton", "cup", 4)
    }

    #[test]
    fn fail_after_lets_calls_through_then_fails() {
        let backend = InMemoryBackend::new();
        let pod = PodId::new();
        backend.fail_after(Fault::CreateCatalogItem, 1);

        assert!(backend.create(pod, catalog_draft("Milk")).is_ok());
        let err = backend.create(pod, catalog_draft("Cream")).unwrap_err();
        assert!(matches!(err, TransportError::Unavailable(_)));

        backend.clear_faults();
        assert!(backend.create(pod, catalog_draft("Cream")).is_ok());
    }

    #[test]
    fn pods_are_isolated() {
        let backend = InMemoryBackend::new();
        let home = PodId::new();
        let other = PodId::new();

        let milk = backend.create(home, catalog_draft("Milk")).unwrap();
        let list = ListId::new();
        let draft = NewItem::acquire(list, &milk, 1, None, Utc::now()).unwrap();
        let item = backend.add_item(home, draft).unwrap();

        assert!(backend.get_item(other, item.id_typed()).unwrap().is_none());
        assert!(backend.find_by_name(other, "milk").unwrap().is_none());
        assert_eq!(backend.list_items(home, list).unwrap().len(), 1);
    }

    #[test]
    fn find_or_create_reuses_existing_entries() {
        let backend = InMemoryBackend::new();
        let pod = PodId::new();

        let first = backend.find_or_create(pod, catalog_draft("Milk")).unwrap();
        let second = backend.find_or_create(pod, catalog_draft(" milk ")).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(backend.search(pod, "MIL").unwrap().len(), 1);

        let dup = backend.create(pod, catalog_draft("MILK")).unwrap_err();
        assert!(matches!(dup, TransportError::Rejected(_)));
    }

    #[test]
    fn checkout_moves_checked_lines_and_clears_the_list() {
        let backend = InMemoryBackend::new();
        let pod = PodId::new();
        let grocery = ListId::new();
        let pantry = ListId::new();
        let milk = backend.create(pod, catalog_draft("Milk")).unwrap();

        let mut checked = backend
            .add_grocery_line(pod, NewGroceryLine::new(grocery, milk.clone(), 2).unwrap())
            .unwrap();
        backend
            .add_grocery_line(pod, NewGroceryLine::new(grocery, milk, 1).unwrap())
            .unwrap();
        checked.mark_acquired(2).unwrap();
        backend.update_grocery_line(pod, &checked).unwrap();

        let moved = backend.checkout(pod, grocery, pantry, Utc::now()).unwrap();
        assert_eq!(moved.len(), 1);
        assert_eq!(moved[0].uses_remaining(), 8);
        assert!(backend.list_grocery_lines(pod, grocery).unwrap().is_empty());
        assert_eq!(backend.list_items(pod, pantry).unwrap().len(), 1);
    }

    #[test]
    fn remove_missing_item_is_not_found() {
        let backend = InMemoryBackend::new();
        let err = backend
            .remove_item(PodId::new(), ItemId::new(AggregateId::new()))
            .unwrap_err();
        assert!(matches!(err, TransportError::NotFound(_)));
    }

    #[test]
    fn expiring_within_only_returns_opened_items_in_window() {
        let backend = InMemoryBackend::new();
        let pod = PodId::new();
        let list = ListId::new();
        let now = Utc::now();
        let milk = backend.create(pod, catalog_draft("Milk")).unwrap();

        let sealed = NewItem::acquire(list, &milk, 1, None, now).unwrap();
        let old = NewItem::acquire(list, &milk, 1, None, now)
            .unwrap()
            .opened(now - Duration::days(6));
        let fresh = NewItem::acquire(list, &milk, 1, None, now).unwrap().opened(now);
        backend.add_item(pod, sealed).unwrap();
        let old = backend.add_item(pod, old).unwrap();
        backend.add_item(pod, fresh).unwrap();

        let due = backend.expiring_within(pod, 3, now).unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id_typed(), old.id_typed());
    }
}
