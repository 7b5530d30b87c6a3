use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{AggregateId, DomainError, DomainResult, Entity, ListId};
use larder_inventory::{CatalogItem, NewItem};

/// Grocery line identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(pub AggregateId);

impl LineId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for LineId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// One entry on a grocery list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryLine {
    pub id: LineId,
    pub list_id: ListId,
    pub catalog: CatalogItem,
    pub quantity: u32,
    /// Checked lines move to the pantry on checkout.
    pub checked: bool,
}

impl GroceryLine {
    pub fn from_new(id: LineId, new: NewGroceryLine) -> Self {
        Self {
            id,
            list_id: new.list_id,
            catalog: new.catalog,
            quantity: new.quantity,
            checked: false,
        }
    }

    /// Check the line off with the amount actually bought.
    pub fn mark_acquired(&mut self, quantity: u32) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("acquired quantity must be at least 1"));
        }
        self.quantity = quantity;
        self.checked = true;
        Ok(())
    }

    /// The pantry item a checked line turns into.
    pub fn to_pantry_item(&self, pantry_list: ListId, now: DateTime<Utc>) -> DomainResult<NewItem> {
        NewItem::acquire(pantry_list, &self.catalog, self.quantity, None, now)
    }
}

impl Entity for GroceryLine {
    type Id = LineId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Draft of a grocery line, before the list service assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGroceryLine {
    pub list_id: ListId,
    pub catalog: CatalogItem,
    pub quantity: u32,
}

impl NewGroceryLine {
    pub fn new(list_id: ListId, catalog: CatalogItem, quantity: u32) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("grocery quantity must be at least 1"));
        }
        Ok(Self {
            list_id,
            catalog,
            quantity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larder_core::CatalogItemId;
    use larder_inventory::{Category, Location, NewCatalogItem};

    fn eggs() -> CatalogItem {
        CatalogItem::from_new(
            CatalogItemId::new(),
            NewCatalogItem::named("Eggs", Category::Dairy).with_units("dozen", "egg", 12),
        )
    }

    #[test]
    fn new_line_rejects_zero_quantity() {
        assert!(NewGroceryLine::new(ListId::new(), eggs(), 0).is_err());
    }

    #[test]
    fn mark_acquired_checks_the_line() {
        let draft = NewGroceryLine::new(ListId::new(), eggs(), 3).unwrap();
        let mut line = GroceryLine::from_new(LineId::new(AggregateId::new()), draft);
        assert!(!line.checked);

        line.mark_acquired(2).unwrap();
        assert!(line.checked);
        assert_eq!(line.quantity, 2);

        assert!(line.mark_acquired(0).is_err());
    }

    #[test]
    fn pantry_item_derives_uses_from_catalog() {
        let draft = NewGroceryLine::new(ListId::new(), eggs(), 2).unwrap();
        let line = GroceryLine::from_new(LineId::new(AggregateId::new()), draft);
        let pantry = ListId::new();

        let item = line.to_pantry_item(pantry, Utc::now()).unwrap();
        assert_eq!(item.list_id, pantry);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.uses_remaining, 24);
        assert_eq!(item.location, Location::Fridge);
    }
}
