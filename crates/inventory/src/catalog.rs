//! Catalog items: named goods with default unit/category metadata.

use serde::{Deserialize, Serialize};

use larder_core::{CatalogItemId, DomainError, DomainResult, Entity};

use crate::freshness::ShelfLife;
use crate::storage::Location;

/// Category of a catalog item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Produce,
    Dairy,
    Meat,
    Seafood,
    Bakery,
    Frozen,
    DryGoods,
    Beverages,
    Snacks,
    Condiments,
    Household,
    Leftovers,
    Other,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::Produce,
        Category::Dairy,
        Category::Meat,
        Category::Seafood,
        Category::Bakery,
        Category::Frozen,
        Category::DryGoods,
        Category::Beverages,
        Category::Snacks,
        Category::Condiments,
        Category::Household,
        Category::Leftovers,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Produce => "Produce",
            Category::Dairy => "Dairy",
            Category::Meat => "Meat",
            Category::Seafood => "Seafood",
            Category::Bakery => "Bakery",
            Category::Frozen => "Frozen",
            Category::DryGoods => "Dry goods",
            Category::Beverages => "Beverages",
            Category::Snacks => "Snacks",
            Category::Condiments => "Condiments",
            Category::Household => "Household",
            Category::Leftovers => "Leftovers",
            Category::Other => "Other",
        }
    }

    /// Badge color used for list rows.
    pub fn color(self) -> &'static str {
        match self {
            Category::Produce => "#66bb6a",
            Category::Dairy => "#90caf9",
            Category::Meat => "#ef5350",
            Category::Seafood => "#4dd0e1",
            Category::Bakery => "#d7a86e",
            Category::Frozen => "#b3e5fc",
            Category::DryGoods => "#ffcc80",
            Category::Beverages => "#ba68c8",
            Category::Snacks => "#ffd54f",
            Category::Condiments => "#ff8a65",
            Category::Household => "#b0bec5",
            Category::Leftovers => "#a1887f",
            Category::Other => "#e0e0e0",
        }
    }

    pub fn default_location(self) -> Location {
        match self {
            Category::Produce | Category::Bakery => Location::Counter,
            Category::Dairy | Category::Meat | Category::Seafood | Category::Leftovers => {
                Location::Fridge
            }
            Category::Frozen => Location::Freezer,
            Category::Household => Location::Closet,
            Category::DryGoods
            | Category::Beverages
            | Category::Snacks
            | Category::Condiments
            | Category::Other => Location::Pantry,
        }
    }

    pub fn default_shelf_life(self) -> ShelfLife {
        match self {
            Category::Produce | Category::Dairy => ShelfLife::Days(7),
            Category::Meat => ShelfLife::Days(3),
            Category::Seafood => ShelfLife::Days(2),
            Category::Bakery => ShelfLife::Days(5),
            Category::Leftovers => ShelfLife::Days(4),
            Category::Frozen => ShelfLife::Days(90),
            Category::Condiments => ShelfLife::Days(60),
            Category::DryGoods
            | Category::Beverages
            | Category::Snacks
            | Category::Household
            | Category::Other => ShelfLife::Never,
        }
    }

    pub fn is_edible(self) -> bool {
        !matches!(self, Category::Household)
    }
}

/// A named good, independent of any specific list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: CatalogItemId,
    pub name: String,
    pub category: Category,
    pub edible: bool,
    pub purchase_unit: String,
    pub use_unit: String,
    /// How many uses one purchase unit yields (1 carton = 8 uses of milk).
    pub uses_per_unit: u32,
    pub default_location: Location,
    pub shelf_life: ShelfLife,
}

impl CatalogItem {
    pub fn from_new(id: CatalogItemId, new: NewCatalogItem) -> Self {
        Self {
            id,
            name: new.name,
            category: new.category,
            edible: new.edible,
            purchase_unit: new.purchase_unit,
            use_unit: new.use_unit,
            uses_per_unit: new.uses_per_unit,
            default_location: new.default_location,
            shelf_life: new.shelf_life,
        }
    }
}

impl Entity for CatalogItem {
    type Id = CatalogItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Draft of a catalog entry, before the catalog service assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCatalogItem {
    pub name: String,
    pub category: Category,
    pub edible: bool,
    pub purchase_unit: String,
    pub use_unit: String,
    pub uses_per_unit: u32,
    pub default_location: Location,
    pub shelf_life: ShelfLife,
}

impl NewCatalogItem {
    /// A single-use "each" item with the category's defaults.
    pub fn named(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            edible: category.is_edible(),
            purchase_unit: "each".to_string(),
            use_unit: "each".to_string(),
            uses_per_unit: 1,
            default_location: category.default_location(),
            shelf_life: category.default_shelf_life(),
        }
    }

    pub fn with_units(
        mut self,
        purchase_unit: impl Into<String>,
        use_unit: impl Into<String>,
        uses_per_unit: u32,
    ) -> Self {
        self.purchase_unit = purchase_unit.into();
        self.use_unit = use_unit.into();
        self.uses_per_unit = uses_per_unit;
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.default_location = location;
        self
    }

    pub fn with_shelf_life(mut self, shelf_life: ShelfLife) -> Self {
        self.shelf_life = shelf_life;
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("catalog item name cannot be empty"));
        }
        if self.uses_per_unit == 0 {
            return Err(DomainError::validation("uses per unit must be at least 1"));
        }
        Ok(())
    }
}
