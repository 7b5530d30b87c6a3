//! Inventory domain module.
//!
//! Business rules for household inventory: the freshness clock, catalog
//! metadata, storage containers, and the lifecycle of a single list item. All of
//! it is deterministic domain logic (no IO, no storage); orchestration against the
//! household store lives in `larder-infra`.

pub mod catalog;
pub mod freshness;
pub mod item;
pub mod storage;

pub use catalog::{CatalogItem, Category, NewCatalogItem};
pub use freshness::{
    FreshnessStatus, Perishable, ShelfLife, days_until_expiration, expiration_date,
    expiring_within, freshness_status,
};
pub use item::{
    BreakDown, BreaksInto, ConsumeUses, ContainerSplit, DiscardReason, GroceryRequeue,
    InventoryCommand, InventoryEvent, InventoryItem, ItemBrokenDown, ItemId, ItemKind, ItemMoved,
    ItemOpened, ItemOutcome, ItemThrownOut, Lifecycle, MoveItem, NewItem, OpenItem, Removal,
    RemovalReason, Replacement, SplitContainer, SplitPortion, ThrowOut, Transformation,
    Transition, UsesConsumed,
};
pub use storage::{Location, SplitOption, StorageSize, divide_uses};
