use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult, ListId};
use larder_events::Event;

use crate::catalog::CatalogItem;
use crate::freshness::{self, FreshnessStatus, Perishable, ShelfLife};
use crate::storage::{Location, StorageSize, divide_uses};

/// List item identifier (pod-scoped through the owning list).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub AggregateId);

impl ItemId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Components an item can be broken down into (one or two, by catalog name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct BreaksInto(Vec<String>);

impl BreaksInto {
    pub const MAX_COMPONENTS: usize = 2;

    pub fn new<I, S>(components: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let components: Vec<String> = components
            .into_iter()
            .map(|c| c.into().trim().to_string())
            .collect();

        if components.is_empty() || components.len() > Self::MAX_COMPONENTS {
            return Err(DomainError::validation(format!(
                "an item breaks into 1 to {} components, got {}",
                Self::MAX_COMPONENTS,
                components.len()
            )));
        }
        if components.iter().any(|c| c.is_empty()) {
            return Err(DomainError::validation("component names cannot be empty"));
        }
        Ok(Self(components))
    }

    pub fn components(&self) -> &[String] {
        &self.0
    }
}

impl TryFrom<Vec<String>> for BreaksInto {
    type Error = DomainError;

    fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BreaksInto> for Vec<String> {
    fn from(value: BreaksInto) -> Self {
        value.0
    }
}

/// What kind of item this is, and the data only that kind carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    Simple,
    SplittableContainer { storage_size: StorageSize },
    Breakable { breaks_into: BreaksInto },
}

impl ItemKind {
    pub fn storage_size(&self) -> Option<StorageSize> {
        match self {
            ItemKind::SplittableContainer { storage_size } => Some(*storage_size),
            ItemKind::Simple | ItemKind::Breakable { .. } => None,
        }
    }

    pub fn breaks_into(&self) -> Option<&BreaksInto> {
        match self {
            ItemKind::Breakable { breaks_into } => Some(breaks_into),
            ItemKind::Simple | ItemKind::SplittableContainer { .. } => None,
        }
    }
}

/// Why an item was thrown out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    Finished,
    Expired,
    Trashed,
}

/// Terminal states. Expiry is not one of them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum Disposition {
    Consumed,
    ThrownOut(DiscardReason),
    Split,
    Transformed,
}

/// Lifecycle state of an item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Unopened,
    Open,
    Consumed,
    ThrownOut,
    Split,
    Transformed,
}

impl Lifecycle {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Lifecycle::Unopened | Lifecycle::Open)
    }
}

/// Draft of a list item, before the list service assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub list_id: ListId,
    pub catalog: CatalogItem,
    pub quantity: u32,
    pub uses_remaining: u32,
    pub location: Location,
    pub kind: ItemKind,
    pub opened_at: Option<DateTime<Utc>>,
    pub purchased_at: DateTime<Utc>,
    pub shelf_life: ShelfLife,
}

impl NewItem {
    /// Acquire `quantity` purchase units of a catalog item.
    ///
    /// Uses are derived as `quantity × uses_per_unit`; location defaults to the
    /// catalog item's default location.
    pub fn acquire(
        list_id: ListId,
        catalog: &CatalogItem,
        quantity: u32,
        location: Option<Location>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        if catalog.uses_per_unit == 0 {
            return Err(DomainError::validation("uses per unit must be at least 1"));
        }
        let uses_remaining = quantity
            .checked_mul(catalog.uses_per_unit)
            .ok_or_else(|| DomainError::validation("quantity is too large"))?;

        Ok(Self {
            list_id,
            catalog: catalog.clone(),
            quantity,
            uses_remaining,
            location: location.unwrap_or(catalog.default_location),
            kind: ItemKind::Simple,
            opened_at: None,
            purchased_at: now,
            shelf_life: catalog.shelf_life,
        })
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = kind;
        self
    }

    /// Track uses explicitly instead of deriving them from the quantity.
    pub fn with_uses(mut self, uses_remaining: u32) -> Self {
        self.uses_remaining = uses_remaining;
        self
    }

    pub fn with_shelf_life(mut self, shelf_life: ShelfLife) -> Self {
        self.shelf_life = shelf_life;
        self
    }

    /// Mark the draft as already open (leftovers are created open).
    pub fn opened(mut self, at: DateTime<Utc>) -> Self {
        self.opened_at = Some(at);
        self
    }

    pub fn validate(&self, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(opened_at) = self.opened_at {
            if opened_at > now {
                return Err(DomainError::validation("opened_at cannot be in the future"));
            }
        }
        Ok(())
    }
}

/// Aggregate root: InventoryItem (one concrete entry on a pantry list).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    id: ItemId,
    list_id: ListId,
    catalog: CatalogItem,
    quantity: u32,
    uses_remaining: u32,
    location: Location,
    kind: ItemKind,
    opened_at: Option<DateTime<Utc>>,
    purchased_at: DateTime<Utc>,
    shelf_life: ShelfLife,
    disposition: Option<Disposition>,
    version: u64,
}

impl InventoryItem {
    /// Materialize a stored item from its draft.
    pub fn from_new(id: ItemId, new: NewItem) -> Self {
        Self {
            id,
            list_id: new.list_id,
            catalog: new.catalog,
            quantity: new.quantity,
            uses_remaining: new.uses_remaining,
            location: new.location,
            kind: new.kind,
            opened_at: new.opened_at,
            purchased_at: new.purchased_at,
            shelf_life: new.shelf_life,
            disposition: None,
            version: 0,
        }
    }

    pub fn id_typed(&self) -> ItemId {
        self.id
    }

    pub fn list_id(&self) -> ListId {
        self.list_id
    }

    pub fn catalog(&self) -> &CatalogItem {
        &self.catalog
    }

    pub fn name(&self) -> &str {
        &self.catalog.name
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn uses_remaining(&self) -> u32 {
        self.uses_remaining
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    pub fn storage_size(&self) -> Option<StorageSize> {
        self.kind.storage_size()
    }

    pub fn breaks_into(&self) -> Option<&BreaksInto> {
        self.kind.breaks_into()
    }

    pub fn opened_at(&self) -> Option<DateTime<Utc>> {
        self.opened_at
    }

    pub fn purchased_at(&self) -> DateTime<Utc> {
        self.purchased_at
    }

    pub fn shelf_life(&self) -> ShelfLife {
        self.shelf_life
    }

    pub fn is_open(&self) -> bool {
        self.opened_at.is_some()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.disposition {
            None if self.opened_at.is_some() => Lifecycle::Open,
            None => Lifecycle::Unopened,
            Some(Disposition::Consumed) => Lifecycle::Consumed,
            Some(Disposition::ThrownOut(_)) => Lifecycle::ThrownOut,
            Some(Disposition::Split) => Lifecycle::Split,
            Some(Disposition::Transformed) => Lifecycle::Transformed,
        }
    }

    pub fn freshness(&self, now: DateTime<Utc>) -> FreshnessStatus {
        freshness::freshness_status(self.opened_at, self.shelf_life, now)
    }

    pub fn expiration_date(&self) -> Option<DateTime<Utc>> {
        freshness::expiration_date(self.opened_at, self.shelf_life)
    }

    /// Decide and apply `command` on a copy of this item.
    ///
    /// The receiver is left untouched, so a failed or abandoned operation has no
    /// effect on the caller's view of the item.
    pub fn transition(&self, command: &InventoryCommand) -> DomainResult<Transition> {
        let mut next = self.clone();
        let events = next.execute(command)?;

        let outcome = match events.last() {
            Some(InventoryEvent::UsesConsumed(e)) if e.uses_remaining == 0 => {
                ItemOutcome::Removed(Removal {
                    item_id: self.id,
                    reason: RemovalReason::Consumed,
                    requeue: None,
                })
            }
            Some(InventoryEvent::ItemThrownOut(e)) => ItemOutcome::Removed(Removal {
                item_id: self.id,
                reason: RemovalReason::Discarded(e.reason),
                requeue: e.requeue,
            }),
            Some(InventoryEvent::ContainerSplit(e)) => ItemOutcome::Replaced(Replacement {
                removed: self.id,
                children: self.split_children(&e.portions),
            }),
            Some(InventoryEvent::ItemBrokenDown(e)) => ItemOutcome::Transformed(Transformation {
                removed: self.id,
                list_id: self.list_id,
                components: e.components.clone(),
            }),
            _ => ItemOutcome::Updated(next),
        };

        Ok(Transition { events, outcome })
    }

    fn split_children(&self, portions: &[SplitPortion]) -> Vec<NewItem> {
        portions
            .iter()
            .map(|portion| NewItem {
                list_id: self.list_id,
                catalog: self.catalog.clone(),
                quantity: 1,
                uses_remaining: portion.uses_remaining,
                location: self.location,
                kind: ItemKind::SplittableContainer {
                    storage_size: portion.storage_size,
                },
                opened_at: self.opened_at,
                purchased_at: self.purchased_at,
                shelf_life: self.shelf_life,
            })
            .collect()
    }
}

impl Perishable for InventoryItem {
    fn opened_at(&self) -> Option<DateTime<Utc>> {
        self.opened_at
    }

    fn shelf_life(&self) -> ShelfLife {
        self.shelf_life
    }
}

impl AggregateRoot for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: OpenItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenItem {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ConsumeUses (`amount == 1` is "use one").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumeUses {
    pub item_id: ItemId,
    pub amount: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: MoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveItem {
    pub item_id: ItemId,
    pub location: Location,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ThrowOut, optionally re-queueing the item onto a grocery list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowOut {
    pub item_id: ItemId,
    pub reason: DiscardReason,
    pub requeue_to: Option<ListId>,
    pub occurred_at: DateTime<Utc>,
}

/// Command: SplitContainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitContainer {
    pub item_id: ItemId,
    pub target_size: StorageSize,
    pub count: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: BreakDown. Irreversible; `confirmed` must be set by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakDown {
    pub item_id: ItemId,
    pub confirmed: bool,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryCommand {
    OpenItem(OpenItem),
    ConsumeUses(ConsumeUses),
    MoveItem(MoveItem),
    ThrowOut(ThrowOut),
    SplitContainer(SplitContainer),
    BreakDown(BreakDown),
}

impl InventoryCommand {
    pub fn use_one(item_id: ItemId, occurred_at: DateTime<Utc>) -> Self {
        InventoryCommand::ConsumeUses(ConsumeUses {
            item_id,
            amount: 1,
            occurred_at,
        })
    }
}

/// Event: ItemOpened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemOpened {
    pub item_id: ItemId,
    pub opened_at: DateTime<Utc>,
}

/// Event: UsesConsumed. `uses_remaining == 0` means the item is used up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsesConsumed {
    pub item_id: ItemId,
    pub amount: u32,
    pub uses_remaining: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemMoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMoved {
    pub item_id: ItemId,
    pub from: Location,
    pub to: Location,
    pub occurred_at: DateTime<Utc>,
}

/// Grocery line to create after an item is thrown out.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroceryRequeue {
    pub list_id: ListId,
    pub quantity: u32,
}

/// Event: ItemThrownOut.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemThrownOut {
    pub item_id: ItemId,
    pub reason: DiscardReason,
    pub requeue: Option<GroceryRequeue>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPortion {
    pub storage_size: StorageSize,
    pub uses_remaining: u32,
}

/// Event: ContainerSplit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerSplit {
    pub item_id: ItemId,
    pub from_size: StorageSize,
    pub portions: Vec<SplitPortion>,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemBrokenDown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemBrokenDown {
    pub item_id: ItemId,
    pub components: Vec<String>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InventoryEvent {
    ItemOpened(ItemOpened),
    UsesConsumed(UsesConsumed),
    ItemMoved(ItemMoved),
    ItemThrownOut(ItemThrownOut),
    ContainerSplit(ContainerSplit),
    ItemBrokenDown(ItemBrokenDown),
}

impl Event for InventoryEvent {
    fn event_type(&self) -> &'static str {
        match self {
            InventoryEvent::ItemOpened(_) => "inventory.item.opened",
            InventoryEvent::UsesConsumed(_) => "inventory.item.uses_consumed",
            InventoryEvent::ItemMoved(_) => "inventory.item.moved",
            InventoryEvent::ItemThrownOut(_) => "inventory.item.thrown_out",
            InventoryEvent::ContainerSplit(_) => "inventory.item.split",
            InventoryEvent::ItemBrokenDown(_) => "inventory.item.broken_down",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            InventoryEvent::ItemOpened(e) => e.opened_at,
            InventoryEvent::UsesConsumed(e) => e.occurred_at,
            InventoryEvent::ItemMoved(e) => e.occurred_at,
            InventoryEvent::ItemThrownOut(e) => e.occurred_at,
            InventoryEvent::ContainerSplit(e) => e.occurred_at,
            InventoryEvent::ItemBrokenDown(e) => e.occurred_at,
        }
    }
}

/// Why an item left the list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    Consumed,
    Discarded(DiscardReason),
}

/// Removal signal: the item must be deleted from its list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    pub item_id: ItemId,
    pub reason: RemovalReason,
    pub requeue: Option<GroceryRequeue>,
}

/// The parent is replaced by fully-specified children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replacement {
    pub removed: ItemId,
    pub children: Vec<NewItem>,
}

/// The parent is replaced by one fresh item per named component.
///
/// Components are catalog names; resolving them to catalog entries needs the
/// catalog service, so the drafts are built by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    pub removed: ItemId,
    pub list_id: ListId,
    pub components: Vec<String>,
}

/// What the store has to do after a command was decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Updated(InventoryItem),
    Removed(Removal),
    Replaced(Replacement),
    Transformed(Transformation),
}

/// Result of a decided command: the events and what they mean for the store.
///
/// Empty `events` means nothing changed (e.g. moving an item where it already is).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub events: Vec<InventoryEvent>,
    pub outcome: ItemOutcome,
}

impl Aggregate for InventoryItem {
    type Command = InventoryCommand;
    type Event = InventoryEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            InventoryEvent::ItemOpened(e) => {
                self.opened_at = Some(e.opened_at);
            }
            InventoryEvent::UsesConsumed(e) => {
                self.uses_remaining = e.uses_remaining;
                if e.uses_remaining == 0 {
                    self.disposition = Some(Disposition::Consumed);
                }
            }
            InventoryEvent::ItemMoved(e) => {
                self.location = e.to;
            }
            InventoryEvent::ItemThrownOut(e) => {
                self.disposition = Some(Disposition::ThrownOut(e.reason));
            }
            InventoryEvent::ContainerSplit(_) => {
                self.disposition = Some(Disposition::Split);
            }
            InventoryEvent::ItemBrokenDown(_) => {
                self.disposition = Some(Disposition::Transformed);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            InventoryCommand::OpenItem(cmd) => self.handle_open(cmd),
            InventoryCommand::ConsumeUses(cmd) => self.handle_consume(cmd),
            InventoryCommand::MoveItem(cmd) => self.handle_move(cmd),
            InventoryCommand::ThrowOut(cmd) => self.handle_throw_out(cmd),
            InventoryCommand::SplitContainer(cmd) => self.handle_split(cmd),
            InventoryCommand::BreakDown(cmd) => self.handle_break_down(cmd),
        }
    }
}

impl InventoryItem {
    fn ensure_live(&self) -> Result<(), DomainError> {
        if self.disposition.is_some() {
            return Err(DomainError::no_longer_listed(format_args!("item {}", self.id)));
        }
        Ok(())
    }

    fn ensure_item_id(&self, item_id: ItemId) -> Result<(), DomainError> {
        if self.id != item_id {
            return Err(DomainError::invariant("item_id mismatch"));
        }
        Ok(())
    }

    fn ensure_target(&self, item_id: ItemId) -> Result<(), DomainError> {
        self.ensure_live()?;
        self.ensure_item_id(item_id)
    }

    fn handle_open(&self, cmd: &OpenItem) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_target(cmd.item_id)?;

        if self.opened_at.is_some() {
            return Err(DomainError::already_open());
        }

        Ok(vec![InventoryEvent::ItemOpened(ItemOpened {
            item_id: cmd.item_id,
            opened_at: cmd.occurred_at,
        })])
    }

    fn handle_consume(&self, cmd: &ConsumeUses) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_target(cmd.item_id)?;

        if cmd.amount == 0 {
            return Err(DomainError::validation("amount must be at least 1"));
        }
        if self.uses_remaining == 0 {
            return Err(DomainError::already_empty());
        }
        if cmd.amount > self.uses_remaining {
            return Err(DomainError::insufficient_uses(cmd.amount, self.uses_remaining));
        }

        Ok(vec![InventoryEvent::UsesConsumed(UsesConsumed {
            item_id: cmd.item_id,
            amount: cmd.amount,
            uses_remaining: self.uses_remaining - cmd.amount,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_move(&self, cmd: &MoveItem) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_target(cmd.item_id)?;

        if cmd.location == self.location {
            return Ok(vec![]);
        }

        Ok(vec![InventoryEvent::ItemMoved(ItemMoved {
            item_id: cmd.item_id,
            from: self.location,
            to: cmd.location,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_throw_out(&self, cmd: &ThrowOut) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_target(cmd.item_id)?;

        // Restock what was bought last time.
        let requeue = cmd.requeue_to.map(|list_id| GroceryRequeue {
            list_id,
            quantity: self.quantity.max(1),
        });

        Ok(vec![InventoryEvent::ItemThrownOut(ItemThrownOut {
            item_id: cmd.item_id,
            reason: cmd.reason,
            requeue,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_split(&self, cmd: &SplitContainer) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_target(cmd.item_id)?;

        let Some(from_size) = self.kind.storage_size() else {
            return Err(DomainError::validation("item is not a splittable container"));
        };
        let Some(expected) = from_size.split_count(cmd.target_size) else {
            return Err(DomainError::validation(format!(
                "a {from_size} cannot be split into {}s",
                cmd.target_size
            )));
        };
        if cmd.count != expected {
            return Err(DomainError::validation(format!(
                "a {from_size} splits into {expected} {}s, not {}",
                cmd.target_size, cmd.count
            )));
        }
        // Fewer uses than containers leaves the trailing containers empty.
        let portions = divide_uses(self.uses_remaining, cmd.count)
            .into_iter()
            .map(|uses_remaining| SplitPortion {
                storage_size: cmd.target_size,
                uses_remaining,
            })
            .collect();

        Ok(vec![InventoryEvent::ContainerSplit(ContainerSplit {
            item_id: cmd.item_id,
            from_size,
            portions,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_break_down(&self, cmd: &BreakDown) -> Result<Vec<InventoryEvent>, DomainError> {
        self.ensure_target(cmd.item_id)?;

        let Some(breaks_into) = self.kind.breaks_into() else {
            return Err(DomainError::validation("item does not break down into components"));
        };
        if !cmd.confirmed {
            return Err(DomainError::validation("breaking down an item must be confirmed"));
        }

        Ok(vec![InventoryEvent::ItemBrokenDown(ItemBrokenDown {
            item_id: cmd.item_id,
            components: breaks_into.components().to_vec(),
            occurred_at: cmd.occurred_at,
        })])
    }
}
