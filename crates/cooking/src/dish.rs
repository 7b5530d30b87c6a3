use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{Aggregate, AggregateId, AggregateRoot, DomainError, DomainResult};
use larder_events::Event;
use larder_inventory::{Category, ItemId, Location};

/// Suffix of the catalog entry created for a dish's leftovers.
pub const LEFTOVER_SUFFIX: &str = " (leftover)";

/// Catalog name of a dish's leftovers: `"<dish name> (leftover)"`.
pub fn leftover_name(dish_name: &str) -> String {
    format!("{}{LEFTOVER_SUFFIX}", dish_name.trim())
}

/// Dish identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DishId(pub AggregateId);

impl DishId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for DishId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DishType {
    Main,
    Side,
    Soup,
    Salad,
    Dessert,
    Snack,
    Drink,
    Sauce,
    Other,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
    Any,
}

/// What happens to whatever is left after cooking.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum LeftoverStorage {
    None,
    Keep { location: Location },
}

impl LeftoverStorage {
    pub fn location(self) -> Option<Location> {
        match self {
            LeftoverStorage::None => None,
            LeftoverStorage::Keep { location } => Some(location),
        }
    }
}

/// Ingredient backed by a pantry list item; cooking deducts from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PantryIngredient {
    pub item_id: ItemId,
    pub name: String,
    pub amount_used: u32,
}

/// Ingredient that is recorded on the dish but not tracked in the pantry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdhocIngredient {
    pub name: String,
    pub category: Category,
    pub amount_used: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum IngredientSpec {
    Pantry(PantryIngredient),
    Adhoc(AdhocIngredient),
}

impl IngredientSpec {
    pub fn name(&self) -> &str {
        match self {
            IngredientSpec::Pantry(i) => &i.name,
            IngredientSpec::Adhoc(i) => &i.name,
        }
    }

    pub fn amount_used(&self) -> u32 {
        match self {
            IngredientSpec::Pantry(i) => i.amount_used,
            IngredientSpec::Adhoc(i) => i.amount_used,
        }
    }
}

/// What the cook filled in about the dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishSpec {
    pub name: String,
    pub servings: u32,
    pub leftover_storage: LeftoverStorage,
    pub dish_type: DishType,
    pub meal_category: MealCategory,
}

impl DishSpec {
    /// Pre-flight checks for a cook: named dish, at least one ingredient, positive amounts.
    pub fn validate(&self, ingredients: &[IngredientSpec]) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("dish name cannot be empty"));
        }
        validate_ingredients(ingredients)
    }
}

fn validate_ingredients(ingredients: &[IngredientSpec]) -> DomainResult<()> {
    if ingredients.is_empty() {
        return Err(DomainError::validation("a dish needs at least one ingredient"));
    }
    if let Some(bad) = ingredients.iter().find(|i| i.amount_used() == 0) {
        return Err(DomainError::validation(format!(
            "amount used for '{}' must be at least 1",
            bad.name()
        )));
    }
    Ok(())
}

/// Aggregate root: Dish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    id: DishId,
    name: String,
    ingredients: Vec<IngredientSpec>,
    servings: u32,
    leftover_storage: LeftoverStorage,
    dish_type: DishType,
    meal_category: MealCategory,
    times_made: u32,
    last_made: Option<DateTime<Utc>>,
    version: u64,
    created: bool,
}

impl Dish {
    /// Create an empty, not-yet-created dish.
    pub fn empty(id: DishId) -> Self {
        Self {
            id,
            name: String::new(),
            ingredients: Vec::new(),
            servings: 0,
            leftover_storage: LeftoverStorage::None,
            dish_type: DishType::Other,
            meal_category: MealCategory::Any,
            times_made: 0,
            last_made: None,
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> DishId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ingredients(&self) -> &[IngredientSpec] {
        &self.ingredients
    }

    pub fn servings(&self) -> u32 {
        self.servings
    }

    pub fn leftover_storage(&self) -> LeftoverStorage {
        self.leftover_storage
    }

    pub fn dish_type(&self) -> DishType {
        self.dish_type
    }

    pub fn meal_category(&self) -> MealCategory {
        self.meal_category
    }

    pub fn times_made(&self) -> u32 {
        self.times_made
    }

    pub fn last_made(&self) -> Option<DateTime<Utc>> {
        self.last_made
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    /// Does this dish answer to `name` (case-insensitive, trimmed)?
    pub fn matches_name(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

impl AggregateRoot for Dish {
    type Id = DishId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateDish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDish {
    pub dish_id: DishId,
    pub spec: DishSpec,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RecordCook. Refreshes the dish details from `spec`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCook {
    pub dish_id: DishId,
    pub spec: DishSpec,
    pub ingredients: Vec<IngredientSpec>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DishCommand {
    CreateDish(CreateDish),
    RecordCook(RecordCook),
}

/// Event: DishCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishCreated {
    pub dish_id: DishId,
    pub spec: DishSpec,
    pub occurred_at: DateTime<Utc>,
}

/// Event: DishCooked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishCooked {
    pub dish_id: DishId,
    pub spec: DishSpec,
    pub ingredients: Vec<IngredientSpec>,
    pub times_made: u32,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DishEvent {
    DishCreated(DishCreated),
    DishCooked(DishCooked),
}

impl Event for DishEvent {
    fn event_type(&self) -> &'static str {
        match self {
            DishEvent::DishCreated(_) => "cooking.dish.created",
            DishEvent::DishCooked(_) => "cooking.dish.cooked",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            DishEvent::DishCreated(e) => e.occurred_at,
            DishEvent::DishCooked(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Dish {
    type Command = DishCommand;
    type Event = DishEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            DishEvent::DishCreated(e) => {
                self.id = e.dish_id;
                self.created = true;
                self.apply_spec(&e.spec);
            }
            DishEvent::DishCooked(e) => {
                self.apply_spec(&e.spec);
                self.ingredients = e.ingredients.clone();
                self.times_made = e.times_made;
                self.last_made = Some(e.occurred_at);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            DishCommand::CreateDish(cmd) => self.handle_create(cmd),
            DishCommand::RecordCook(cmd) => self.handle_cook(cmd),
        }
    }
}

impl Dish {
    fn apply_spec(&mut self, spec: &DishSpec) {
        self.name = spec.name.trim().to_string();
        self.servings = spec.servings;
        self.leftover_storage = spec.leftover_storage;
        self.dish_type = spec.dish_type;
        self.meal_category = spec.meal_category;
    }

    fn ensure_dish_id(&self, dish_id: DishId) -> Result<(), DomainError> {
        if self.id != dish_id {
            return Err(DomainError::invariant("dish_id mismatch"));
        }
        Ok(())
    }

    fn handle_create(&self, cmd: &CreateDish) -> Result<Vec<DishEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("dish already exists"));
        }
        if cmd.spec.name.trim().is_empty() {
            return Err(DomainError::validation("dish name cannot be empty"));
        }

        Ok(vec![DishEvent::DishCreated(DishCreated {
            dish_id: cmd.dish_id,
            spec: cmd.spec.clone(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_cook(&self, cmd: &RecordCook) -> Result<Vec<DishEvent>, DomainError> {
        if !self.created {
            return Err(DomainError::not_found(format!("dish {} does not exist", cmd.dish_id)));
        }
        self.ensure_dish_id(cmd.dish_id)?;
        cmd.spec.validate(&cmd.ingredients)?;

        Ok(vec![DishEvent::DishCooked(DishCooked {
            dish_id: cmd.dish_id,
            spec: cmd.spec.clone(),
            ingredients: cmd.ingredients.clone(),
            times_made: self.times_made.saturating_add(1),
            occurred_at: cmd.occurred_at,
        })])
    }
}

/// One cook, as recorded in the household history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookRecord {
    pub dish_id: DishId,
    pub dish_name: String,
    pub servings: u32,
    pub ingredients: Vec<IngredientSpec>,
    pub leftover_created: bool,
    pub cooked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_dish_id() -> DishId {
        DishId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn soup_spec() -> DishSpec {
        DishSpec {
            name: "Lentil soup".to_string(),
            servings: 4,
            leftover_storage: LeftoverStorage::Keep {
                location: Location::Fridge,
            },
            dish_type: DishType::Soup,
            meal_category: MealCategory::Dinner,
        }
    }

    fn lentils(amount_used: u32) -> IngredientSpec {
        IngredientSpec::Pantry(PantryIngredient {
            item_id: ItemId::new(AggregateId::new()),
            name: "Lentils".to_string(),
            amount_used,
        })
    }

    fn salt() -> IngredientSpec {
        IngredientSpec::Adhoc(AdhocIngredient {
            name: "Salt".to_string(),
            category: Category::Condiments,
            amount_used: 1,
        })
    }

    fn created_dish() -> Dish {
        let dish_id = test_dish_id();
        let mut dish = Dish::empty(dish_id);
        dish.execute(&DishCommand::CreateDish(CreateDish {
            dish_id,
            spec: soup_spec(),
            occurred_at: test_time(),
        }))
        .unwrap();
        dish
    }

    #[test]
    fn leftover_name_appends_suffix() {
        assert_eq!(leftover_name(" Lentil soup "), "Lentil soup (leftover)");
    }

    #[test]
    fn create_dish_emits_dish_created_event() {
        let dish_id = test_dish_id();
        let dish = Dish::empty(dish_id);
        let events = dish
            .handle(&DishCommand::CreateDish(CreateDish {
                dish_id,
                spec: soup_spec(),
                occurred_at: test_time(),
            }))
            .unwrap();

        assert_eq!(events.len(), 1);
        match &events[0] {
            DishEvent::DishCreated(e) => {
                assert_eq!(e.dish_id, dish_id);
                assert_eq!(e.spec.name, "Lentil soup");
            }
            _ => panic!("Expected DishCreated event"),
        }
    }

    #[test]
    fn create_dish_twice_is_a_conflict() {
        let dish = created_dish();
        let err = dish
            .handle(&DishCommand::CreateDish(CreateDish {
                dish_id: dish.id_typed(),
                spec: soup_spec(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn record_cook_increments_times_made_and_sets_last_made() {
        let mut dish = created_dish();
        let at = test_time();

        dish.execute(&DishCommand::RecordCook(RecordCook {
            dish_id: dish.id_typed(),
            spec: soup_spec(),
            ingredients: vec![lentils(2), salt()],
            occurred_at: at,
        }))
        .unwrap();

        assert_eq!(dish.times_made(), 1);
        assert_eq!(dish.last_made(), Some(at));
        assert_eq!(dish.ingredients().len(), 2);
        assert_eq!(dish.version(), 2);
    }

    #[test]
    fn record_cook_on_missing_dish_is_not_found() {
        let dish = Dish::empty(test_dish_id());
        let err = dish
            .handle(&DishCommand::RecordCook(RecordCook {
                dish_id: dish.id_typed(),
                spec: soup_spec(),
                ingredients: vec![salt()],
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn validate_rejects_missing_name_no_ingredients_and_zero_amounts() {
        let mut unnamed = soup_spec();
        unnamed.name = "   ".to_string();
        assert!(matches!(unnamed.validate(&[salt()]), Err(DomainError::Validation(_))));

        assert!(matches!(soup_spec().validate(&[]), Err(DomainError::Validation(_))));

        match soup_spec().validate(&[lentils(0)]) {
            Err(DomainError::Validation(msg)) => assert!(msg.contains("Lentils")),
            other => panic!("Expected Validation error, got {other:?}"),
        }
    }

    #[test]
    fn matches_name_ignores_case_and_whitespace() {
        let dish = created_dish();
        assert!(dish.matches_name("  lentil SOUP "));
        assert!(!dish.matches_name("lentil stew"));
    }

    #[test]
    fn matches_name_trims_the_stored_name_too() {
        let mut dish = created_dish();
        dish.name = format!("  {}\t", dish.name);
        assert!(dish.matches_name("Lentil soup"));
    }

    #[test]
    fn leftover_storage_location() {
        assert_eq!(LeftoverStorage::None.location(), None);
        assert_eq!(soup_spec().leftover_storage.location(), Some(Location::Fridge));
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 200,
                ..ProptestConfig::default()
            })]

            /// Property: every successful cook adds exactly one to `times_made`.
            #[test]
            fn times_made_counts_cooks(cooks in 1u32..30) {
                let mut dish = created_dish();
                for expected in 1..=cooks {
                    dish.execute(&DishCommand::RecordCook(RecordCook {
                        dish_id: dish.id_typed(),
                        spec: soup_spec(),
                        ingredients: vec![salt()],
                        occurred_at: test_time(),
                    }))
                    .unwrap();
                    prop_assert_eq!(dish.times_made(), expected);
                }
            }
        }
    }
}
