//! Cooking domain module.
//!
//! Dishes, their ingredient specs and leftover policy. Deducting ingredients from
//! the pantry is orchestrated by `larder-infra`; this crate only decides what a
//! cook means for the dish record itself.

pub mod dish;

pub use dish::{
    AdhocIngredient, CookRecord, CreateDish, Dish, DishCommand, DishCooked, DishCreated, DishEvent,
    DishId, DishSpec, DishType, IngredientSpec, LEFTOVER_SUFFIX, LeftoverStorage, MealCategory,
    PantryIngredient, RecordCook, leftover_name,
};
