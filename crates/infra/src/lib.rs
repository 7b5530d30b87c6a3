//! Infrastructure layer: collaborator boundaries and the orchestrations built on them.
//!
//! The domain crates decide; this crate talks to the catalog, list and dish
//! services, publishes events, and reports partial failures of the multi-step
//! transactions.

pub mod checkout;
pub mod collaborators;
pub mod config;
pub mod cooking;
pub mod error;
pub mod operations;


pub use checkout::{CheckoutFailure, CheckoutResult, CheckoutStep, CheckoutTransaction};
pub use config::EngineConfig;
pub use cooking::{
    CookResult, CookingTransaction, IngredientOutcome, IngredientResult, LeftoverOutcome,
    Unavailable,
};
pub use error::EngineError;
pub use operations::{AppliedOutcome, InventoryOperations};
