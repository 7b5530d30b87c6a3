//! Collaborator boundaries consumed by the engine.
//!
//! The engine assumes a remote household store reachable through simple CRUD
//! calls. These traits are that boundary; `InMemoryBackend` implements all of them
//! for tests and local development.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::{Fault, InMemoryBackend};
pub use r#trait::{CatalogService, DishService, ListService, TransportError};
