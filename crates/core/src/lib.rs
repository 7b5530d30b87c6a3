//! `larder-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error model, and the aggregate/entity traits that the
//! inventory, cooking and shopping modules build on.

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{AggregateId, CatalogItemId, ListId, PodId};
