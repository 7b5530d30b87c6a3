//! Domain events and their distribution.
//!
//! Aggregates emit typed events; the orchestration layer wraps them in
//! [`EventEnvelope`]s and publishes them on an [`EventBus`] once the household
//! store has accepted the corresponding mutation.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, MessageFilter, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
