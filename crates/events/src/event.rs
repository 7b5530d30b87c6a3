use chrono::{DateTime, Utc};

/// A domain-agnostic event.
///
/// Events are immutable facts, versioned for schema evolution.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "inventory.item.opened").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (household wall-clock time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
