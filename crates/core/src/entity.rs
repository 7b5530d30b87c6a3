//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Implemented by records that are not aggregates but still have identity
/// (catalog items, grocery lines).
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
