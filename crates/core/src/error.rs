//! Domain error model.
//!
//! Every lifecycle rule an item or dish can break maps onto one of five kinds.
//! The recurring ones get a named constructor so the wording stays the same
//! wherever the rule is checked.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Deterministic failure of a domain decision.
///
/// Collaborator and transport failures are not represented here.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input rejected before anything changes (zero amounts, blank names, too few uses).
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The record does not exist, or has already left its list.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request contradicts the record's current state.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Opening something that already has an `opened_at`.
    pub fn already_open() -> Self {
        Self::conflict("item is already open")
    }

    /// Using an item with no uses left.
    pub fn already_empty() -> Self {
        Self::validation("item is already empty")
    }

    /// Deducting more uses than the item holds. Never truncated.
    pub fn insufficient_uses(requested: u32, available: u32) -> Self {
        Self::Validation(format!("requested {requested} uses but only {available} remain"))
    }

    /// Acting on a record that was thrown out, used up, split or broken down.
    pub fn no_longer_listed(what: impl core::fmt::Display) -> Self {
        Self::NotFound(format!("{what} is no longer on its list"))
    }

    /// Human-readable detail without the kind prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(msg)
            | Self::InvariantViolation(msg)
            | Self::InvalidId(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => msg,
        }
    }
}
