//! Engine-level error model.

use thiserror::Error;

use larder_core::DomainError;

use crate::collaborators::TransportError;

/// Failure of an engine operation.
///
/// Domain failures are deterministic and mean nothing was sent to a collaborator.
/// Transport failures are surfaced as-is; whatever was already applied stays applied.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl From<DomainError> for EngineError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) => EngineError::Validation(msg),
            DomainError::InvalidId(msg) => EngineError::Validation(msg),
            DomainError::NotFound(msg) => EngineError::NotFound(msg),
            DomainError::Conflict(msg) => EngineError::Conflict(msg),
            DomainError::InvariantViolation(msg) => EngineError::InvariantViolation(msg),
        }
    }
}

impl EngineError {
    pub fn is_transport(&self) -> bool {
        matches!(self, EngineError::Transport(_))
    }
}
