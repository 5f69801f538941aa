//! Domain layer error definitions.

use thiserror::Error;

use super::entity::SessionState;

/// Errors related to the Session lifecycle
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The requested transition is not allowed from the current state
    #[error("Invalid session transition: {from:?} -> {to:?}")]
    InvalidTransition { from: SessionState, to: SessionState },
}

/// Errors raised by a message log store
#[derive(Debug, Error)]
pub enum MessageLogError {
    /// Opening, writing or reading the store failed
    #[error("Message log I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A message could not be serialized into a record
    #[error("Message log serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
