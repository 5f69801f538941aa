//! UseCase layer error definitions.

use thiserror::Error;

/// Errors while joining a session
#[derive(Debug, Error)]
pub enum JoinError {
    /// The session id is already registered
    #[error("Session '{0}' is already registered")]
    AlreadyRegistered(String),

    /// The backlog payload could not be serialized
    #[error("Failed to serialize backlog: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors while relaying an inbound payload
#[derive(Debug, Error)]
pub enum RelayError {
    /// The payload is not a `{who, time, what}` envelope
    #[error("Malformed message payload: {0}")]
    Parse(#[source] serde_json::Error),
}
