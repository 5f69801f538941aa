//! Persistence port for the message log.

use async_trait::async_trait;

use super::{Backlog, ChatMessage, MessageLogError};

/// Append-only message log.
///
/// Implementations must serialize concurrent appends so that two records are
/// never interleaved. Reads may run concurrently with appends and observe any
/// recent prefix of the log.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageLogRepository: Send + Sync {
    /// Append `message` as the new last record.
    async fn append(&self, message: &ChatMessage) -> Result<(), MessageLogError>;

    /// Scan the whole log from the start.
    ///
    /// Returns [`Backlog::Missing`] when the store has never been written.
    async fn read_all(&self) -> Result<Backlog, MessageLogError>;
}
