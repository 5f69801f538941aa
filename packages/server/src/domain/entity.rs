//! Domain entities.

use super::{SessionId, error::SessionError};

/// A relayed chat message as recorded in the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    /// Timestamp as sent by the origin (not server-corrected)
    pub timestamp: String,
    /// Sender tag as sent by the origin
    pub sender: String,
    /// Message body
    pub content: String,
}

impl ChatMessage {
    /// Create a new chat message
    pub fn new(
        timestamp: impl Into<String>,
        sender: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            sender: sender.into(),
            content: content.into(),
        }
    }
}

/// Result of scanning the message log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backlog {
    /// The store has never been written
    Missing,
    /// All readable records, in append order
    Entries(Vec<ChatMessage>),
}

impl Backlog {
    /// Messages in append order; empty when the store is missing
    pub fn into_messages(self) -> Vec<ChatMessage> {
        match self {
            Backlog::Missing => Vec::new(),
            Backlog::Entries(messages) => messages,
        }
    }
}

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Accepted, handshake not completed yet
    Connecting,
    /// Registered and reading
    Active,
    /// Read loop terminated (terminal)
    Closed,
}

/// Server-side state of one connected party
#[derive(Debug, Clone)]
pub struct Session {
    /// Unique per connection
    pub id: SessionId,
    /// Local time the session was created
    pub connected_at: String,
    state: SessionState,
}

impl Session {
    /// Create a new session in the `Connecting` state
    pub fn new(id: SessionId, connected_at: impl Into<String>) -> Self {
        Self {
            id,
            connected_at: connected_at.into(),
            state: SessionState::Connecting,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    /// `Connecting -> Active`, once the handshake has succeeded
    pub fn activate(&mut self) -> Result<(), SessionError> {
        self.transition(SessionState::Connecting, SessionState::Active)
    }

    /// Move to the terminal `Closed` state.
    ///
    /// Allowed from `Connecting` (session discarded before activation) and
    /// from `Active`.
    pub fn close(&mut self) -> Result<(), SessionError> {
        if self.state == SessionState::Closed {
            return Err(SessionError::InvalidTransition {
                from: SessionState::Closed,
                to: SessionState::Closed,
            });
        }
        self.state = SessionState::Closed;
        Ok(())
    }

    fn transition(&mut self, from: SessionState, to: SessionState) -> Result<(), SessionError> {
        if self.state != from {
            return Err(SessionError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}
