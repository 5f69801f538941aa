//! WebSocket payload and log record DTOs.

use serde::{Deserialize, Serialize};

use crate::domain::ChatMessage;

/// Field value of `message` in [`FileMissingNotice`]
pub const FILE_MISSING_TEXT: &str = "file DNE.";

/// Inbound chat payload sent by a party
#[derive(Debug, Clone, Deserialize)]
pub struct MessageEnvelope {
    pub who: String,
    pub time: String,
    pub what: String,
}

impl From<MessageEnvelope> for ChatMessage {
    fn from(envelope: MessageEnvelope) -> Self {
        ChatMessage::new(envelope.time, envelope.who, envelope.what)
    }
}

/// One line of the persisted log, also one element of the backlog array
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub time: String,
    pub who: String,
    pub what: String,
}

impl From<&ChatMessage> for MessageRecord {
    fn from(message: &ChatMessage) -> Self {
        Self {
            time: message.timestamp.clone(),
            who: message.sender.clone(),
            what: message.content.clone(),
        }
    }
}

impl From<MessageRecord> for ChatMessage {
    fn from(record: MessageRecord) -> Self {
        ChatMessage::new(record.time, record.who, record.what)
    }
}

/// Sent instead of the backlog when the log store does not exist yet.
///
/// Uses `message` rather than `what`; existing clients rely on it.
#[derive(Debug, Clone, Serialize)]
pub struct FileMissingNotice {
    pub time: String,
    pub who: String,
    pub message: String,
}

impl FileMissingNotice {
    pub fn new(time: String) -> Self {
        Self {
            time,
            who: String::new(),
            message: FILE_MISSING_TEXT.to_string(),
        }
    }
}
