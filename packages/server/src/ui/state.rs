//! Server state shared by every handler.

use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::{domain::MessageLogRepository, infrastructure::registry::SessionRegistry};

/// Shared application state
pub struct AppState {
    /// Message log（データアクセス層の抽象化）
    pub message_log: Arc<dyn MessageLogRepository>,
    /// Live sessions, the broadcast targets
    pub registry: Arc<SessionRegistry>,
    /// One tracked task per session, awaited on shutdown
    pub sessions: TaskTracker,
}

impl AppState {
    pub fn new(message_log: Arc<dyn MessageLogRepository>) -> Self {
        Self {
            message_log,
            registry: Arc::new(SessionRegistry::new()),
            sessions: TaskTracker::new(),
        }
    }
}
