//! Session registry: the shared set of live sessions.
//!
//! Every operation takes the same lock, so membership changes and broadcast
//! snapshots are totally ordered. Broadcast callbacks run on a snapshot
//! taken under the lock and after it is released, which lets a callback (or
//! another task) remove members while the pass is in progress.

use std::collections::HashMap;

use thiserror::Error;
use tokio::sync::{Mutex, mpsc};

use crate::domain::SessionId;

/// Outbound instruction for a session's writer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Write a text payload
    Text(String),
    /// Send a Close frame and stop writing
    Close,
}

/// Queued outbound payloads per session before it counts as stalled
pub const OUTBOX_CAPACITY: usize = 256;

/// Delivery to a session failed: its writer is gone or has stopped draining
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("session '{0}' is no longer accepting messages")]
pub struct DeliveryError(pub SessionId);

/// Write side of a registered session.
///
/// Cloning is cheap. All writes go through one bounded queue drained by the
/// session's writer, so writes to one session never run concurrently. A
/// full queue is treated the same as a closed one.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    outbox: mpsc::Sender<Outbound>,
}

impl SessionHandle {
    pub fn new(id: SessionId, outbox: mpsc::Sender<Outbound>) -> Self {
        Self { id, outbox }
    }

    /// Create a handle together with the receiving end of its outbox
    pub fn channel(id: SessionId) -> (Self, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(OUTBOX_CAPACITY);
        (Self::new(id, tx), rx)
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Queue a text payload for this session
    pub fn send(&self, payload: impl Into<String>) -> Result<(), DeliveryError> {
        self.push(Outbound::Text(payload.into()))
    }

    /// Ask this session to close its connection
    pub fn close(&self) -> Result<(), DeliveryError> {
        self.push(Outbound::Close)
    }

    fn push(&self, outbound: Outbound) -> Result<(), DeliveryError> {
        self.outbox.try_send(outbound).map_err(|e| {
            if let mpsc::error::TrySendError::Full(_) = e {
                tracing::warn!(session_id = %self.id, capacity = OUTBOX_CAPACITY, "Outbox full");
            }
            DeliveryError(self.id.clone())
        })
    }
}

/// Shared set of live sessions, unique by id
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<SessionId, SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session.
    ///
    /// Returns `false` (and keeps the existing entry) if the id is already
    /// registered.
    pub async fn add(&self, handle: SessionHandle) -> bool {
        let mut sessions = self.sessions.lock().await;
        if sessions.contains_key(handle.id()) {
            return false;
        }
        sessions.insert(handle.id().clone(), handle);
        true
    }

    /// Unregister a session. Returns `false` if it was not registered.
    pub async fn remove(&self, id: &SessionId) -> bool {
        let mut sessions = self.sessions.lock().await;
        sessions.remove(id).is_some()
    }

    pub async fn contains(&self, id: &SessionId) -> bool {
        self.sessions.lock().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Invoke `f` once per registered session other than `excluded`.
    ///
    /// The member set is the one registered when the call takes the lock.
    /// Sessions for which `f` fails are removed afterwards; their ids are
    /// returned.
    pub async fn for_each_except<F>(&self, excluded: &SessionId, f: F) -> Vec<SessionId>
    where
        F: FnMut(&SessionHandle) -> Result<(), DeliveryError>,
    {
        let snapshot = self.snapshot(Some(excluded)).await;
        self.deliver(&snapshot, f).await
    }

    /// Ask every registered session to close. Returns how many were asked.
    pub async fn close_all(&self) -> usize {
        let snapshot = self.snapshot(None).await;
        let failed = self.deliver(&snapshot, SessionHandle::close).await;
        tracing::debug!(
            closing = snapshot.len() - failed.len(),
            already_gone = failed.len(),
            "requested close of all sessions"
        );
        snapshot.len() - failed.len()
    }

    async fn snapshot(&self, excluded: Option<&SessionId>) -> Vec<SessionHandle> {
        let sessions = self.sessions.lock().await;
        sessions
            .values()
            .filter(|handle| Some(handle.id()) != excluded)
            .cloned()
            .collect()
    }

    async fn deliver<F>(&self, snapshot: &[SessionHandle], mut f: F) -> Vec<SessionId>
    where
        F: FnMut(&SessionHandle) -> Result<(), DeliveryError>,
    {
        let failed: Vec<SessionId> = snapshot
            .iter()
            .filter_map(|handle| f(handle).err().map(|DeliveryError(id)| id))
            .collect();

        if !failed.is_empty() {
            let mut sessions = self.sessions.lock().await;
            for id in &failed {
                sessions.remove(id);
            }
        }

        failed
    }
}
