//! WebSocket connection handlers.
//!
//! One tracked task per connection drives a [`Session`] through
//! `Connecting -> Active -> Closed`: register, replay the backlog, then run
//! the reader and the writer until either side stops.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use dengon_shared::time::current_local_timestamp;
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, Stream, StreamExt},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{Session, SessionId, SessionIdFactory},
    infrastructure::registry::{Outbound, SessionHandle},
    ui::state::AppState,
    usecase::{JoinSessionUseCase, LeaveSessionUseCase, RelayMessageUseCase},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let session = Session::new(SessionIdFactory::generate(), current_local_timestamp());
    tracing::debug!(session_id = %session.id, "Session connecting");

    let failed_id = session.id.clone();
    let tracker = state.sessions.clone();
    ws.on_failed_upgrade(move |e| {
        // Never registered; the session is dropped while still Connecting
        tracing::warn!(session_id = %failed_id, error = %e, "WebSocket handshake failed");
    })
    .on_upgrade(move |socket| tracker.track_future(handle_socket(socket, state, session)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, mut session: Session) {
    if let Err(e) = session.activate() {
        tracing::error!(session_id = %session.id, error = %e, "Cannot activate session");
        return;
    }

    // Broadcasts queue up in the outbox until the writer starts, so the
    // backlog is always the first payload this party sees
    let (handle, rx) = SessionHandle::channel(session.id.clone());
    let join_usecase = JoinSessionUseCase::new(state.message_log.clone(), state.registry.clone());

    match join_usecase.execute(handle).await {
        Ok(backlog) => {
            tracing::info!(
                session_id = %session.id,
                connected_at = %session.connected_at,
                "Session joined"
            );
            run_session(socket, &state, &session.id, backlog, rx).await;
        }
        Err(e) => {
            tracing::error!(session_id = %session.id, error = %e, "Failed to join session");
        }
    }

    let leave_usecase = LeaveSessionUseCase::new(state.registry.clone());
    let removed = leave_usecase.execute(&session.id).await;
    if let Err(e) = session.close() {
        tracing::warn!(session_id = %session.id, error = %e, "Unexpected session state on close");
    }
    let remaining = state.registry.len().await;
    tracing::info!(
        session_id = %session.id,
        removed,
        remaining,
        "Session closed"
    );
}

async fn run_session(
    socket: WebSocket,
    state: &AppState,
    session_id: &SessionId,
    backlog: String,
    rx: mpsc::Receiver<Outbound>,
) {
    let (mut sender, receiver) = socket.split();

    if let Err(e) = sender.send(Message::Text(backlog.into())).await {
        tracing::warn!(session_id = %session_id, error = %e, "Failed to send backlog");
        return;
    }
    tracing::debug!(session_id = %session_id, "Sent backlog");

    // Whichever side stops first tells the other one. The reader only checks
    // between payloads, so a relay in progress is never cut short.
    let stop = CancellationToken::new();
    tokio::join!(
        async {
            read_loop(receiver, state, session_id, &stop).await;
            stop.cancel();
        },
        async {
            write_loop(sender, rx, session_id, &stop).await;
            stop.cancel();
        },
    );
}

/// Relay every inbound text payload until the peer closes, the read fails or
/// `stop` is cancelled
async fn read_loop<S>(mut receiver: S, state: &AppState, session_id: &SessionId, stop: &CancellationToken)
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let relay_usecase = RelayMessageUseCase::new(state.message_log.clone(), state.registry.clone());

    loop {
        let next = tokio::select! {
            _ = stop.cancelled() => break,
            next = receiver.next() => next,
        };
        let Some(msg) = next else {
            break;
        };
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "WebSocket read error");
                break;
            }
        };

        match msg {
            Message::Text(text) => {
                tracing::debug!(session_id = %session_id, payload = %text.as_str(), "Received text");
                match relay_usecase.execute(session_id, text.as_str()).await {
                    Ok(outcome) => {
                        tracing::debug!(
                            session_id = %session_id,
                            delivered = outcome.delivered,
                            dropped = outcome.dropped.len(),
                            persisted = outcome.persisted,
                            "Relayed message"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(session_id = %session_id, error = %e, "Discarding payload");
                    }
                }
            }
            Message::Binary(bytes) => {
                tracing::warn!(
                    session_id = %session_id,
                    len = bytes.len(),
                    "Discarding binary payload"
                );
            }
            Message::Ping(_) | Message::Pong(_) => {
                // Ping/pong is handled automatically by the WebSocket protocol
                tracing::trace!(session_id = %session_id, "Received ping/pong");
            }
            Message::Close(_) => {
                tracing::info!(session_id = %session_id, "Peer requested close");
                break;
            }
        }
    }
}

/// Drain the outbox in order; one write at a time
async fn write_loop(
    mut sender: SplitSink<WebSocket, Message>,
    mut rx: mpsc::Receiver<Outbound>,
    session_id: &SessionId,
    stop: &CancellationToken,
) {
    loop {
        let next = tokio::select! {
            _ = stop.cancelled() => break,
            next = rx.recv() => next,
        };
        let Some(outbound) = next else {
            break;
        };
        match outbound {
            Outbound::Text(payload) => {
                if let Err(e) = sender.send(Message::Text(payload.into())).await {
                    tracing::warn!(session_id = %session_id, error = %e, "WebSocket write error");
                    break;
                }
            }
            Outbound::Close => {
                if let Err(e) = sender.send(Message::Close(None)).await {
                    tracing::debug!(session_id = %session_id, error = %e, "Failed to send close frame");
                }
                break;
            }
        }
    }
}
