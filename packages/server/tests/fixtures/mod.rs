//! Test fixtures: an in-process relay server and WebSocket client helpers.

#![allow(dead_code)]

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use dengon_server::{
    ServerError,
    infrastructure::repository::JsonlMessageLog,
    ui::{serve, state::AppState},
};
use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, sync::oneshot, task::JoinHandle};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for a payload that should arrive
pub const RECV_TIMEOUT: Duration = Duration::from_secs(5);

/// Relay server running on an ephemeral port with its own log file
pub struct TestServer {
    addr: SocketAddr,
    log_path: PathBuf,
    state: Arc<AppState>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<Result<(), ServerError>>>,
    _dir: tempfile::TempDir,
}

impl TestServer {
    /// Start a server whose log file does not exist yet
    pub async fn start() -> Self {
        Self::start_with_log(None).await
    }

    /// Start a server, optionally pre-populating the log file
    pub async fn start_with_log(contents: Option<&str>) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let log_path = dir.path().join("data.json");
        if let Some(contents) = contents {
            std::fs::write(&log_path, contents).expect("Failed to write log file");
        }

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get local addr");
        let state = Arc::new(AppState::new(Arc::new(JsonlMessageLog::new(&log_path))));

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(serve(
            listener,
            state.clone(),
            async move {
                let _ = shutdown_rx.await;
            },
            Duration::from_secs(2),
        ));

        Self {
            addr,
            log_path,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
            _dir: dir,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    pub fn log_path(&self) -> &PathBuf {
        &self.log_path
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Connect a client and return it with its first payload (the backlog)
    pub async fn connect(&self) -> (WsClient, String) {
        let (mut ws, _) = connect_async(self.ws_url())
            .await
            .expect("Failed to connect");
        let backlog = recv_text(&mut ws).await;
        (ws, backlog)
    }

    /// Wait until the registry holds exactly `count` sessions
    pub async fn wait_for_sessions(&self, count: usize) {
        tokio::time::timeout(RECV_TIMEOUT, async {
            while self.state.registry.len().await != count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("Registry never reached {count} sessions"));
    }

    /// Trigger a graceful shutdown and wait for the server to stop
    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        let handle = self.handle.take().expect("Server already stopped");
        tokio::time::timeout(Duration::from_secs(10), handle)
            .await
            .expect("Server did not stop in time")
            .expect("Server task panicked")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Receive the next text payload, skipping control frames
pub async fn recv_text(ws: &mut WsClient) -> String {
    tokio::time::timeout(RECV_TIMEOUT, async {
        loop {
            match ws.next().await {
                Some(Ok(Message::Text(text))) => return text.to_string(),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => continue,
                other => panic!("Expected a text payload, got {other:?}"),
            }
        }
    })
    .await
    .expect("Timed out waiting for a text payload")
}

/// Assert that no text payload arrives within `wait`
pub async fn assert_no_text(ws: &mut WsClient, wait: Duration) {
    if let Ok(Some(Ok(Message::Text(text)))) = tokio::time::timeout(wait, ws.next()).await {
        panic!("Unexpected payload: {text}");
    }
}

pub async fn send_text(ws: &mut WsClient, payload: &str) {
    ws.send(Message::text(payload))
        .await
        .expect("Failed to send payload");
}

/// A `{who, time, what}` payload
pub fn chat_payload(who: &str, time: &str, what: &str) -> String {
    serde_json::json!({"who": who, "time": time, "what": what}).to_string()
}
