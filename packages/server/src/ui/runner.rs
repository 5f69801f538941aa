//! Server runner: binds the listener and drives the accept loop.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    error::ServerError,
    infrastructure::repository::JsonlMessageLog,
    ui::{
        handler::{get_messages, get_sessions, health_check, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
};

/// How often shutdown re-sends Close to sessions that registered late
const CLOSE_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Build the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(websocket_handler))
        .route("/ws", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/messages", get(get_messages))
        .route("/api/sessions", get(get_sessions))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to the configured address and serve until a shutdown signal arrives
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let addr = config.bind_address();
    let listener = TcpListener::bind(addr.as_str())
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;

    let message_log = Arc::new(JsonlMessageLog::new(&config.log_file));
    let state = Arc::new(AppState::new(message_log));

    let local_addr = listener.local_addr().map_err(ServerError::Serve)?;
    tracing::info!(
        addr = %local_addr,
        log_file = %config.log_file.display(),
        "Relay listening"
    );

    serve(listener, state, shutdown_signal(), config.shutdown_timeout()).await
}

/// Serve on an already bound listener.
///
/// When `shutdown` resolves, every live session is asked to close. Once the
/// listener has stopped, the session tasks are awaited for at most
/// `shutdown_timeout`.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
    shutdown_timeout: Duration,
) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state.clone());

    let closing_state = state.clone();
    let shutdown = async move {
        shutdown.await;
        let closing = closing_state.registry.close_all().await;
        tracing::info!(sessions = closing, "Closing sessions");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ServerError::Serve)?;

    state.sessions.close();
    if !drain_sessions(&state, shutdown_timeout).await {
        tracing::warn!(
            remaining = state.sessions.len(),
            "Timed out waiting for sessions to close"
        );
    }

    tracing::info!("Server stopped");
    Ok(())
}

/// Wait for every tracked session task to finish.
///
/// Sessions that were still upgrading when the first close went out register
/// afterwards, so the close request is repeated until the tracker is empty.
/// Returns `false` if `timeout` elapsed first.
async fn drain_sessions(state: &AppState, timeout: Duration) -> bool {
    let drain = async {
        loop {
            state.registry.close_all().await;
            tokio::select! {
                _ = state.sessions.wait() => break,
                _ = tokio::time::sleep(CLOSE_RETRY_INTERVAL) => {}
            }
        }
    };
    tokio::time::timeout(timeout, drain).await.is_ok()
}
