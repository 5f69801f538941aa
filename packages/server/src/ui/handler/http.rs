//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    infrastructure::dto::{http::SessionCountDto, websocket::MessageRecord},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get the logged messages in append order (empty if the log does not exist yet)
pub async fn get_messages(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MessageRecord>>, StatusCode> {
    let backlog = state.message_log.read_all().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to read message log");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let records = backlog
        .into_messages()
        .iter()
        .map(MessageRecord::from)
        .collect();

    Ok(Json(records))
}

/// Get the number of live sessions
pub async fn get_sessions(State(state): State<Arc<AppState>>) -> Json<SessionCountDto> {
    Json(SessionCountDto {
        count: state.registry.len().await,
    })
}
