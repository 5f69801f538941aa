//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

// Re-export HTTP handlers
pub use http::{get_messages, get_sessions, health_check};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;
