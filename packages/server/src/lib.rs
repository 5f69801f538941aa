//! WebSocket broadcast relay library.
//!
//! Every connected party sends `{who, time, what}` messages. The server
//! appends each one to a JSON Lines log and forwards the received payload,
//! unchanged, to every other connected party. A newly joined party first
//! receives the whole log as a JSON array.

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use error::ServerError;
pub use ui::run as run_server;
