//! JSON Lines file repository implementations.

mod message_log;

pub use message_log::JsonlMessageLog;
