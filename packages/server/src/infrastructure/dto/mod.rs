//! Data transfer objects for the wire and the persisted log.

pub mod http;
pub mod websocket;
