//! WebSocket relay server: router, handlers and the accept loop.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{create_router, run, serve};
pub use signal::shutdown_signal;
