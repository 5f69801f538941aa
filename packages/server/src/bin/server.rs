//! WebSocket broadcast relay server.
//!
//! Receives messages from clients, records them, and broadcasts them to all
//! other connected clients.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin dengon-server -- --port 1234 --log-file data.json
//! ```

use clap::Parser;
use dengon_server::ServerConfig;
use dengon_shared::logger::setup_logger;

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), &config.log_level);

    // Run the server
    if let Err(e) = dengon_server::run_server(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
