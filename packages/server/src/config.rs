//! Command line configuration.

use std::{path::PathBuf, time::Duration};

use clap::Parser;

/// WebSocket broadcast relay with a persisted backlog
#[derive(Debug, Clone, Parser)]
#[command(name = "dengon-server", version, about)]
pub struct ServerConfig {
    /// Interface to listen on
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 1234)]
    pub port: u16,

    /// Message log file (one JSON object per line)
    #[arg(long, default_value = "data.json")]
    pub log_file: PathBuf,

    /// Seconds to wait for sessions to close on shutdown
    #[arg(long, default_value_t = 5)]
    pub shutdown_timeout_secs: u64,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "debug")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}
