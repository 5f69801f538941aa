//! Logger setup shared by Dengon binaries.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise `default_level` applies to the
/// binary's own crate and `warn` to everything else.
///
/// # Arguments
///
/// * `bin_name` - binary name (usually `env!("CARGO_BIN_NAME")`)
/// * `default_level` - level used when `RUST_LOG` is unset or invalid
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(bin_name, default_level)));

    // Ignore the error when a subscriber is already installed (e.g. in tests)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init();
}

fn default_directive(bin_name: &str, default_level: &str) -> String {
    let crate_name = bin_name.replace('-', "_");
    format!("warn,{crate_name}={default_level},tower_http={default_level}")
}
