use chrono::Local;

/// Timestamp format used on the wire, e.g. `2024-05-01T09:30:00`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Get the current local time formatted with [`TIMESTAMP_FORMAT`]
pub fn current_local_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
