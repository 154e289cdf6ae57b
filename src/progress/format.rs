//! Timestamp and error-record formatting.

use crate::error::server_response;
use chrono::Local;
use serde_json::Value;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Current local time, e.g. `2024-03-01T12:30:05`
pub fn now() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Prefix `message` with the current timestamp
pub fn timestamped(message: &str) -> String {
    format!("{} -- {}", now(), message)
}

/// Describe an error for the log: full status, reason and body for server
/// responses, the display text for everything else.
pub fn error_info(error: &(dyn std::error::Error + 'static)) -> String {
    match server_response(error) {
        Some(response) => format!(
            "Server returned an error response: Status {} - {}\n{}",
            response.status, response.reason, response.body
        ),
        None => error.to_string(),
    }
}

/// Pretty-print error context
pub fn pretty_context(context: &Value) -> String {
    serde_json::to_string_pretty(context).unwrap_or_else(|_| context.to_string())
}

/// Full error record as written to the log sink
pub fn error_record(error: &(dyn std::error::Error + 'static), context: &Value) -> String {
    format!("{}\n{}", error_info(error), pretty_context(context))
}
