//! # Error Module
//!
//! Error types for the journal transporter.
//!
//! ## Design Principles
//! - **Fail fast on bad configuration** - an unknown mode token is rejected at construction
//! - **Never interrupt progress** - log-sink failures are recorded, not raised
//! - **Keep server detail** - status, reason and body survive until they are logged

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the reporter and the command-line layer
#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("Unrecognized log mode '{0}' (expected none, error or debug)")]
    InvalidLogMode(String),

    #[error("Unrecognized error mode '{0}' (expected interactive, continue or abort)")]
    InvalidErrorMode(String),

    #[error("Logging was requested but no log file could be determined. Pass --log-file.")]
    MissingLogFile,

    #[error("Invalid progress script {path} at line {line}: {source}")]
    Script {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Transfer aborted: {0}")]
    Aborted(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A non-success answer from a journal server
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("HTTP {status}: {reason}")]
pub struct ServerResponseError {
    /// HTTP status code
    pub status: u16,
    /// Reason phrase sent with the status
    pub reason: String,
    /// Raw response body
    pub body: String,
}

/// Errors surfaced by a transfer and handed to `Reporter::report_error`
#[derive(Error, Debug)]
pub enum TransferError {
    #[error(transparent)]
    ServerResponse(#[from] ServerResponseError),

    #[error("{0}")]
    Message(String),
}

/// Find a server-response payload on `error` or anywhere in its source chain.
pub fn server_response<'a>(
    error: &'a (dyn std::error::Error + 'static),
) -> Option<&'a ServerResponseError> {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(response) = err.downcast_ref::<ServerResponseError>() {
            return Some(response);
        }
        if let Some(TransferError::ServerResponse(response)) = err.downcast_ref::<TransferError>() {
            return Some(response);
        }
        current = err.source();
    }
    None
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, ReporterError>;
