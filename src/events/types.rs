//! Event type definitions for progress reporting.

use crate::error::{ServerResponseError, TransferError};
use crate::progress::{ErrorResponse, Renderer, Reporter, UpdateKind, DEFAULT_BAR_LENGTH};
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_length() -> f64 {
    DEFAULT_BAR_LENGTH
}

/// All events a transfer can emit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// A new top-level operation begins
    Major {
        message: String,
        #[serde(default = "default_length")]
        length: f64,
        #[serde(default)]
        debug_message: Option<String>,
    },
    /// A sub-operation begins
    Minor {
        #[serde(default)]
        progress: Option<f64>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default = "default_length")]
        length: f64,
        #[serde(default)]
        debug_message: Option<String>,
    },
    /// Progress within the current sub-operation
    Detail {
        #[serde(default)]
        progress: Option<f64>,
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        debug_message: Option<String>,
    },
    /// Diagnostic text
    Debug { message: String },
    /// A message to display as an error
    Error {
        message: String,
        #[serde(default)]
        fatal: bool,
    },
    /// A failed step that needs a continue/abort decision
    Failure {
        failure: Failure,
        #[serde(default)]
        context: Value,
    },
}

/// What went wrong in a failed step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Failure {
    /// The server answered with an error status
    ServerResponse {
        status: u16,
        reason: String,
        #[serde(default)]
        body: String,
    },
    /// Any other failure
    Message { message: String },
}

impl Failure {
    pub fn to_error(&self) -> TransferError {
        match self {
            Failure::ServerResponse {
                status,
                reason,
                body,
            } => TransferError::ServerResponse(ServerResponseError {
                status: *status,
                reason: reason.clone(),
                body: body.clone(),
            }),
            Failure::Message { message } => TransferError::Message(message.clone()),
        }
    }
}

impl ProgressEvent {
    /// The update kind this event maps to, if it is a progress update
    pub fn update_kind(&self) -> Option<UpdateKind> {
        match self {
            ProgressEvent::Major { .. } => Some(UpdateKind::Major),
            ProgressEvent::Minor { .. } => Some(UpdateKind::Minor),
            ProgressEvent::Detail { .. } => Some(UpdateKind::Detail),
            ProgressEvent::Debug { .. } => Some(UpdateKind::Debug),
            ProgressEvent::Error { .. } | ProgressEvent::Failure { .. } => None,
        }
    }

    /// Hand this event to `reporter`.
    ///
    /// Returns the reporter's answer for failures, `None` otherwise.
    pub fn dispatch<R: Renderer>(&self, reporter: &mut Reporter<R>) -> Option<ErrorResponse> {
        match self {
            ProgressEvent::Major {
                message,
                length,
                debug_message,
            } => reporter.major(message, *length, debug_message.as_deref()),
            ProgressEvent::Minor {
                progress,
                message,
                length,
                debug_message,
            } => reporter.minor(
                *progress,
                message.as_deref(),
                *length,
                debug_message.as_deref(),
            ),
            ProgressEvent::Detail {
                progress,
                message,
                debug_message,
            } => reporter.detail(*progress, message.as_deref(), debug_message.as_deref()),
            ProgressEvent::Debug { message } => reporter.debug(message),
            ProgressEvent::Error { message, fatal } => reporter.error(message, *fatal),
            ProgressEvent::Failure { failure, context } => {
                let error = failure.to_error();
                return Some(reporter.report_error(&error, context));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::{ErrorMode, RecordingRenderer, ReporterBuilder};
    use serde_json::json;

    #[test]
    fn events_deserialize_with_defaults() {
        let event: ProgressEvent =
            serde_json::from_str(r#"{"kind":"major","message":"Importing journals"}"#).unwrap();
        assert_eq!(
            event,
            ProgressEvent::Major {
                message: "Importing journals".to_string(),
                length: 100.0,
                debug_message: None,
            }
        );
    }

    #[test]
    fn failure_shapes_are_distinguished() {
        let server: Failure =
            serde_json::from_value(json!({"status": 500, "reason": "Internal Server Error"}))
                .unwrap();
        assert!(matches!(server, Failure::ServerResponse { status: 500, .. }));

        let plain: Failure = serde_json::from_value(json!({"message": "bad DOI"})).unwrap();
        assert!(matches!(plain.to_error(), TransferError::Message(m) if m == "bad DOI"));
    }

    #[test]
    fn failure_dispatch_returns_response() {
        let mut reporter = ReporterBuilder::new()
            .error_mode(ErrorMode::Abort)
            .build(RecordingRenderer::new())
            .unwrap();
        let event = ProgressEvent::Failure {
            failure: Failure::Message {
                message: "bad DOI".to_string(),
            },
            context: json!({"record": 1}),
        };

        assert_eq!(event.dispatch(&mut reporter), Some(ErrorResponse::Abort));
        assert_eq!(event.update_kind(), None);
    }

    #[test]
    fn progress_dispatch_returns_none() {
        let mut reporter = ReporterBuilder::new().build(RecordingRenderer::new()).unwrap();
        let event = ProgressEvent::Detail {
            progress: Some(2.0),
            message: None,
            debug_message: None,
        };
        assert_eq!(event.dispatch(&mut reporter), None);
        assert_eq!(reporter.renderer().last_progress(), Some(2.0));
    }
}
