//! Progress scripts: JSON Lines files of events.

use super::ProgressEvent;
use crate::error::{ReporterError, Result};
use crate::progress::{ErrorResponse, Renderer, Reporter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of replaying a script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Number of events dispatched
    pub events: usize,
    /// Number of failures handed to the error mediator
    pub errors_reported: usize,
    /// True if a failure was answered with "abort"
    pub aborted: bool,
}

/// An ordered list of events read from a file
#[derive(Debug, Clone)]
pub struct ProgressScript {
    path: PathBuf,
    events: Vec<ProgressEvent>,
}

impl ProgressScript {
    /// Read and parse a script file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::parse(path, &content)
    }

    /// Parse script text. Blank lines and lines starting with `#` are skipped.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        let mut events = Vec::new();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let event = serde_json::from_str(line).map_err(|source| ReporterError::Script {
                path: path.clone(),
                line: index + 1,
                source,
            })?;
            events.push(event);
        }

        debug!(path = %path.display(), events = events.len(), "Loaded progress script");
        Ok(Self { path, events })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn events(&self) -> &[ProgressEvent] {
        &self.events
    }

    /// Dispatch every event in order, stopping at the first abort
    pub fn replay<R: Renderer>(&self, reporter: &mut Reporter<R>) -> ReplaySummary {
        let mut summary = ReplaySummary::default();

        for event in &self.events {
            summary.events += 1;
            if let Some(response) = event.dispatch(reporter) {
                summary.errors_reported += 1;
                if response == ErrorResponse::Abort {
                    info!(event = summary.events, "Replay aborted");
                    summary.aborted = true;
                    break;
                }
            }
        }

        reporter.clean_up();
        summary
    }
}
