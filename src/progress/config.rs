//! Reporter configuration and the kinds of update it understands.

use crate::error::ReporterError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Default length of a freshly opened bar
pub const DEFAULT_BAR_LENGTH: f64 = 100.0;

/// The kind of a progress update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateKind {
    /// A new top-level operation begins
    Major,
    /// A sub-operation of the current major operation begins
    Minor,
    /// Incremental progress within the current sub-operation
    Detail,
    /// Free-form diagnostic text, never rendered as a bar
    Debug,
}

/// What the reporter persists to its log sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogMode {
    #[default]
    None,
    Error,
    Debug,
}

impl FromStr for LogMode {
    type Err = ReporterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "none" => Ok(LogMode::None),
            "e" | "error" => Ok(LogMode::Error),
            "d" | "debug" => Ok(LogMode::Debug),
            _ => Err(ReporterError::InvalidLogMode(s.to_string())),
        }
    }
}

impl fmt::Display for LogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogMode::None => write!(f, "none"),
            LogMode::Error => write!(f, "error"),
            LogMode::Debug => write!(f, "debug"),
        }
    }
}

/// How a reported error is escalated
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Ask the user
    #[default]
    Interactive,
    /// Always answer "continue"
    Continue,
    /// Always answer "abort"
    Abort,
}

impl FromStr for ErrorMode {
    type Err = ReporterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "i" | "interactive" => Ok(ErrorMode::Interactive),
            "c" | "continue" => Ok(ErrorMode::Continue),
            "a" | "abort" => Ok(ErrorMode::Abort),
            _ => Err(ReporterError::InvalidErrorMode(s.to_string())),
        }
    }
}

impl fmt::Display for ErrorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorMode::Interactive => write!(f, "interactive"),
            ErrorMode::Continue => write!(f, "continue"),
            ErrorMode::Abort => write!(f, "abort"),
        }
    }
}

/// Display configuration, fixed once the reporter is built
#[derive(Debug, Clone, Default)]
pub struct DisplayConfig {
    /// Render every sub-operation as its own bar
    pub verbose: bool,
    /// Disable all bars and print timestamped text instead
    pub debug_mode: bool,
    /// What gets persisted to the log file
    pub log_mode: LogMode,
    /// How reported errors are escalated
    pub error_mode: ErrorMode,
    /// Message shown before the first event
    pub init_message: Option<String>,
    /// Initial progress value
    pub start: f64,
    /// Log file path; required when `log_mode` is not `None`
    pub log_file: Option<PathBuf>,
}

/// The caller-visible answer to a reported error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorResponse {
    Continue,
    Abort,
    /// Any other answer an interactive renderer produced
    Other(String),
}

impl ErrorResponse {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorResponse::Continue => "continue",
            ErrorResponse::Abort => "abort",
            ErrorResponse::Other(s) => s,
        }
    }
}

impl From<String> for ErrorResponse {
    fn from(s: String) -> Self {
        match s.as_str() {
            "continue" => ErrorResponse::Continue,
            "abort" => ErrorResponse::Abort,
            _ => ErrorResponse::Other(s),
        }
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
