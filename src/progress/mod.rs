//! # Progress Module
//!
//! Hierarchical progress reporting for transfers.
//!
//! ## Update kinds
//! - **Major** - a new top-level operation; opens the primary bar
//! - **Minor** - a sub-operation; folded into the primary bar, or given its own bar in verbose mode
//! - **Detail** - progress within the current sub-operation, weighted by its length
//! - **Debug** - diagnostic text, only shown in debug mode
//!
//! ## Renderers
//! - `TerminalRenderer` - indicatif bars and interactive error prompts
//! - `HeadlessRenderer` - log-only, for unattended runs
//! - `RecordingRenderer` - for testing

mod config;
mod format;
mod headless;
mod log_sink;
mod recording;
mod renderer;
mod reporter;
mod state;
mod terminal;

pub use config::{DisplayConfig, ErrorMode, ErrorResponse, LogMode, UpdateKind, DEFAULT_BAR_LENGTH};
pub use format::{error_info, error_record, now, pretty_context, timestamped};
pub use headless::HeadlessRenderer;
pub use log_sink::{FileLogSink, LogSink, MemoryLogSink};
pub use recording::{OpenedBar, RecordingRenderer, RenderCall};
pub use renderer::{BarSpec, LineStyle, Renderer};
pub use reporter::{default_log_path, Reporter, ReporterBuilder};
pub use state::ProgressState;
pub use terminal::TerminalRenderer;
