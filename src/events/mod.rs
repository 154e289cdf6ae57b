//! # Events Module
//!
//! Serializable progress events, the producer side of the reporter.
//!
//! ## Design
//! A transfer emits events in call order; each one maps onto a single
//! reporter operation. Scripts of events (JSON Lines) can be replayed
//! against any renderer, which is how the CLI exercises the reporter
//! without a live server.
//!
//! ## Example
//! ```rust,ignore
//! let script = ProgressScript::load("import.jsonl")?;
//! let mut reporter = ReporterBuilder::new().build(TerminalRenderer::new())?;
//! let summary = script.replay(&mut reporter);
//! println!("{} events, aborted: {}", summary.events, summary.aborted);
//! ```

mod script;
mod types;

pub use script::{ProgressScript, ReplaySummary};
pub use types::*;
