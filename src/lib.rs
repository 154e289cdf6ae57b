//! # Journal Transporter
//!
//! Moves journal content between hosting servers and keeps the user
//! informed while it does.
//!
//! ## Core Philosophy
//! - **Show where you are** - nested progress for operations, sub-operations and details
//! - **Let the user decide** - errors are asked about, continued past, or abort the run
//! - **Leave a trail** - optional audit log of errors or every event
//!
//! ## Architecture
//! - `progress` - The reporter engine and its renderers
//! - `events` - Serializable progress events and replayable scripts
//! - `error` - Typed error definitions

pub mod error;
pub mod events;
pub mod progress;

// Re-export commonly used types at the crate root
pub use error::{ReporterError, Result};

/// Initialize tracing for the library
///
/// This should be called by the application entry point. Output goes to
/// stderr and is filtered by `RUST_LOG`. A second call has no effect.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}
