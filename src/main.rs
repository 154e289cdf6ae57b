//! # journal-transporter CLI
//!
//! Command-line interface for the journal transporter.
//!
//! ## Usage
//! ```bash
//! journal-transporter replay import.jsonl
//! journal-transporter --verbose --log error --on-error continue replay import.jsonl
//! ```

mod cli;

use journal_transporter::Result;

fn main() -> Result<()> {
    cli::run()
}
