//! # CLI Module
//!
//! Command-line interface for the journal transporter.
//!
//! ## Usage
//! ```bash
//! # Replay a recorded transfer with progress bars
//! journal-transporter replay import.jsonl
//!
//! # One bar per sub-operation
//! journal-transporter --verbose replay import.jsonl
//!
//! # Timestamped text instead of bars, never stop on errors
//! journal-transporter --debug --on-error continue replay import.jsonl
//!
//! # Keep an audit log of errors
//! journal-transporter --log error --log-file transfer.log replay import.jsonl
//! ```

use clap::{Parser, Subcommand};
use console::{style, Term};
use journal_transporter::error::{ReporterError, Result};
use journal_transporter::events::{ProgressScript, ReplaySummary};
use journal_transporter::progress::{
    DisplayConfig, ErrorMode, HeadlessRenderer, LogMode, Renderer, ReporterBuilder,
    TerminalRenderer,
};
use std::path::PathBuf;

/// Journal Transporter - Move journal content between servers
#[derive(Parser, Debug)]
#[command(name = "journal-transporter")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Render every sub-operation as its own bar
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable bars and print timestamped debug text
    #[arg(short, long, global = true)]
    debug: bool,

    /// What to write to the log file: none, error or debug
    #[arg(long, default_value = "none", global = true)]
    log: LogMode,

    /// Log file path (defaults to the user data directory)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// How to handle transfer errors: interactive, continue or abort
    #[arg(long, default_value = "interactive", global = true)]
    on_error: ErrorMode,

    /// Never draw bars or prompt; send output to the log instead
    #[arg(long, global = true)]
    headless: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a recorded progress script (JSON Lines, one event per line)
    Replay {
        /// Script to replay
        script: PathBuf,
    },
}

impl Cli {
    fn display_config(&self) -> DisplayConfig {
        DisplayConfig {
            verbose: self.verbose,
            debug_mode: self.debug,
            log_mode: self.log,
            error_mode: self.on_error,
            init_message: None,
            start: 0.0,
            log_file: self.log_file.clone(),
        }
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    journal_transporter::init_tracing();

    let config = cli.display_config();
    let renderer: Box<dyn Renderer> = if cli.headless {
        Box::new(HeadlessRenderer::new())
    } else {
        Box::new(TerminalRenderer::new())
    };

    match cli.command {
        Commands::Replay { script } => run_replay(config, renderer, script),
    }
}

fn run_replay(config: DisplayConfig, renderer: Box<dyn Renderer>, path: PathBuf) -> Result<()> {
    let script = ProgressScript::load(&path)?;
    let mut reporter = ReporterBuilder::new().config(config).build(renderer)?;

    let summary = script.replay(&mut reporter);

    if let Some(log_file) = reporter.log_file() {
        tracing::info!(path = %log_file.display(), degraded = reporter.log_degraded(), "Audit log");
    }
    drop(reporter);

    print_summary(&Term::stderr(), &summary);

    if summary.aborted {
        return Err(ReporterError::Aborted(format!(
            "stopped after {} of {} events",
            summary.events,
            script.events().len()
        )));
    }
    Ok(())
}

fn print_summary(term: &Term, summary: &ReplaySummary) {
    term.write_line("").ok();
    let marker = if summary.aborted {
        style("✗").red().bold()
    } else {
        style("✓").green().bold()
    };
    term.write_line(&format!(
        "{} {} events replayed, {} errors reported",
        marker,
        style(summary.events).cyan(),
        style(summary.errors_reported).yellow()
    ))
    .ok();
}
