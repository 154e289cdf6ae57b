//! Interactive terminal renderer backed by indicatif.

use super::format;
use super::renderer::{BarSpec, LineStyle, Renderer};
use console::{style, Term};
use dialoguer::Select;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use tracing::warn;

/// indicatif positions are integers; fractional progress is kept to two places
const SCALE: f64 = 100.0;

/// Answers offered when a transfer error needs a decision
const RESPONSES: [&str; 2] = ["continue", "abort"];

fn to_units(value: f64) -> u64 {
    (value.max(0.0) * SCALE).round() as u64
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {percent:>3}% {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░")
}

/// Draws one bar at a time on stderr
pub struct TerminalRenderer {
    term: Term,
    bar: Option<ProgressBar>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            bar: None,
        }
    }

    fn write(&self, line: &str) {
        match &self.bar {
            Some(pb) => pb.suspend(|| self.term.write_line(line).ok()),
            None => self.term.write_line(line).ok(),
        };
    }

    fn ask(&self, error: &(dyn std::error::Error + 'static), context: &Value) -> dialoguer::Result<String> {
        self.term.write_line(&format!(
            "{} {}",
            style("Transfer error:").red().bold(),
            format::error_info(error)
        ))?;
        self.term
            .write_line(&style(format::pretty_context(context)).dim().to_string())?;

        let choice = Select::new()
            .with_prompt("How do you want to proceed?")
            .items(&RESPONSES)
            .default(0)
            .interact()?;
        Ok(RESPONSES[choice].to_string())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TerminalRenderer {
    fn open_bar(&mut self, bar: BarSpec<'_>) {
        self.close_bar();
        if let Some(before) = bar.before_message {
            self.write(before);
        }

        let pb = ProgressBar::new(to_units(bar.length));
        pb.set_style(bar_style());
        if let Some(message) = bar.init_message {
            pb.set_message(message.to_string());
        }
        pb.set_position(to_units(bar.start));
        self.bar = Some(pb);
    }

    fn close_bar(&mut self) {
        if let Some(pb) = self.bar.take() {
            pb.abandon();
        }
    }

    fn set_progress(&mut self, value: f64) {
        if let Some(pb) = &self.bar {
            pb.set_position(to_units(value));
        }
    }

    fn set_message(&mut self, text: &str) {
        if let Some(pb) = &self.bar {
            pb.set_message(text.to_string());
        }
    }

    fn print_line(&mut self, text: &str, line_style: LineStyle) {
        let line = match line_style {
            LineStyle::Plain => text.to_string(),
            LineStyle::Error => style(text).red().to_string(),
            LineStyle::Fatal => style(text).red().bold().reverse().to_string(),
        };
        self.write(&line);
    }

    fn prompt_for_error_response(
        &mut self,
        error: &(dyn std::error::Error + 'static),
        context: &Value,
    ) -> String {
        let answer = match &self.bar {
            Some(pb) => pb.suspend(|| self.ask(error, context)),
            None => self.ask(error, context),
        };
        answer.unwrap_or_else(|e| {
            warn!(error = %e, "Could not read an answer from the terminal; aborting");
            "abort".to_string()
        })
    }
}
