//! Position, length and message of the active bar.

use super::config::DEFAULT_BAR_LENGTH;

/// Mutable progress state owned by a single reporter.
///
/// `subtask_length` is `Some` only while a minor scope is active on the
/// primary bar; a major update always clears it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressState {
    current_progress: f64,
    bar_length: f64,
    subtask_length: Option<f64>,
    current_message: Option<String>,
    /// Position at which the active minor scope started
    scope_base: f64,
    bar_open: bool,
}

impl ProgressState {
    pub fn new(start: f64, init_message: Option<String>) -> Self {
        Self {
            current_progress: start,
            bar_length: DEFAULT_BAR_LENGTH,
            subtask_length: None,
            current_message: init_message,
            scope_base: start,
            bar_open: false,
        }
    }

    pub fn current_progress(&self) -> f64 {
        self.current_progress
    }

    pub fn bar_length(&self) -> f64 {
        self.bar_length
    }

    pub fn subtask_length(&self) -> Option<f64> {
        self.subtask_length
    }

    pub fn current_message(&self) -> Option<&str> {
        self.current_message.as_deref()
    }

    pub fn is_bar_open(&self) -> bool {
        self.bar_open
    }

    /// A new bar replaces the old one; its scope starts at `start`.
    pub fn open_bar(&mut self, length: f64, start: f64) {
        self.bar_length = length;
        self.bar_open = true;
        self.current_progress = self.clamp(start);
        self.scope_base = self.current_progress;
    }

    pub fn close_bar(&mut self) {
        self.bar_open = false;
    }

    pub fn clear_subtask(&mut self) {
        self.subtask_length = None;
    }

    /// Enter a minor scope on the primary bar.
    pub fn begin_subtask(&mut self, length: f64, progress: Option<f64>) {
        self.subtask_length = Some(length);
        if let Some(progress) = progress {
            self.current_progress = self.clamp(progress);
        }
        self.scope_base = self.current_progress;
    }

    /// Apply cumulative detail progress within the active scope.
    ///
    /// With a nonzero subtask length the raw count is weighted into
    /// primary-bar units; otherwise it is applied as-is.
    pub fn apply_detail(&mut self, progress: f64) {
        let advance = match self.subtask_length {
            Some(length) if length != 0.0 => progress / length,
            _ => progress,
        };
        self.current_progress = self.clamp(self.scope_base + advance);
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.current_message = Some(message.into());
    }

    fn clamp(&self, value: f64) -> f64 {
        value.clamp(0.0, self.bar_length.max(0.0))
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new(0.0, None)
    }
}
