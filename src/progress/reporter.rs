//! The reporter: event dispatch, progress state and error mediation.

use super::config::{DisplayConfig, ErrorMode, ErrorResponse, LogMode, UpdateKind, DEFAULT_BAR_LENGTH};
use super::format;
use super::log_sink::{FileLogSink, LogSink};
use super::renderer::{BarSpec, LineStyle, Renderer};
use super::state::ProgressState;
use crate::error::{ReporterError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Default audit log location when logging is enabled without a path
pub fn default_log_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("journal-transporter").join("transporter.log"))
}

/// A progress value of zero counts as "not provided".
fn provided(progress: Option<f64>) -> Option<f64> {
    progress.filter(|p| *p != 0.0)
}

/// Builder for reporter configuration
pub struct ReporterBuilder {
    config: DisplayConfig,
    log_sink: Option<Box<dyn LogSink>>,
}

impl ReporterBuilder {
    /// Create a new reporter builder
    pub fn new() -> Self {
        Self {
            config: DisplayConfig::default(),
            log_sink: None,
        }
    }

    /// Start from a complete configuration
    pub fn config(mut self, config: DisplayConfig) -> Self {
        self.config = config;
        self
    }

    /// Give every sub-operation its own bar
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Replace bars with timestamped text
    pub fn debug_mode(mut self, debug_mode: bool) -> Self {
        self.config.debug_mode = debug_mode;
        self
    }

    /// Set what gets persisted
    pub fn log_mode(mut self, log_mode: LogMode) -> Self {
        self.config.log_mode = log_mode;
        self
    }

    /// Set how errors are escalated
    pub fn error_mode(mut self, error_mode: ErrorMode) -> Self {
        self.config.error_mode = error_mode;
        self
    }

    /// Message shown before the first event
    pub fn init_message(mut self, message: impl Into<String>) -> Self {
        self.config.init_message = Some(message.into());
        self
    }

    /// Initial progress value
    pub fn start(mut self, start: f64) -> Self {
        self.config.start = start;
        self
    }

    /// Write the log to this file
    pub fn log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.log_file = Some(path.into());
        self
    }

    /// Use a custom log sink instead of a file
    pub fn log_sink(mut self, sink: Box<dyn LogSink>) -> Self {
        self.log_sink = Some(sink);
        self
    }

    /// Build the reporter around a rendering surface
    pub fn build<R: Renderer>(self, renderer: R) -> Result<Reporter<R>> {
        let Self { mut config, log_sink } = self;

        let log = match config.log_mode {
            LogMode::None => None,
            LogMode::Error | LogMode::Debug => match log_sink {
                Some(sink) => Some(sink),
                None => {
                    let path = config
                        .log_file
                        .clone()
                        .or_else(default_log_path)
                        .ok_or(ReporterError::MissingLogFile)?;
                    config.log_file = Some(path.clone());
                    Some(Box::new(FileLogSink::new(path)) as Box<dyn LogSink>)
                }
            },
        };

        let state = ProgressState::new(config.start, config.init_message.clone());

        Ok(Reporter {
            config,
            state,
            renderer,
            log,
            log_degraded: false,
        })
    }
}

impl Default for ReporterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns progress events into renderer calls.
///
/// One reporter exists per run. It is not designed for concurrent writers;
/// a caller that shares it across threads must hold a single `Mutex`
/// around every call. Dropping the reporter closes any open bar.
pub struct Reporter<R: Renderer> {
    config: DisplayConfig,
    state: ProgressState,
    renderer: R,
    log: Option<Box<dyn LogSink>>,
    log_degraded: bool,
}

impl<R: Renderer> Reporter<R> {
    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Path of the audit log, if one is configured
    pub fn log_file(&self) -> Option<&Path> {
        self.log.as_ref().and(self.config.log_file.as_deref())
    }

    /// True once a log write has failed
    pub fn log_degraded(&self) -> bool {
        self.log_degraded
    }

    /// Dispatch one progress event.
    ///
    /// `length` only matters when the event opens a bar. In debug mode
    /// `debug_message` is preferred over `message`.
    pub fn update(
        &mut self,
        kind: UpdateKind,
        progress: Option<f64>,
        message: Option<&str>,
        length: f64,
        debug_message: Option<&str>,
    ) {
        trace!(?kind, ?progress, text = ?message, length, "progress update");

        if self.config.debug_mode {
            let text = debug_message
                .filter(|t| !t.is_empty())
                .or(message.filter(|t| !t.is_empty()));
            if let Some(text) = text {
                self.renderer
                    .print_line(&format::timestamped(text), LineStyle::Plain);
            }
            return;
        }

        match kind {
            UpdateKind::Debug => {}
            UpdateKind::Major => self.handle_major(progress, message, length),
            UpdateKind::Minor => self.handle_minor(progress, message, length),
            UpdateKind::Detail => self.handle_detail(progress, message),
        }

        if self.config.log_mode == LogMode::Debug {
            if let Some(text) = debug_message.or(message) {
                self.write_log(text);
            }
        }
    }

    /// A new top-level operation begins
    pub fn major(&mut self, message: &str, length: f64, debug_message: Option<&str>) {
        self.update(UpdateKind::Major, None, Some(message), length, debug_message)
    }

    /// A sub-operation begins; `progress` is its absolute position on the primary bar
    pub fn minor(
        &mut self,
        progress: Option<f64>,
        message: Option<&str>,
        length: f64,
        debug_message: Option<&str>,
    ) {
        self.update(UpdateKind::Minor, progress, message, length, debug_message)
    }

    /// Progress within the current sub-operation
    pub fn detail(&mut self, progress: Option<f64>, message: Option<&str>, debug_message: Option<&str>) {
        self.update(
            UpdateKind::Detail,
            progress,
            message,
            DEFAULT_BAR_LENGTH,
            debug_message,
        )
    }

    /// Diagnostic text, shown only in debug mode
    pub fn debug(&mut self, message: &str) {
        self.update(UpdateKind::Debug, None, None, DEFAULT_BAR_LENGTH, Some(message))
    }

    /// Decide how the caller should react to `error`.
    ///
    /// Never fails on its own account; acting on the answer is up to the caller.
    pub fn report_error(
        &mut self,
        error: &(dyn std::error::Error + 'static),
        context: &Value,
    ) -> ErrorResponse {
        let response = match self.config.error_mode {
            ErrorMode::Continue => ErrorResponse::Continue,
            ErrorMode::Abort => ErrorResponse::Abort,
            ErrorMode::Interactive => {
                ErrorResponse::from(self.renderer.prompt_for_error_response(error, context))
            }
        };

        if self.config.log_mode == LogMode::Error {
            self.write_log(&format::error_record(error, context));
        }

        trace!(%error, %response, "error reported");
        response
    }

    /// Show an error message. Display only: nothing is raised and nothing stops.
    pub fn error(&mut self, message: &str, fatal: bool) {
        self.close_bar();
        let style = if fatal { LineStyle::Fatal } else { LineStyle::Error };
        self.renderer.print_line(message, style);
    }

    /// Close any open bar so the terminal is left in a sane state
    pub fn clean_up(&mut self) {
        self.close_bar();
    }

    fn handle_major(&mut self, progress: Option<f64>, message: Option<&str>, length: f64) {
        if self.config.verbose {
            // Bars for this operation come from the minor updates
            if let Some(message) = message {
                self.renderer.print_line(message, LineStyle::Plain);
            }
            return;
        }

        self.state.clear_subtask();
        if let Some(message) = message {
            self.state.set_message(message);
        }
        let start = provided(progress).unwrap_or(0.0);
        self.open_bar(BarSpec {
            length,
            before_message: None,
            init_message: message,
            start,
        });
    }

    fn handle_minor(&mut self, progress: Option<f64>, message: Option<&str>, length: f64) {
        let message = message.filter(|m| !m.is_empty());
        if self.config.verbose {
            if let Some(message) = message {
                self.state.set_message(message);
            }
            self.open_bar(BarSpec {
                length,
                before_message: message,
                init_message: None,
                start: 0.0,
            });
            return;
        }

        self.state.begin_subtask(length, provided(progress));
        if let Some(message) = message {
            self.state.set_message(message);
        }
        self.push();
    }

    fn handle_detail(&mut self, progress: Option<f64>, message: Option<&str>) {
        if let Some(progress) = provided(progress) {
            self.state.apply_detail(progress);
        }
        if self.config.verbose {
            if let Some(message) = message.filter(|m| !m.is_empty()) {
                self.state.set_message(message);
            }
        }
        self.push();
    }

    fn open_bar(&mut self, bar: BarSpec<'_>) {
        self.state.open_bar(bar.length, bar.start);
        self.renderer.open_bar(bar);
    }

    fn close_bar(&mut self) {
        if self.state.is_bar_open() {
            self.renderer.close_bar();
            self.state.close_bar();
        }
    }

    /// Send the current position and label to the renderer
    fn push(&mut self) {
        self.renderer.set_progress(self.state.current_progress());
        if let Some(message) = self.state.current_message() {
            self.renderer.set_message(message);
        }
    }

    fn write_log(&mut self, message: &str) {
        if message.is_empty() {
            return;
        }
        let Some(sink) = self.log.as_mut() else {
            return;
        };
        if let Err(e) = sink.append(&format::timestamped(message)) {
            if !self.log_degraded {
                warn!(error = %e, "Log write failed; continuing without audit log entries");
            }
            self.log_degraded = true;
        }
    }
}

impl<R: Renderer> Drop for Reporter<R> {
    fn drop(&mut self) {
        self.clean_up();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransferError;
    use crate::progress::log_sink::MemoryLogSink;
    use crate::progress::recording::{OpenedBar, RecordingRenderer, RenderCall};
    use serde_json::json;
    use std::cell::RefCell;
    use std::io;
    use std::rc::Rc;

    struct BrokenSink;

    impl LogSink for BrokenSink {
        fn append(&mut self, _line: &str) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
    }

    /// Keeps its call log after the reporter that owns it is dropped
    #[derive(Default)]
    struct SharedLogRenderer {
        calls: Rc<RefCell<Vec<RenderCall>>>,
    }

    impl Renderer for SharedLogRenderer {
        fn open_bar(&mut self, bar: BarSpec<'_>) {
            self.calls.borrow_mut().push(RenderCall::OpenBar(OpenedBar {
                length: bar.length,
                before_message: bar.before_message.map(str::to_string),
                init_message: bar.init_message.map(str::to_string),
                start: bar.start,
            }));
        }

        fn close_bar(&mut self) {
            self.calls.borrow_mut().push(RenderCall::CloseBar);
        }

        fn set_progress(&mut self, value: f64) {
            self.calls.borrow_mut().push(RenderCall::SetProgress(value));
        }

        fn set_message(&mut self, text: &str) {
            self.calls
                .borrow_mut()
                .push(RenderCall::SetMessage(text.to_string()));
        }

        fn print_line(&mut self, text: &str, style: LineStyle) {
            self.calls.borrow_mut().push(RenderCall::PrintLine {
                text: text.to_string(),
                style,
            });
        }

        fn prompt_for_error_response(
            &mut self,
            _error: &(dyn std::error::Error + 'static),
            _context: &Value,
        ) -> String {
            "continue".to_string()
        }
    }

    fn reporter() -> Reporter<RecordingRenderer> {
        ReporterBuilder::new()
            .error_mode(ErrorMode::Continue)
            .build(RecordingRenderer::new())
            .unwrap()
    }

    #[test]
    fn major_opens_one_bar_with_message() {
        let mut reporter = reporter();
        reporter.major("Importing journals", 4.0, None);

        let opened = reporter.renderer().opened_bars();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].length, 4.0);
        assert_eq!(opened[0].init_message.as_deref(), Some("Importing journals"));
        assert_eq!(reporter.state().current_message(), Some("Importing journals"));
        assert_eq!(reporter.state().bar_length(), 4.0);
    }

    #[test]
    fn major_resets_subtask() {
        let mut reporter = reporter();
        reporter.major("Journals", 10.0, None);
        reporter.minor(None, None, 5.0, None);
        assert_eq!(reporter.state().subtask_length(), Some(5.0));

        reporter.major("Issues", 10.0, None);
        assert_eq!(reporter.state().subtask_length(), None);

        reporter.detail(Some(2.0), None, None);
        assert_eq!(reporter.renderer().last_progress(), Some(2.0));
    }

    #[test]
    fn minor_progress_is_absolute_on_primary_bar() {
        let mut reporter = reporter();
        reporter.major("Journals", 10.0, None);
        reporter.minor(Some(3.0), Some("Journal 4"), 2.0, None);
        assert_eq!(reporter.renderer().last_progress(), Some(3.0));
        assert_eq!(reporter.renderer().last_message(), Some("Journal 4"));

        reporter.detail(Some(1.0), None, None);
        assert_eq!(reporter.renderer().last_progress(), Some(3.5));
    }

    #[test]
    fn non_verbose_detail_keeps_message() {
        let mut reporter = reporter();
        reporter.major("Journals", 10.0, None);
        reporter.detail(Some(1.0), Some("Issue 12"), None);
        assert_eq!(reporter.state().current_message(), Some("Journals"));
    }

    #[test]
    fn zero_progress_is_not_an_update() {
        let mut reporter = reporter();
        reporter.major("Journals", 10.0, None);
        reporter.minor(Some(4.0), None, 2.0, None);
        reporter.minor(Some(0.0), None, 2.0, None);
        assert_eq!(reporter.state().current_progress(), 4.0);
        reporter.detail(Some(0.0), None, None);
        assert_eq!(reporter.state().current_progress(), 4.0);
    }

    #[test]
    fn verbose_major_prints_without_bar() {
        let mut reporter = ReporterBuilder::new()
            .verbose(true)
            .build(RecordingRenderer::new())
            .unwrap();
        reporter.major("Importing journals", 3.0, None);

        assert!(reporter.renderer().opened_bars().is_empty());
        assert_eq!(
            reporter.renderer().printed_lines(),
            vec!["Importing journals".to_string()]
        );
    }

    #[test]
    fn verbose_minor_opens_nested_bar_and_detail_updates_label() {
        let mut reporter = ReporterBuilder::new()
            .verbose(true)
            .build(RecordingRenderer::new())
            .unwrap();
        reporter.major("Importing journals", 3.0, None);
        reporter.minor(None, Some("Journal A"), 20.0, None);
        reporter.detail(Some(5.0), Some("Issue 5"), None);

        let opened = reporter.renderer().opened_bars();
        assert_eq!(opened.len(), 1);
        assert_eq!(opened[0].length, 20.0);
        assert_eq!(opened[0].before_message.as_deref(), Some("Journal A"));
        assert_eq!(reporter.renderer().last_progress(), Some(5.0));
        assert_eq!(reporter.renderer().last_message(), Some("Issue 5"));
    }

    #[test]
    fn debug_kind_renders_nothing_outside_debug_mode() {
        let mut reporter = reporter();
        reporter.debug("GET /api/journals");
        assert!(reporter.renderer().calls().is_empty());
    }

    #[test]
    fn debug_mode_prefers_debug_message() {
        let mut reporter = ReporterBuilder::new()
            .debug_mode(true)
            .build(RecordingRenderer::new())
            .unwrap();
        reporter.major("Importing", 10.0, Some("Importing 3 journals from source"));

        let lines = reporter.renderer().printed_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" -- Importing 3 journals from source"));
    }

    #[test]
    fn debug_log_records_every_kind() {
        let sink = MemoryLogSink::new();
        let mut reporter = ReporterBuilder::new()
            .log_mode(LogMode::Debug)
            .log_sink(Box::new(sink.clone()))
            .build(RecordingRenderer::new())
            .unwrap();

        reporter.major("Journals", 2.0, None);
        reporter.detail(Some(1.0), Some("Journal A"), Some("POST /journals 201"));
        reporter.debug("GET /api/issues");

        let lines = sink.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" -- Journals"));
        assert!(lines[1].ends_with(" -- POST /journals 201"));
        assert!(lines[2].ends_with(" -- GET /api/issues"));
    }

    #[test]
    fn error_log_records_reported_errors_only() {
        let sink = MemoryLogSink::new();
        let mut reporter = ReporterBuilder::new()
            .log_mode(LogMode::Error)
            .error_mode(ErrorMode::Continue)
            .log_sink(Box::new(sink.clone()))
            .build(RecordingRenderer::new())
            .unwrap();

        reporter.major("Journals", 2.0, None);
        let error = TransferError::Message("duplicate article".to_string());
        reporter.report_error(&error, &json!({"article": 7}));

        let lines = sink.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" -- duplicate article\n"));
        assert!(lines[0].contains("\"article\": 7"));
    }

    #[test]
    fn failing_log_sink_does_not_interrupt_progress() {
        let mut reporter = ReporterBuilder::new()
            .log_mode(LogMode::Debug)
            .log_sink(Box::new(BrokenSink))
            .build(RecordingRenderer::new())
            .unwrap();

        reporter.major("Journals", 2.0, None);
        reporter.detail(Some(1.0), None, None);

        assert!(reporter.log_degraded());
        assert_eq!(reporter.renderer().last_progress(), Some(1.0));
    }

    #[test]
    fn interactive_answer_is_returned_verbatim() {
        let mut reporter = ReporterBuilder::new()
            .build(RecordingRenderer::with_responses(["retry later"]))
            .unwrap();
        let error = TransferError::Message("timeout".to_string());

        let response = reporter.report_error(&error, &json!({}));

        assert_eq!(response.as_str(), "retry later");
        assert_eq!(reporter.renderer().prompt_count(), 1);
    }

    #[test]
    fn error_closes_open_bar_and_prints_fatal() {
        let mut reporter = reporter();
        reporter.major("Journals", 2.0, None);
        reporter.error("Could not authenticate", true);

        let calls = reporter.renderer().calls();
        let n = calls.len();
        assert_eq!(calls[n - 2], RenderCall::CloseBar);
        assert_eq!(
            calls[n - 1],
            RenderCall::PrintLine {
                text: "Could not authenticate".to_string(),
                style: LineStyle::Fatal,
            }
        );
        assert!(!reporter.state().is_bar_open());
    }

    #[test]
    fn clean_up_is_idempotent() {
        let mut reporter = reporter();
        reporter.major("Journals", 2.0, None);
        reporter.clean_up();
        reporter.clean_up();
        assert_eq!(reporter.renderer().count(|c| matches!(c, RenderCall::CloseBar)), 1);
    }

    #[test]
    fn log_file_is_exposed_when_logging() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("audit.log");
        let reporter = ReporterBuilder::new()
            .log_mode(LogMode::Error)
            .log_file(&path)
            .build(RecordingRenderer::new())
            .unwrap();
        assert_eq!(reporter.log_file(), Some(path.as_path()));
    }

    #[test]
    fn no_log_file_without_log_mode() {
        let reporter = ReporterBuilder::new()
            .log_file("/tmp/unused.log")
            .build(RecordingRenderer::new())
            .unwrap();
        assert!(reporter.log_file().is_none());
    }
    #[test]
    fn dropping_reporter_closes_open_bar() {
        let renderer = SharedLogRenderer::default();
        let calls = Rc::clone(&renderer.calls);
        {
            let mut reporter = ReporterBuilder::new()
                .error_mode(ErrorMode::Continue)
                .build(renderer)
                .unwrap();
            reporter.major("Journals", 10.0, None);
            reporter.minor(Some(2.0), None, 4.0, None);
            reporter.detail(Some(1.0), None, None);
            reporter.detail(Some(2.0), None, None);
        }

        let calls = calls.borrow();
        assert!(matches!(calls.first(), Some(RenderCall::OpenBar(_))));
        assert_eq!(calls.last(), Some(&RenderCall::CloseBar));
        assert_eq!(calls.iter().filter(|c| **c == RenderCall::CloseBar).count(), 1);
        let progress: Vec<f64> = calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::SetProgress(v) => Some(*v),
                _ => None,
            })
            .collect();
        assert_eq!(progress, vec![2.0, 2.25, 2.5]);
    }

    #[test]
    fn dropping_reporter_after_clean_up_closes_nothing_twice() {
        let renderer = SharedLogRenderer::default();
        let calls = Rc::clone(&renderer.calls);
        {
            let mut reporter = ReporterBuilder::new().build(renderer).unwrap();
            reporter.major("Journals", 2.0, None);
            reporter.clean_up();
        }
        let closes = calls
            .borrow()
            .iter()
            .filter(|c| **c == RenderCall::CloseBar)
            .count();
        assert_eq!(closes, 1);
    }

    #[test]
    fn debug_mode_writes_nothing_to_log() {
        let sink = MemoryLogSink::new();
        let mut reporter = ReporterBuilder::new()
            .debug_mode(true)
            .log_mode(LogMode::Debug)
            .log_sink(Box::new(sink.clone()))
            .build(RecordingRenderer::new())
            .unwrap();

        reporter.major("Importing", 10.0, Some("Importing 2 journals"));
        reporter.detail(Some(1.0), Some("Issue 1"), None);
        reporter.debug("GET /api/journals");

        assert_eq!(reporter.renderer().printed_lines().len(), 3);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn empty_text_prints_nothing_in_debug_mode() {
        let mut reporter = ReporterBuilder::new()
            .debug_mode(true)
            .build(RecordingRenderer::new())
            .unwrap();

        reporter.detail(Some(1.0), Some(""), None);
        reporter.debug("");
        assert!(reporter.renderer().printed_lines().is_empty());

        reporter.minor(None, Some("Journal A"), 2.0, Some(""));
        let lines = reporter.renderer().printed_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" -- Journal A"));
    }

    #[test]
    fn empty_label_keeps_previous_message() {
        let mut reporter = reporter();
        reporter.major("Journals", 10.0, None);
        reporter.minor(Some(1.0), Some(""), 2.0, None);
        assert_eq!(reporter.state().current_message(), Some("Journals"));

        let mut reporter = ReporterBuilder::new()
            .verbose(true)
            .build(RecordingRenderer::new())
            .unwrap();
        reporter.minor(None, Some("Journal A"), 4.0, None);
        reporter.detail(Some(1.0), Some(""), None);
        assert_eq!(reporter.state().current_message(), Some("Journal A"));
        assert_eq!(
            reporter.renderer().opened_bars()[0].before_message.as_deref(),
            Some("Journal A")
        );
    }
}
