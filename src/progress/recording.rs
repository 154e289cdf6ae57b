//! Recording renderer for testing.

use super::renderer::{BarSpec, LineStyle, Renderer};
use serde_json::Value;
use std::collections::VecDeque;

/// An owned copy of a `BarSpec`
#[derive(Debug, Clone, PartialEq)]
pub struct OpenedBar {
    pub length: f64,
    pub before_message: Option<String>,
    pub init_message: Option<String>,
    pub start: f64,
}

/// One call received by the renderer
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    OpenBar(OpenedBar),
    CloseBar,
    SetProgress(f64),
    SetMessage(String),
    PrintLine { text: String, style: LineStyle },
    Prompt { error: String, context: Value },
}

impl RenderCall {
    /// True for calls that create, move or close a bar
    pub fn is_bar_operation(&self) -> bool {
        matches!(
            self,
            RenderCall::OpenBar(_) | RenderCall::CloseBar | RenderCall::SetProgress(_)
        )
    }
}

/// Renderer that draws nothing and remembers every call
///
/// Prompts are answered from a queue of canned responses, falling back
/// to `"continue"` once the queue is empty.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    calls: Vec<RenderCall>,
    responses: VecDeque<String>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer prompts with `responses`, in order
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            calls: Vec::new(),
            responses: responses.into_iter().map(Into::into).collect(),
        }
    }

    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    pub fn count(&self, predicate: impl Fn(&RenderCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(*c)).count()
    }

    pub fn opened_bars(&self) -> Vec<OpenedBar> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::OpenBar(bar) => Some(bar.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn progress_values(&self) -> Vec<f64> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::SetProgress(v) => Some(*v),
                _ => None,
            })
            .collect()
    }

    pub fn last_progress(&self) -> Option<f64> {
        self.progress_values().last().copied()
    }

    pub fn last_message(&self) -> Option<&str> {
        self.calls.iter().rev().find_map(|c| match c {
            RenderCall::SetMessage(m) => Some(m.as_str()),
            _ => None,
        })
    }

    pub fn printed_lines(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                RenderCall::PrintLine { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn prompt_count(&self) -> usize {
        self.count(|c| matches!(c, RenderCall::Prompt { .. }))
    }
}

impl Renderer for RecordingRenderer {
    fn open_bar(&mut self, bar: BarSpec<'_>) {
        self.calls.push(RenderCall::OpenBar(OpenedBar {
            length: bar.length,
            before_message: bar.before_message.map(str::to_string),
            init_message: bar.init_message.map(str::to_string),
            start: bar.start,
        }));
    }

    fn close_bar(&mut self) {
        self.calls.push(RenderCall::CloseBar);
    }

    fn set_progress(&mut self, value: f64) {
        self.calls.push(RenderCall::SetProgress(value));
    }

    fn set_message(&mut self, text: &str) {
        self.calls.push(RenderCall::SetMessage(text.to_string()));
    }

    fn print_line(&mut self, text: &str, style: LineStyle) {
        self.calls.push(RenderCall::PrintLine {
            text: text.to_string(),
            style,
        });
    }

    fn prompt_for_error_response(
        &mut self,
        error: &(dyn std::error::Error + 'static),
        context: &Value,
    ) -> String {
        self.calls.push(RenderCall::Prompt {
            error: error.to_string(),
            context: context.clone(),
        });
        self.responses
            .pop_front()
            .unwrap_or_else(|| "continue".to_string())
    }
}
