//! Rendering surface trait definition.

use serde_json::Value;

/// Parameters for a new progress bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarSpec<'a> {
    /// Total units of the bar
    pub length: f64,
    /// Printed as a standalone line before the bar appears
    pub before_message: Option<&'a str>,
    /// Label shown on the bar itself
    pub init_message: Option<&'a str>,
    /// Initial position
    pub start: f64,
}

/// Severity of a printed line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineStyle {
    #[default]
    Plain,
    Error,
    /// Maximal visual severity
    Fatal,
}

/// Trait for rendering surfaces.
///
/// The reporter decides what to show and when; implementations decide how.
pub trait Renderer {
    /// Close any existing bar and open a new one
    fn open_bar(&mut self, bar: BarSpec<'_>);

    /// End the current bar regardless of completion
    fn close_bar(&mut self);

    /// Move the current bar to an absolute position
    fn set_progress(&mut self, value: f64);

    /// Replace the current bar's label
    fn set_message(&mut self, text: &str);

    /// Print a line outside of any bar
    fn print_line(&mut self, text: &str, style: LineStyle);

    /// Present an error and block until the user answers
    fn prompt_for_error_response(
        &mut self,
        error: &(dyn std::error::Error + 'static),
        context: &Value,
    ) -> String;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn open_bar(&mut self, bar: BarSpec<'_>) {
        (**self).open_bar(bar)
    }

    fn close_bar(&mut self) {
        (**self).close_bar()
    }

    fn set_progress(&mut self, value: f64) {
        (**self).set_progress(value)
    }

    fn set_message(&mut self, text: &str) {
        (**self).set_message(text)
    }

    fn print_line(&mut self, text: &str, style: LineStyle) {
        (**self).print_line(text, style)
    }

    fn prompt_for_error_response(
        &mut self,
        error: &(dyn std::error::Error + 'static),
        context: &Value,
    ) -> String {
        (**self).prompt_for_error_response(error, context)
    }
}
