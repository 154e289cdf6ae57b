//! Log-only renderer for unattended runs.

use super::format;
use super::renderer::{BarSpec, LineStyle, Renderer};
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Sends lines to `tracing` and never draws a bar.
///
/// There is nobody to ask, so interactive prompts answer `"abort"`.
#[derive(Debug, Default)]
pub struct HeadlessRenderer;

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for HeadlessRenderer {
    fn open_bar(&mut self, bar: BarSpec<'_>) {
        if let Some(before) = bar.before_message {
            info!("{}", before);
        }
        debug!(length = bar.length, label = ?bar.init_message, "bar opened");
    }

    fn close_bar(&mut self) {
        debug!("bar closed");
    }

    fn set_progress(&mut self, value: f64) {
        debug!(progress = value, "progress");
    }

    fn set_message(&mut self, text: &str) {
        debug!(label = text, "progress label");
    }

    fn print_line(&mut self, text: &str, style: LineStyle) {
        match style {
            LineStyle::Plain => info!("{}", text),
            LineStyle::Error => error!("{}", text),
            LineStyle::Fatal => error!(fatal = true, "{}", text),
        }
    }

    fn prompt_for_error_response(
        &mut self,
        err: &(dyn std::error::Error + 'static),
        context: &Value,
    ) -> String {
        warn!(
            error = %format::error_info(err),
            context = %context,
            "No terminal to ask; aborting"
        );
        "abort".to_string()
    }
}
