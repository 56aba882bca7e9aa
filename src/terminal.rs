//! Terminal rendering of handler status messages.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};
use vidfetch_core::handler::BUSY_LABEL;
use vidfetch_core::{StatusKind, StatusMessage, StatusSink};

/// Status sink for the CLI.
///
/// Info messages become a spinner while the request is in flight (when
/// enabled); success and error messages are logged and replace the spinner.
pub(crate) struct TerminalStatus {
    use_spinner: bool,
    spinner: Option<ProgressBar>,
}

impl TerminalStatus {
    pub(crate) fn new(use_spinner: bool) -> Self {
        Self {
            use_spinner,
            spinner: None,
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn start_spinner(&mut self, text: &str) {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {prefix} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_prefix(BUSY_LABEL);
        spinner.set_message(text.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }
}

impl StatusSink for TerminalStatus {
    fn show(&mut self, message: StatusMessage) {
        self.clear_spinner();
        match message.kind {
            StatusKind::Info if self.use_spinner => self.start_spinner(&message.text),
            StatusKind::Info | StatusKind::Success => {
                info!(status = message.kind.as_str(), "{}", message.text);
            }
            StatusKind::Error => error!(status = message.kind.as_str(), "{}", message.text),
        }
    }
}

impl Drop for TerminalStatus {
    fn drop(&mut self) {
        self.clear_spinner();
    }
}
