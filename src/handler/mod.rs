//! The download request handler.
//!
//! [`DownloadHandler::submit`] runs one user-initiated cycle:
//!
//! 1. trim and validate the input (no network call on failure)
//! 2. disable the trigger control and announce progress
//! 3. POST the URL to the backend
//! 4. save the returned artifact, or report the failure
//! 5. re-enable the trigger control
//!
//! Step 5 is tied to a [`BusyGuard`] rather than to any particular exit path,
//! so the control comes back on success, on every error, and on unwinding.

mod error;
mod status;
mod trigger;

pub use error::SubmitError;
pub use status::{
    Messages, STATUS_AUTO_HIDE, StatusKind, StatusMessage, StatusRegion, StatusSink,
};
pub use trigger::{BUSY_LABEL, BusyGuard, IDLE_LABEL, TriggerControl};

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::artifact::{ArtifactSink, SavedArtifact};
use crate::backend::DownloadBackend;
use crate::input::validate_video_url;

/// Where a submission currently is.
///
/// `Idle → Validating → (Idle on failure) → Submitting → (Succeeded | Failed) → Idle`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// Orchestrates validation, the backend call, saving, and status feedback.
#[derive(Debug)]
pub struct DownloadHandler<B, S, U> {
    backend: B,
    sink: S,
    status: U,
    trigger: Arc<TriggerControl>,
    input: String,
    state: HandlerState,
    messages: Messages,
}

impl<B, S, U> DownloadHandler<B, S, U>
where
    B: DownloadBackend,
    S: ArtifactSink,
    U: StatusSink,
{
    /// Creates an idle handler with an empty input and the default messages.
    pub fn new(backend: B, sink: S, status: U) -> Self {
        Self {
            backend,
            sink,
            status,
            trigger: Arc::new(TriggerControl::new()),
            input: String::new(),
            state: HandlerState::Idle,
            messages: Messages::default(),
        }
    }

    /// Replaces the message catalog.
    #[must_use]
    pub fn with_messages(mut self, messages: Messages) -> Self {
        self.messages = messages;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn status(&self) -> &U {
        &self.status
    }

    pub fn trigger(&self) -> &TriggerControl {
        &self.trigger
    }

    /// Shared handle to the trigger control, for front ends that watch it.
    pub fn trigger_handle(&self) -> Arc<TriggerControl> {
        Arc::clone(&self.trigger)
    }

    pub fn state(&self) -> HandlerState {
        self.state
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Current contents of the input field.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replaces the contents of the input field.
    pub fn set_input(&mut self, value: impl Into<String>) {
        self.input = value.into();
    }

    /// Submits whatever is currently in the input field.
    ///
    /// # Errors
    ///
    /// Same as [`submit`](Self::submit).
    pub async fn submit_input(&mut self) -> Result<SavedArtifact, SubmitError> {
        let raw = self.input.clone();
        self.submit(&raw).await
    }

    /// Runs one download cycle for `raw_input`.
    ///
    /// On success the artifact is saved, a success message is shown, and the
    /// input field is cleared. On failure an error message is shown and the
    /// input is left as it was. Either way the trigger control is enabled and
    /// the handler is idle when this returns.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Validation`] if the input is empty or not a supported URL
    /// - [`SubmitError::Remote`] if the backend answered with a failure status
    /// - [`SubmitError::Transport`] if the request did not complete
    /// - [`SubmitError::Save`] if the artifact could not be written
    #[instrument(skip(self, raw_input), fields(input_len = raw_input.len()))]
    pub async fn submit(&mut self, raw_input: &str) -> Result<SavedArtifact, SubmitError> {
        enter(&mut self.state, HandlerState::Validating);
        let url = match validate_video_url(raw_input) {
            Ok(url) => url,
            Err(error) => {
                let error = SubmitError::from(error);
                debug!(error = %error, "input rejected");
                self.status
                    .show(StatusMessage::error(error.status_text(&self.messages)));
                enter(&mut self.state, HandlerState::Idle);
                return Err(error);
            }
        };

        let busy = self.trigger.acquire();
        enter(&mut self.state, HandlerState::Submitting);
        self.status
            .show(StatusMessage::info(self.messages.in_progress));

        let result = download_and_save(&self.backend, &self.sink, &url).await;
        match &result {
            Ok(saved) => {
                enter(&mut self.state, HandlerState::Succeeded);
                info!(path = %saved.path.display(), bytes = saved.bytes_written, "download saved");
                self.status
                    .show(StatusMessage::success(self.messages.success));
                self.input.clear();
            }
            Err(error) => {
                enter(&mut self.state, HandlerState::Failed);
                warn!(error = %error, "download failed");
                self.status
                    .show(StatusMessage::error(error.status_text(&self.messages)));
            }
        }

        drop(busy);
        enter(&mut self.state, HandlerState::Idle);
        result
    }
}

async fn download_and_save<B, S>(
    backend: &B,
    sink: &S,
    url: &str,
) -> Result<SavedArtifact, SubmitError>
where
    B: DownloadBackend + ?Sized,
    S: ArtifactSink + ?Sized,
{
    let artifact = backend.request_download(url).await?;
    Ok(sink.save(artifact).await?)
}

fn enter(state: &mut HandlerState, next: HandlerState) {
    debug!(from = ?*state, to = ?next, "handler state");
    *state = next;
}
