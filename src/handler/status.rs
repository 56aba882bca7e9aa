//! Status messaging: message kinds, the localizable catalog, and the
//! auto-hiding status region.

use std::time::{Duration, Instant};

/// How long a status message stays visible after it is shown.
pub const STATUS_AUTO_HIDE: Duration = Duration::from_secs(8);

/// Visual variant of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

impl StatusKind {
    /// Returns the stable string label for display output.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// One message for the status region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// Receiver of status messages emitted by the handler.
pub trait StatusSink {
    /// Displays `message`, replacing whatever was shown before.
    fn show(&mut self, message: StatusMessage);
}

/// User-facing message catalog.
///
/// [`Messages::default`] is English. Other locales can be supplied by
/// building the struct directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Messages {
    pub empty_input: &'static str,
    pub invalid_url: &'static str,
    pub in_progress: &'static str,
    pub success: &'static str,
    /// Prefix for backend failures; the description follows.
    pub remote_failure: &'static str,
    /// Prefix for transport failures; the failure detail follows.
    pub transport_failure: &'static str,
    /// Prefix for local save failures; the IO error follows.
    pub save_failure: &'static str,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            empty_input: "Please enter a YouTube video URL.",
            invalid_url: "Invalid YouTube URL. Please enter a valid URL.",
            in_progress: "Download starting... Please wait, this may take a while.",
            success: "Video downloaded successfully!",
            remote_failure: "Download failed",
            transport_failure: "Network error or no response from server",
            save_failure: "Could not save video",
        }
    }
}

/// Library model of the status region: one current message that hides
/// itself [`STATUS_AUTO_HIDE`] after it was shown.
#[derive(Debug, Clone)]
pub struct StatusRegion {
    current: Option<(StatusMessage, Instant)>,
    history: Vec<StatusMessage>,
    auto_hide: Duration,
}

impl Default for StatusRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusRegion {
    #[must_use]
    pub fn new() -> Self {
        Self::with_auto_hide(STATUS_AUTO_HIDE)
    }

    #[must_use]
    pub fn with_auto_hide(auto_hide: Duration) -> Self {
        Self {
            current: None,
            history: Vec::new(),
            auto_hide,
        }
    }

    /// The message visible at `now`, if any.
    #[must_use]
    pub fn visible_at(&self, now: Instant) -> Option<&StatusMessage> {
        self.current
            .as_ref()
            .filter(|(_, shown_at)| now.saturating_duration_since(*shown_at) < self.auto_hide)
            .map(|(message, _)| message)
    }

    /// The message visible right now, if any.
    #[must_use]
    pub fn visible(&self) -> Option<&StatusMessage> {
        self.visible_at(Instant::now())
    }

    /// The most recently shown message, visible or not.
    #[must_use]
    pub fn last(&self) -> Option<&StatusMessage> {
        self.history.last()
    }

    /// Every message shown so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &[StatusMessage] {
        &self.history
    }
}

impl StatusSink for StatusRegion {
    fn show(&mut self, message: StatusMessage) {
        self.history.push(message.clone());
        self.current = Some((message, Instant::now()));
    }
}
