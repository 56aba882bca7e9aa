//! The trigger control and its scoped busy guard.

use std::sync::atomic::{AtomicBool, Ordering};

/// Label shown while the control is enabled.
pub const IDLE_LABEL: &str = "Download Video";

/// Label shown while a request is in flight.
pub const BUSY_LABEL: &str = "Downloading...";

/// The control a user activates to start a download.
///
/// The enabled flag is advisory: front ends should not start a submission
/// while it is cleared, but nothing in the handler enforces that.
#[derive(Debug)]
pub struct TriggerControl {
    enabled: AtomicBool,
}

impl Default for TriggerControl {
    fn default() -> Self {
        Self::new()
    }
}

impl TriggerControl {
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(true),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.is_enabled() {
            IDLE_LABEL
        } else {
            BUSY_LABEL
        }
    }

    /// Disables the control until the returned guard is dropped.
    #[must_use = "the control is re-enabled as soon as the guard is dropped"]
    pub fn acquire(&self) -> BusyGuard<'_> {
        self.enabled.store(false, Ordering::SeqCst);
        BusyGuard { control: self }
    }
}

/// Keeps a [`TriggerControl`] disabled for its lifetime.
///
/// Dropping the guard re-enables the control and restores its label, on every
/// exit path including early returns and unwinding.
#[derive(Debug)]
pub struct BusyGuard<'a> {
    control: &'a TriggerControl,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.control.enabled.store(true, Ordering::SeqCst);
    }
}
