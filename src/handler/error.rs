//! Error type for a single submission.

use thiserror::Error;

use super::status::Messages;
use crate::artifact::SaveError;
use crate::backend::BackendError;
use crate::input::ValidationError;

/// Terminal failure of one `submit` call.
///
/// Every variant is recoverable: the handler is back to idle with the trigger
/// enabled by the time the error is returned.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Input was empty or not a supported URL; no request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend answered with a failure status.
    #[error("download failed (HTTP {status}): {description}")]
    Remote {
        /// The HTTP status code.
        status: u16,
        /// Backend-provided description, or a generic fallback.
        description: String,
    },

    /// The request did not complete.
    #[error("network error: {detail}")]
    Transport {
        /// Underlying failure text.
        detail: String,
    },

    /// The artifact arrived but could not be written locally.
    #[error(transparent)]
    Save(#[from] SaveError),
}

impl From<BackendError> for SubmitError {
    fn from(error: BackendError) -> Self {
        match error {
            BackendError::Remote {
                status,
                description,
            } => Self::Remote {
                status,
                description,
            },
            BackendError::Transport { detail } => Self::Transport { detail },
        }
    }
}

impl SubmitError {
    /// Text for the status region, localized through `messages`.
    #[must_use]
    pub fn status_text(&self, messages: &Messages) -> String {
        match self {
            Self::Validation(ValidationError::Empty) => messages.empty_input.to_string(),
            Self::Validation(ValidationError::UnrecognizedUrl { .. }) => {
                messages.invalid_url.to_string()
            }
            Self::Remote { description, .. } => {
                format!("{}: {description}", messages.remote_failure)
            }
            Self::Transport { detail } => format!("{}: {detail}", messages.transport_failure),
            Self::Save(source) => format!("{}: {source}", messages.save_failure),
        }
    }

    /// Returns true if the request never left the process.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_backend_errors_map_onto_submit_errors() {
        let remote: SubmitError = BackendError::remote(500, "video unavailable").into();
        assert!(matches!(
            remote,
            SubmitError::Remote { status: 500, ref description } if description == "video unavailable"
        ));

        let transport: SubmitError = BackendError::transport("connection refused").into();
        assert!(matches!(
            transport,
            SubmitError::Transport { ref detail } if detail == "connection refused"
        ));
    }

    #[test]
    fn test_status_text_uses_catalog() {
        let messages = Messages::default();

        assert_eq!(
            SubmitError::from(ValidationError::Empty).status_text(&messages),
            messages.empty_input
        );
        assert_eq!(
            SubmitError::from(ValidationError::unrecognized("x")).status_text(&messages),
            messages.invalid_url
        );
        assert_eq!(
            SubmitError::from(BackendError::remote(400, "video unavailable"))
                .status_text(&messages),
            "Download failed: video unavailable"
        );
        assert_eq!(
            SubmitError::from(BackendError::transport("timed out")).status_text(&messages),
            "Network error or no response from server: timed out"
        );
    }

    #[test]
    fn test_status_text_for_save_error_includes_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SubmitError::from(SaveError::io(PathBuf::from("/out/clip.mp4"), io));
        let text = err.status_text(&Messages::default());
        assert!(text.starts_with("Could not save video"), "got {text}");
        assert!(text.contains("/out/clip.mp4"), "got {text}");
    }

    #[test]
    fn test_is_validation() {
        assert!(SubmitError::from(ValidationError::Empty).is_validation());
        assert!(!SubmitError::from(BackendError::transport("x")).is_validation());
    }
}
