//! Error types for input validation.

use thiserror::Error;

/// Reasons a raw input is rejected before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Input was empty after trimming surrounding whitespace.
    #[error("empty input")]
    Empty,

    /// Input does not look like a supported video URL.
    #[error("unrecognized url '{url}'\n  Suggestion: use a youtube.com or youtu.be video link")]
    UnrecognizedUrl {
        /// The trimmed input that failed the shape check
        url: String,
    },
}

impl ValidationError {
    /// Creates an `UnrecognizedUrl` error for the given trimmed input.
    #[must_use]
    pub fn unrecognized(url: &str) -> Self {
        Self::UnrecognizedUrl {
            url: url.to_string(),
        }
    }
}
