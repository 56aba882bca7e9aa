//! Error types for the backend client.

use thiserror::Error;

/// Errors returned by a single download request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The backend answered with a non-success status.
    #[error("download failed (HTTP {status}): {description}")]
    Remote {
        /// The HTTP status code.
        status: u16,
        /// The backend's `error` field, or a generic fallback.
        description: String,
    },

    /// The request could not complete: no response, or a body that could not be read.
    #[error("transport error: {detail}")]
    Transport {
        /// Underlying failure text.
        detail: String,
    },
}

impl BackendError {
    /// Creates a remote error.
    pub fn remote(status: u16, description: impl Into<String>) -> Self {
        Self::Remote {
            status,
            description: description.into(),
        }
    }

    /// Creates a transport error from any displayable failure.
    pub fn transport(detail: impl std::fmt::Display) -> Self {
        Self::Transport {
            detail: detail.to_string(),
        }
    }
}

/// Errors building a [`BackendClient`](super::BackendClient).
#[derive(Debug, Error)]
pub enum BackendSetupError {
    /// The configured base URL is not an absolute http(s) URL.
    #[error("invalid backend URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected base URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
}
