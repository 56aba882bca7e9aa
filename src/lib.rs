//! vidfetch core library
//!
//! This library implements a single download flow: a video URL is validated,
//! submitted to a download backend as JSON, and the binary response is saved
//! locally under a filename suggested by the backend.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`input`] - Input normalization and accepted URL shape
//! - [`backend`] - HTTP client for the download backend
//! - [`artifact`] - Downloaded artifacts, filename derivation, and saving
//! - [`handler`] - The download request handler, trigger control, and status messaging
//! - [`config`] - Build-time backend URL and file configuration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod artifact;
pub mod backend;
pub mod config;
pub mod handler;
pub mod input;
mod user_agent;

// Re-export commonly used types
pub use artifact::{
    ArtifactSink, DEFAULT_FILENAME, DirectorySink, DownloadedArtifact, SaveError, SavedArtifact,
};
pub use backend::{BackendClient, BackendError, BackendSetupError, ClientOptions, DownloadBackend};
pub use config::{
    ConfigError, DEFAULT_BACKEND_URL, FileConfig, LoadedConfig, load_default_file_config,
};
pub use handler::{
    DownloadHandler, HandlerState, Messages, StatusKind, StatusMessage, StatusRegion, StatusSink,
    SubmitError, TriggerControl,
};
pub use input::{ValidationError, is_supported_video_url, normalize_input, validate_video_url};
