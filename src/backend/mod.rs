//! HTTP client for the download backend.
//!
//! The backend exposes a single endpoint, `POST {base}/download`, taking
//! `{"url": "..."}` and answering either with the file bytes (2xx) or with a
//! JSON body carrying an optional `error` string (anything else).
//!
//! # Example
//!
//! ```no_run
//! use vidfetch_core::backend::{BackendClient, ClientOptions, DownloadBackend};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = BackendClient::new("http://127.0.0.1:5000", ClientOptions::default())?;
//! let artifact = client
//!     .request_download("https://www.youtube.com/watch?v=abc123")
//!     .await?;
//! println!("received {} ({} bytes)", artifact.filename, artifact.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;

pub use client::{BackendClient, ClientOptions, DownloadRequest, extract_error_description};
pub use constants::{DOWNLOAD_PATH, GENERIC_ERROR_DESCRIPTION};
pub use error::{BackendError, BackendSetupError};

use async_trait::async_trait;

use crate::artifact::DownloadedArtifact;

/// A collaborator that turns a validated video URL into a downloaded artifact.
///
/// Each call is one independent request; implementations must not cache.
#[async_trait]
pub trait DownloadBackend: Send + Sync {
    /// Requests the file for `url` and returns its bytes and suggested name.
    async fn request_download(&self, url: &str) -> Result<DownloadedArtifact, BackendError>;
}
