//! Downloaded artifacts and their local save target.
//!
//! A [`DownloadedArtifact`] is the in-memory response body plus the filename
//! the backend suggested. It lives only between a successful response and the
//! save step: [`ArtifactSink::save`] takes it by value, so the buffer is
//! released as soon as it has been written.

mod filename;

pub use filename::{
    DEFAULT_FILENAME, UNIQUE_SUFFIX_LIMIT, filename_from_header, numbered_path,
    parse_content_disposition, sanitize_filename,
};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument};

/// Binary response body and the name it should be saved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedArtifact {
    /// Sanitized filename, never empty.
    pub filename: String,
    /// Response body.
    pub bytes: Bytes,
}

impl DownloadedArtifact {
    /// Creates an artifact from a body and an optional Content-Disposition value.
    #[must_use]
    pub fn from_response_parts(content_disposition: Option<&str>, bytes: Bytes) -> Self {
        Self {
            filename: filename_from_header(content_disposition),
            bytes,
        }
    }

    /// Body size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the body is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Where a saved artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    /// Final output path.
    pub path: PathBuf,
    /// Filename the artifact carried before path resolution.
    pub filename: String,
    /// Bytes written to `path`.
    pub bytes_written: u64,
}

/// Errors that can occur while saving an artifact.
#[derive(Debug, Error)]
pub enum SaveError {
    /// File system error while creating or writing the output file.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl SaveError {
    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Destination for downloaded artifacts.
///
/// Implementations consume the artifact; nothing keeps the body alive after
/// `save` returns.
#[async_trait]
pub trait ArtifactSink: Send + Sync {
    /// Persists the artifact and reports where it went.
    async fn save(&self, artifact: DownloadedArtifact) -> Result<SavedArtifact, SaveError>;
}

/// Saves artifacts as files in a single output directory.
///
/// Existing files are never overwritten; a numeric suffix is added instead.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Creates a sink writing into `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`SaveError::Io`] if the directory cannot be created.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SaveError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| SaveError::io(dir.clone(), e))?;
        Ok(Self { dir })
    }

    /// The output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ArtifactSink for DirectorySink {
    #[instrument(skip(self, artifact), fields(filename = %artifact.filename, bytes = artifact.len()))]
    async fn save(&self, artifact: DownloadedArtifact) -> Result<SavedArtifact, SaveError> {
        let DownloadedArtifact { filename, bytes } = artifact;
        let (path, file) = create_unique_file(&self.dir, &filename).await?;
        debug!(path = %path.display(), "created output file");

        let write_result = write_file(file, &path, &bytes).await;
        drop(bytes);

        // Created with create_new above, so the file is ours to remove
        if write_result.is_err() {
            debug!(path = %path.display(), "cleaning up partial file after error");
            let _ = tokio::fs::remove_file(&path).await;
        }
        let bytes_written = write_result?;

        info!(path = %path.display(), bytes = bytes_written, "artifact saved");
        Ok(SavedArtifact {
            path,
            filename,
            bytes_written,
        })
    }
}

/// Creates the first free candidate path with `create_new`, so an existing
/// file is never opened for writing.
async fn create_unique_file(dir: &Path, filename: &str) -> Result<(PathBuf, File), SaveError> {
    for attempt in 0..=UNIQUE_SUFFIX_LIMIT {
        let path = numbered_path(dir, filename, attempt);
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "output path taken, trying next suffix");
            }
            Err(err) => return Err(SaveError::io(path, err)),
        }
    }

    Err(SaveError::io(
        numbered_path(dir, filename, UNIQUE_SUFFIX_LIMIT),
        std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free name after {UNIQUE_SUFFIX_LIMIT} suffixes"),
        ),
    ))
}

async fn write_file(file: File, path: &Path, bytes: &[u8]) -> Result<u64, SaveError> {
    let mut writer = BufWriter::new(file);
    writer
        .write_all(bytes)
        .await
        .map_err(|e| SaveError::io(path.to_path_buf(), e))?;
    writer
        .flush()
        .await
        .map_err(|e| SaveError::io(path.to_path_buf(), e))?;
    Ok(bytes.len() as u64)
}
