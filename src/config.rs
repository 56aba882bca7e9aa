//! Backend location and optional file configuration.
//!
//! The backend base URL is fixed at build time through the
//! `VIDFETCH_BACKEND_URL` environment variable. A TOML config file may
//! override it along with a few transport and output settings.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::backend::ClientOptions;

/// Backend base URL baked in at compile time.
pub const DEFAULT_BACKEND_URL: &str = match option_env!("VIDFETCH_BACKEND_URL") {
    Some(url) => url,
    None => "http://127.0.0.1:5000",
};

/// Accepted range for timeout settings, in seconds.
const TIMEOUT_RANGE_SECS: std::ops::RangeInclusive<u64> = 1..=3600;

/// Errors loading the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value for `{field}`: {value}. Expected range: {expected}")]
    Invalid {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// TOML-backed file configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Overrides [`DEFAULT_BACKEND_URL`].
    pub backend_url: Option<String>,
    /// Directory downloads are saved into.
    pub output_dir: Option<PathBuf>,
    /// Connect timeout in seconds.
    pub connect_timeout_secs: Option<u64>,
    /// Overall request deadline in seconds. Unset means no deadline.
    pub request_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Parses and validates config text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys, and
    /// [`ConfigError::Invalid`] for out-of-range values. `origin` is only used
    /// in error messages.
    pub fn from_toml_str(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validates config values against runtime constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_timeout_secs("connect_timeout_secs", self.connect_timeout_secs)?;
        validate_timeout_secs("request_timeout_secs", self.request_timeout_secs)?;
        if let Some(url) = &self.backend_url
            && url.trim().is_empty()
        {
            return Err(ConfigError::Invalid {
                field: "backend_url",
                value: format!("{url:?}"),
                expected: "a non-empty http(s) URL",
            });
        }
        Ok(())
    }

    /// Transport settings. Unset timeouts stay with the transport default.
    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

fn validate_timeout_secs(field: &'static str, value: Option<u64>) -> Result<(), ConfigError> {
    let Some(value) = value else {
        return Ok(());
    };
    if !TIMEOUT_RANGE_SECS.contains(&value) {
        return Err(ConfigError::Invalid {
            field,
            value: value.to_string(),
            expected: "1..=3600",
        });
    }
    Ok(())
}

/// Loaded config metadata.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    /// Parsed file config when a config file exists and was valid.
    pub config: Option<FileConfig>,
}

impl LoadedConfig {
    /// Indicates whether configuration was loaded from disk.
    #[must_use]
    pub fn loaded_from_file(&self) -> bool {
        self.config.is_some()
    }
}

/// Resolves default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/vidfetch/config.toml`
/// 2. `$HOME/.config/vidfetch/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("vidfetch")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("vidfetch")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<std::ffi::OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads config from the default path if present.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file exists but cannot be read, parsed,
/// or validated. A missing file is not an error.
pub fn load_default_file_config() -> Result<LoadedConfig, ConfigError> {
    let path = resolve_default_config_path();
    let config = match path.as_deref() {
        Some(path_ref) if path_ref.exists() => Some(load_file_config(path_ref)?),
        _ => None,
    };
    Ok(LoadedConfig { path, config })
}

/// Loads and validates a config file.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or validated.
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = FileConfig::from_toml_str(&raw, path)?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}
