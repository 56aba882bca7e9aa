//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;
use vidfetch_core::backend::ClientOptions;
use vidfetch_core::{DEFAULT_BACKEND_URL, FileConfig};

/// Download a video through a vidfetch backend.
///
/// Pass a YouTube URL to download it once, or omit it to enter one URL per
/// line on stdin. Files are saved under the name suggested by the backend.
#[derive(Parser, Debug)]
#[command(name = "vidfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Video URL to download (reads one URL per line from stdin when omitted)
    pub url: Option<String>,

    /// Directory to save downloads into [default: .]
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Base URL of the download backend (overrides config and build default)
    #[arg(long, value_name = "URL")]
    pub backend_url: Option<String>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

/// Effective settings after merging CLI flags, file config, and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub backend_url: String,
    pub output_dir: PathBuf,
    pub client_options: ClientOptions,
}

impl Args {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }

    /// Priority: CLI flag > config file > built-in default.
    pub fn resolve_settings(&self, file_config: Option<&FileConfig>) -> RunSettings {
        let backend_url = self
            .backend_url
            .clone()
            .or_else(|| file_config.and_then(|cfg| cfg.backend_url.clone()))
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());
        let output_dir = self
            .output_dir
            .clone()
            .or_else(|| file_config.and_then(|cfg| cfg.output_dir.clone()))
            .unwrap_or_else(|| PathBuf::from("."));
        let client_options = file_config.map_or_else(ClientOptions::default, |cfg| {
            cfg.client_options()
        });

        RunSettings {
            backend_url,
            output_dir,
            client_options,
        }
    }
}
