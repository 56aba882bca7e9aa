//! CLI entry point for vidfetch.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result, bail};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use vidfetch_core::{
    ArtifactSink, BackendClient, DirectorySink, DownloadBackend, DownloadHandler, StatusSink,
    load_default_file_config,
};

mod cli;
mod terminal;

use cli::Args;
use terminal::TerminalStatus;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.default_log_level()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    debug!(?args, "CLI arguments parsed");

    let loaded = load_default_file_config().context("failed to load configuration")?;
    if let Some(path) = &loaded.path {
        debug!(
            path = %path.display(),
            loaded = loaded.loaded_from_file(),
            "config file resolved"
        );
    }
    let settings = args.resolve_settings(loaded.config.as_ref());

    info!(
        backend = %settings.backend_url,
        output_dir = %settings.output_dir.display(),
        "vidfetch starting"
    );

    let backend = BackendClient::new(&settings.backend_url, settings.client_options)
        .context("failed to set up backend client")?;
    let sink = DirectorySink::new(&settings.output_dir).with_context(|| {
        format!(
            "failed to prepare output directory '{}'",
            settings.output_dir.display()
        )
    })?;
    let use_spinner = !args.quiet && io::stderr().is_terminal();
    let mut handler = DownloadHandler::new(backend, sink, TerminalStatus::new(use_spinner));

    match args.url {
        Some(url) => {
            handler.set_input(url);
            handler.submit_input().await?;
            Ok(())
        }
        None => run_stdin(&mut handler).await,
    }
}

/// Treats each stdin line as one form submission until EOF.
///
/// Interactive sessions keep going after failures. Piped input skips blank
/// lines and fails the run if any submission failed.
async fn run_stdin<B, S, U>(handler: &mut DownloadHandler<B, S, U>) -> Result<()>
where
    B: DownloadBackend,
    S: ArtifactSink,
    U: StatusSink,
{
    let interactive = io::stdin().is_terminal();
    if interactive {
        info!("Enter a YouTube video URL per line (Ctrl-D to quit)");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut submitted = 0usize;
    let mut failed = 0usize;

    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        if !interactive && line.trim().is_empty() {
            continue;
        }
        handler.set_input(line);
        submitted += 1;
        if let Err(error) = handler.submit_input().await {
            debug!(error = %error, "submission failed");
            failed += 1;
        }
    }

    info!(submitted, failed, "input finished");
    if failed > 0 && !interactive {
        bail!("{failed} of {submitted} downloads failed");
    }
    Ok(())
}
