//! songvid - music video acquisition for song directories
//!
//! Scans a root folder for `song.ini` directories and makes sure each one has
//! a `video.mp4`. Individual song failures are reported, not fatal; the exit
//! status is non-zero only when the root folder or configuration is unusable.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use songvid::services::{RunSummary, SongScanner};
use songvid_common::TomlConfig;

/// Command-line arguments for songvid
#[derive(Parser, Debug)]
#[command(name = "songvid")]
#[command(about = "Fetch a music video for every song directory under a folder")]
#[command(version)]
struct Args {
    /// Root folder to scan for song directories
    root: PathBuf,

    /// Config file (default: <config dir>/songvid/config.toml)
    #[arg(short, long, env = "SONGVID_CONFIG")]
    config: Option<PathBuf>,

    /// Songs processed at once
    #[arg(short = 'j', long, env = "SONGVID_CONCURRENCY")]
    concurrency: Option<usize>,

    /// Per-video fetch deadline in seconds
    #[arg(long, env = "SONGVID_FETCH_TIMEOUT")]
    fetch_timeout: Option<u64>,

    /// Search backend: yt-dlp or youtube-api
    #[arg(long, env = "SONGVID_SEARCH_BACKEND")]
    search_backend: Option<String>,

    /// yt-dlp executable
    #[arg(long, env = "SONGVID_YTDLP")]
    ytdlp_path: Option<PathBuf>,

    /// Follow symlinked directories while scanning
    #[arg(long)]
    follow_links: bool,

    /// Write the run summary as JSON to this file
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,
}

impl Args {
    /// Command-line values override the config file
    fn apply_overrides(&self, config: &mut TomlConfig) {
        if let Some(concurrency) = self.concurrency {
            config.acquisition.concurrency = concurrency;
        }
        if let Some(secs) = self.fetch_timeout {
            config.acquisition.fetch_timeout_secs = secs;
        }
        if let Some(backend) = &self.search_backend {
            config.search.backend = backend.clone();
        }
        if let Some(path) = &self.ytdlp_path {
            config.tools.ytdlp_path = path.clone();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);
    config.validate().context("Invalid configuration")?;

    // Initialize tracing (RUST_LOG wins over the configured level)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("songvid={0},songvid_common={0}", config.logging.level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting songvid {}", env!("CARGO_PKG_VERSION"));
    info!("Root folder: {}", args.root.display());

    let songs = SongScanner::new()
        .with_follow_links(args.follow_links)
        .scan(&args.root)
        .with_context(|| format!("Cannot scan {}", args.root.display()))?;

    let orchestrator =
        songvid::config::build_orchestrator(&config).context("Failed to set up acquisition")?;

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    info!("Scanning songs...");
    let summary = orchestrator.run(songs, cancel).await;

    if let Some(path) = &args.report {
        // Report failures never change the exit status
        match write_report(&summary, path) {
            Ok(()) => info!("Report written to {}", path.display()),
            Err(e) => tracing::error!("{:#}", e),
        }
    }

    Ok(())
}

fn write_report(summary: &RunSummary, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(summary).context("Failed to encode report")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report {}", path.display()))
}

/// Cancel the run on Ctrl+C; in-flight fetches are rolled back
async fn shutdown_signal(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Interrupted, finishing in-flight songs");
            cancel.cancel();
        }
        Err(e) => tracing::warn!("Failed to install Ctrl+C handler: {}", e),
    }
}
