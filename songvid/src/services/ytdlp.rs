//! yt-dlp adapters
//!
//! Both collaborators shell out to `yt-dlp`:
//! - [`YtDlpSearch`] runs a `ytsearchN:` query and prints video ids
//! - [`YtDlpFetcher`] downloads an mp4 rendition to the destination path
//!
//! Children are spawned with `kill_on_drop`, so dropping a fetch future on
//! timeout or cancellation also stops the download.

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;

use crate::models::SearchReference;
use crate::types::{FetchError, SearchError, SearchProvider, VideoFetcher};

const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Lines of stderr kept in error messages
const STDERR_TAIL_LINES: usize = 5;

/// Search through `yt-dlp "ytsearchN:<query>"`
#[derive(Debug, Clone)]
pub struct YtDlpSearch {
    program: PathBuf,
}

impl YtDlpSearch {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait::async_trait]
impl SearchProvider for YtDlpSearch {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchReference>, SearchError> {
        let output = Command::new(&self.program)
            .args(["--flat-playlist", "--no-warnings", "--print", "id"])
            .arg(format!("ytsearch{}:{}", max_results.max(1), query))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    SearchError::ToolNotFound(self.program.display().to_string())
                }
                _ => SearchError::ToolFailed(e.to_string()),
            })?;

        if !output.status.success() {
            return Err(SearchError::ToolFailed(stderr_tail(&output)));
        }

        let references = parse_video_ids(&String::from_utf8_lossy(&output.stdout), max_results);
        tracing::debug!(query = %query, results = references.len(), "yt-dlp search complete");
        Ok(references)
    }
}

/// Map printed video ids to watch URLs, preserving rank order
fn parse_video_ids(stdout: &str, max_results: usize) -> Vec<SearchReference> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|id| is_video_id(id))
        .take(max_results)
        .map(|id| SearchReference::new(format!("{}{}", WATCH_URL_PREFIX, id)))
        .collect()
}

fn is_video_id(id: &str) -> bool {
    id.len() == 11
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Download through `yt-dlp -f mp4 -o <destination> <reference>`
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    program: PathBuf,
}

impl YtDlpFetcher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait::async_trait]
impl VideoFetcher for YtDlpFetcher {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn fetch(&self, reference: &SearchReference, destination: &Path) -> Result<(), FetchError> {
        tracing::debug!(
            reference = %reference,
            destination = %destination.display(),
            "Starting yt-dlp download"
        );

        let output = Command::new(&self.program)
            .args(fetch_args(reference, destination))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    FetchError::ToolNotFound(self.program.display().to_string())
                }
                _ => FetchError::Io(e),
            })?;

        if !output.status.success() {
            self.discard_partial(destination).await;
            return Err(FetchError::ToolFailed {
                status: output.status.code(),
                stderr: stderr_tail(&output),
            });
        }

        if !destination.is_file() {
            return Err(FetchError::MissingOutput(destination.to_path_buf()));
        }

        Ok(())
    }

    async fn discard_partial(&self, destination: &Path) {
        for path in partial_paths(destination) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => tracing::debug!(path = %path.display(), "Removed partial download"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => tracing::warn!(path = %path.display(), "Failed to remove partial download: {}", e),
            }
        }
    }
}

/// Arguments for one download; the reference always follows `--`
fn fetch_args(reference: &SearchReference, destination: &Path) -> Vec<String> {
    let mut args: Vec<String> = ["-f", "mp4", "--no-playlist", "--no-progress", "--no-warnings"]
        .iter()
        .map(|a| a.to_string())
        .collect();
    args.push("-o".to_string());
    args.push(output_template(destination));
    args.push("--".to_string());
    args.push(reference.as_str().to_string());
    args
}

/// Output template for `-o`; `%` starts a template field and must be doubled
fn output_template(destination: &Path) -> String {
    destination.to_string_lossy().replace('%', "%%")
}

/// Side files yt-dlp leaves next to an interrupted download
fn partial_paths(destination: &Path) -> Vec<PathBuf> {
    ["part", "ytdl"]
        .iter()
        .map(|ext| {
            let mut name = destination.as_os_str().to_os_string();
            name.push(".");
            name.push(ext);
            PathBuf::from(name)
        })
        .collect()
}

fn stderr_tail(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}
