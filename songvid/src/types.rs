//! Collaborator traits for search and fetch
//!
//! The orchestrator only talks to the outside world through these two seams:
//! - [`SearchProvider`]: query string in, ranked references out
//! - [`VideoFetcher`]: reference and destination in, video file out
//!
//! Implementations live in [`crate::services`]; tests substitute mocks.

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::models::SearchReference;

/// Search collaborator errors
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search tool not found: {0}")]
    ToolNotFound(String),

    #[error("Search tool failed: {0}")]
    ToolFailed(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Fetch collaborator errors
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Fetch tool not found: {0}")]
    ToolNotFound(String),

    #[error("Fetch tool exited with status {status:?}: {stderr}")]
    ToolFailed { status: Option<i32>, stderr: String },

    #[error("Fetch reported success but {} was not written", .0.display())]
    MissingOutput(PathBuf),

    #[error("Fetch timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Fetch cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Search collaborator
#[async_trait::async_trait]
pub trait SearchProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Return up to `max_results` references, best match first
    ///
    /// An empty list is a valid answer; callers decide whether it is an error.
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchReference>, SearchError>;
}

/// Fetch collaborator
#[async_trait::async_trait]
pub trait VideoFetcher: Send + Sync {
    /// Fetcher name for logging
    fn name(&self) -> &'static str;

    /// Retrieve the video behind `reference` into `destination`
    ///
    /// May be dropped mid-flight (timeout, cancellation); callers must not
    /// assume the destination is untouched on failure.
    async fn fetch(&self, reference: &SearchReference, destination: &Path) -> Result<(), FetchError>;

    /// Remove fetcher-private leftovers for `destination` after a failed attempt
    async fn discard_partial(&self, _destination: &Path) {}
}
