//! Test helper utilities
//!
//! Shared fixtures for songvid integration tests:
//! - [`SongLibrary`]: a temporary root folder populated with song directories
//! - [`MockSearch`]: scripted search results with call recording
//! - [`MockFetcher`]: scripted fetch behavior with call recording

#![allow(dead_code)]

use songvid::models::SearchReference;
use songvid::services::{
    AcquisitionOrchestrator, AcquisitionSettings, QueryBuilder, SearchResolver,
};
use songvid::types::{FetchError, SearchError, SearchProvider, VideoFetcher};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Temporary root folder holding song directories
pub struct SongLibrary {
    dir: TempDir,
}

impl SongLibrary {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Canonical root, matching the paths the scanner reports
    pub fn root(&self) -> PathBuf {
        self.dir.path().canonicalize().unwrap()
    }

    /// Song directory with a well-formed descriptor
    pub fn add_song(&self, rel: &str, name: &str, artist: &str) -> PathBuf {
        self.add_raw(rel, &format!("[song]\nname = {}\nartist = {}\n", name, artist))
    }

    /// Song directory with arbitrary descriptor content
    pub fn add_raw(&self, rel: &str, descriptor: &str) -> PathBuf {
        let dir = self.root().join(rel);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("song.ini"), descriptor).unwrap();
        dir
    }

    /// Pre-existing video for a song directory
    pub fn add_video(&self, rel: &str, bytes: &[u8]) -> PathBuf {
        let path = self.root().join(rel).join("video.mp4");
        std::fs::write(&path, bytes).unwrap();
        path
    }
}

/// Search collaborator answering from a fixed table
///
/// Unknown queries return an empty list.
#[derive(Default)]
pub struct MockSearch {
    results: HashMap<String, Vec<SearchReference>>,
    unavailable: bool,
    queries: Mutex<Vec<String>>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, query: &str, references: &[&str]) -> Self {
        self.results.insert(
            query.to_string(),
            references.iter().map(|r| SearchReference::from(*r)).collect(),
        );
        self
    }

    /// Every query fails with a network error
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl SearchProvider for MockSearch {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchReference>, SearchError> {
        self.queries.lock().unwrap().push(query.to_string());

        if self.unavailable {
            return Err(SearchError::NetworkError("connection refused".to_string()));
        }

        Ok(self
            .results
            .get(query)
            .map(|refs| refs.iter().take(max_results).cloned().collect())
            .unwrap_or_default())
    }
}

/// Fetch collaborator that writes a fake video unless told to fail
#[derive(Default)]
pub struct MockFetcher {
    failing: HashSet<String>,
    partial_on_failure: bool,
    delay: Option<Duration>,
    fetched: Mutex<Vec<(SearchReference, PathBuf)>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every fetch of `reference`
    pub fn failing_for(mut self, reference: &str) -> Self {
        self.failing.insert(reference.to_string());
        self
    }

    /// Leave a truncated video behind when failing
    pub fn leaving_partial(mut self) -> Self {
        self.partial_on_failure = true;
        self
    }

    /// Sleep before completing each fetch
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<(SearchReference, PathBuf)> {
        self.fetched.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.fetched.lock().unwrap().len()
    }
}

/// Content written by [`MockFetcher`] for a reference
pub fn video_bytes(reference: &str) -> Vec<u8> {
    format!("mp4:{}", reference).into_bytes()
}

#[async_trait::async_trait]
impl VideoFetcher for MockFetcher {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn fetch(&self, reference: &SearchReference, destination: &Path) -> Result<(), FetchError> {
        self.fetched
            .lock()
            .unwrap()
            .push((reference.clone(), destination.to_path_buf()));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.contains(reference.as_str()) {
            if self.partial_on_failure {
                tokio::fs::write(destination, b"trunc").await?;
            }
            return Err(FetchError::ToolFailed {
                status: Some(1),
                stderr: "ERROR: Video unavailable".to_string(),
            });
        }

        tokio::fs::write(destination, video_bytes(reference.as_str())).await?;
        Ok(())
    }
}

/// Orchestrator over mocks with the default query rules
pub fn orchestrator(
    search: Arc<MockSearch>,
    fetcher: Arc<MockFetcher>,
    concurrency: usize,
) -> AcquisitionOrchestrator {
    let queries = QueryBuilder::new("music video", &["wavegroup".to_string()]).unwrap();
    AcquisitionOrchestrator::new(
        SearchResolver::new(search, queries),
        fetcher,
        AcquisitionSettings {
            concurrency,
            fetch_timeout: Duration::from_secs(10),
        },
    )
}
