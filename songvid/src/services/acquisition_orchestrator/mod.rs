//! Acquisition orchestrator
//!
//! Drives each song through a fixed sequence, never backtracking:
//!
//! 1. **Check**: video already on disk → done, nothing written
//! 2. **Resolve**: search for the top link; a miss skips the song with no writes
//! 3. **Record provenance**: write the reference to `video_origin.txt`
//! 4. **Fetch**: download to `video.mp4` under a deadline
//! 5. **Compensate**: on any fetch failure remove the provenance file and any
//!    partial video so the song is back to its initial state
//!
//! Songs are independent. Every error is turned into a [`SongOutcome`] at the
//! song boundary, so one bad song never stops the others. With a concurrency
//! above 1, songs run side by side; the scanner never yields the same
//! directory twice, so no two in-flight songs touch the same files.

use futures::stream::{self, StreamExt};
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::AcquisitionError;
use crate::models::{SearchReference, SongOutcome, SongRecord};
use crate::services::descriptor_reader::DescriptorError;
use crate::services::search_resolver::SearchResolver;
use crate::types::{FetchError, VideoFetcher};

mod statistics;

pub use statistics::RunSummary;

/// Orchestrator tuning
#[derive(Debug, Clone)]
pub struct AcquisitionSettings {
    /// Songs processed at once (1 = strictly sequential)
    pub concurrency: usize,
    /// Deadline for a single fetch
    pub fetch_timeout: Duration,
}

impl Default for AcquisitionSettings {
    fn default() -> Self {
        Self {
            concurrency: 1,
            fetch_timeout: Duration::from_secs(600),
        }
    }
}

/// Per-song acquisition state machine
pub struct AcquisitionOrchestrator {
    resolver: SearchResolver,
    fetcher: Arc<dyn VideoFetcher>,
    settings: AcquisitionSettings,
}

impl AcquisitionOrchestrator {
    pub fn new(
        resolver: SearchResolver,
        fetcher: Arc<dyn VideoFetcher>,
        settings: AcquisitionSettings,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            settings,
        }
    }

    /// Process every scanned song and aggregate the outcomes
    ///
    /// Descriptor errors from the scanner become `Skipped` reports. Once
    /// `cancel` fires no further songs are started; in-flight fetches are
    /// aborted and rolled back.
    pub async fn run<I>(&self, songs: I, cancel: CancellationToken) -> RunSummary
    where
        I: IntoIterator<Item = Result<SongRecord, DescriptorError>>,
    {
        let start_time = Instant::now();
        let mut summary = RunSummary::default();

        let mut outcomes = stream::iter(songs)
            .map(|scanned| {
                let cancel = cancel.clone();
                async move {
                    match scanned {
                        Ok(record) => {
                            let path = record.path().to_path_buf();
                            let title = record.to_string();
                            let outcome = if cancel.is_cancelled() {
                                SongOutcome::Cancelled
                            } else {
                                self.acquire(record, &cancel).await
                            };
                            (path, Some(title), outcome)
                        }
                        Err(e) => {
                            let path = e
                                .path()
                                .parent()
                                .unwrap_or_else(|| e.path())
                                .to_path_buf();
                            let outcome = SongOutcome::from_error(&AcquisitionError::from(e));
                            (path, None, outcome)
                        }
                    }
                }
            })
            .buffer_unordered(self.settings.concurrency.max(1));

        while let Some((path, title, outcome)) = outcomes.next().await {
            log_outcome(&path, title.as_deref(), &outcome);
            summary.record(path, title, outcome);
        }

        summary.elapsed = start_time.elapsed();
        tracing::info!("{}", summary.display_string());
        summary
    }

    /// Take one song from its current state to a final outcome
    pub async fn acquire(&self, mut record: SongRecord, cancel: &CancellationToken) -> SongOutcome {
        // Check
        if record.has_video() {
            tracing::debug!(path = %record.path().display(), "Video found for {}", record);
            return SongOutcome::AlreadyPresent;
        }

        // Resolve
        let resolved = tokio::select! {
            _ = cancel.cancelled() => return SongOutcome::Cancelled,
            resolved = self.resolver.resolve(&mut record) => resolved,
        };
        let reference = match resolved {
            Ok(reference) => reference,
            Err(e) => return SongOutcome::from_error(&AcquisitionError::from(e)),
        };

        if cancel.is_cancelled() {
            return SongOutcome::Cancelled;
        }

        tracing::debug!(
            path = %record.path().display(),
            reference = %reference,
            "Downloading video for {}",
            record
        );

        // Record provenance
        let provenance_path = record.provenance_path();
        if let Err(source) = tokio::fs::write(&provenance_path, reference.as_str()).await {
            // The file may exist even though the write failed
            remove_if_present(&provenance_path).await;
            return SongOutcome::from_error(&AcquisitionError::Filesystem {
                path: provenance_path,
                source,
            });
        }

        // Fetch
        let video_path = record.video_path();
        match self.fetch_with_deadline(&reference, &video_path, cancel).await {
            Ok(()) => SongOutcome::Downloaded { reference },
            Err(e) => {
                // Compensate
                tracing::error!(
                    path = %record.path().display(),
                    "Couldn't download video for {}: {}",
                    record,
                    e
                );
                self.compensate(&record).await;
                SongOutcome::from_error(&AcquisitionError::from(e))
            }
        }
    }

    async fn fetch_with_deadline(
        &self,
        reference: &SearchReference,
        destination: &Path,
        cancel: &CancellationToken,
    ) -> Result<(), FetchError> {
        let timeout = self.settings.fetch_timeout;

        tokio::select! {
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = tokio::time::timeout(timeout, self.fetcher.fetch(reference, destination)) => {
                match result {
                    Ok(fetched) => fetched,
                    Err(_) => Err(FetchError::TimedOut(timeout)),
                }
            }
        }
    }

    /// Undo everything a failed attempt may have left behind
    ///
    /// The Check step guarantees no video existed before the attempt, so any
    /// file at the video path now is a partial download.
    async fn compensate(&self, record: &SongRecord) {
        remove_if_present(&record.provenance_path()).await;
        remove_if_present(&record.video_path()).await;
        self.fetcher.discard_partial(&record.video_path()).await;
    }
}

async fn remove_if_present(path: &Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path = %path.display(), "Removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), "Failed to remove: {}", e),
    }
}

fn log_outcome(path: &Path, title: Option<&str>, outcome: &SongOutcome) {
    let title = title.unwrap_or("<unreadable descriptor>");
    match outcome {
        SongOutcome::AlreadyPresent | SongOutcome::Cancelled => {
            tracing::info!(path = %path.display(), "{}: {}", outcome.label(), title)
        }
        SongOutcome::Downloaded { reference } => tracing::info!(
            path = %path.display(),
            reference = %reference,
            "{}: {}",
            outcome.label(),
            title
        ),
        SongOutcome::Skipped { kind, reason } => tracing::warn!(
            path = %path.display(),
            "{}: {} ({}: {})",
            outcome.label(),
            title,
            kind,
            reason
        ),
        SongOutcome::Failed { kind, reason } => tracing::error!(
            path = %path.display(),
            "{}: {} ({}: {})",
            outcome.label(),
            title,
            kind,
            reason
        ),
    }
}
