//! Run statistics
//!
//! Aggregates per-song outcomes for the end-of-run summary.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::models::{SongOutcome, SongReport};

/// Outcome of every song seen in one run
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Per-song reports, in completion order
    pub reports: Vec<SongReport>,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn record(&mut self, path: PathBuf, title: Option<String>, outcome: SongOutcome) {
        self.reports.push(SongReport {
            path,
            title,
            outcome,
        });
    }

    /// Songs discovered (including ones with bad descriptors)
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    pub fn already_present(&self) -> usize {
        self.count(|o| matches!(o, SongOutcome::AlreadyPresent))
    }

    pub fn downloaded(&self) -> usize {
        self.count(|o| matches!(o, SongOutcome::Downloaded { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, SongOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SongOutcome::Failed { .. }))
    }

    pub fn cancelled(&self) -> usize {
        self.count(|o| matches!(o, SongOutcome::Cancelled))
    }

    /// Report for a song directory, if it was seen
    pub fn outcome_for(&self, path: &std::path::Path) -> Option<&SongOutcome> {
        self.reports
            .iter()
            .find(|r| r.path == path)
            .map(|r| &r.outcome)
    }

    fn count(&self, pred: impl Fn(&SongOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn display_string(&self) -> String {
        let mut summary = format!(
            "{} songs: {} found, {} downloaded, {} skipped, {} failed",
            self.total(),
            self.already_present(),
            self.downloaded(),
            self.skipped(),
            self.failed()
        );
        let cancelled = self.cancelled();
        if cancelled > 0 {
            summary.push_str(&format!(", {} cancelled", cancelled));
        }
        summary.push_str(&format!(" in {:.1}s", self.elapsed.as_secs_f64()));
        summary
    }
}
