//! Per-song acquisition outcomes
//!
//! Every song the scanner yields ends in exactly one [`SongOutcome`]. Errors
//! below the orchestrator are converted into outcomes here and never escape
//! the per-song boundary.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AcquisitionError, ErrorKind};
use crate::models::SearchReference;

/// Final state of one song after an acquisition attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SongOutcome {
    /// Video was already on disk; nothing was done
    AlreadyPresent,
    /// Video fetched from `reference` during this run
    Downloaded { reference: SearchReference },
    /// Bad descriptor or no usable search result; nothing written
    Skipped { kind: ErrorKind, reason: String },
    /// Fetch or filesystem failure; partial state rolled back
    Failed { kind: ErrorKind, reason: String },
    /// Run was cancelled before a reference was recorded; nothing written
    Cancelled,
}

impl SongOutcome {
    /// Classify an error: input and resolution problems skip, the rest fail
    pub fn from_error(error: &AcquisitionError) -> Self {
        let kind = error.kind();
        let reason = error.to_string();
        match kind {
            ErrorKind::InputError | ErrorKind::ResolutionError => Self::Skipped { kind, reason },
            ErrorKind::FetchError | ErrorKind::FilesystemError => Self::Failed { kind, reason },
        }
    }

    /// Short label used in the per-song log line
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlreadyPresent => "found",
            Self::Downloaded { .. } => "downloaded",
            Self::Skipped { .. } => "skipped",
            Self::Failed { .. } => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Skipped { reason, .. } | Self::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Outcome of one song directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongReport {
    /// Song directory
    pub path: PathBuf,
    /// "name - artist" when the descriptor could be read
    pub title: Option<String>,
    pub outcome: SongOutcome,
}
