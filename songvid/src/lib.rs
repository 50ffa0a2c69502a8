//! songvid library interface
//!
//! Finds song directories (`song.ini`), resolves a music video for each and
//! fetches it to `video.mp4` exactly once, rolling back on failure.
//!
//! Exposes public APIs for the binary and for integration testing.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod types;

pub use crate::error::{AcquisitionError, ErrorKind};
pub use crate::models::{SearchReference, SongOutcome, SongRecord};
pub use crate::services::{AcquisitionOrchestrator, RunSummary, SongScanner};
