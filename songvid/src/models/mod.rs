//! Data models for songvid
//!
//! - Song records discovered on disk
//! - Per-song acquisition outcomes

pub mod outcome;
pub mod song;

pub use outcome::{SongOutcome, SongReport};
pub use song::{SearchReference, SongRecord, DESCRIPTOR_FILE, PROVENANCE_FILE, VIDEO_FILE};
