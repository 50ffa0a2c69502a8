//! Song directory record and its resolved search reference
//!
//! A [`SongRecord`] is identified by its directory. Every file location it
//! knows about (descriptor, video, provenance) is derived from that directory
//! on demand and never stored.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::services::descriptor_reader::{self, DescriptorError};

/// Descriptor file marking a song directory
pub const DESCRIPTOR_FILE: &str = "song.ini";

/// Video artifact fetched for a song
pub const VIDEO_FILE: &str = "video.mp4";

/// Marker holding the reference a video was fetched from
pub const PROVENANCE_FILE: &str = "video_origin.txt";

/// Top-ranked external locator for a song's video
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchReference(String);

impl SearchReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SearchReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SearchReference {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One discovered song directory
///
/// Lives for a single run: created by the scanner, consumed by the
/// orchestrator. The resolved reference is cached here so a record is
/// searched for at most once.
#[derive(Debug, Clone)]
pub struct SongRecord {
    path: PathBuf,
    /// Song title from the descriptor
    pub name: String,
    /// Artist exactly as written in the descriptor
    pub artist: String,
    top_link: Option<SearchReference>,
}

impl SongRecord {
    /// Create a record for an already-parsed descriptor
    pub fn new(path: impl Into<PathBuf>, name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            artist: artist.into(),
            top_link: None,
        }
    }

    /// Read the descriptor inside `dir` and build the record
    pub fn from_dir(dir: &Path) -> Result<Self, DescriptorError> {
        let descriptor = descriptor_reader::read_descriptor(&dir.join(DESCRIPTOR_FILE))?;
        Ok(Self::new(dir, descriptor.name, descriptor.artist))
    }

    /// Song directory (identity key)
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn descriptor_path(&self) -> PathBuf {
        self.path.join(DESCRIPTOR_FILE)
    }

    pub fn video_path(&self) -> PathBuf {
        self.path.join(VIDEO_FILE)
    }

    pub fn provenance_path(&self) -> PathBuf {
        self.path.join(PROVENANCE_FILE)
    }

    /// Whether the video artifact already exists
    pub fn has_video(&self) -> bool {
        self.video_path().is_file()
    }

    /// Reference resolved earlier in this run, if any
    pub fn top_link(&self) -> Option<&SearchReference> {
        self.top_link.as_ref()
    }

    pub(crate) fn remember_top_link(&mut self, reference: SearchReference) -> &SearchReference {
        self.top_link.insert(reference)
    }
}

impl PartialEq for SongRecord {
    fn eq(&self, other: &Self) -> bool {
        self.path == other.path
    }
}

impl Eq for SongRecord {}

impl fmt::Display for SongRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.artist)
    }
}
