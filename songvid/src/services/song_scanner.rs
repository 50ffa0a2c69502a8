//! Song directory scanner
//!
//! Recursive discovery of directories holding a `song.ini` descriptor.
//! Archives unpack into nested or duplicated layouts, so depth is unlimited
//! and every matching directory is reported on its own.
//!
//! Scanning is lazy: [`SongScanner::scan`] validates the root and returns an
//! iterator that walks the tree as it is consumed. A bad descriptor yields an
//! `Err` for that directory only; the walk continues.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::models::{SongRecord, DESCRIPTOR_FILE};
use crate::services::descriptor_reader::DescriptorError;

/// Scan root errors (fatal for the whole run)
#[derive(Debug, Error)]
pub enum ScanError {
    /// Specified path does not exist
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Path exists but is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Root could not be resolved to an absolute path
    #[error("File access error {}: {}", .0.display(), .1)]
    FileAccessError(PathBuf, String),
}

/// Song directory scanner
#[derive(Debug, Clone)]
pub struct SongScanner {
    ignore_names: Vec<String>,
    follow_links: bool,
}

impl SongScanner {
    /// Create new scanner with default ignore list
    ///
    /// Skips version control and OS metadata directories.
    pub fn new() -> Self {
        Self {
            ignore_names: vec![
                ".git".to_string(),
                ".svn".to_string(),
                "__MACOSX".to_string(),
            ],
            follow_links: false,
        }
    }

    /// Descend into symlinked directories (walkdir reports loops as errors)
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// Start scanning `root_path`
    ///
    /// Fails only if the root itself is unusable. Yielded record paths are
    /// absolute.
    pub fn scan(&self, root_path: &Path) -> Result<SongDirs, ScanError> {
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        let root = root_path
            .canonicalize()
            .map_err(|e| ScanError::FileAccessError(root_path.to_path_buf(), e.to_string()))?;

        tracing::debug!(root = %root.display(), "Scanning for song directories");

        let ignore_names = self.ignore_names.clone();
        let entries = WalkDir::new(&root)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |e| {
                let name = e.file_name().to_string_lossy();
                !ignore_names.iter().any(|ignored| *ignored == name)
            });

        Ok(SongDirs {
            entries: Box::new(entries),
            seen: HashSet::new(),
        })
    }
}

impl Default for SongScanner {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy sequence of song directories, depth-first
pub struct SongDirs {
    entries: Box<dyn Iterator<Item = walkdir::Result<walkdir::DirEntry>> + Send>,
    seen: HashSet<PathBuf>,
}

impl Iterator for SongDirs {
    type Item = Result<SongRecord, DescriptorError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Error accessing entry: {}", e);
                    continue;
                }
            };

            if entry.file_name() != DESCRIPTOR_FILE || !entry.path().is_file() {
                continue;
            }

            let Some(dir) = entry.path().parent() else {
                continue;
            };

            // The same directory can be reached twice through symlinks
            let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
            if !self.seen.insert(dir.clone()) {
                tracing::debug!(path = %dir.display(), "Song directory already seen");
                continue;
            }

            return Some(SongRecord::from_dir(&dir));
        }
    }
}
