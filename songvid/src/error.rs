//! Error types for songvid
//!
//! Component errors live next to their components. [`AcquisitionError`]
//! gathers them at the per-song boundary and maps each onto an [`ErrorKind`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::services::descriptor_reader::DescriptorError;
use crate::services::search_resolver::ResolveError;
use crate::types::FetchError;

/// Error categories reported per song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad descriptor, isolated to one song
    InputError,
    /// Search produced nothing usable
    ResolutionError,
    /// Download failed; triggers rollback
    FetchError,
    /// A song path could not be read or written
    FilesystemError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::InputError => "input error",
            Self::ResolutionError => "resolution error",
            Self::FetchError => "fetch error",
            Self::FilesystemError => "filesystem error",
        };
        f.write_str(name)
    }
}

/// Anything that can end one song's acquisition
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    Resolution(#[from] ResolveError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Cannot write {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AcquisitionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            // An unreadable descriptor is a filesystem problem, not bad content
            Self::Descriptor(DescriptorError::Io { .. }) => ErrorKind::FilesystemError,
            Self::Descriptor(_) => ErrorKind::InputError,
            Self::Resolution(_) => ErrorKind::ResolutionError,
            Self::Fetch(_) => ErrorKind::FetchError,
            Self::Filesystem { .. } => ErrorKind::FilesystemError,
        }
    }
}
