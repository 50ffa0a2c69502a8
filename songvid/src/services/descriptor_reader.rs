//! song.ini descriptor reader
//!
//! Parses the `[song]` section of a descriptor into name and artist. Both
//! keys are required; absence is an error, never a default.
//!
//! Section and key names match case-insensitively (`[Song]`, `Artist = ...`
//! are common in the wild). Values are taken verbatim, without escape
//! processing.

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

const SONG_SECTION: &str = "song";

/// Descriptor errors
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// Required key absent or blank
    #[error("Descriptor {} is missing required field '{field}'", .path.display())]
    MissingField { path: PathBuf, field: &'static str },

    /// No `[song]` section at all
    #[error("Descriptor {} has no [song] section", .path.display())]
    MissingSection { path: PathBuf },

    /// File is not parseable as INI
    #[error("Malformed descriptor {}: {reason}", .path.display())]
    MalformedDescriptor { path: PathBuf, reason: String },

    /// File could not be read
    #[error("Cannot read descriptor {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DescriptorError {
    /// Descriptor file the error refers to
    pub fn path(&self) -> &Path {
        match self {
            Self::MissingField { path, .. }
            | Self::MissingSection { path }
            | Self::MalformedDescriptor { path, .. }
            | Self::Io { path, .. } => path,
        }
    }
}

/// Validated descriptor content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongDescriptor {
    pub name: String,
    pub artist: String,
}

/// Read and parse a descriptor file
///
/// Non-UTF-8 bytes are replaced rather than rejected; older charts are often
/// saved in a legacy code page.
pub fn read_descriptor(path: &Path) -> Result<SongDescriptor, DescriptorError> {
    let bytes = std::fs::read(path).map_err(|source| DescriptorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let content = String::from_utf8_lossy(&bytes);
    parse_descriptor(&content, path)
}

/// Parse descriptor text; `path` is only used for error reporting
pub fn parse_descriptor(content: &str, path: &Path) -> Result<SongDescriptor, DescriptorError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let ini = Ini::load_from_str_noescape(content).map_err(|e| {
        DescriptorError::MalformedDescriptor {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    let section = ini
        .iter()
        .find(|(name, _)| name.is_some_and(|n| n.trim().eq_ignore_ascii_case(SONG_SECTION)))
        .map(|(_, props)| props)
        .ok_or_else(|| DescriptorError::MissingSection {
            path: path.to_path_buf(),
        })?;

    let field = |key: &'static str| -> Result<String, DescriptorError> {
        section
            .iter()
            .find(|(k, _)| k.trim().eq_ignore_ascii_case(key))
            .map(|(_, v)| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .ok_or_else(|| DescriptorError::MissingField {
                path: path.to_path_buf(),
                field: key,
            })
    };

    Ok(SongDescriptor {
        name: field("name")?,
        artist: field("artist")?,
    })
}
