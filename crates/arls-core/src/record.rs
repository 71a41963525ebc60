//! Raw records produced by the archive walker.

use std::path::{Path, PathBuf};

/// One filesystem object discovered under a root, as reported by the walker
/// before any path reconciliation.
///
/// `extracted_path` is where the object physically resides right now: under
/// the scratch directory for entries pulled out of an archive, or the real
/// filesystem path for entries found directly under a directory root.
/// `archive_path` is the object's path relative to its immediate containing
/// archive or root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExtractionRecord {
    /// Physical location of the entry at the time the record is emitted.
    pub extracted_path: PathBuf,
    /// Path relative to the containing archive or root.
    pub archive_path: PathBuf,
    /// Entry is itself an archive (as judged by the format sniffer).
    pub is_archive: bool,
    /// Entry is a directory.
    pub is_directory: bool,
}

impl RawExtractionRecord {
    /// Record for a regular (non-archive) file.
    pub fn file(extracted_path: impl Into<PathBuf>, archive_path: impl AsRef<Path>) -> Self {
        Self {
            extracted_path: extracted_path.into(),
            archive_path: archive_path.as_ref().to_path_buf(),
            is_archive: false,
            is_directory: false,
        }
    }

    /// Record for a directory.
    pub fn directory(extracted_path: impl Into<PathBuf>, archive_path: impl AsRef<Path>) -> Self {
        Self {
            extracted_path: extracted_path.into(),
            archive_path: archive_path.as_ref().to_path_buf(),
            is_archive: false,
            is_directory: true,
        }
    }

    /// Record for a file the sniffer identified as an archive.
    pub fn archive(extracted_path: impl Into<PathBuf>, archive_path: impl AsRef<Path>) -> Self {
        Self {
            extracted_path: extracted_path.into(),
            archive_path: archive_path.as_ref().to_path_buf(),
            is_archive: true,
            is_directory: false,
        }
    }
}
