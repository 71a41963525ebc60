//! Classified entries as delivered to the output layer.

use std::fmt;

/// Classification of a discovered entry.
///
/// Derived from the walker's record flags only; classification never re-runs
/// format detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryVariant {
    /// A plain file (including symlinks and special files).
    RegularFile,
    /// A directory.
    Directory,
    /// A file identified as an archive.
    Archive,
}

impl EntryVariant {
    /// Maps walker flags to a variant. An entry flagged as both archive and
    /// directory counts as an archive.
    #[must_use]
    pub const fn from_flags(is_archive: bool, is_directory: bool) -> Self {
        if is_archive {
            Self::Archive
        } else if is_directory {
            Self::Directory
        } else {
            Self::RegularFile
        }
    }

    /// Full variant name, as used by long-variant listings and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RegularFile => "RegularFile",
            Self::Directory => "Directory",
            Self::Archive => "Archive",
        }
    }

    /// Single-letter form used by the default long-listing column.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            Self::RegularFile => 'R',
            Self::Directory => 'D',
            Self::Archive => 'A',
        }
    }
}

impl fmt::Display for EntryVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One classified, path-reconciled entry.
///
/// `archive_path` and `absolute_path` describe the same object under two
/// bases: the root/archive namespace and the real filesystem as if the
/// archive had been extracted next to the root. Both are forward-slash
/// strings; `archive_path` is derived from `absolute_path` by prefix
/// substitution, never computed independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Entry classification.
    pub variant: EntryVariant,
    /// Path within the root/archive namespace, starting with the root's
    /// basename.
    pub archive_path: String,
    /// Path resolved against the original root's location.
    pub absolute_path: String,
}
