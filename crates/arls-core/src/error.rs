//! Error types for archive walking operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `WalkError`.
pub type Result<T> = std::result::Result<T, WalkError>;

/// Errors that can occur while walking a root or extracting archive members.
///
/// A `WalkError` produced for a single member travels as an `Err` item of the
/// walk iterator and does not end the walk; only a corrupt archive stream
/// ends the walk of that archive early.
#[derive(Error, Debug)]
pub enum WalkError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive is corrupted or could not be decoded.
    #[error("invalid archive {path}: {reason}")]
    InvalidArchive {
        /// The archive file that failed to decode.
        path: PathBuf,
        /// Decoder-reported reason.
        reason: String,
    },

    /// Archive member path would escape its extraction directory.
    #[error("archive entry path escapes its extraction directory: {path}")]
    UnsafePath {
        /// The offending member path as stored in the archive.
        path: PathBuf,
    },
}
