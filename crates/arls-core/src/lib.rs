//! Archive walking library with nested extraction and path reconciliation.
//!
//! `arls-core` enumerates the contents of a root path: a plain file, a
//! directory, or an archive (zip, tar, and compressed tar variants). It
//! streams one record per discovered entry. Archives found along the way,
//! including archives inside archives, are extracted into a scratch
//! directory and walked as well. Companion helpers rebase each record's
//! physical path onto the archive namespace and the original root's
//! location.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//!
//! use arls_core::Sniffer;
//! use arls_core::Walker;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let walker = Walker::new(Sniffer::new());
//! let walk = walker.walk(Path::new("sample.zip"), Path::new("/tmp/scratch/sample.zip"))?;
//! for item in walk {
//!     let record = item?;
//!     println!("{}", record.archive_path.display());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod entry;
pub mod error;
pub mod paths;
pub mod record;
pub mod sniff;
pub mod test_utils;
pub mod walk;

// Re-export main API types
pub use entry::Entry;
pub use entry::EntryVariant;
pub use error::Result;
pub use error::WalkError;
pub use record::RawExtractionRecord;
pub use sniff::ArchiveKind;
pub use sniff::Sniffer;
pub use sniff::TarCompression;
pub use walk::WalkIter;
pub use walk::Walker;
