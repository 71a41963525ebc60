//! The run loop: scratch-directory lifecycle, per-root walking, path
//! reconciliation, and reporting.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;

use arls_core::Entry;
use arls_core::EntryVariant;
use arls_core::Sniffer;
use arls_core::Walker;
use arls_core::paths;

use crate::output::Output;

/// Name prefix of self-created scratch directories.
const SCRATCH_PREFIX: &str = "arls_";

/// One run's inputs, fixed before any traversal starts.
pub struct RunOptions {
    /// Roots in reporting order.
    pub roots: Vec<PathBuf>,
    /// Caller-supplied extraction directory (`--td`).
    pub scratch_dir: Option<PathBuf>,
    /// Leave the extraction directory in place after the run.
    pub keep_unpacked: bool,
    /// Announce the scratch directory.
    pub verbose: bool,
}

/// Extraction area for one run.
///
/// Removal applies to caller-supplied directories too; `--keep-unpacked`
/// is the only way to keep extracted content around.
enum ScratchDir {
    Owned(tempfile::TempDir),
    Caller(PathBuf),
}

impl ScratchDir {
    /// Resolves the extraction area: the caller's directory (created when
    /// absent) or a fresh temporary directory.
    fn prepare(requested: Option<PathBuf>) -> io::Result<Self> {
        match requested {
            Some(dir) => {
                fs::create_dir_all(&dir)?;
                Ok(Self::Caller(dir))
            }
            None => {
                let dir = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;
                Ok(Self::Owned(dir))
            }
        }
    }

    fn path(&self) -> &Path {
        match self {
            Self::Owned(dir) => dir.path(),
            Self::Caller(dir) => dir,
        }
    }

    /// Removes the directory and everything under it.
    fn remove(self) -> io::Result<()> {
        match self {
            Self::Owned(dir) => dir.close(),
            Self::Caller(dir) => fs::remove_dir_all(dir),
        }
    }

    /// Disarms cleanup so the directory survives the run.
    fn keep(self) {
        if let Self::Owned(dir) = self {
            let _ = dir.keep();
        }
    }
}

/// Drives a whole run: walks every root and reports entries and failures
/// through `out`.
///
/// Per-root and per-entry failures are reported and never abort the run;
/// the process still finishes with status 0.
///
/// # Errors
///
/// Returns an error only when the scratch directory cannot be prepared,
/// since nothing can be extracted without one.
pub fn run(opts: &RunOptions, out: &mut Output) -> Result<()> {
    let scratch = ScratchDir::prepare(opts.scratch_dir.clone())
        .context("could not prepare temporary directory for archive extraction")?;
    if opts.verbose {
        out.info(&format!(
            "using '{}' as temporary path for archive extraction",
            scratch.path().display()
        ));
    }

    let walker = Walker::new(Sniffer::new());
    for root in &opts.roots {
        if let Err(err) = fs::metadata(root) {
            out.error(&format!(
                "couldn't stat root path '{}' - could not read the contents: {err}",
                root.display()
            ));
            continue;
        }
        walk_root(&walker, root, scratch.path(), out);
    }

    if opts.keep_unpacked {
        scratch.keep();
    } else {
        let dir = scratch.path().to_path_buf();
        if scratch.remove().is_err() {
            out.error(&format!("could not delete temporary dir {}", dir.display()));
        }
    }

    Ok(())
}

/// Walks one root, reconciling and reporting every item it yields.
fn walk_root(walker: &Walker, root: &Path, scratch: &Path, out: &mut Output) {
    let out_path = scratch.join(root.file_name().unwrap_or_default());
    let items = match walker.walk(root, &out_path) {
        Ok(items) => items,
        Err(err) => {
            out.error(&walk_failure(root, &err));
            return;
        }
    };
    for item in items {
        match item {
            Ok(record) => {
                let absolute = paths::absolute_path(&record.extracted_path, scratch, root);
                let entry = Entry {
                    variant: EntryVariant::from_flags(record.is_archive, record.is_directory),
                    archive_path: paths::archive_path(&absolute, root),
                    absolute_path: absolute.display().to_string(),
                };
                out.entry(&entry);
            }
            Err(err) => out.error(&walk_failure(root, &err)),
        }
    }
}

fn walk_failure(root: &Path, err: &impl fmt::Display) -> String {
    format!(
        "error while walking through the \"{}\" file: {err}",
        root.display()
    )
}
