//! Walking roots: plain files, directories, and archives with nested
//! extraction.
//!
//! A walk runs on its own thread and streams [`RawExtractionRecord`]s
//! through a bounded channel, so the consumer pulls one record at a time
//! and an arbitrarily large archive never accumulates an entry list in
//! memory. Records arrive in discovery order: directory roots are walked
//! sorted by file name, archive members in archive order.
//!
//! A member that is itself an archive is re-rooted: the extracted file is
//! moved into a private staging area and its contents are extracted into a
//! directory bearing the archive's own name, so a nested archive reads as a
//! directory in the reconciled namespace.

use std::fmt;
use std::fs;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::mpsc::SyncSender;
use std::thread;
use std::thread::JoinHandle;

use walkdir::WalkDir;

use crate::error::WalkError;
use crate::record::RawExtractionRecord;
use crate::sniff::ArchiveKind;
use crate::sniff::Sniffer;
use crate::sniff::TarCompression;

/// Bound on records in flight between the walker thread and the consumer.
const CHANNEL_CAPACITY: usize = 64;

type Item = Result<RawExtractionRecord, WalkError>;

/// The consumer dropped the iterator; the walk stops quietly.
struct ReceiverGone;

type Flow = Result<(), ReceiverGone>;

fn send(tx: &SyncSender<Item>, item: Item) -> Flow {
    tx.send(item).map_err(|_| ReceiverGone)
}

/// Walks roots into streams of raw extraction records.
///
/// One walker serves a whole run; each [`Walker::walk`] call starts an
/// independent walk of one root.
#[derive(Debug, Clone, Copy)]
pub struct Walker {
    sniffer: Sniffer,
}

impl Walker {
    /// Creates a walker using `sniffer` to decide what is an archive.
    #[must_use]
    pub fn new(sniffer: Sniffer) -> Self {
        Self { sniffer }
    }

    /// Starts walking `root`, extracting any archive contents under
    /// `out_path`.
    ///
    /// The returned iterator yields one item per discovered entry; an `Err`
    /// item reports a per-entry failure and the walk continues behind it.
    /// Dropping the iterator early stops the walk.
    ///
    /// # Errors
    ///
    /// Returns an error when the walker thread cannot be spawned. Problems
    /// with the root itself are reported as iterator items, not here.
    pub fn walk(&self, root: &Path, out_path: &Path) -> io::Result<WalkIter> {
        let job = WalkJob {
            sniffer: self.sniffer,
            root: root.to_path_buf(),
            out_path: out_path.to_path_buf(),
            stage: None,
            stage_seq: 0,
        };
        let (tx, rx) = mpsc::sync_channel(CHANNEL_CAPACITY);
        let handle = thread::Builder::new()
            .name("arls-walk".into())
            .spawn(move || {
                let _ = job.run(&tx);
            })?;
        Ok(WalkIter {
            rx: Some(rx),
            handle: Some(handle),
        })
    }
}

/// Pull-based stream of walk results.
///
/// `next` blocks until the walker produces the next record, the walk ends,
/// or a failure is reported. The walker thread is joined when the stream is
/// exhausted or the iterator is dropped.
pub struct WalkIter {
    rx: Option<mpsc::Receiver<Item>>,
    handle: Option<JoinHandle<()>>,
}

impl Iterator for WalkIter {
    type Item = Result<RawExtractionRecord, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.rx.as_ref().and_then(|rx| rx.recv().ok());
        if item.is_none() {
            self.shutdown();
        }
        item
    }
}

impl WalkIter {
    /// Disconnects the channel first so a sender blocked on a full channel
    /// wakes up and exits before the join.
    fn shutdown(&mut self) {
        self.rx = None;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for WalkIter {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// State owned by the walker thread for one walk.
struct WalkJob {
    sniffer: Sniffer,
    root: PathBuf,
    out_path: PathBuf,
    /// Staging area for nested archives, created lazily under `out_path`.
    stage: Option<tempfile::TempDir>,
    stage_seq: u64,
}

impl WalkJob {
    fn run(mut self, tx: &SyncSender<Item>) -> Flow {
        let root = self.root.clone();
        let meta = match fs::metadata(&root) {
            Ok(meta) => meta,
            Err(e) => return send(tx, Err(e.into())),
        };
        if meta.is_dir() {
            self.walk_dir(&root, tx)
        } else {
            self.walk_file_root(&root, tx)
        }
    }

    /// Directory root: real filesystem descent, sorted for reproducible
    /// output. Files identified as archives are recorded and then extracted
    /// under `out_path/<relative path>/`.
    fn walk_dir(&mut self, root: &Path, tx: &SyncSender<Item>) -> Flow {
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    send(tx, Err(WalkError::Io(e.into())))?;
                    continue;
                }
            };
            let path = entry.path().to_path_buf();
            let rel = path
                .strip_prefix(root)
                .map_or_else(|_| path.clone(), Path::to_path_buf);
            let file_type = entry.file_type();
            if file_type.is_dir() {
                send(tx, Ok(RawExtractionRecord::directory(&path, &rel)))?;
            } else if file_type.is_file() {
                let kind = match self.sniffer.sniff_file(&path) {
                    Ok(kind) => kind,
                    Err(e) => {
                        send(tx, Err(e.into()))?;
                        continue;
                    }
                };
                if let Some(kind) = kind {
                    send(tx, Ok(RawExtractionRecord::archive(&path, &rel)))?;
                    let dest = self.out_path.join(&rel);
                    self.extract_archive(&path, kind, &dest, tx)?;
                } else {
                    send(tx, Ok(RawExtractionRecord::file(&path, &rel)))?;
                }
            } else {
                // Symlinks and special files are reported, never followed.
                send(tx, Ok(RawExtractionRecord::file(&path, &rel)))?;
            }
        }
        Ok(())
    }

    /// Regular-file root: an archive streams its members, anything else is
    /// exactly one record for the file itself. The root archive is not a
    /// record of its own walk.
    fn walk_file_root(&mut self, root: &Path, tx: &SyncSender<Item>) -> Flow {
        match self.sniffer.sniff_file(root) {
            Ok(Some(kind)) => {
                let dest = self.out_path.clone();
                self.extract_archive(root, kind, &dest, tx)
            }
            Ok(None) => {
                let name = root.file_name().map(PathBuf::from).unwrap_or_default();
                send(tx, Ok(RawExtractionRecord::file(root, name)))
            }
            Err(e) => send(tx, Err(e.into())),
        }
    }

    fn extract_archive(
        &mut self,
        archive: &Path,
        kind: ArchiveKind,
        dest: &Path,
        tx: &SyncSender<Item>,
    ) -> Flow {
        if let Err(e) = fs::create_dir_all(dest) {
            return send(tx, Err(e.into()));
        }
        match kind {
            ArchiveKind::Zip => self.extract_zip(archive, dest, tx),
            ArchiveKind::Tar(compression) => self.extract_tar(archive, compression, dest, tx),
        }
    }

    fn extract_zip(&mut self, archive: &Path, dest: &Path, tx: &SyncSender<Item>) -> Flow {
        let file = match File::open(archive) {
            Ok(file) => file,
            Err(e) => return send(tx, Err(e.into())),
        };
        let mut zip = match zip::ZipArchive::new(file) {
            Ok(zip) => zip,
            Err(e) => return send(tx, Err(invalid(archive, e))),
        };
        for index in 0..zip.len() {
            let mut member = match zip.by_index(index) {
                Ok(member) => member,
                Err(e) => {
                    send(tx, Err(invalid(archive, e)))?;
                    continue;
                }
            };
            let Some(rel) = member.enclosed_name() else {
                send(
                    tx,
                    Err(WalkError::UnsafePath {
                        path: PathBuf::from(member.name()),
                    }),
                )?;
                continue;
            };
            if rel.as_os_str().is_empty() {
                continue;
            }
            let target = dest.join(&rel);
            if member.is_dir() {
                if let Err(e) = fs::create_dir_all(&target) {
                    send(tx, Err(e.into()))?;
                    continue;
                }
                send(tx, Ok(RawExtractionRecord::directory(&target, &rel)))?;
            } else if is_zip_symlink(&member) {
                send(tx, Ok(RawExtractionRecord::file(&target, &rel)))?;
            } else {
                if let Err(e) = write_member(&mut member, &target) {
                    send(tx, Err(e))?;
                    continue;
                }
                self.emit_extracted_file(&target, &rel, tx)?;
            }
        }
        Ok(())
    }

    fn extract_tar(
        &mut self,
        archive: &Path,
        compression: TarCompression,
        dest: &Path,
        tx: &SyncSender<Item>,
    ) -> Flow {
        let file = match File::open(archive) {
            Ok(file) => file,
            Err(e) => return send(tx, Err(e.into())),
        };
        let decoder = match compression.decoder(io::BufReader::new(file)) {
            Ok(decoder) => decoder,
            Err(e) => return send(tx, Err(invalid(archive, e))),
        };
        let mut tar = tar::Archive::new(decoder);
        let entries = match tar.entries() {
            Ok(entries) => entries,
            Err(e) => return send(tx, Err(invalid(archive, e))),
        };
        for entry in entries {
            let mut entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // The stream cannot be resynchronized after a bad header.
                    return send(tx, Err(invalid(archive, e)));
                }
            };
            let raw = match entry.path() {
                Ok(raw) => raw.into_owned(),
                Err(e) => {
                    send(tx, Err(invalid(archive, e)))?;
                    continue;
                }
            };
            let Some(rel) = sanitize_member_path(&raw) else {
                send(tx, Err(WalkError::UnsafePath { path: raw }))?;
                continue;
            };
            if rel.as_os_str().is_empty() {
                continue;
            }
            let target = dest.join(&rel);
            match entry.header().entry_type() {
                tar::EntryType::Directory => {
                    if let Err(e) = fs::create_dir_all(&target) {
                        send(tx, Err(e.into()))?;
                        continue;
                    }
                    send(tx, Ok(RawExtractionRecord::directory(&target, &rel)))?;
                }
                tar::EntryType::Symlink
                | tar::EntryType::Link
                | tar::EntryType::Char
                | tar::EntryType::Block
                | tar::EntryType::Fifo => {
                    send(tx, Ok(RawExtractionRecord::file(&target, &rel)))?;
                }
                _ => {
                    if let Err(e) = write_member(&mut entry, &target) {
                        send(tx, Err(e))?;
                        continue;
                    }
                    self.emit_extracted_file(&target, &rel, tx)?;
                }
            }
        }
        Ok(())
    }

    /// Sniffs a freshly extracted file, records it, and burrows into it if
    /// it turned out to be another archive.
    fn emit_extracted_file(&mut self, target: &Path, rel: &Path, tx: &SyncSender<Item>) -> Flow {
        match self.sniffer.sniff_file(target) {
            Ok(Some(kind)) => {
                send(tx, Ok(RawExtractionRecord::archive(target, rel)))?;
                self.burrow(target, kind, tx)
            }
            Ok(None) => send(tx, Ok(RawExtractionRecord::file(target, rel))),
            Err(e) => send(tx, Err(e.into())),
        }
    }

    /// Replaces an extracted archive file with a directory of the same name
    /// holding the archive's contents. The file is renamed into the staging
    /// area, extracted from there into its vacated path, then deleted.
    fn burrow(&mut self, target: &Path, kind: ArchiveKind, tx: &SyncSender<Item>) -> Flow {
        let staged = match self.stage_path() {
            Ok(staged) => staged,
            Err(e) => return send(tx, Err(e.into())),
        };
        if let Err(e) = fs::rename(target, &staged) {
            return send(tx, Err(e.into()));
        }
        self.extract_archive(&staged, kind, target, tx)?;
        let _ = fs::remove_file(&staged);
        Ok(())
    }

    /// Next free path in the staging area. The area lives under `out_path`
    /// with a randomized name so no archive member can collide with it, and
    /// is removed when the walk ends.
    fn stage_path(&mut self) -> io::Result<PathBuf> {
        if self.stage.is_none() {
            let dir = tempfile::Builder::new()
                .prefix(".stage-")
                .tempdir_in(&self.out_path)?;
            self.stage = Some(dir);
        }
        self.stage_seq += 1;
        let base = self
            .stage
            .as_ref()
            .map_or(self.out_path.as_path(), tempfile::TempDir::path);
        Ok(base.join(self.stage_seq.to_string()))
    }
}

fn invalid(path: &Path, error: impl fmt::Display) -> WalkError {
    WalkError::InvalidArchive {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

fn write_member<R: Read>(reader: &mut R, target: &Path) -> Result<(), WalkError> {
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut out = File::create(target)?;
    io::copy(reader, &mut out)?;
    Ok(())
}

/// Normalizes an archive member path: `.` components are dropped; `..`,
/// absolute paths and prefixes reject the whole path.
fn sanitize_member_path(path: &Path) -> Option<PathBuf> {
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(clean)
}

fn is_zip_symlink<R: io::Read + io::Seek>(member: &zip::read::ZipFile<'_, R>) -> bool {
    const S_IFLNK: u32 = 0o120_000;
    member
        .unix_mode()
        .is_some_and(|mode| (mode & S_IFLNK) == S_IFLNK)
}
