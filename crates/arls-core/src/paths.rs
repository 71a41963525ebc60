//! Path reconciliation between scratch, root and archive namespaces.
//!
//! Every walked entry physically lives either at its real filesystem path or
//! somewhere under the scratch directory. The functions here rebase such a
//! path onto the two externally meaningful namespaces: the real filesystem
//! location next to the original root, and the `/`-separated archive
//! namespace starting at the root's basename.

use std::path::{Component, Path, PathBuf};

/// Rebases `extracted` from the scratch directory onto the original root's
/// parent directory.
///
/// The result reads as if extraction had happened in place next to the root,
/// regardless of where the scratch directory physically lives. A path that
/// does not carry the scratch prefix is returned unchanged; that is the
/// normal case for entries found directly on the real filesystem, not a
/// failure.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use arls_core::paths::absolute_path;
///
/// let abs = absolute_path(
///     Path::new("/scratch/sample.zip/a.txt"),
///     Path::new("/scratch"),
///     Path::new("/tmp/sample.zip"),
/// );
/// assert_eq!(abs, Path::new("/tmp/sample.zip/a.txt").to_path_buf());
/// ```
#[must_use]
pub fn absolute_path(extracted: &Path, scratch: &Path, root: &Path) -> PathBuf {
    match extracted.strip_prefix(scratch) {
        Ok(rest) => root.parent().unwrap_or(Path::new("")).join(rest),
        Err(_) => extracted.to_path_buf(),
    }
}

/// Derives the archive-namespace path from a reconciled absolute path.
///
/// The result starts with the root's basename and continues with the portion
/// of `absolute` inside the root, joined with `/` regardless of host
/// separator. When `absolute` is the root itself (plain-file root) the
/// result is just the basename. When `absolute` is not under the root the
/// basename is prepended to the whole slash-normalized path, so the walk
/// still produces a line rather than failing. A root without a basename
/// (`.`, `/`) contributes no leading component; the remainder stays
/// relative on its own.
#[must_use]
pub fn archive_path(absolute: &Path, root: &Path) -> String {
    let base = root
        .file_name()
        .map_or_else(String::new, |n| n.to_string_lossy().into_owned());
    let rest = match absolute.strip_prefix(root) {
        Ok(rest) => to_slash(rest),
        Err(_) => to_slash(absolute).trim_start_matches('/').to_owned(),
    };
    if rest.is_empty() {
        base
    } else if base.is_empty() {
        rest
    } else {
        format!("{base}/{rest}")
    }
}

/// Renders a path with `/` separators, dropping `.` components.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => {
                if out.is_empty() {
                    out.push('/');
                }
            }
            Component::CurDir => {}
            other => {
                if !(out.is_empty() || out.ends_with('/')) {
                    out.push('/');
                }
                out.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    out
}
