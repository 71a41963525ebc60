//! Text rendering: one line per entry, `[INF]`/`[WRN]`/`[ERR]` prefixed
//! messages.

use arls_core::Entry;

/// Immutable text rendering configuration, built once from the CLI flags.
#[derive(Debug, Clone)]
pub struct TextOptions {
    /// Print `absolute_path` instead of `archive_path`.
    pub absolute_paths: bool,
    /// Separator between the variant column and the path.
    pub column_separator: String,
    /// Prefix each entry with its variant.
    pub long_list: bool,
    /// Spell variants out instead of single letters.
    pub long_variant: bool,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            absolute_paths: false,
            column_separator: "  ".to_string(),
            long_list: false,
            long_variant: false,
        }
    }
}

/// Renders one entry line, without the trailing newline.
///
/// The variant column only exists in long listings; `long_variant` has no
/// effect on its own.
pub(crate) fn entry_line(entry: &Entry, options: &TextOptions) -> String {
    let mut line = String::new();
    if options.long_list {
        if options.long_variant {
            line.push_str(entry.variant.as_str());
        } else {
            line.push(entry.variant.letter());
        }
        line.push_str(&options.column_separator);
    }
    if options.absolute_paths {
        line.push_str(&entry.absolute_path);
    } else {
        line.push_str(&entry.archive_path);
    }
    line
}

pub(crate) fn info_line(msg: &str) -> String {
    format!("[INF] {msg}")
}

pub(crate) fn warn_line(msg: &str) -> String {
    format!("[WRN] {msg}")
}

pub(crate) fn error_line(msg: &str) -> String {
    format!("[ERR] {msg}")
}
