//! JSON rendering: one compact object per line (NDJSON).

use arls_core::Entry;
use serde::Serialize;

/// Wire shape of an entry; serde emits fields in declaration order.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EntryLine<'a> {
    variant: &'a str,
    archive_path: &'a str,
    absolute_path: &'a str,
}

#[derive(Serialize)]
struct InfoLine<'a> {
    info: &'a str,
}

#[derive(Serialize)]
struct WrnLine<'a> {
    wrn: &'a str,
}

#[derive(Serialize)]
struct ErrLine<'a> {
    err: &'a str,
}

/// Serializing borrowed strings cannot fail; the fallback is unreachable.
fn to_line<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

pub(crate) fn entry_line(entry: &Entry) -> String {
    to_line(&EntryLine {
        variant: entry.variant.as_str(),
        archive_path: &entry.archive_path,
        absolute_path: &entry.absolute_path,
    })
}

pub(crate) fn info_line(msg: &str) -> String {
    to_line(&InfoLine { info: msg })
}

pub(crate) fn warn_line(msg: &str) -> String {
    to_line(&WrnLine { wrn: msg })
}

pub(crate) fn error_line(msg: &str) -> String {
    to_line(&ErrLine { err: msg })
}
