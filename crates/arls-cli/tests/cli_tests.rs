//! Integration tests for arls-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use tempfile::TempDir;

use arls_core::test_utils;

fn arls_cmd() -> Command {
    cargo_bin_cmd!("arls")
}

/// `sample.zip` holding `a.txt`, `dir/`, `dir/b.txt` in that member order.
fn sample_zip(dir: &Path) -> PathBuf {
    let data = test_utils::ZipTestBuilder::new()
        .add_file("a.txt", b"alpha")
        .add_directory("dir/")
        .add_file("dir/b.txt", b"beta")
        .build();
    test_utils::write_fixture(dir, "sample.zip", &data)
}

/// `outer.zip` holding `a.txt` and a nested `inner.zip` with one member.
fn nested_zip(dir: &Path) -> PathBuf {
    let inner = test_utils::ZipTestBuilder::new()
        .add_file("x.txt", b"deep")
        .build();
    let outer = test_utils::ZipTestBuilder::new()
        .add_file("a.txt", b"top")
        .add_file("inner.zip", &inner)
        .build();
    test_utils::write_fixture(dir, "outer.zip", &outer)
}

fn sample_tar_gz(dir: &Path) -> PathBuf {
    let tar = test_utils::TarTestBuilder::new()
        .add_file("a.txt", b"one")
        .add_directory("sub/")
        .add_file("sub/b.txt", b"two")
        .build();
    test_utils::write_fixture(dir, "sample.tar.gz", &test_utils::gzip(&tar))
}

#[test]
fn test_help_flag() {
    arls_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "recursive archive content listing",
        ));
}

#[test]
fn test_zip_root_lists_members_in_archive_order() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());

    arls_cmd()
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "sample.zip/a.txt\nsample.zip/dir\nsample.zip/dir/b.txt\n",
        ))
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_tar_gz_root_lists_members() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_tar_gz(temp.path());

    arls_cmd()
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "sample.tar.gz/a.txt\nsample.tar.gz/sub\nsample.tar.gz/sub/b.txt\n",
        ));
}

/// A gzip file whose decompressed head is not a tar stream is a plain
/// file, not an archive.
#[test]
fn test_gzip_of_plain_text_is_a_regular_file() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = test_utils::write_fixture(
        temp.path(),
        "notes.txt.gz",
        &test_utils::gzip(b"just some text, nothing nested"),
    );

    arls_cmd()
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::diff("notes.txt.gz\n"));
}

#[test]
fn test_plain_file_root_is_a_single_line() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = test_utils::write_fixture(temp.path(), "notes.txt", b"plain");

    arls_cmd()
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::diff("notes.txt\n"));
}

#[test]
fn test_directory_root_lists_real_tree() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = temp.path().join("tree");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("a.txt"), b"a").unwrap();
    fs::write(root.join("sub/b.txt"), b"b").unwrap();

    arls_cmd()
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::diff("tree/a.txt\ntree/sub\ntree/sub/b.txt\n"));
}

/// A nested archive is reported itself and then burrowed into; its members
/// list under the archive's own name.
#[test]
fn test_nested_archive_members_are_listed() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = nested_zip(temp.path());

    arls_cmd()
        .arg("-L")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "R  outer.zip/a.txt\nA  outer.zip/inner.zip\nR  outer.zip/inner.zip/x.txt\n",
        ));
}

#[test]
fn test_absolute_paths_flag() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());

    let base = temp.path().join("sample.zip");
    let expected = format!(
        "{0}/a.txt\n{0}/dir\n{0}/dir/b.txt\n",
        base.display()
    );
    arls_cmd()
        .arg("--absolute-paths")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::diff(expected));
}

#[test]
fn test_long_listing_letters() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());

    arls_cmd()
        .arg("-L")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "R  sample.zip/a.txt\nD  sample.zip/dir\nR  sample.zip/dir/b.txt\n",
        ));
}

#[test]
fn test_long_listing_full_variant_names() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());

    arls_cmd()
        .arg("-L")
        .arg("-V")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "RegularFile  sample.zip/a.txt\nDirectory  sample.zip/dir\nRegularFile  sample.zip/dir/b.txt\n",
        ));
}

#[test]
fn test_custom_column_separator() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());

    arls_cmd()
        .arg("-L")
        .arg("--separator")
        .arg("|")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "R|sample.zip/a.txt\nD|sample.zip/dir\nR|sample.zip/dir/b.txt\n",
        ));
}

#[test]
fn test_json_output_is_valid_ndjson() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());

    let output = arls_cmd()
        .arg("--json")
        .arg(&root)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let lines: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).expect("invalid JSON line"))
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["variant"], "RegularFile");
    assert_eq!(lines[0]["archivePath"], "sample.zip/a.txt");
    assert_eq!(lines[1]["variant"], "Directory");
    assert_eq!(lines[1]["archivePath"], "sample.zip/dir");
    assert_eq!(lines[2]["archivePath"], "sample.zip/dir/b.txt");
}

/// JSON entries always carry both path fields; `absolutePath` is rooted
/// next to the root, never under any temp-directory prefix.
#[test]
fn test_json_absolute_paths_rooted_next_to_root() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());

    let output = arls_cmd()
        .arg("--json")
        .arg("--absolute-paths")
        .arg(&root)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let base = temp.path().display().to_string();
    for line in String::from_utf8(output).unwrap().lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        let absolute = value["absolutePath"].as_str().unwrap();
        assert!(absolute.starts_with(&base), "not rooted at fixture: {absolute}");
        assert!(!absolute.contains("arls_"), "scratch path leaked: {absolute}");
    }
}

/// A root that cannot be statted produces one error and does not stop the
/// remaining roots from being listed. The process still exits 0.
#[test]
fn test_missing_root_is_isolated() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let good = sample_zip(temp.path());
    let missing = temp.path().join("missing.zip");

    arls_cmd()
        .arg(&missing)
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("sample.zip/a.txt"))
        .stderr(predicate::str::starts_with("[ERR] couldn't stat root path"));
}

#[test]
fn test_i_flag_roots() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());

    arls_cmd()
        .arg("-i")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "sample.zip/a.txt\nsample.zip/dir\nsample.zip/dir/b.txt\n",
        ));
}

#[test]
fn test_trailing_args_after_double_dash_are_ignored() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());

    arls_cmd()
        .arg(&root)
        .arg("--")
        .arg("pattern")
        .arg("-x")
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "sample.zip/a.txt\nsample.zip/dir\nsample.zip/dir/b.txt\n",
        ));
}

#[test]
fn test_no_roots_is_a_quiet_success() {
    arls_cmd()
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_library_path_flags_warn_and_continue() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());

    arls_cmd()
        .arg("--libarchive")
        .arg("/usr/lib/libarchive.so")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "[WRN] ignoring '--libarchive': archive support is built in\n",
        ))
        .stdout(predicate::str::contains("sample.zip/a.txt"));
}

#[test]
fn test_verbose_announces_formats_and_scratch_directory() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());

    arls_cmd()
        .arg("-v")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "[INF] using built-in detection for formats: zip, tar, tar.gz, tar.bz2, tar.xz, tar.zst\n",
        ))
        .stdout(predicate::str::contains(
            "' as temporary path for archive extraction\n",
        ));
}

/// By default the extraction directory is deleted after the run, a
/// caller-supplied `--td` directory included.
#[test]
fn test_td_directory_is_removed_after_the_run() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());
    let td = temp.path().join("scratch");

    arls_cmd()
        .arg("--td")
        .arg(&td)
        .arg(&root)
        .assert()
        .success();

    assert!(!td.exists());
}

#[test]
fn test_keep_unpacked_preserves_extracted_files() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());
    let td = temp.path().join("scratch");

    arls_cmd()
        .arg("--td")
        .arg(&td)
        .arg("--keep-unpacked")
        .arg(&root)
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(td.join("sample.zip/a.txt")).unwrap(),
        "alpha"
    );
    assert_eq!(
        fs::read_to_string(td.join("sample.zip/dir/b.txt")).unwrap(),
        "beta"
    );
}

/// A dead socket is the one fatal startup error: exit 1, and the scratch
/// directory is never created.
#[test]
fn test_dead_socket_exits_one_without_scratch() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());
    let td = temp.path().join("never");

    arls_cmd()
        .arg("--unix-socket-path")
        .arg(temp.path().join("nobody-listens.sock"))
        .arg("--td")
        .arg(&td)
        .arg(&root)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "could not establish connection to unix socket",
        ));

    assert!(!td.exists());
}

/// With a live socket every category goes over the connection and the
/// process's own streams stay silent.
#[test]
fn test_live_socket_receives_all_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());
    let sock = temp.path().join("listing.sock");

    let listener = std::os::unix::net::UnixListener::bind(&sock).unwrap();
    let reader = std::thread::spawn(move || {
        let (mut conn, _) = listener.accept().unwrap();
        let mut received = String::new();
        conn.read_to_string(&mut received).unwrap();
        received
    });

    arls_cmd()
        .arg("--unix-socket-path")
        .arg(&sock)
        .arg("--json")
        .arg(&root)
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::is_empty());

    let received = reader.join().unwrap();
    let lines: Vec<&str> = received.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains(r#""archivePath":"sample.zip/a.txt""#));
}

#[test]
fn test_repeated_runs_are_identical() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let root = sample_zip(temp.path());

    let first = arls_cmd()
        .arg(&root)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let second = arls_cmd()
        .arg(&root)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    assert_eq!(first, second);
}

#[test]
fn test_completions_generation() {
    arls_cmd()
        .arg("--completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("arls"));
}
