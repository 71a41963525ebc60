//! Content-based archive format detection.
//!
//! Detection looks at magic bytes only, never at file extensions. For the
//! compressed candidates (gzip, bzip2, xz, zstd) the container signature
//! alone does not make the file an archive: the sniffer decompresses the
//! head of the stream and probes for a tar header, so `notes.txt.gz` stays
//! a regular file while `src.tar.gz` is walked.

use std::fmt;
use std::fs::File;
use std::io;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

/// Bytes inspected when classifying a file or a decompressed stream. One tar
/// header block is 512 bytes, and every signature fits well within that.
const HEAD_LEN: usize = 512;

/// Offset of the `ustar` magic inside a tar header block.
const TAR_MAGIC_OFFSET: usize = 257;

/// Archive format the walker knows how to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// ZIP archive.
    Zip,
    /// Tar stream, possibly behind a compression codec.
    Tar(TarCompression),
}

/// Compression codec wrapping a tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TarCompression {
    /// Plain uncompressed tar.
    None,
    /// Gzip.
    Gzip,
    /// Bzip2.
    Bzip2,
    /// Xz.
    Xz,
    /// Zstd.
    Zstd,
}

impl ArchiveKind {
    /// Every format the walker supports, in the order used for diagnostics.
    pub const ALL: [Self; 6] = [
        Self::Zip,
        Self::Tar(TarCompression::None),
        Self::Tar(TarCompression::Gzip),
        Self::Tar(TarCompression::Bzip2),
        Self::Tar(TarCompression::Xz),
        Self::Tar(TarCompression::Zstd),
    ];

    /// Conventional name of the format.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::Tar(TarCompression::None) => "tar",
            Self::Tar(TarCompression::Gzip) => "tar.gz",
            Self::Tar(TarCompression::Bzip2) => "tar.bz2",
            Self::Tar(TarCompression::Xz) => "tar.xz",
            Self::Tar(TarCompression::Zstd) => "tar.zst",
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TarCompression {
    /// Wraps `reader` in the decoder for this codec.
    ///
    /// # Errors
    ///
    /// Returns an error when the zstd decoder cannot be initialized from the
    /// stream head.
    pub fn decoder<R: Read>(self, reader: R) -> io::Result<Decoder<R>> {
        Ok(match self {
            Self::None => Decoder::Plain(reader),
            Self::Gzip => Decoder::Gzip(Box::new(flate2::read::GzDecoder::new(reader))),
            Self::Bzip2 => Decoder::Bzip2(Box::new(bzip2::read::BzDecoder::new(reader))),
            Self::Xz => Decoder::Xz(Box::new(xz2::read::XzDecoder::new(reader))),
            Self::Zstd => Decoder::Zstd(Box::new(zstd::stream::read::Decoder::new(reader)?)),
        })
    }
}

/// Decoder wrapper so tar walking is generic over the compression codec.
pub enum Decoder<R: Read> {
    /// No decompression.
    Plain(R),
    /// Gzip decoder.
    Gzip(Box<flate2::read::GzDecoder<R>>),
    /// Bzip2 decoder.
    Bzip2(Box<bzip2::read::BzDecoder<R>>),
    /// Xz decoder.
    Xz(Box<xz2::read::XzDecoder<R>>),
    /// Zstd decoder.
    Zstd(Box<zstd::stream::read::Decoder<'static, io::BufReader<R>>>),
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(r) => r.read(buf),
            Self::Gzip(d) => d.read(buf),
            Self::Bzip2(d) => d.read(buf),
            Self::Xz(d) => d.read(buf),
            Self::Zstd(d) => d.read(buf),
        }
    }
}

/// Classifies a head-of-file byte slice by magic signature.
///
/// Compressed candidates are reported as their tar variant without
/// confirming the inner stream; [`Sniffer::sniff_file`] performs that
/// confirmation. Returns `None` for anything unrecognized.
#[must_use]
pub fn detect_format(data: &[u8]) -> Option<ArchiveKind> {
    match data {
        [0x50, 0x4B, 0x03, 0x04, ..] | [0x50, 0x4B, 0x05, 0x06, ..] => Some(ArchiveKind::Zip),
        [0x1F, 0x8B, ..] => Some(ArchiveKind::Tar(TarCompression::Gzip)),
        [0x42, 0x5A, 0x68, ..] => Some(ArchiveKind::Tar(TarCompression::Bzip2)),
        [0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00, ..] => Some(ArchiveKind::Tar(TarCompression::Xz)),
        [0x28, 0xB5, 0x2F, 0xFD, ..] => Some(ArchiveKind::Tar(TarCompression::Zstd)),
        _ => is_tar_header(data).then_some(ArchiveKind::Tar(TarCompression::None)),
    }
}

/// A full header block with `ustar` at offset 257 covers both the POSIX
/// (`ustar\0`) and GNU (`ustar `) magic.
fn is_tar_header(data: &[u8]) -> bool {
    data.len() >= HEAD_LEN && data[TAR_MAGIC_OFFSET..TAR_MAGIC_OFFSET + 5] == *b"ustar"
}

/// File-type oracle deciding whether a file is a walkable archive.
///
/// Constructed once per run, queried per candidate file, dropped at
/// shutdown. Construction cannot fail; detection is built in rather than
/// loaded from a shared library.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sniffer;

impl Sniffer {
    /// Creates a sniffer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Classifies the file at `path`, returning `None` when it is not a
    /// supported archive.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened or its head cannot be
    /// read. Decode failures while probing a compressed candidate are not
    /// errors; such a file is simply not an archive.
    pub fn sniff_file(&self, path: &Path) -> io::Result<Option<ArchiveKind>> {
        let mut file = File::open(path)?;
        let head = read_head(&mut file)?;
        match detect_format(&head) {
            Some(ArchiveKind::Tar(compression)) if compression != TarCompression::None => {
                file.rewind()?;
                Ok(confirm_compressed_tar(file, compression))
            }
            other => Ok(other),
        }
    }
}

fn read_head<R: Read>(reader: &mut R) -> io::Result<Vec<u8>> {
    let mut head = Vec::with_capacity(HEAD_LEN);
    reader.take(HEAD_LEN as u64).read_to_end(&mut head)?;
    Ok(head)
}

fn confirm_compressed_tar(file: File, compression: TarCompression) -> Option<ArchiveKind> {
    let mut decoder = compression.decoder(file).ok()?;
    let head = read_head(&mut decoder).ok()?;
    is_tar_header(&head).then_some(ArchiveKind::Tar(compression))
}
