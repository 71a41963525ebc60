//! Output transports: terminal streams or one unix socket connection.

use std::io;
use std::io::Write;
use std::os::unix::net::UnixStream;

/// Where rendered lines go. Selected once at startup.
///
/// The terminal splits errors from everything else; a socket carries every
/// category over the one connection. Writes are best-effort ordered
/// appends; a failed write is dropped rather than aborting the run.
pub enum Sink {
    /// Process standard streams.
    Terminal {
        /// Entries, info and warnings.
        stdout: io::Stdout,
        /// Errors.
        stderr: io::Stderr,
    },
    /// A connected unix domain socket.
    Socket(UnixStream),
}

impl Sink {
    /// Terminal sink over the process's standard streams.
    #[must_use]
    pub fn terminal() -> Self {
        Self::Terminal {
            stdout: io::stdout(),
            stderr: io::stderr(),
        }
    }

    pub(crate) fn write_out(&mut self, line: &str) {
        match self {
            Self::Terminal { stdout, .. } => {
                let _ = stdout.write_all(line.as_bytes());
            }
            Self::Socket(stream) => {
                let _ = stream.write_all(line.as_bytes());
            }
        }
    }

    pub(crate) fn write_err(&mut self, line: &str) {
        match self {
            Self::Terminal { stderr, .. } => {
                let _ = stderr.write_all(line.as_bytes());
            }
            Self::Socket(stream) => {
                let _ = stream.write_all(line.as_bytes());
            }
        }
    }
}
