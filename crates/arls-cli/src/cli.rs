//! CLI argument parsing using clap.

use clap::Parser;
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arls")]
#[command(author, about, long_about = None)]
pub struct Cli {
    /// Root paths to list (files, directories, or archives)
    #[arg(value_name = "PATH")]
    pub roots: Vec<PathBuf>,

    /// Root path to list; used when no positional paths are given
    #[arg(short = 'i', long = "i", value_name = "PATH")]
    pub inputs: Vec<PathBuf>,

    /// Print absolute as-if-extracted paths instead of archive-relative ones
    #[arg(long)]
    pub absolute_paths: bool,

    /// Output entries and messages as newline-delimited JSON
    #[arg(long)]
    pub json: bool,

    /// Long listing: prefix each entry with its variant
    #[arg(short = 'L', long = "L")]
    pub long_list: bool,

    /// Print full variant names instead of single letters in long listings
    #[arg(short = 'V', long = "V")]
    pub long_variant: bool,

    /// Path to the libmagic library (accepted for compatibility; detection
    /// is built in)
    #[arg(long, value_name = "PATH")]
    pub libmagic: Option<PathBuf>,

    /// Path to the libarchive library (accepted for compatibility; archive
    /// support is built in)
    #[arg(long, value_name = "PATH")]
    pub libarchive: Option<PathBuf>,

    /// Directory for archive extraction (default: a fresh temporary
    /// directory)
    #[arg(long, value_name = "DIR")]
    pub td: Option<PathBuf>,

    /// Stream all output over a unix socket instead of stdout/stderr
    #[arg(long, value_name = "PATH")]
    pub unix_socket_path: Option<PathBuf>,

    /// Verbose logging
    #[arg(short = 'v', long = "v")]
    pub verbose: bool,

    /// Keep the extraction directory instead of deleting it after the run
    #[arg(long)]
    pub keep_unpacked: bool,

    /// Column separator for text output
    #[arg(long, value_name = "STRING", default_value = "  ")]
    pub separator: String,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", value_enum)]
    pub completions: Option<Shell>,

    /// Trailing arguments; accepted but not interpreted
    #[arg(last = true, value_name = "ARGS")]
    pub passthrough: Vec<String>,
}

impl Cli {
    /// Roots to walk. Positional paths win; `-i` inputs apply only when no
    /// positional paths were given.
    #[must_use]
    pub fn root_paths(&self) -> &[PathBuf] {
        if self.roots.is_empty() {
            &self.inputs
        } else {
            &self.roots
        }
    }
}
