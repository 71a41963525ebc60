//! Arls - lists the contents of archives, directories and plain files,
//! burrowing into nested archives.

mod cli;
mod output;
mod run;

use std::io;
use std::os::unix::net::UnixStream;

use anyhow::Context;
use anyhow::Result;
use arls_core::ArchiveKind;
use clap::CommandFactory;
use clap::Parser;

use crate::output::Output;
use crate::output::Renderer;
use crate::output::Sink;
use crate::output::TextOptions;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = cli::Cli::command();
        clap_complete::generate(shell, &mut cmd, "arls", &mut io::stdout());
        return Ok(());
    }

    // The socket is the one fatal dependency: nothing is created or walked
    // until the connection is up.
    let sink = match &cli.unix_socket_path {
        Some(path) => {
            let stream = UnixStream::connect(path).with_context(|| {
                format!(
                    "could not establish connection to unix socket at '{}'",
                    path.display()
                )
            })?;
            Sink::Socket(stream)
        }
        None => Sink::terminal(),
    };

    let renderer = if cli.json {
        Renderer::Json
    } else {
        Renderer::Text(TextOptions {
            absolute_paths: cli.absolute_paths,
            column_separator: cli.separator.clone(),
            long_list: cli.long_list,
            long_variant: cli.long_variant,
        })
    };
    let mut out = Output::new(sink, renderer);

    if cli.libmagic.is_some() {
        out.warn("ignoring '--libmagic': format detection is built in");
    }
    if cli.libarchive.is_some() {
        out.warn("ignoring '--libarchive': archive support is built in");
    }
    if cli.verbose {
        let formats = ArchiveKind::ALL.map(ArchiveKind::as_str).join(", ");
        out.info(&format!("using built-in detection for formats: {formats}"));
    }

    let opts = run::RunOptions {
        roots: cli.root_paths().to_vec(),
        scratch_dir: cli.td.clone(),
        keep_unpacked: cli.keep_unpacked,
        verbose: cli.verbose,
    };
    run::run(&opts, &mut out)
}
