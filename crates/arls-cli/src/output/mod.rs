//! Output composition: a transport sink crossed with a rendering style.

mod json;
mod sink;
mod text;

pub use sink::Sink;
pub use text::TextOptions;

use arls_core::Entry;

/// How entries and messages render. Selected once at startup.
pub enum Renderer {
    /// Human-readable lines.
    Text(TextOptions),
    /// Newline-delimited JSON objects.
    Json,
}

/// Composed output channel; every entry and message of a run goes through
/// one of these.
pub struct Output {
    sink: Sink,
    renderer: Renderer,
}

impl Output {
    /// Composes a sink with a renderer.
    #[must_use]
    pub fn new(sink: Sink, renderer: Renderer) -> Self {
        Self { sink, renderer }
    }

    /// Reports one listed entry.
    pub fn entry(&mut self, entry: &Entry) {
        let line = match &self.renderer {
            Renderer::Text(options) => text::entry_line(entry, options),
            Renderer::Json => json::entry_line(entry),
        };
        self.write_out(&line);
    }

    /// Reports a diagnostic message.
    pub fn info(&mut self, msg: &str) {
        let line = match &self.renderer {
            Renderer::Text(_) => text::info_line(msg),
            Renderer::Json => json::info_line(msg),
        };
        self.write_out(&line);
    }

    /// Reports a warning.
    pub fn warn(&mut self, msg: &str) {
        let line = match &self.renderer {
            Renderer::Text(_) => text::warn_line(msg),
            Renderer::Json => json::warn_line(msg),
        };
        self.write_out(&line);
    }

    /// Reports a non-fatal error.
    pub fn error(&mut self, msg: &str) {
        let line = match &self.renderer {
            Renderer::Text(_) => text::error_line(msg),
            Renderer::Json => json::error_line(msg),
        };
        self.write_err(&line);
    }

    fn write_out(&mut self, line: &str) {
        self.sink.write_out(&format!("{line}\n"));
    }

    fn write_err(&mut self, line: &str) {
        self.sink.write_err(&format!("{line}\n"));
    }
}
