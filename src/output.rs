//! Write trait abstractions for stdout, stderr and files.

use std::fmt::{self, Debug, Formatter};
use std::fs::File;
use std::io::{self, BufWriter, ErrorKind::BrokenPipe, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// `Writer` dynamic dispatches the `Write` trait.
pub(crate) type Writer = Box<dyn Write>;

/// `Output` writes to either a file or stream like stdout or stderr.
pub(crate) struct Output {
    writer: Writer,
    /// Set once the reading end of a pipe has gone away.
    broken: bool,
}

impl Debug for Output {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("writer", &"<dyn Write>")
            .field("broken", &self.broken)
            .finish()
    }
}

impl Output {
    /// Creates an `Output` from optional arguments, choosing between file or stdout.
    pub(crate) fn new(output: Option<&Path>) -> Result<Self> {
        match output {
            Some(path) if path == Path::new("-") => Ok(Self::stdout()),
            Some(path) => Self::file(path),
            None => Ok(Self::stdout()),
        }
    }

    /// Creates an `Output` that writes to a file with error context.
    pub(crate) fn file(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create output file: {}", path.display()))?;

        Ok(Self::from_writer(BufWriter::new(file)))
    }

    /// Creates an `Output` that writes to stdout.
    pub(crate) fn stdout() -> Self {
        Self::from_writer(BufWriter::new(io::stdout().lock()))
    }

    /// Creates an `Output` that writes to stderr.
    pub(crate) fn stderr() -> Self {
        Self::from_writer(io::stderr().lock())
    }

    /// Creates an `Output` from a writer.
    pub(crate) fn from_writer<W: Write + 'static>(writer: W) -> Self {
        Self {
            writer: Box::new(writer),
            broken: false,
        }
    }

    /// Writes a line followed by `\n`.
    pub(crate) fn write_line(&mut self, line: &str) -> Result<()> {
        let result = self
            .writer
            .write_all(line.as_bytes())
            .and_then(|()| self.writer.write_all(b"\n"));
        self.handle_broken_pipe(result)
    }

    /// Writes text as is.
    pub(crate) fn write_chunk(&mut self, chunk: &str) -> Result<()> {
        let result = self.writer.write_all(chunk.as_bytes());
        self.handle_broken_pipe(result)
    }

    /// Flushes the writer, ensuring all output is written.
    pub(crate) fn flush(&mut self) -> Result<()> {
        let result = self.writer.flush();
        self.handle_broken_pipe(result)
    }

    /// Whether the reader of a pipe has gone away.
    pub(crate) const fn is_broken(&self) -> bool {
        self.broken
    }

    /// Processes the result of a write, treating `BrokenPipe` as a clean stop.
    fn handle_broken_pipe(&mut self, result: io::Result<()>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == BrokenPipe => {
                self.broken = true;
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

