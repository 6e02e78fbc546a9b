//! Forward-only line iteration over a plain or compressed source.

use core::fmt::{self, Debug, Formatter};
use std::mem;
use std::time::{Duration, Instant};

use crate::error::Error;
use crate::input::Input;
use crate::options::Options;
use crate::producer::ChunkProducer;
use crate::source::ByteSource;
use crate::splitter::LineSplitter;
use crate::stats::{Mode, Stats};

/// Lifecycle of a [`LineReader`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum State {
    /// Opened, nothing read yet.
    Open,
    /// At least one chunk requested.
    Iterating,
    /// Source exhausted or iteration stopped by an error; resources released.
    Exhausted,
    /// Closed by the caller or by drop.
    Closed,
}

/// Where chunks come from.
enum Pipeline {
    /// Source opened, no chunk requested yet.
    Idle(ByteSource),
    /// Plain source read ahead on a producer thread.
    Background(ChunkProducer),
    /// Compressed source decoded on the caller's thread.
    Direct(ByteSource),
    /// Source and producer torn down.
    Released,
}

/// Reads the lines of a large text source in big chunks.
///
/// Plain sources are read ahead by one background thread into a bounded queue; compressed
/// sources are decoded synchronously, since the decompressor is the bottleneck anyway.
/// Lines are yielded in source order without their `\n`; a `\r` before it is kept.
///
/// Dropping the reader closes it, so resources are released on every exit path.
///
/// # Examples
///
/// ```
/// use chunk_lines::{Input, LineReader, Options};
///
/// # fn example() -> Result<(), chunk_lines::ChunkLinesError> {
/// let input = Input::from_bytes(b"ab\ncd\nef");
/// let options = Options::default().with_chunk_size(3);
/// let reader = LineReader::open(input, &options)?;
///
/// let lines = reader.collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(lines, ["ab", "cd", "ef"]);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub struct LineReader {
    file: String,
    mode: Mode,
    chunk_size: usize,
    queue_capacity: usize,
    pipeline: Pipeline,
    splitter: LineSplitter,
    /// Lines split from the latest chunk, not yet handed out.
    pending: std::vec::IntoIter<String>,
    state: State,
    lines_emitted: u64,
    bytes_read: u64,
    started: Option<Instant>,
    /// Frozen once the reader is exhausted or closed.
    elapsed: Option<Duration>,
}

impl LineReader {
    /// Opens `input` for line iteration.
    ///
    /// Compression is taken from `options` if forced, otherwise sniffed from the file
    /// extension. The chunk size defaults by compression.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for invalid options, `Error::InvalidMode` if the input is not a
    /// readable byte stream, and `Error::Io` if it cannot be opened.
    pub fn open(input: impl Into<Input>, options: &Options) -> Result<Self, Error> {
        options.validate()?;

        let input = input.into();
        let compression = options
            .compression()
            .unwrap_or_else(|| input.compression());
        let chunk_size = options.chunk_size_for(compression);
        let mode = if compression.is_compressed() {
            Mode::Compressed
        } else {
            Mode::Buffered
        };

        let source = ByteSource::open(input, compression)?;
        log::debug!(
            "opened {} ({compression}, {mode}, {chunk_size} byte chunks)",
            source.name()
        );

        Ok(Self {
            file: source.name().to_string(),
            mode,
            chunk_size,
            queue_capacity: options.queue_capacity(),
            pipeline: Pipeline::Idle(source),
            splitter: LineSplitter::new(options.encoding(), options.error_policy()),
            pending: Vec::new().into_iter(),
            state: State::Open,
            lines_emitted: 0,
            bytes_read: 0,
            started: None,
            elapsed: None,
        })
    }

    /// Returns the next line, or `None` once the source is exhausted.
    ///
    /// After exhaustion or an error, further calls return `None`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Closed` after [`close`](Self::close). Read and decode failures are
    /// returned once and end iteration; lines returned before them stay valid.
    pub fn next_line(&mut self) -> Result<Option<String>, Error> {
        loop {
            if self.state == State::Closed {
                return Err(Error::Closed);
            }

            if let Some(line) = self.pending.next() {
                self.lines_emitted += 1;
                return Ok(Some(line));
            }

            if self.state == State::Exhausted {
                return Ok(None);
            }

            if let Err(err) = self.advance() {
                self.finish();
                return Err(err);
            }
        }
    }

    /// Releases the source and joins the producer thread. Idempotent.
    pub fn close(&mut self) {
        if self.state == State::Closed {
            return;
        }

        self.finish();
        self.pending = Vec::new().into_iter();
        self.state = State::Closed;
        log::debug!("closed {}", self.file);
    }

    /// Snapshot of the counters with rates computed now.
    ///
    /// Remains available after the reader is closed.
    pub fn stats(&self) -> Stats {
        let elapsed = self
            .elapsed
            .or_else(|| self.started.map(|started| started.elapsed()))
            .unwrap_or_default();

        Stats::new(
            self.file.clone(),
            self.mode,
            self.lines_emitted,
            self.bytes_read,
            elapsed,
        )
    }

    /// File name of the source.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Whether a background producer or the synchronous path is used.
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Bytes requested per chunk.
    pub const fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Current lifecycle state.
    pub const fn state(&self) -> State {
        self.state
    }

    /// Whether [`close`](Self::close) has run.
    pub const fn is_closed(&self) -> bool {
        matches!(self.state, State::Closed)
    }

    /// Pulls one chunk and splits it, or flushes the carry at end of input.
    fn advance(&mut self) -> Result<(), Error> {
        let chunk = self.pull_chunk()?;

        if chunk.is_empty() {
            self.pending = self.splitter.finish()?.into_iter();
            self.finish();
            log::debug!("exhausted {} after {} bytes", self.file, self.bytes_read);
        } else {
            self.bytes_read += chunk.len() as u64;
            self.pending = self.splitter.push(&chunk)?.into_iter();
        }

        Ok(())
    }

    fn pull_chunk(&mut self) -> Result<Vec<u8>, Error> {
        if self.state == State::Open {
            self.start()?;
        }

        match &mut self.pipeline {
            Pipeline::Background(producer) => producer.recv(),
            Pipeline::Direct(source) => source.read_chunk(self.chunk_size),
            Pipeline::Idle(_) | Pipeline::Released => Ok(Vec::new()),
        }
    }

    /// Starts the clock and, for plain sources, the producer thread.
    fn start(&mut self) -> Result<(), Error> {
        self.started = Some(Instant::now());
        self.state = State::Iterating;

        self.pipeline = match mem::replace(&mut self.pipeline, Pipeline::Released) {
            Pipeline::Idle(source) if self.mode == Mode::Buffered => Pipeline::Background(
                ChunkProducer::spawn(source, self.chunk_size, self.queue_capacity)?,
            ),
            Pipeline::Idle(source) => Pipeline::Direct(source),
            pipeline => pipeline,
        };

        Ok(())
    }

    /// Freezes the clock and tears down the pipeline, keeping pending lines.
    fn finish(&mut self) {
        if self.elapsed.is_none() {
            self.elapsed = self.started.map(|started| started.elapsed());
        }

        // Dropping a producer disconnects its queue and joins its thread.
        self.pipeline = Pipeline::Released;

        if self.state != State::Closed {
            self.state = State::Exhausted;
        }
    }
}

impl Debug for LineReader {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineReader")
            .field("file", &self.file)
            .field("mode", &self.mode)
            .field("chunk_size", &self.chunk_size)
            .field("state", &self.state)
            .field("lines_emitted", &self.lines_emitted)
            .field("bytes_read", &self.bytes_read)
            .finish_non_exhaustive()
    }
}

/// Yields `Err(Closed)` on every call once the reader is closed, like
/// [`next_line`](LineReader::next_line). Adapters that skip errors, such as `flatten`, never
/// terminate on a closed reader; stop at the first error instead.
impl Iterator for LineReader {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

impl Drop for LineReader {
    fn drop(&mut self) {
        self.close();
    }
}
