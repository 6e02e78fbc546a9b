//! Sequential, memory-efficient iteration over the lines of large text files.
//!
//! `chunk-lines` reads plain, gzip, bzip2 and xz/lzma sources in large chunks and splits
//! them into lines without loading the whole input into memory. Plain sources are read ahead
//! by a background thread into a bounded queue so disk latency overlaps with decoding and
//! splitting; compressed sources are decoded on the caller's thread.
//!
//! Partial lines and partial characters at chunk boundaries are carried over to the next
//! chunk, so the emitted lines do not depend on the chunk size.
//!
//! ## Module structure
//!
//! - `input.rs`: Paths, stdin, handles and byte buffers
//! - `source/`: [`ByteSource`] pull interface and [`Compression`] sniffing
//! - `producer.rs`: [`ChunkProducer`] background reader over a bounded queue
//! - `decode.rs`: [`TextDecoder`] streaming chunk decoding
//! - `splitter.rs`: [`LineSplitter`] and the pure [`split_lines`]
//! - `line_reader.rs`: [`LineReader`] orchestration, lifecycle and counters
//! - `stats.rs`: [`Stats`] snapshots
//! - `timing.rs`: [`Timed`] per-call timing adapter
//! - `options/`: [`Options`], [`Encoding`] and [`ErrorPolicy`]
//! - `exit_code.rs`: Exit codes for the CLI
//!
//! # Examples
//!
//! ```
//! use chunk_lines::{Input, LineReader, Options};
//!
//! # fn example() -> Result<(), chunk_lines::ChunkLinesError> {
//! let options = Options::default().with_chunk_size(4);
//! let mut reader = LineReader::open(Input::from_bytes(b"line1\nline2\n"), &options)?;
//!
//! let mut lines = Vec::new();
//! while let Some(line) = reader.next_line()? {
//!     lines.push(line);
//! }
//! assert_eq!(lines, ["line1", "line2"]);
//!
//! let stats = reader.stats();
//! assert_eq!(stats.lines, 2);
//! assert_eq!(stats.bytes, 12);
//! reader.close();
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod decode;
pub mod error;
pub mod exit_code;
pub mod input;
pub mod line_reader;
pub mod options;
pub mod producer;
pub mod source;
pub mod splitter;
pub mod stats;
pub mod timing;

pub use decode::TextDecoder;
pub use error::Error as ChunkLinesError;
pub use exit_code::ExitCode;
pub use input::{Handle, Input};
pub use line_reader::{LineReader, State};
pub use options::{Options, encoding::Encoding, error_policy::ErrorPolicy};
pub use producer::ChunkProducer;
pub use source::{ByteSource, Compression};
pub use splitter::{LineSplitter, split_lines};
pub use stats::{Mode, Stats};
pub use timing::{CallTimings, Timed, TimedExt};
