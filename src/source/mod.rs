//! Uniform pull interface over plain and decompressed bytes.
//!
//! A [`ByteSource`] hides which codec, if any, sits between the raw stream and the line
//! splitter. Every variant answers the same question: give me up to `n` more bytes.
//!
//! - **Plain**: bytes straight from the file, stdin, handle or buffer
//! - **Gzip**: `flate2` multi-member decoder
//! - **Bzip2**: `bzip2` multi-stream decoder
//! - **Xz**: `xz2` auto decoder, covering both `.xz` and legacy `.lzma`

pub mod compression;

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::io::{self, Read};

use bzip2::read::MultiBzDecoder;
use flate2::read::MultiGzDecoder;
use xz2::read::XzDecoder;
use xz2::stream::{CONCATENATED, Stream};

pub use self::compression::Compression;
use crate::error::Error;
use crate::input::Input;

type RawReader = Box<dyn Read + Send>;

/// Largest buffer allocated before the first byte of a chunk is read.
const PREALLOC_LIMIT: usize = Compression::PLAIN_CHUNK_SIZE;

/// Decoder state for each supported format.
enum Codec {
    Plain(RawReader),
    Gzip(Box<MultiGzDecoder<Tagged>>),
    Bzip2(Box<MultiBzDecoder<Tagged>>),
    Xz(Box<XzDecoder<Tagged>>),
}

impl Read for Codec {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Plain(reader) => reader.read(buf),
            Self::Gzip(reader) => reader.read(buf),
            Self::Bzip2(reader) => reader.read(buf),
            Self::Xz(reader) => reader.read(buf),
        }
    }
}

/// A failure of the stream under a decompressor, as opposed to one raised by the
/// decompressor itself.
#[derive(Debug)]
struct RawReadError(io::Error);

impl Display for RawReadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl StdError for RawReadError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.0)
    }
}

/// Wraps errors of the raw stream in [`RawReadError`], keeping their kind.
struct Tagged(RawReader);

impl Read for Tagged {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0
            .read(buf)
            .map_err(|err| io::Error::new(err.kind(), RawReadError(err)))
    }
}

/// Recovers the raw stream error from a tagged one, or hands back a decompressor error.
fn untag(err: io::Error) -> Result<io::Error, io::Error> {
    if !err.get_ref().is_some_and(|inner| inner.is::<RawReadError>()) {
        return Err(err);
    }

    let kind = err.kind();
    match err.into_inner().map(|inner| inner.downcast::<RawReadError>()) {
        Some(Ok(tagged)) => Ok(tagged.0),
        Some(Err(inner)) => Err(io::Error::new(kind, inner)),
        None => Err(io::Error::from(kind)),
    }
}

/// A byte stream that may be decompressed on the fly.
///
/// The underlying handle is owned exclusively and closed when the source is dropped.
pub struct ByteSource {
    name: String,
    compression: Compression,
    codec: Codec,
    /// An error raised after part of a chunk was read, reported on the next call.
    deferred: Option<Error>,
}

impl ByteSource {
    /// Opens `input`, decoding it as `compression`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMode` when the input is not a readable stream, `Error::Io` when
    /// it cannot be opened, and `Error::Compressed` when a decoder cannot be initialized.
    pub fn open(input: Input, compression: Compression) -> Result<Self, Error> {
        let name = input.source();
        let raw = input.open()?;

        let codec = match compression {
            Compression::None => Codec::Plain(raw),
            Compression::Gzip => Codec::Gzip(Box::new(MultiGzDecoder::new(Tagged(raw)))),
            Compression::Bzip2 => Codec::Bzip2(Box::new(MultiBzDecoder::new(Tagged(raw)))),
            Compression::Xz | Compression::Lzma => {
                let stream = Stream::new_auto_decoder(u64::MAX, CONCATENATED).map_err(|err| {
                    Error::Compressed {
                        path: name.clone(),
                        compression,
                        source: io::Error::other(err),
                    }
                })?;
                Codec::Xz(Box::new(XzDecoder::new_stream(Tagged(raw), stream)))
            }
        };

        Ok(Self {
            name,
            compression,
            codec,
            deferred: None,
        })
    }

    /// Reads up to `max_bytes`, returning fewer only at end of stream.
    ///
    /// An empty chunk means the stream is exhausted. The buffer grows as data arrives, so a
    /// `max_bytes` far beyond the stream length costs no more than the data read.
    ///
    /// # Errors
    ///
    /// Returns `Error::Compressed` for malformed compressed data and `Error::Io` for failed
    /// reads. Bytes decoded before a failure are returned first and the error is raised by
    /// the following call.
    pub fn read_chunk(&mut self, max_bytes: usize) -> Result<Vec<u8>, Error> {
        if let Some(err) = self.deferred.take() {
            return Err(err);
        }

        let mut chunk = Vec::with_capacity(max_bytes.min(PREALLOC_LIMIT));
        let result = (&mut self.codec)
            .take(max_bytes as u64)
            .read_to_end(&mut chunk);

        match result {
            Ok(_) => Ok(chunk),
            Err(err) if chunk.is_empty() => Err(self.classify(err)),
            Err(err) => {
                self.deferred = Some(self.classify(err));
                Ok(chunk)
            }
        }
    }

    /// Name of the source for messages and statistics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compression format being decoded.
    pub const fn compression(&self) -> Compression {
        self.compression
    }

    /// Splits read failures into stream corruption and plain I/O errors.
    ///
    /// Under a decompressor, any error not raised by the raw stream is corruption.
    fn classify(&self, source: io::Error) -> Error {
        if !self.compression.is_compressed() {
            return Error::read(&self.name, source);
        }

        match untag(source) {
            Ok(raw) => Error::read(&self.name, raw),
            Err(source) => Error::Compressed {
                path: self.name.clone(),
                compression: self.compression,
                source,
            },
        }
    }
}

impl Debug for ByteSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteSource")
            .field("name", &self.name)
            .field("compression", &self.compression)
            .finish_non_exhaustive()
    }
}
