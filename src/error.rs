//! Error types for chunk-lines.

use std::io;

use thiserror::Error;

use crate::source::Compression;

/// Structured error types for chunk-lines.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O error with context.
    #[error("{message}: {path}")]
    Io {
        /// Source name where the error occurred.
        path: String,
        /// Error description.
        message: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Malformed or truncated compressed stream.
    #[error("malformed {compression} stream: {path}")]
    Compressed {
        /// Source name where the error occurred.
        path: String,
        /// Compression format being decoded.
        compression: Compression,
        /// Error reported by the decompressor.
        #[source]
        source: io::Error,
    },

    /// Undecodable bytes under the strict error policy.
    #[error("invalid {encoding} byte sequence at byte {position}")]
    Encoding {
        /// Name of the configured encoding.
        encoding: &'static str,
        /// Offset of the first invalid byte in the decoded stream.
        position: u64,
    },

    /// Source cannot be read as a byte stream.
    #[error("not a readable byte stream: {path}")]
    InvalidMode {
        /// Source name.
        path: String,
    },

    /// Operation attempted on a closed reader.
    #[error("line reader is closed")]
    Closed,

    /// Encoding label not recognized.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Configuration error.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Background producer ended without a terminal chunk.
    #[error("chunk producer exited before end of input")]
    ProducerLost,

    /// JSON serialization error.
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),

    /// CSV serialization error.
    #[error("CSV serialization failed")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Whether the error came from decoding: a bad compressed stream or, under
    /// `strict`, an invalid byte sequence.
    #[must_use]
    pub const fn is_decode(&self) -> bool {
        matches!(self, Self::Compressed { .. } | Self::Encoding { .. })
    }

    /// Wraps an I/O error raised while reading from `path`.
    pub(crate) fn read(path: &str, source: io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            message: "failed to read".to_string(),
            source,
        }
    }
}
