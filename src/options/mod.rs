//! Configuration options for line reading.
//!
//! This module provides the [`Options`] struct, a unified container for all
//! chunk-lines configuration settings.
//!
//! # Structure
//!
//! - **Chunk size**: Bytes per read, defaulting by [`Compression`]
//! - **Queue capacity**: Chunks buffered ahead by the background producer
//! - **Encoding** ([`Encoding`]): Text encoding used to decode chunks
//! - **Error policy** ([`ErrorPolicy`]): Handling of undecodable bytes
//! - **Compression** ([`Compression`]): Override for extension sniffing
//!
//! # Usage
//!
//! ```
//! use chunk_lines::{Compression, ErrorPolicy, Options};
//!
//! let options = Options::default();
//! assert_eq!(options.chunk_size_for(Compression::Bzip2), Compression::BZIP2_CHUNK_SIZE);
//!
//! let options = Options::default()
//!     .with_chunk_size(64 * 1024)
//!     .with_error_policy(ErrorPolicy::Strict);
//! assert_eq!(options.chunk_size_for(Compression::Gzip), 64 * 1024);
//! ```
//!
//! # Environment Variables
//!
//! - `CHUNK_LINES_CHUNK_SIZE`: Bytes per chunk (default: by compression)
//! - `CHUNK_LINES_QUEUE_CAPACITY`: Chunks queued ahead (default: 4)
//! - `CHUNK_LINES_ENCODING`: Encoding label (default: utf-8)
//! - `CHUNK_LINES_ERRORS`: `strict`, `ignore` or `replace` (default: replace)
//! - `CHUNK_LINES_COMPRESSION`: Force a compression format (default: by extension)

pub mod encoding;
pub mod error_policy;

use core::fmt::{self, Display, Formatter};
use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use self::encoding::Encoding;
use self::error_policy::ErrorPolicy;
use crate::error::Error;
use crate::source::Compression;

/// Unified configuration for line reading.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Bytes per chunk, `None` to use the compression default.
    chunk_size: Option<usize>,

    /// Chunks the background producer may queue ahead of the consumer.
    queue_capacity: usize,

    /// Text encoding of the source.
    encoding: Encoding,

    /// Handling of undecodable bytes.
    error_policy: ErrorPolicy,

    /// Compression format, `None` to sniff from the extension.
    compression: Option<Compression>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            chunk_size: None,
            queue_capacity: Self::QUEUE_CAPACITY,
            encoding: Encoding::default(),
            error_policy: ErrorPolicy::default(),
            compression: None,
        }
    }
}

impl Options {
    /// Four queued chunks let one read overlap the processing of the previous ones.
    pub const QUEUE_CAPACITY: usize = 4;

    // Environment variable names for configuration.
    const ENV_CHUNK_SIZE: &str = "CHUNK_LINES_CHUNK_SIZE";
    const ENV_QUEUE_CAPACITY: &str = "CHUNK_LINES_QUEUE_CAPACITY";
    const ENV_ENCODING: &str = "CHUNK_LINES_ENCODING";
    const ENV_ERRORS: &str = "CHUNK_LINES_ERRORS";
    const ENV_COMPRESSION: &str = "CHUNK_LINES_COMPRESSION";

    /// Creates `Options` from environment variables if present.
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            chunk_size: parse_env_var::<usize>(Self::ENV_CHUNK_SIZE),
            queue_capacity: parse_env_var(Self::ENV_QUEUE_CAPACITY)
                .unwrap_or(defaults.queue_capacity),
            encoding: parse_env_var(Self::ENV_ENCODING).unwrap_or(defaults.encoding),
            error_policy: parse_env_var(Self::ENV_ERRORS).unwrap_or(defaults.error_policy),
            compression: parse_env_var(Self::ENV_COMPRESSION),
        }
    }

    /// Set the chunk size in bytes.
    #[must_use]
    pub const fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }

    /// Set the number of chunks queued ahead.
    #[must_use]
    pub const fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Set the text encoding.
    #[must_use]
    pub const fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the error policy.
    #[must_use]
    pub const fn with_error_policy(mut self, error_policy: ErrorPolicy) -> Self {
        self.error_policy = error_policy;
        self
    }

    /// Force a compression format instead of sniffing the extension.
    #[must_use]
    pub const fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = Some(compression);
        self
    }

    /// Get the configured chunk size, if any.
    #[must_use]
    pub const fn chunk_size(&self) -> Option<usize> {
        self.chunk_size
    }

    /// Get the chunk size to use for a source of the given compression.
    #[must_use]
    pub const fn chunk_size_for(&self, compression: Compression) -> usize {
        match self.chunk_size {
            Some(size) => size,
            None => compression.default_chunk_size(),
        }
    }

    /// Get the queue capacity.
    #[must_use]
    pub const fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }

    /// Get the encoding.
    #[must_use]
    pub const fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Get the error policy.
    #[must_use]
    pub const fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// Get the forced compression format, if any.
    #[must_use]
    pub const fn compression(&self) -> Option<Compression> {
        self.compression
    }

    /// Checks that sizes are usable.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for a zero chunk size or queue capacity.
    pub fn validate(&self) -> Result<(), Error> {
        if self.chunk_size == Some(0) {
            return Err(Error::Config("chunk size must be at least 1 byte".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(Error::Config(
                "queue capacity must be at least 1 chunk".to_string(),
            ));
        }
        Ok(())
    }
}

impl Display for Options {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let chunk_size = self
            .chunk_size
            .map_or_else(|| "auto".to_string(), |size| size.to_string());
        let compression = self
            .compression
            .map_or_else(|| "auto".to_string(), |compression| compression.to_string());

        write!(
            f,
            "Options {{ chunk_size: {chunk_size}, queue_capacity: {}, encoding: {}, errors: {}, compression: {compression} }}",
            self.queue_capacity, self.encoding, self.error_policy
        )
    }
}

/// Parse an environment variable, `None` if unset or invalid.
fn parse_env_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.trim().parse().ok())
}
