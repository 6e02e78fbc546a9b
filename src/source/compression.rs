//! Compression formats recognized by file extension.

use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Compression format of a byte source.
///
/// The format is normally sniffed from the file extension; it can be forced through
/// [`Options::with_compression`](crate::Options::with_compression) for stdin or handles
/// without a meaningful name.
///
/// # Examples
///
/// ```
/// use chunk_lines::Compression;
///
/// assert_eq!(Compression::from_path("access.log.gz"), Compression::Gzip);
/// assert_eq!(Compression::from_path("dump.sql"), Compression::None);
/// assert!(Compression::Bzip2.default_chunk_size() < Compression::None.default_chunk_size());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Plain, uncompressed bytes.
    #[default]
    None,

    /// Gzip, possibly with several concatenated members.
    #[value(alias = "gz")]
    Gzip,

    /// Bzip2, possibly with several concatenated streams.
    #[value(alias = "bz2")]
    Bzip2,

    /// XZ container.
    Xz,

    /// Legacy LZMA-alone container.
    Lzma,
}

impl Compression {
    /// Default chunk size for uncompressed input is 32MB.
    pub const PLAIN_CHUNK_SIZE: usize = 32 * 1024 * 1024;
    /// Default chunk size for gzip and xz/lzma is 16MB.
    pub const INFLATE_CHUNK_SIZE: usize = 16 * 1024 * 1024;
    /// Default chunk size for bzip2 is 8MB, it decompresses the slowest.
    pub const BZIP2_CHUNK_SIZE: usize = 8 * 1024 * 1024;

    /// Sniffs the format from the extension of `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(Self::None, |ext| match ext.to_ascii_lowercase().as_str() {
                "gz" => Self::Gzip,
                "bz2" => Self::Bzip2,
                "xz" => Self::Xz,
                "lzma" => Self::Lzma,
                _ => Self::None,
            })
    }

    /// Chunk size used when none is configured.
    #[must_use]
    pub const fn default_chunk_size(self) -> usize {
        match self {
            Self::None => Self::PLAIN_CHUNK_SIZE,
            Self::Gzip | Self::Xz | Self::Lzma => Self::INFLATE_CHUNK_SIZE,
            Self::Bzip2 => Self::BZIP2_CHUNK_SIZE,
        }
    }

    /// Whether bytes must pass through a decompressor.
    #[must_use]
    pub const fn is_compressed(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl Display for Compression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Gzip => write!(f, "gzip"),
            Self::Bzip2 => write!(f, "bzip2"),
            Self::Xz => write!(f, "xz"),
            Self::Lzma => write!(f, "lzma"),
        }
    }
}

impl FromStr for Compression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "plain" => Ok(Self::None),
            "gzip" | "gz" => Ok(Self::Gzip),
            "bzip2" | "bz2" => Ok(Self::Bzip2),
            "xz" => Ok(Self::Xz),
            "lzma" => Ok(Self::Lzma),
            other => Err(Error::Config(format!("unknown compression: {other}"))),
        }
    }
}
