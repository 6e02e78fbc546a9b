//! Counters snapshot for a line reader.

use core::fmt::{self, Display, Formatter};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Which path delivered chunks to the splitter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Plain source read ahead by a background producer thread.
    Buffered,

    /// Compressed source decoded synchronously on the caller's thread.
    Compressed,
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered => write!(f, "buffered"),
            Self::Compressed => write!(f, "compressed"),
        }
    }
}

/// A point-in-time snapshot of reader counters with derived rates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stats {
    /// File name of the source.
    pub file: String,
    /// Producer path used.
    pub mode: Mode,
    /// Lines emitted so far.
    pub lines: u64,
    /// Bytes read from the source so far, after decompression.
    pub bytes: u64,
    /// Seconds since the first pull, frozen once the reader finishes.
    pub time: f64,
    pub lines_per_second: u64,
    pub megabytes_per_second: f64,
}

impl Stats {
    const BYTES_PER_MEGABYTE: f64 = 1024.0 * 1024.0;

    /// Computes rates from raw counters.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(file: String, mode: Mode, lines: u64, bytes: u64, elapsed: Duration) -> Self {
        let time = elapsed.as_secs_f64();
        let (lines_per_second, megabytes_per_second) = if time > 0.0 {
            (
                (lines as f64 / time) as u64,
                bytes as f64 / Self::BYTES_PER_MEGABYTE / time,
            )
        } else {
            (0, 0.0)
        };

        Self {
            file,
            mode,
            lines,
            bytes,
            time,
            lines_per_second,
            megabytes_per_second,
        }
    }

    /// All fields as name-value pairs, rounded for display.
    #[must_use]
    pub fn field_pairs(&self) -> [(&'static str, String); 7] {
        [
            ("file", self.file.clone()),
            ("mode", self.mode.to_string()),
            ("lines", self.lines.to_string()),
            ("bytes", self.bytes.to_string()),
            ("time", format!("{:.2}", self.time)),
            ("lines_per_second", self.lines_per_second.to_string()),
            ("megabytes_per_second", format!("{:.2}", self.megabytes_per_second)),
        ]
    }
}

impl Display for Stats {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} lines, {} bytes in {:.2}s ({} lines/s, {:.2} MB/s, {})",
            self.file,
            self.lines,
            self.bytes,
            self.time,
            self.lines_per_second,
            self.megabytes_per_second,
            self.mode
        )
    }
}
