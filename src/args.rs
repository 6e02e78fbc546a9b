use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;

use anyhow::Result;
use chunk_lines::{Compression, Encoding, ErrorPolicy, Options};
use clap::{Parser, ValueEnum};

/// Format of statistics and verbose output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    #[default]
    Text,
    Json,
    Csv,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(about, version)]
pub(crate) struct Args {
    /// File path to use as input rather than stdin ("-").
    #[arg(default_value = "-", value_name = "PATH")]
    pub(crate) input: PathBuf,

    /// Bytes read per chunk [default: by compression].
    #[arg(short, long, value_name = "BYTES")]
    pub(crate) chunk_size: Option<usize>,

    /// Chunks read ahead of the consumer for plain input.
    #[arg(short, long, value_name = "CHUNKS")]
    pub(crate) queue_capacity: Option<usize>,

    /// Text encoding label, such as utf-8, latin1 or utf-16le.
    #[arg(short, long, value_name = "LABEL")]
    pub(crate) encoding: Option<String>,

    /// Handling of undecodable bytes [default: replace].
    #[arg(short = 'E', long = "errors", value_enum, value_name = "POLICY")]
    pub(crate) error_policy: Option<ErrorPolicy>,

    /// Compression format [default: by file extension].
    #[arg(short = 'z', long, value_enum, value_name = "FORMAT")]
    pub(crate) compression: Option<Compression>,

    /// Print only the number of lines.
    #[arg(short = 'n', long)]
    pub(crate) count: bool,

    /// Write output to file rather than stdout.
    #[arg(short, long, value_name = "PATH")]
    pub(crate) output: Option<PathBuf>,

    /// Print reading statistics to stderr.
    #[arg(short, long)]
    pub(crate) stats: bool,

    /// Format of statistics and verbose output.
    #[arg(short, long, default_value_t, value_enum, value_name = "FORMAT")]
    pub(crate) format: Format,

    /// Print settings and statistics to stderr.
    #[arg(short = 'v', long)]
    pub(crate) verbose: bool,

    /// Log debug events and per-line call timings.
    #[arg(long)]
    pub(crate) debug: bool,
}

impl Args {
    /// Layers command-line flags over `CHUNK_LINES_*` environment settings.
    pub(crate) fn options(&self) -> Result<Options> {
        let mut options = Options::from_env();

        if let Some(size) = self.chunk_size {
            options = options.with_chunk_size(size);
        }
        if let Some(capacity) = self.queue_capacity {
            options = options.with_queue_capacity(capacity);
        }
        if let Some(label) = &self.encoding {
            options = options.with_encoding(Encoding::for_label(label)?);
        }
        if let Some(policy) = self.error_policy {
            options = options.with_error_policy(policy);
        }
        if let Some(compression) = self.compression {
            options = options.with_compression(compression);
        }

        options.validate()?;
        Ok(options)
    }
}
