//! Process exit statuses for the `chunk-lines` binary, drawn from sysexits.h.

use std::{io, process};

use clap::error::ErrorKind as ClapErrorKind;

use crate::error::Error as ChunkLinesError;

/// How a `chunk-lines` run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ExitCode {
    /// Every line was written, or help or version was shown.
    Success = 0,
    /// An error with no more specific status.
    Failure = 1,
    /// Bad flags, environment values or encoding labels (`EX_USAGE`).
    UsageError = 64,
    /// A corrupt compressed stream, or text rejected by the strict policy (`EX_DATAERR`).
    DataFormat = 65,
    /// The input is missing or is not a byte stream (`EX_NOINPUT`).
    InputNotFound = 66,
    /// The reader was misused or its producer died (`EX_SOFTWARE`).
    InternalError = 70,
    /// Reading input or writing output failed (`EX_IOERR`).
    IoError = 74,
    /// `EX_NOPERM`
    PermissionDenied = 77,
}

impl ExitCode {
    /// The numeric status handed to the OS.
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl From<&io::Error> for ExitCode {
    fn from(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::InputNotFound,
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            _ => Self::IoError,
        }
    }
}

impl From<&clap::Error> for ExitCode {
    fn from(err: &clap::Error) -> Self {
        match err.kind() {
            ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => Self::Success,
            _ => Self::UsageError,
        }
    }
}

impl From<&ChunkLinesError> for ExitCode {
    fn from(err: &ChunkLinesError) -> Self {
        match err {
            ChunkLinesError::Io { source, .. } => Self::from(source),
            ChunkLinesError::Compressed { .. } | ChunkLinesError::Encoding { .. } => {
                Self::DataFormat
            }
            ChunkLinesError::InvalidMode { .. } => Self::InputNotFound,
            ChunkLinesError::UnknownEncoding(_) | ChunkLinesError::Config(_) => Self::UsageError,
            // Only stats reports are serialized, so these are output failures.
            ChunkLinesError::Json(_) | ChunkLinesError::Csv(_) => Self::IoError,
            ChunkLinesError::Closed | ChunkLinesError::ProducerLost => Self::InternalError,
        }
    }
}

/// Uses the first error in the chain that has a status of its own.
impl From<&anyhow::Error> for ExitCode {
    fn from(err: &anyhow::Error) -> Self {
        err.chain()
            .find_map(|cause| {
                cause
                    .downcast_ref::<ChunkLinesError>()
                    .map(Self::from)
                    .or_else(|| cause.downcast_ref::<clap::Error>().map(Self::from))
                    .or_else(|| cause.downcast_ref::<io::Error>().map(Self::from))
            })
            .unwrap_or(Self::Failure)
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code.code())
    }
}
