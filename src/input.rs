//! Input sources handed to a [`LineReader`](crate::LineReader).

use std::fmt::{self, Debug, Display, Formatter};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::source::Compression;

/// An already-open byte stream, optionally named so its extension can be sniffed.
pub struct Handle {
    name: Option<String>,
    reader: Box<dyn Read + Send>,
}

impl Handle {
    /// Wraps `reader`, taking ownership so it is closed with the line reader.
    pub fn new<R: Read + Send + 'static>(name: Option<String>, reader: R) -> Self {
        Self {
            name,
            reader: Box::new(reader),
        }
    }

    /// Returns the handle name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub(crate) fn into_reader(self) -> Box<dyn Read + Send> {
        self.reader
    }
}

impl Debug for Handle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("name", &self.name)
            .field("reader", &"<dyn Read>")
            .finish()
    }
}

/// `Input` to read from a file, stdin, an open handle, or bytes.
#[derive(Debug, Default)]
pub enum Input {
    #[default]
    Stdin,
    File(PathBuf),
    Handle(Handle),
    Bytes(Box<[u8]>),
}

impl Input {
    /// Construct an `Input` from a file path or stdin (designated by "-").
    ///
    /// The file itself is opened when a [`LineReader`](crate::LineReader) is created.
    pub fn new<P: AsRef<Path>>(p: P) -> Self {
        let path = p.as_ref();
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }

    /// Create an `Input` from byte data.
    pub fn from_bytes<B: AsRef<[u8]>>(bytes: B) -> Self {
        Self::Bytes(bytes.as_ref().into())
    }

    /// Create an `Input` from an open binary reader.
    ///
    /// The `name` is used for compression sniffing and statistics.
    pub fn from_reader<R: Read + Send + 'static>(name: Option<&str>, reader: R) -> Self {
        Self::Handle(Handle::new(name.map(str::to_string), reader))
    }

    /// Returns the file name of the input, `"-"` for stdin.
    pub fn source(&self) -> String {
        match self {
            Self::Stdin => "-".to_string(),
            Self::File(path) => path.file_name().map_or_else(
                || format!("No filename: {}", path.display()),
                |name| {
                    name.to_str().map_or_else(
                        || format!("Non-UTF-8 filename: {name:?}"),
                        ToString::to_string,
                    )
                },
            ),
            Self::Handle(handle) => handle
                .name()
                .map(|name| {
                    Path::new(name)
                        .file_name()
                        .and_then(|file_name| file_name.to_str())
                        .unwrap_or(name)
                        .to_string()
                })
                .unwrap_or_else(|| "<stream>".to_string()),
            Self::Bytes(_) => "<bytes>".to_string(),
        }
    }

    /// Compression sniffed from the path or handle name.
    pub fn compression(&self) -> Compression {
        match self {
            Self::File(path) => Compression::from_path(path),
            Self::Handle(handle) => handle.name().map_or(Compression::None, Compression::from_path),
            Self::Stdin | Self::Bytes(_) => Compression::None,
        }
    }

    /// Get the size of the input in bytes, if available.
    /// Returns `None` for stdin, handles, and when a filesize can't be determined.
    pub fn size(&self) -> Option<u64> {
        match self {
            Self::File(path) => fs::metadata(path).ok().map(|metadata| metadata.len()),
            Self::Bytes(bytes) => Some(bytes.len() as u64),
            Self::Stdin | Self::Handle(_) => None,
        }
    }

    /// Opens the underlying stream, consuming the `Input`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidMode` if a path names a directory, or `Error::Io` if the file
    /// cannot be opened.
    pub(crate) fn open(self) -> Result<Box<dyn Read + Send>, Error> {
        match self {
            Self::Stdin => Ok(Box::new(io::stdin())),
            Self::File(path) => {
                if fs::metadata(&path).is_ok_and(|metadata| metadata.is_dir()) {
                    return Err(Error::InvalidMode {
                        path: path.display().to_string(),
                    });
                }
                Ok(Box::new(open_file_with_error_context(&path)?))
            }
            Self::Handle(handle) => Ok(handle.into_reader()),
            Self::Bytes(bytes) => Ok(Box::new(io::Cursor::new(bytes))),
        }
    }
}

impl From<&str> for Input {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<&Path> for Input {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

impl From<PathBuf> for Input {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}

impl Display for Input {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => write!(f, "Stdin"),
            Self::File(path) => write!(f, "File({})", path.display()),
            Self::Handle(handle) => write!(f, "Handle({})", handle.name().unwrap_or("<stream>")),
            Self::Bytes(_) => write!(f, "Bytes"),
        }
    }
}

/// Opens a file with enhanced error context.
///
/// # Errors
///
/// Returns `Error::Io` with specific messages for:
/// - File not found
/// - Permission denied
/// - Other I/O errors
pub(crate) fn open_file_with_error_context(path: &Path) -> Result<File, Error> {
    File::open(path).map_err(|source| {
        let message = match source.kind() {
            io::ErrorKind::NotFound => "no such file",
            io::ErrorKind::PermissionDenied => "permission denied",
            _ => "failed to open file",
        };

        Error::Io {
            path: path.display().to_string(),
            message: message.to_string(),
            source,
        }
    })
}
