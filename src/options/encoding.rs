//! Text encoding used to decode chunks.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A text encoding, identified by any WHATWG label such as `utf-8`, `latin1` or `utf-16le`.
///
/// # Examples
///
/// ```
/// use chunk_lines::Encoding;
///
/// assert_eq!(Encoding::default().to_string(), "UTF-8");
/// let latin1: Encoding = "latin1".parse().unwrap();
/// assert_eq!(latin1.name(), "windows-1252");
/// assert!("klingon".parse::<Encoding>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Encoding(&'static encoding_rs::Encoding);

impl Encoding {
    /// Look up an encoding by label, ignoring case and surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownEncoding` if the label is not recognized.
    pub fn for_label(label: &str) -> Result<Self, Error> {
        encoding_rs::Encoding::for_label(label.as_bytes())
            .map(Self)
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))
    }

    /// Canonical name of the encoding.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.0.name()
    }

    /// A fresh streaming decoder that leaves any byte order mark in the text.
    pub(crate) fn new_decoder(self) -> encoding_rs::Decoder {
        self.0.new_decoder_without_bom_handling()
    }
}

impl Default for Encoding {
    fn default() -> Self {
        Self(encoding_rs::UTF_8)
    }
}

impl Display for Encoding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::for_label(s)
    }
}

impl TryFrom<String> for Encoding {
    type Error = Error;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Self::for_label(&label)
    }
}

impl From<Encoding> for String {
    fn from(encoding: Encoding) -> Self {
        encoding.name().to_string()
    }
}
