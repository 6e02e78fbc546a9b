//! Carry-over aware splitting of chunks into lines.

use memchr::memchr_iter;

use crate::decode::TextDecoder;
use crate::error::Error;
use crate::options::{encoding::Encoding, error_policy::ErrorPolicy};

/// Splits `carry + text` on `\n`.
///
/// Returns the complete lines, newline stripped, and the unsplit tail that becomes the next
/// carry. The tail is empty when `text` ends with a newline. Text without any newline only
/// extends the carry, which may grow without bound.
///
/// # Examples
///
/// ```
/// use chunk_lines::split_lines;
///
/// let (lines, carry) = split_lines(String::new(), "ab\ncd\ne");
/// assert_eq!(lines, ["ab", "cd"]);
/// assert_eq!(carry, "e");
///
/// let (lines, carry) = split_lines(carry, "f\n");
/// assert_eq!(lines, ["ef"]);
/// assert_eq!(carry, "");
/// ```
#[must_use]
pub fn split_lines(mut carry: String, text: &str) -> (Vec<String>, String) {
    let mut newlines = memchr_iter(b'\n', text.as_bytes());

    let Some(first) = newlines.next() else {
        carry.push_str(text);
        return (Vec::new(), carry);
    };

    carry.push_str(&text[..first]);
    let mut lines = vec![carry];
    let mut start = first + 1;

    for end in newlines {
        lines.push(text[start..end].to_string());
        start = end + 1;
    }

    (lines, text[start..].to_string())
}

/// Decodes chunks once each and splits them into lines, carrying partial lines across
/// chunk boundaries.
#[derive(Debug)]
pub struct LineSplitter {
    decoder: TextDecoder,
    carry: String,
}

impl LineSplitter {
    #[must_use]
    pub fn new(encoding: Encoding, policy: ErrorPolicy) -> Self {
        Self {
            decoder: TextDecoder::new(encoding, policy),
            carry: String::new(),
        }
    }

    /// Returns the complete lines ending in `chunk`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encoding` if the chunk cannot be decoded under the strict policy.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>, Error> {
        let text = self.decoder.decode(chunk)?;
        let (lines, carry) = split_lines(std::mem::take(&mut self.carry), &text);
        self.carry = carry;
        Ok(lines)
    }

    /// Returns the lines left at end of stream, including a final line without a newline.
    ///
    /// A stream ending exactly on `\n` leaves nothing to emit.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encoding` if the stream ends mid-character under the strict policy.
    pub fn finish(&mut self) -> Result<Vec<String>, Error> {
        let text = self.decoder.finish()?;
        let (mut lines, carry) = split_lines(std::mem::take(&mut self.carry), &text);
        if !carry.is_empty() {
            lines.push(carry);
        }
        Ok(lines)
    }

    /// Text held back waiting for its newline.
    pub fn carry(&self) -> &str {
        &self.carry
    }
}
