//! Streaming chunk decoder.
//!
//! Each chunk is decoded exactly once. The decoder keeps the bytes of a character cut off by
//! a chunk boundary and completes it with the next chunk, so splitting is safe for any
//! encoding and any chunk size.

use core::fmt::{self, Debug, Formatter};

use encoding_rs::{CoderResult, DecoderResult};

use crate::error::Error;
use crate::options::{encoding::Encoding, error_policy::ErrorPolicy};

/// Decodes successive chunks of one stream into text.
pub struct TextDecoder {
    encoding: Encoding,
    policy: ErrorPolicy,
    decoder: encoding_rs::Decoder,
    /// Bytes consumed so far, for error positions.
    position: u64,
}

impl Debug for TextDecoder {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextDecoder")
            .field("encoding", &self.encoding)
            .field("policy", &self.policy)
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

impl TextDecoder {
    #[must_use]
    pub fn new(encoding: Encoding, policy: ErrorPolicy) -> Self {
        Self {
            encoding,
            policy,
            decoder: encoding.new_decoder(),
            position: 0,
        }
    }

    /// Decodes `bytes`, holding back an incomplete trailing character.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encoding` under the strict policy when `bytes` contain an invalid
    /// sequence.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<String, Error> {
        self.decode_to_string(bytes, false)
    }

    /// Flushes any incomplete character left at end of stream.
    ///
    /// # Errors
    ///
    /// Returns `Error::Encoding` under the strict policy when the stream ends mid-character.
    pub fn finish(&mut self) -> Result<String, Error> {
        self.decode_to_string(&[], true)
    }

    fn decode_to_string(&mut self, bytes: &[u8], last: bool) -> Result<String, Error> {
        let mut text = String::new();
        let mut input = bytes;

        loop {
            let headroom = self
                .decoder
                .max_utf8_buffer_length(input.len())
                .unwrap_or(input.len());
            text.reserve(headroom);

            if self.policy == ErrorPolicy::Replace {
                let (result, read, _) = self.decoder.decode_to_string(input, &mut text, last);
                input = &input[read..];
                self.position += read as u64;
                if result == CoderResult::InputEmpty {
                    return Ok(text);
                }
                continue;
            }

            let (result, read) =
                self.decoder
                    .decode_to_string_without_replacement(input, &mut text, last);
            input = &input[read..];
            self.position += read as u64;

            match result {
                DecoderResult::InputEmpty => return Ok(text),
                DecoderResult::OutputFull => {}
                DecoderResult::Malformed(bad, extra) => {
                    if self.policy == ErrorPolicy::Strict {
                        let consumed = u64::from(bad) + u64::from(extra);
                        return Err(Error::Encoding {
                            encoding: self.encoding.name(),
                            position: self.position.saturating_sub(consumed),
                        });
                    }
                }
            }
        }
    }
}
