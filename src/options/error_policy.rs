//! Handling of byte sequences the configured encoding cannot decode.

use clap::ValueEnum;
use core::fmt::{self, Display, Formatter};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

/// Determines what happens to undecodable bytes.
///
/// - **Strict**: Stop iteration with a decode error.
/// - **Ignore**: Drop the invalid bytes.
/// - **Replace**: Substitute U+FFFD for each invalid sequence.
///
/// # Examples
///
/// ```
/// use chunk_lines::ErrorPolicy;
///
/// assert_eq!(ErrorPolicy::default(), ErrorPolicy::Replace);
/// assert_eq!(ErrorPolicy::Strict.to_string(), "strict");
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Fail on the first invalid sequence.
    Strict,

    /// Silently drop invalid sequences.
    Ignore,

    /// Replace invalid sequences with U+FFFD (default).
    #[default]
    Replace,
}

impl Display for ErrorPolicy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strict => write!(f, "strict"),
            Self::Ignore => write!(f, "ignore"),
            Self::Replace => write!(f, "replace"),
        }
    }
}

impl FromStr for ErrorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            s if s.eq_ignore_ascii_case("strict") => Ok(Self::Strict),
            s if s.eq_ignore_ascii_case("ignore") => Ok(Self::Ignore),
            s if s.eq_ignore_ascii_case("replace") => Ok(Self::Replace),
            other => Err(Error::Config(format!("unknown error policy: {other}"))),
        }
    }
}
