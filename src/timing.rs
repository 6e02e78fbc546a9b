//! Per-call timing around any iterator.
//!
//! The line reader knows nothing about profiling; wrap it with [`TimedExt::timed`] to measure
//! how long each pull takes.
//!
//! ```
//! use chunk_lines::{Input, LineReader, Options, TimedExt};
//!
//! let reader = LineReader::open(Input::from_bytes("a\nb\n"), &Options::default()).unwrap();
//! let mut timed = reader.timed();
//! while let Some(line) = timed.next() {
//!     line.unwrap();
//! }
//! assert_eq!(timed.timings().calls, 3);
//! ```

use core::fmt::{self, Display, Formatter};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Accumulated call durations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CallTimings {
    /// Number of `next` calls, including the final one returning `None`.
    pub calls: u64,
    /// Sum of all call durations.
    pub total: Duration,
    /// Longest single call.
    pub slowest: Duration,
}

impl CallTimings {
    /// Mean duration per call.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.calls) {
            Ok(0) => Duration::ZERO,
            Ok(calls) => self.total / calls,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.calls as f64),
        }
    }

    fn record(&mut self, elapsed: Duration) {
        self.calls += 1;
        self.total += elapsed;
        self.slowest = self.slowest.max(elapsed);
    }
}

impl Display for CallTimings {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} calls, {:.2} ms total, {:.3} ms mean, {:.3} ms slowest",
            self.calls,
            self.total.as_secs_f64() * 1000.0,
            self.mean().as_secs_f64() * 1000.0,
            self.slowest.as_secs_f64() * 1000.0
        )
    }
}

/// An iterator that times every call to `next`.
#[derive(Debug)]
pub struct Timed<I> {
    inner: I,
    timings: CallTimings,
}

impl<I> Timed<I> {
    /// Timings recorded so far.
    pub const fn timings(&self) -> CallTimings {
        self.timings
    }

    /// Borrows the wrapped iterator.
    pub const fn get_ref(&self) -> &I {
        &self.inner
    }

    /// Unwraps the iterator, returning it with the recorded timings.
    pub fn into_parts(self) -> (I, CallTimings) {
        (self.inner, self.timings)
    }
}

impl<I: Iterator> Iterator for Timed<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let started = Instant::now();
        let item = self.inner.next();
        self.timings.record(started.elapsed());
        item
    }
}

/// Adds [`timed`](TimedExt::timed) to every iterator.
pub trait TimedExt: Iterator + Sized {
    /// Wraps the iterator to record per-call durations.
    fn timed(self) -> Timed<Self> {
        Timed {
            inner: self,
            timings: CallTimings::default(),
        }
    }
}

impl<I: Iterator> TimedExt for I {}
