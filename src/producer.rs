//! Background chunk acquisition for plain sources.
//!
//! A single worker thread owns the [`ByteSource`] and pushes chunks onto a bounded
//! channel, overlapping disk latency with decoding and splitting on the consumer side.
//! The channel is the only state shared between the two threads.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded};

use crate::error::Error;
use crate::source::ByteSource;

/// A chunk read by the producer, or the error that stopped it.
type Slot = Result<Vec<u8>, Error>;

/// Reads chunks on a background thread into a bounded queue.
///
/// The queue holds at most `capacity` chunks; the producer blocks while it is full. An empty
/// chunk marks end of input.
#[derive(Debug)]
pub struct ChunkProducer {
    receiver: Option<Receiver<Slot>>,
    handle: Option<JoinHandle<()>>,
}

impl ChunkProducer {
    /// Moves `source` to a new thread that reads `chunk_size` bytes at a time.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the thread cannot be spawned.
    pub fn spawn(source: ByteSource, chunk_size: usize, capacity: usize) -> Result<Self, Error> {
        let (sender, receiver) = bounded(capacity);
        let name = source.name().to_string();

        let handle = thread::Builder::new()
            .name("chunk-producer".to_string())
            .spawn(move || produce(source, chunk_size, &sender))
            .map_err(|source| Error::Io {
                path: name,
                message: "failed to spawn chunk producer".to_string(),
                source,
            })?;

        Ok(Self {
            receiver: Some(receiver),
            handle: Some(handle),
        })
    }

    /// Blocks until the next chunk is available.
    ///
    /// # Errors
    ///
    /// Re-raises the error the producer hit while reading, or `Error::ProducerLost` if the
    /// thread is gone without an end-of-input chunk.
    pub fn recv(&self) -> Result<Vec<u8>, Error> {
        let receiver = self.receiver.as_ref().ok_or(Error::ProducerLost)?;
        receiver.recv().map_err(|_| Error::ProducerLost)?
    }

    /// Disconnects the queue, then joins the thread.
    ///
    /// Disconnecting fails a producer waiting on a full queue instead of making room for it,
    /// so no further chunk is read. Queued chunks are freed with the channel. Idempotent.
    pub fn shutdown(&mut self) {
        drop(self.receiver.take());

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::warn!("chunk producer thread panicked");
            }
            log::debug!("chunk producer joined");
        }
    }
}

impl Drop for ChunkProducer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Producer loop: read, push, repeat until end of input, error, or disconnect.
fn produce(mut source: ByteSource, chunk_size: usize, sender: &Sender<Slot>) {
    log::debug!("chunk producer started: {}", source.name());

    loop {
        match source.read_chunk(chunk_size) {
            Ok(chunk) => {
                let end = chunk.is_empty();
                log::trace!("produced {} byte chunk", chunk.len());
                if sender.send(Ok(chunk)).is_err() {
                    log::debug!("chunk queue disconnected, stopping producer");
                    break;
                }
                if end {
                    break;
                }
            }
            Err(err) => {
                log::debug!("chunk producer failed: {err}");
                if sender.send(Err(err)).is_err() {
                    log::debug!("chunk queue disconnected before error was delivered");
                }
                break;
            }
        }
    }
}
