//! Double-buffered byte source with a background fill thread.
//!
//! Two [`Slot`]s alternate: the fill thread reads up to `C` bytes into the
//! slot the consumer is not draining while the consumer reads bytes one at a
//! time out of the other.
//!
//! # Ownership
//!
//! | Field              | Owner                      |
//! |--------------------|----------------------------|
//! | fill index         | fill thread (local)        |
//! | `drain_index`      | consumer                   |
//! | `cursor`           | consumer                   |
//! | slot state/bytes   | shared, per-slot mutex     |
//! | `exhausted`        | set once by the fill thread|
//!
//! # Lookback
//!
//! The consumer advances to the other slot as soon as it reads the last
//! byte of a chunk, but the drained slot is only recycled once a byte of
//! the next chunk has been read. Until then it is still `Ready`, so a single
//! [`push_back`](DoubleBufferedSource::push_back) can step back into it.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::slot::{Checkout, Slot, SlotState};
use crate::{SourceConfig, SourceError};

/// State reachable from both threads.
struct Shared {
    slots: [Slot; 2],
    /// Monotonic: set once the byte source returned no more data.
    exhausted: AtomicBool,
    /// Set by the consumer when it stops reading; the fill thread exits.
    closed: AtomicBool,
    /// Mid-stream read failure, reported by `close`.
    failure: Mutex<Option<SourceError>>,
    poll: Duration,
}

impl Shared {
    fn wake_all(&self) {
        for slot in &self.slots {
            slot.wake();
        }
    }
}

/// Byte source drained one character at a time, refilled in the background.
pub struct DoubleBufferedSource {
    shared: Arc<Shared>,
    filler: Option<JoinHandle<()>>,
    /// Slot the consumer reads from next.
    drain_index: usize,
    /// Offset into `current`.
    cursor: usize,
    /// Bytes checked out of `slots[drain_index]`, if any.
    current: Option<Vec<u8>>,
    /// Drained bytes of `slots[drain_index ^ 1]`, kept until a byte of
    /// `current` has been read.
    previous: Option<Vec<u8>>,
    /// End of input has been returned; no more slot traffic.
    at_end: bool,
    /// The last call returned a byte that has not been pushed back.
    can_push_back: bool,
}

impl DoubleBufferedSource {
    /// Start draining `reader` with a background fill thread.
    pub fn new<R>(reader: R, config: SourceConfig) -> Result<Self, SourceError>
    where
        R: Read + Send + 'static,
    {
        let capacity = config.capacity();
        let shared = Arc::new(Shared {
            slots: [Slot::new(capacity), Slot::new(capacity)],
            exhausted: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            failure: Mutex::new(None),
            poll: config.poll_interval(),
        });

        let fill = FillLoop {
            reader,
            shared: Arc::clone(&shared),
            capacity,
        };
        let filler = thread::Builder::new()
            .name("pas-fill".to_string())
            .spawn(move || fill.run())
            .map_err(SourceError::Spawn)?;

        Ok(DoubleBufferedSource {
            shared,
            filler: Some(filler),
            drain_index: 0,
            cursor: 0,
            current: None,
            previous: None,
            at_end: false,
            can_push_back: false,
        })
    }

    /// Open `path` and start draining it.
    ///
    /// Open failures are returned here, before any thread is started.
    pub fn open(path: impl AsRef<Path>, config: SourceConfig) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(file, config)
    }

    /// Next byte, or `None` once the byte source is exhausted and every
    /// buffered byte has been returned.
    ///
    /// Blocks while the next chunk is still being read.
    pub fn next_char(&mut self) -> Option<u8> {
        if self.current.is_none() && !self.checkout() {
            self.can_push_back = false;
            return None;
        }
        let Some(&byte) = self.current.as_ref().and_then(|c| c.get(self.cursor)) else {
            self.can_push_back = false;
            return None;
        };
        self.cursor += 1;

        if let Some(drained) = self.previous.take() {
            self.shared.slots[self.drain_index ^ 1].recycle(drained);
        }
        if self.current.as_ref().is_some_and(|c| self.cursor == c.len()) {
            self.previous = self.current.take();
            self.drain_index ^= 1;
            self.cursor = 0;
        }

        self.can_push_back = true;
        Some(byte)
    }

    /// Step back one byte so the next [`next_char`](Self::next_char)
    /// returns it again.
    ///
    /// Returns `false` at the start of the stream, after end of input, when
    /// called twice without an intervening `next_char`, or when the previous
    /// slot has already been recycled.
    pub fn push_back(&mut self) -> bool {
        if !std::mem::replace(&mut self.can_push_back, false) {
            return false;
        }
        if self.cursor > 0 {
            self.cursor -= 1;
            return true;
        }
        match self.previous.take() {
            Some(drained) if self.current.is_none() => {
                self.cursor = drained.len().saturating_sub(1);
                self.current = Some(drained);
                self.drain_index ^= 1;
                true
            }
            other => {
                self.previous = other;
                false
            }
        }
    }

    /// Whether the fill thread has seen the end of the byte source.
    ///
    /// Buffered bytes may still be pending.
    pub fn is_exhausted(&self) -> bool {
        self.shared.exhausted.load(Ordering::Acquire)
    }

    /// Stop the fill thread, wait for it, and report how it ended.
    ///
    /// Returns the recorded mid-stream read error, if any. If called before
    /// end of input this waits for an in-flight read to return.
    pub fn close(mut self) -> Result<(), SourceError> {
        self.shutdown();
        if let Some(handle) = self.filler.take() {
            if handle.join().is_err() {
                return Err(SourceError::FillerPanicked);
            }
        }
        match self.shared.failure.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Check out `slots[drain_index]`. Returns `false` at end of input.
    fn checkout(&mut self) -> bool {
        if self.at_end {
            return false;
        }
        loop {
            let slot = &self.shared.slots[self.drain_index];
            match slot.take(self.shared.poll, &self.shared.exhausted) {
                Checkout::Chunk(bytes) => {
                    self.current = Some(bytes);
                    return true;
                }
                Checkout::Final => {
                    self.at_end = true;
                    return false;
                }
                Checkout::Exhausted => {
                    // The other slot may still hold a chunk nobody checked out.
                    let other = &self.shared.slots[self.drain_index ^ 1];
                    if self.previous.is_none() && other.state() == SlotState::Ready {
                        self.drain_index ^= 1;
                        continue;
                    }
                    self.at_end = true;
                    return false;
                }
            }
        }
    }

    fn shutdown(&self) {
        self.shared.closed.store(true, Ordering::Release);
        self.shared.wake_all();
    }
}

impl Drop for DoubleBufferedSource {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// The fill thread's half of the protocol.
struct FillLoop<R> {
    reader: R,
    shared: Arc<Shared>,
    capacity: usize,
}

impl<R: Read> FillLoop<R> {
    fn run(mut self) {
        let _exhaust = ExhaustOnExit(Arc::clone(&self.shared));
        debug!(capacity = self.capacity, "fill thread started");

        let mut fill_index = 0;
        let mut offset: u64 = 0;
        let mut chunks: u64 = 0;
        loop {
            let slot = &self.shared.slots[fill_index];
            let Some(mut spare) = slot.wait_empty(self.shared.poll, &self.shared.closed) else {
                debug!(offset, chunks, "fill thread stopped by consumer");
                return;
            };
            spare.resize(self.capacity, 0);

            match read_chunk(&mut self.reader, &mut spare) {
                Ok(0) => {
                    slot.mark_eof(spare, &self.shared.exhausted);
                    debug!(offset, chunks, "byte source exhausted");
                    return;
                }
                Ok(len) => {
                    spare.truncate(len);
                    offset += u64::try_from(len).unwrap_or(u64::MAX);
                    chunks += 1;
                    trace!(slot = fill_index, len, "filled chunk");
                    slot.publish(spare);
                }
                Err(source) => {
                    warn!(offset, error = %source, "read failed, treating as end of input");
                    *self.shared.failure.lock() = Some(SourceError::Read { offset, source });
                    slot.mark_eof(spare, &self.shared.exhausted);
                    return;
                }
            }
            fill_index ^= 1;
        }
    }
}

/// Raises `exhausted` when the fill thread exits by any path, unwinding
/// included, so the consumer never waits on a thread that is gone.
struct ExhaustOnExit(Arc<Shared>);

impl Drop for ExhaustOnExit {
    fn drop(&mut self) {
        self.0.exhausted.store(true, Ordering::Release);
        self.0.wake_all();
    }
}

/// One `read` call, retried on `Interrupted`.
fn read_chunk(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests;
