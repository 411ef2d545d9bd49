//! One half of the double buffer: a fixed-capacity chunk plus the state
//! machine that hands it between the fill thread and the consumer.
//!
//! # State machine
//!
//! ```text
//!            publish              take            recycle
//!   Empty ───────────▶ Ready ───────────▶ (drained) ───────▶ Empty
//!     │
//!     └── mark_eof ──▶ AtEof   (terminal; no further fills)
//! ```
//!
//! Only the fill thread moves a slot out of `Empty`; only the consumer moves
//! it back into `Empty`. Each slot has its own mutex and condvar, so filling
//! one slot never blocks draining the other.
//!
//! While the consumer is draining, the chunk bytes are checked out of the
//! slot (moved into the consumer) and the slot stays `Ready`. `recycle`
//! moves the allocation back so the fill thread can reuse it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Fill state of a [`Slot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SlotState {
    /// Drained (or never filled); owned by the fill thread.
    Empty,
    /// Holds a chunk the consumer has not finished.
    Ready,
    /// Final marker: the byte source is exhausted. Contents are empty.
    AtEof,
}

/// Result of the consumer checking out a slot.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Checkout {
    /// A chunk of bytes to drain.
    Chunk(Vec<u8>),
    /// The slot is the final marker; nothing follows it.
    Final,
    /// The slot is still `Empty` but the fill thread has terminated.
    Exhausted,
}

struct SlotInner {
    state: SlotState,
    contents: Vec<u8>,
}

/// A single buffer slot.
pub(crate) struct Slot {
    inner: Mutex<SlotInner>,
    changed: Condvar,
}

impl Slot {
    pub(crate) fn new(capacity: usize) -> Self {
        Slot {
            inner: Mutex::new(SlotInner {
                state: SlotState::Empty,
                contents: Vec::with_capacity(capacity),
            }),
            changed: Condvar::new(),
        }
    }

    /// Current state. A snapshot; it may change as soon as this returns.
    pub(crate) fn state(&self) -> SlotState {
        self.inner.lock().state
    }

    // ─── Fill side ─────────────────────────────────────────────────

    /// Block until the slot is `Empty`, then hand its allocation to the
    /// fill thread.
    ///
    /// Returns `None` once `closed` is observed. The wait is bounded by
    /// `poll` so a missed notification costs at most one interval.
    pub(crate) fn wait_empty(&self, poll: Duration, closed: &AtomicBool) -> Option<Vec<u8>> {
        let mut inner = self.inner.lock();
        loop {
            if closed.load(Ordering::Acquire) {
                return None;
            }
            if inner.state == SlotState::Empty {
                return Some(std::mem::take(&mut inner.contents));
            }
            self.changed.wait_for(&mut inner, poll);
        }
    }

    /// Store a freshly read chunk and mark the slot `Ready`.
    pub(crate) fn publish(&self, chunk: Vec<u8>) {
        debug_assert!(!chunk.is_empty(), "empty chunks are published as AtEof");
        let mut inner = self.inner.lock();
        debug_assert_eq!(inner.state, SlotState::Empty);
        inner.contents = chunk;
        inner.state = SlotState::Ready;
        self.changed.notify_all();
    }

    /// Mark the slot as the final, empty chunk and raise `exhausted`.
    ///
    /// The flag is set while the slot lock is held, so a consumer that
    /// checks the flag under the same lock cannot miss it.
    pub(crate) fn mark_eof(&self, mut spare: Vec<u8>, exhausted: &AtomicBool) {
        spare.clear();
        let mut inner = self.inner.lock();
        inner.contents = spare;
        inner.state = SlotState::AtEof;
        exhausted.store(true, Ordering::Release);
        self.changed.notify_all();
    }

    // ─── Drain side ────────────────────────────────────────────────

    /// Block until the slot is `Ready` or `AtEof` and check it out.
    ///
    /// While the slot is `Empty`, `exhausted` is rechecked every time the
    /// lock is (re)acquired, before and after each bounded wait.
    pub(crate) fn take(&self, poll: Duration, exhausted: &AtomicBool) -> Checkout {
        let mut inner = self.inner.lock();
        loop {
            match inner.state {
                SlotState::Ready => return Checkout::Chunk(std::mem::take(&mut inner.contents)),
                SlotState::AtEof => return Checkout::Final,
                SlotState::Empty => {
                    if exhausted.load(Ordering::Acquire) {
                        return Checkout::Exhausted;
                    }
                    self.changed.wait_for(&mut inner, poll);
                }
            }
        }
    }

    /// Return a drained chunk's allocation and mark the slot `Empty`.
    pub(crate) fn recycle(&self, mut drained: Vec<u8>) {
        drained.clear();
        let mut inner = self.inner.lock();
        debug_assert_eq!(inner.state, SlotState::Ready);
        inner.contents = drained;
        inner.state = SlotState::Empty;
        self.changed.notify_all();
    }

    /// Wake every thread waiting on this slot.
    pub(crate) fn wake(&self) {
        let _inner = self.inner.lock();
        self.changed.notify_all();
    }
}
