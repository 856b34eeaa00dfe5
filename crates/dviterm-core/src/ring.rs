//! Bounded single-producer/single-consumer byte ring for interrupt-fed input.
//!
//! The producer side (`push`) is the only engine code allowed to run at
//! interrupt priority: it never blocks, never allocates, and never overwrites
//! unread data — on a full ring the byte is dropped and the overflow flag
//! raised. The consumer side (`pop`) runs in the logic loop and clears the
//! flag with hysteresis once the backlog has drained past a quarter of
//! capacity, so the flag cannot flap while the producer is still bursting.
//!
//! Implemented over atomic slots so neither side takes a lock; with one
//! producer and one consumer the head/tail release/acquire pairs are the only
//! ordering required.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};

/// Fixed-capacity SPSC byte queue with an overflow indicator.
#[derive(Debug)]
pub struct InputRing {
    slots: Box<[AtomicU8]>,
    /// Producer index (next slot to write).
    head: AtomicUsize,
    /// Consumer index (next slot to read).
    tail: AtomicUsize,
    overflow: AtomicBool,
}

impl InputRing {
    /// Default capacity, sized for a UART receive buffer.
    pub const DEFAULT_CAPACITY: usize = 512;

    /// Create a ring that holds up to `capacity` unread bytes.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        // One slot is kept empty to distinguish full from empty.
        let slots = (0..capacity.max(1) + 1)
            .map(|_| AtomicU8::new(0))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            slots,
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            overflow: AtomicBool::new(false),
        }
    }

    /// Usable capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len() - 1
    }

    /// Unread bytes currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + self.slots.len() - tail) % self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether bytes have been dropped since the flag last cleared.
    #[must_use]
    pub fn overflowed(&self) -> bool {
        self.overflow.load(Ordering::Relaxed)
    }

    /// Producer side: enqueue one byte.
    ///
    /// Returns `false` (and raises the overflow flag) if the ring is full;
    /// the byte is dropped, never blocked on and never overwritten.
    pub fn push(&self, byte: u8) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next = (head + 1) % self.slots.len();
        if next == self.tail.load(Ordering::Acquire) {
            self.overflow.store(true, Ordering::Relaxed);
            return false;
        }
        self.slots[head].store(byte, Ordering::Relaxed);
        self.head.store(next, Ordering::Release);
        true
    }

    /// Consumer side: dequeue one byte, or `None` when empty.
    ///
    /// Clears the overflow flag once free space exceeds 25% of capacity.
    pub fn pop(&self) -> Option<u8> {
        let tail = self.tail.load(Ordering::Relaxed);
        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }
        let byte = self.slots[tail].load(Ordering::Relaxed);
        self.tail.store((tail + 1) % self.slots.len(), Ordering::Release);

        if self.overflow.load(Ordering::Relaxed) {
            let free = self.capacity() - self.len();
            if free > self.capacity() / 4 {
                self.overflow.store(false, Ordering::Relaxed);
            }
        }
        Some(byte)
    }
}

impl Default for InputRing {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
