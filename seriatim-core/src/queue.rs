//! Bounded FIFO byte queue
//!
//! One instance buffers inbound bytes between the receive interrupt and the
//! update loop; a second buffers outbound bytes between the update loop and
//! the transmit interrupt. The queue itself provides no synchronization -
//! callers on both sides of an interrupt boundary go through
//! [`SharedLink`](crate::shared::SharedLink).

use heapless::Deque;

/// Errors from queue operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueueError {
    /// Queue at capacity; the offered byte was discarded
    Full,
    /// Nothing to dequeue
    Empty,
}

/// Fixed-capacity FIFO of bytes
///
/// A ring buffer: no per-byte allocation on the hot path. Enqueueing into a
/// full queue rejects the byte rather than blocking or overwriting.
#[derive(Debug, Clone, Default)]
pub struct ByteQueue<const N: usize> {
    inner: Deque<u8, N>,
}

impl<const N: usize> ByteQueue<N> {
    /// Create an empty queue
    pub const fn new() -> Self {
        Self {
            inner: Deque::new(),
        }
    }

    /// Append a byte at the tail
    ///
    /// At capacity the byte is discarded and [`QueueError::Full`] returned;
    /// there is no buffering or retry.
    pub fn enqueue(&mut self, byte: u8) -> Result<(), QueueError> {
        self.inner.push_back(byte).map_err(|_| QueueError::Full)
    }

    /// Remove and return the head byte
    pub fn dequeue(&mut self) -> Result<u8, QueueError> {
        self.inner.pop_front().ok_or(QueueError::Empty)
    }

    /// Dequeue repeatedly until the queue is empty
    ///
    /// Teardown helper; discarded bytes are simply lost.
    pub fn drain(&mut self) {
        while self.inner.pop_front().is_some() {}
    }

    /// Number of queued bytes
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns true if the queue is at capacity
    pub fn is_full(&self) -> bool {
        self.inner.is_full()
    }

    /// Total capacity
    pub fn capacity(&self) -> usize {
        N
    }

    /// Free slots remaining
    pub fn remaining(&self) -> usize {
        N - self.inner.len()
    }
}
