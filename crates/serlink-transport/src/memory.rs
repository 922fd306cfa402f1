use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::Result;
use crate::line::SerialLine;

type Queue = Arc<Mutex<VecDeque<u8>>>;

/// In-memory serial line.
///
/// [`MemoryLine::pair`] returns two ends wired TX-to-RX, like a null-modem
/// cable. [`MemoryLine::new`] returns a single end whose input is fed with
/// [`MemoryLine::inject`] and whose output is collected with
/// [`MemoryLine::take_written`]. Clones share the same queues.
#[derive(Debug, Clone, Default)]
pub struct MemoryLine {
    rx: Queue,
    tx: Queue,
}

impl MemoryLine {
    /// A standalone line with empty input and output queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Two lines where each one's output is the other one's input.
    pub fn pair() -> (Self, Self) {
        let a_to_b = Queue::default();
        let b_to_a = Queue::default();
        let a = Self {
            rx: Arc::clone(&b_to_a),
            tx: Arc::clone(&a_to_b),
        };
        let b = Self {
            rx: a_to_b,
            tx: b_to_a,
        };
        (a, b)
    }

    /// Make `bytes` readable on this end, as if the peer had sent them.
    pub fn inject(&self, bytes: &[u8]) {
        lock(&self.rx).extend(bytes.iter().copied());
    }

    /// Remove and return everything written to this end so far.
    pub fn take_written(&self) -> Vec<u8> {
        lock(&self.tx).drain(..).collect()
    }

    /// Bytes written to this end that nobody has read yet.
    pub fn pending_output(&self) -> usize {
        lock(&self.tx).len()
    }
}

fn lock(queue: &Queue) -> MutexGuard<'_, VecDeque<u8>> {
    queue.lock().unwrap_or_else(PoisonError::into_inner)
}

impl SerialLine for MemoryLine {
    fn available(&self) -> Result<usize> {
        Ok(lock(&self.rx).len())
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        Ok(lock(&self.rx).pop_front())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        lock(&self.tx).extend(bytes.iter().copied());
        Ok(())
    }
}
