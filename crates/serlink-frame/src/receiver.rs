//! Receive-side framing state machine.
//!
//! Bytes are fed one at a time. The machine hunts for the sync marker,
//! reads the length byte, then collects exactly that many payload bytes.
//! Any unexpected header byte drops it back to [`ReceiverState::Idle`]
//! without surfacing an error; at most one frame's worth of buffered bytes
//! is lost.

use std::fmt;

use bytes::{BufMut, BytesMut};
use tracing::trace;

use crate::codec::{Frame, FRAME_TERMINATOR, SYNC_FIRST, SYNC_SECOND};
use crate::config::MAX_PACKET_MTU;

/// Where the receiver is within a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReceiverState {
    /// Hunting for the first sync byte.
    #[default]
    Idle,
    /// Saw 0xFF; expecting 0x55. A repeated 0xFF keeps waiting here.
    SawFirstSync,
    /// Next byte is the payload length.
    SawSecondSync,
    /// Collecting payload; `remaining` bytes still to come.
    ReadingPayload { remaining: u8 },
}

/// A byte the receiver threw away, and why.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corruption {
    /// A byte outside any frame that cannot start one.
    Noise(u8),
    /// The byte after `0xFF` was not `0x55`.
    BadSync(u8),
    /// A length byte of zero or above the MTU.
    BadLength(u8),
}

/// Running totals for one receiver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    /// Complete frames delivered.
    pub frames: u64,
    /// Bytes discarded while idle (terminators excluded).
    pub noise_bytes: u64,
    /// Sync marker mismatches.
    pub bad_sync: u64,
    /// Rejected length bytes.
    pub bad_length: u64,
}

impl ReceiverStats {
    /// Total corruption events of any kind.
    pub fn corruption_events(&self) -> u64 {
        self.noise_bytes + self.bad_sync + self.bad_length
    }
}

type CorruptionHook = Box<dyn FnMut(Corruption) + Send>;

/// Packet-mode frame receiver. One instance per line.
pub struct FrameReceiver {
    state: ReceiverState,
    buf: BytesMut,
    mtu: usize,
    stats: ReceiverStats,
    on_corruption: Option<CorruptionHook>,
}

impl FrameReceiver {
    /// Create a receiver accepting payloads of `1..=mtu` bytes.
    ///
    /// The length field is one byte wide, so an `mtu` above 255 behaves as 255.
    pub fn new(mtu: usize) -> Self {
        let mtu = mtu.min(MAX_PACKET_MTU);
        Self {
            state: ReceiverState::Idle,
            buf: BytesMut::with_capacity(mtu),
            mtu,
            stats: ReceiverStats::default(),
            on_corruption: None,
        }
    }

    /// Call `hook` for every discarded byte. Frame recovery is unaffected.
    pub fn with_corruption_hook(mut self, hook: impl FnMut(Corruption) + Send + 'static) -> Self {
        self.on_corruption = Some(Box::new(hook));
        self
    }

    /// Feed one byte. Returns the frame it completes, if any.
    pub fn push(&mut self, byte: u8) -> Option<Frame> {
        match self.state {
            ReceiverState::Idle => {
                if byte == SYNC_FIRST {
                    self.state = ReceiverState::SawFirstSync;
                } else if !FRAME_TERMINATOR.contains(&byte) {
                    self.discard(Corruption::Noise(byte));
                }
            }
            ReceiverState::SawFirstSync => {
                if byte == SYNC_SECOND {
                    self.state = ReceiverState::SawSecondSync;
                } else {
                    self.discard(Corruption::BadSync(byte));
                    // A repeated 0xFF may itself open the next header.
                    if byte != SYNC_FIRST {
                        self.state = ReceiverState::Idle;
                    }
                }
            }
            ReceiverState::SawSecondSync => {
                let len = usize::from(byte);
                if len == 0 || len > self.mtu {
                    self.discard(Corruption::BadLength(byte));
                    self.state = ReceiverState::Idle;
                } else {
                    self.buf.clear();
                    self.buf.reserve(len);
                    self.state = ReceiverState::ReadingPayload { remaining: byte };
                }
            }
            ReceiverState::ReadingPayload { remaining } => {
                self.buf.put_u8(byte);
                if remaining > 1 {
                    self.state = ReceiverState::ReadingPayload {
                        remaining: remaining - 1,
                    };
                } else {
                    self.state = ReceiverState::Idle;
                    self.stats.frames += 1;
                    return Some(Frame::new(self.buf.split().freeze()));
                }
            }
        }
        None
    }

    /// Feed bytes until one frame completes or input runs out.
    ///
    /// Returns how many bytes were consumed; bytes after a completed frame
    /// are left for the next call.
    pub fn feed(&mut self, bytes: &[u8]) -> (usize, Option<Frame>) {
        for (i, &byte) in bytes.iter().enumerate() {
            if let Some(frame) = self.push(byte) {
                return (i + 1, Some(frame));
            }
        }
        (bytes.len(), None)
    }

    pub fn state(&self) -> ReceiverState {
        self.state
    }

    /// Payload bytes collected for the frame in flight.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    pub fn mtu(&self) -> usize {
        self.mtu
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    /// Drop any partial frame and go back to hunting for a sync marker.
    pub fn reset(&mut self) {
        self.state = ReceiverState::Idle;
        self.buf.clear();
    }

    fn discard(&mut self, event: Corruption) {
        match event {
            Corruption::Noise(_) => self.stats.noise_bytes += 1,
            Corruption::BadSync(_) => self.stats.bad_sync += 1,
            Corruption::BadLength(_) => self.stats.bad_length += 1,
        }
        trace!(?event, state = ?self.state, "discarding byte");
        if let Some(hook) = self.on_corruption.as_mut() {
            hook(event);
        }
    }
}

impl fmt::Debug for FrameReceiver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameReceiver")
            .field("state", &self.state)
            .field("buffered", &self.buf.len())
            .field("mtu", &self.mtu)
            .field("stats", &self.stats)
            .finish()
    }
}
