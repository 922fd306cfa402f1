use bytes::BytesMut;
use serlink_transport::SerialLine;
use tracing::warn;

use crate::codec::{encode, Frame};
use crate::config::{FrameConfig, FramingMode};
use crate::error::{FrameError, Result};
use crate::receiver::{Corruption, FrameReceiver, ReceiverStats};

/// Sends and polls frames over any [`SerialLine`].
///
/// Owns the receive state for its line, so independent lines never share
/// framing state. Nothing here blocks: polling consumes only bytes that are
/// already available and stops after at most one complete frame.
pub struct FramedLine<T> {
    inner: T,
    config: FrameConfig,
    receiver: FrameReceiver,
    tx: BytesMut,
    pending: Option<Frame>,
}

impl<T: SerialLine> FramedLine<T> {
    /// Wrap a line with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Wrap a line with explicit configuration.
    pub fn with_config(inner: T, config: FrameConfig) -> Self {
        Self {
            inner,
            config,
            receiver: FrameReceiver::new(config.mtu()),
            tx: BytesMut::with_capacity(config.mtu() + crate::codec::HEADER_SIZE + 2),
            pending: None,
        }
    }

    /// Report discarded bytes to `hook` (packet mode only).
    pub fn with_corruption_hook(mut self, hook: impl FnMut(Corruption) + Send + 'static) -> Self {
        self.receiver = self.receiver.with_corruption_hook(hook);
        self
    }

    /// Encode and write one payload. Returns the payload length.
    ///
    /// Oversized payloads are rejected before any byte reaches the line.
    pub fn send(&mut self, payload: &[u8]) -> Result<usize> {
        self.tx.clear();
        if let Err(err) = encode(payload, &self.config, &mut self.tx) {
            warn!(size = payload.len(), mtu = self.config.mtu(), %err, "refusing to send");
            return Err(err);
        }
        self.inner.write_bytes(&self.tx)?;
        self.inner.flush()?;
        Ok(payload.len())
    }

    /// Poll for one complete frame (packet mode).
    ///
    /// In stream mode this returns whatever bytes are available, up to the
    /// MTU, as one unframed chunk.
    pub fn poll_frame(&mut self) -> Result<Option<Frame>> {
        if let Some(frame) = self.pending.take() {
            return Ok(Some(frame));
        }
        match self.config.mode() {
            FramingMode::Packet => {
                while let Some(byte) = self.inner.read_byte()? {
                    if let Some(frame) = self.receiver.push(byte) {
                        return Ok(Some(frame));
                    }
                }
                Ok(None)
            }
            FramingMode::Stream => {
                let mut chunk = BytesMut::with_capacity(self.config.mtu());
                while chunk.len() < self.config.mtu() {
                    match self.inner.read_byte()? {
                        Some(byte) => chunk.extend_from_slice(&[byte]),
                        None => break,
                    }
                }
                if chunk.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(Frame::new(chunk.freeze())))
                }
            }
        }
    }

    /// Poll into a caller buffer. Returns 0 when nothing is ready.
    ///
    /// Packet mode copies one complete frame; if `buf` is too small the
    /// frame is kept and offered again on the next call. Stream mode copies
    /// all available bytes up to `buf.len()`.
    pub fn poll_receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        match self.config.mode() {
            FramingMode::Packet => {
                let Some(frame) = self.poll_frame()? else {
                    return Ok(0);
                };
                if frame.len() > buf.len() {
                    let needed = frame.len();
                    self.pending = Some(frame);
                    return Err(FrameError::BufferTooSmall {
                        needed,
                        capacity: buf.len(),
                    });
                }
                buf[..frame.len()].copy_from_slice(&frame.payload);
                Ok(frame.len())
            }
            FramingMode::Stream => {
                let mut n = 0usize;
                while n < buf.len() {
                    match self.inner.read_byte()? {
                        Some(byte) => {
                            buf[n] = byte;
                            n += 1;
                        }
                        None => break,
                    }
                }
                Ok(n)
            }
        }
    }

    /// Returns true if input is waiting on the line. Does not consume it.
    pub fn has_input(&self) -> Result<bool> {
        if self.pending.is_some() {
            return Ok(true);
        }
        Ok(self.inner.has_input()?)
    }

    pub fn stats(&self) -> ReceiverStats {
        self.receiver.stats()
    }

    pub fn receiver(&self) -> &FrameReceiver {
        &self.receiver
    }

    /// Current framing configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    /// Borrow the underlying line.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying line.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the framer and return the inner line.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> std::fmt::Debug for FramedLine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FramedLine")
            .field("config", &self.config)
            .field("receiver", &self.receiver)
            .finish_non_exhaustive()
    }
}
