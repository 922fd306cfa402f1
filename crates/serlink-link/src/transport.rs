use std::time::Duration;

use serlink_frame::{Corruption, Frame, FrameConfig, FramedLine, ReceiverStats};
use serlink_transport::{Clock, SerialAddress, SerialLine, SystemClock, Transport};

use crate::error::{LinkError, Result};
use crate::startup::{run_startup_drain, DrainReport, DrainTiming};

/// Configuration for a serial link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkConfig {
    /// Framing mode and MTU.
    pub frame: FrameConfig,
    /// Startup drain timeouts.
    pub drain: DrainTiming,
}

/// A ready-to-use serial transport.
///
/// Constructing one runs the startup drain to completion. After that every
/// operation is non-blocking and driven by the caller's polling loop.
pub struct SerialTransport<L> {
    framed: FramedLine<L>,
    drain: DrainReport,
}

impl<L: SerialLine> SerialTransport<L> {
    /// Drain startup noise from `line` using `clock`, then wrap it.
    pub fn create<C: Clock + ?Sized>(mut line: L, clock: &C, config: LinkConfig) -> Result<Self> {
        let drain = run_startup_drain(&mut line, clock, &config.drain)?;
        Ok(Self {
            framed: FramedLine::with_config(line, config.frame),
            drain,
        })
    }

    /// [`SerialTransport::create`] with the host's monotonic clock.
    pub fn open(line: L, config: LinkConfig) -> Result<Self> {
        Self::create(line, &SystemClock::new(), config)
    }

    /// Report bytes the receiver throws away to `hook`.
    pub fn with_corruption_hook(mut self, hook: impl FnMut(Corruption) + Send + 'static) -> Self {
        self.framed = self.framed.with_corruption_hook(hook);
        self
    }

    /// Send one payload to the peer. `dst` is ignored; there is only one.
    pub fn send(&mut self, payload: &[u8], _dst: &SerialAddress) -> Result<usize> {
        Ok(self.framed.send(payload)?)
    }

    /// Poll for one received payload. Returns 0 when nothing is ready.
    pub fn poll_receive(&mut self, buf: &mut [u8], src: &mut SerialAddress) -> Result<usize> {
        let n = self.framed.poll_receive(buf)?;
        if n > 0 {
            *src = SerialAddress;
        }
        Ok(n)
    }

    /// Poll for one received frame without a caller buffer.
    pub fn recv_frame(&mut self) -> Result<Option<Frame>> {
        Ok(self.framed.poll_frame()?)
    }

    /// Whether input is waiting. Does not consume it.
    ///
    /// The timeout is part of the shared transport contract; a serial line
    /// answers immediately.
    pub fn wait(&self, _timeout: Duration) -> Result<bool> {
        Ok(self.framed.has_input()?)
    }

    pub fn address_to_string(&self, addr: &SerialAddress) -> String {
        addr.to_string()
    }

    pub fn string_to_address(&self, _s: &str) -> SerialAddress {
        SerialAddress
    }

    /// What happened during the startup drain.
    pub fn drain_report(&self) -> &DrainReport {
        &self.drain
    }

    pub fn stats(&self) -> ReceiverStats {
        self.framed.stats()
    }

    pub fn config(&self) -> &FrameConfig {
        self.framed.config()
    }

    /// Borrow the underlying line.
    pub fn get_ref(&self) -> &L {
        self.framed.get_ref()
    }

    /// Mutably borrow the underlying line.
    pub fn get_mut(&mut self) -> &mut L {
        self.framed.get_mut()
    }

    /// Consume the transport and return the line.
    pub fn into_inner(self) -> L {
        self.framed.into_inner()
    }
}

#[cfg(unix)]
impl SerialTransport<serlink_transport::TtyLine> {
    /// Open a serial device at the fixed baud rate and drain it.
    pub fn open_tty(path: impl AsRef<std::path::Path>, config: LinkConfig) -> Result<Self> {
        let line = serlink_transport::TtyLine::open(path)?;
        Self::open(line, config)
    }
}

impl<L: SerialLine> Transport for SerialTransport<L> {
    type Address = SerialAddress;
    type Error = LinkError;

    fn send(&mut self, payload: &[u8], dst: &SerialAddress) -> Result<usize> {
        SerialTransport::send(self, payload, dst)
    }

    fn recv(&mut self, buf: &mut [u8], src: &mut SerialAddress) -> Result<usize> {
        self.poll_receive(buf, src)
    }

    fn wait(&self, timeout: Duration) -> Result<bool> {
        SerialTransport::wait(self, timeout)
    }
}

impl<L> std::fmt::Debug for SerialTransport<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("framed", &self.framed)
            .field("drain", &self.drain)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use serlink_frame::{FrameError, FramingMode};
    use serlink_transport::{ManualClock, MemoryLine, Millis};

    use super::*;

    fn fast_config() -> LinkConfig {
        LinkConfig {
            drain: DrainTiming {
                wait_input_ms: 20,
                drain_quiet_ms: 5,
            },
            ..LinkConfig::default()
        }
    }

    fn quiet_transport(line: MemoryLine) -> SerialTransport<MemoryLine> {
        let clock = ManualClock::stepping(Millis(0), 1);
        SerialTransport::create(line, &clock, fast_config()).unwrap()
    }

    #[test]
    fn create_drains_pending_garbage() {
        let line = MemoryLine::new();
        line.inject(b"\x00\xffboot");
        let transport = quiet_transport(line.clone());

        assert_eq!(transport.drain_report().bytes_drained, 6);
        assert_eq!(line.available().unwrap(), 0);
    }

    #[test]
    fn send_then_receive_across_pair() {
        let (a, b) = MemoryLine::pair();
        let mut left = quiet_transport(a);
        let mut right = quiet_transport(b);

        assert_eq!(left.send(b"hello", &SerialAddress).unwrap(), 5);
        assert!(right.wait(Duration::ZERO).unwrap());

        let mut buf = [0u8; 64];
        let mut src = SerialAddress;
        let n = right.poll_receive(&mut buf, &mut src).unwrap();
        assert_eq!(&buf[..n], b"hello");
        assert_eq!(src, SerialAddress);
    }

    #[test]
    fn oversized_send_is_rejected() {
        let line = MemoryLine::new();
        let mut transport = quiet_transport(line.clone());
        let too_big = vec![0u8; transport.config().mtu() + 1];

        let err = transport.send(&too_big, &SerialAddress).unwrap_err();
        assert!(matches!(
            err,
            LinkError::Frame(FrameError::PayloadTooLarge { .. })
        ));
        assert_eq!(line.pending_output(), 0);
    }

    #[test]
    fn wait_reports_without_consuming() {
        let line = MemoryLine::new();
        let transport = quiet_transport(line.clone());

        assert!(!transport.wait(Duration::from_millis(10)).unwrap());
        line.inject(b"?");
        assert!(transport.wait(Duration::from_millis(10)).unwrap());
        assert_eq!(line.available().unwrap(), 1);
    }

    #[test]
    fn addresses_are_degenerate() {
        let transport = quiet_transport(MemoryLine::new());
        let addr = transport.string_to_address("239.255.0.1:7447");
        assert_eq!(addr, SerialAddress);
        assert_eq!(transport.address_to_string(&addr), "");
        assert!(transport.addr_eq(&addr, &SerialAddress));
        assert_eq!(transport.string_to_addr("anything"), Some(SerialAddress));
    }

    #[test]
    fn generic_transport_surface() {
        fn exchange<T: Transport>(tx: &mut T, rx: &mut T, dst: &T::Address) -> usize
        where
            T::Address: Default,
        {
            tx.send(b"via trait", dst).unwrap();
            let mut buf = [0u8; 32];
            let mut src = T::Address::default();
            rx.recv(&mut buf, &mut src).unwrap()
        }

        let (a, b) = MemoryLine::pair();
        let mut left = quiet_transport(a);
        let mut right = quiet_transport(b);
        assert_eq!(exchange(&mut left, &mut right, &SerialAddress), 9);
    }

    #[test]
    fn stream_mode_transport() {
        let (a, b) = MemoryLine::pair();
        let clock = ManualClock::stepping(Millis(0), 1);
        let config = LinkConfig {
            frame: FrameConfig::stream(128).unwrap(),
            ..fast_config()
        };
        let mut left = SerialTransport::create(a, &clock, config).unwrap();
        let mut right = SerialTransport::create(b, &clock, config).unwrap();
        assert_eq!(right.config().mode(), FramingMode::Stream);

        left.send(b"raw bytes", &SerialAddress).unwrap();
        let mut buf = [0u8; 3];
        let mut src = SerialAddress;
        assert_eq!(right.poll_receive(&mut buf, &mut src).unwrap(), 3);
        assert_eq!(&buf, b"raw");
    }

    #[test]
    fn corruption_hook_through_transport() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let line = MemoryLine::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let mut transport = quiet_transport(line.clone()).with_corruption_hook(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        line.inject(&[0x01, 0x02, 0xFF, 0x55, 0x01, b'k']);
        let frame = transport.recv_frame().unwrap().unwrap();
        assert_eq!(frame.payload.as_ref(), b"k");
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(transport.stats().noise_bytes, 2);
    }
}
