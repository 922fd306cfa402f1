use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Operation surface shared by every transport the protocol engine drives.
///
/// Packet transports (serial, UDP) implement the same capability set so the
/// engine above can stay transport-agnostic. Every operation except
/// construction is non-blocking.
pub trait Transport {
    /// Peer address type. Degenerate for point-to-point links.
    type Address: Clone + Eq + fmt::Debug + fmt::Display + FromStr;

    /// Error returned by send/receive.
    type Error: std::error::Error;

    /// Send one packet to `dst`. Returns the number of payload bytes accepted.
    fn send(&mut self, payload: &[u8], dst: &Self::Address) -> Result<usize, Self::Error>;

    /// Poll for one packet. Returns 0 when nothing is ready; otherwise the
    /// packet length, with the payload in `buf` and the sender in `src`.
    fn recv(&mut self, buf: &mut [u8], src: &mut Self::Address) -> Result<usize, Self::Error>;

    /// Reports whether input is pending. Never consumes input.
    fn wait(&self, timeout: Duration) -> Result<bool, Self::Error>;

    fn addr_to_string(&self, addr: &Self::Address) -> String {
        addr.to_string()
    }

    fn string_to_addr(&self, s: &str) -> Option<Self::Address> {
        s.parse().ok()
    }

    fn addr_eq(&self, a: &Self::Address, b: &Self::Address) -> bool {
        a == b
    }
}
