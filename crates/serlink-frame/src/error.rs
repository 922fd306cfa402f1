/// Errors that can occur during frame encoding, configuration, and line I/O.
///
/// Malformed input on the receive side is never an error; it is absorbed by
/// resynchronization.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds the configured MTU. Nothing was written.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// Packet mode cannot carry an empty payload (length 0 is noise).
    #[error("empty payload cannot be framed")]
    EmptyPayload,

    /// The MTU does not fit in the single length byte of packet mode.
    #[error("MTU {mtu} too large for packet framing (max {max})")]
    MtuTooLarge { mtu: usize, max: usize },

    /// An MTU of zero admits no payload at all.
    #[error("MTU must be at least 1")]
    ZeroMtu,

    /// The caller's receive buffer cannot hold the completed frame.
    #[error("receive buffer too small ({capacity} bytes, frame is {needed})")]
    BufferTooSmall { needed: usize, capacity: usize },

    /// The underlying serial line failed.
    #[error("serial transport error: {0}")]
    Transport(#[from] serlink_transport::TransportError),

    /// An I/O error from an async byte stream.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FrameError>;
