//! Packet framing for byte streams with no inherent boundaries.
//!
//! Every packet on the wire is:
//! - A 2-byte sync marker (`0xFF 0x55`) for stream synchronization
//! - A 1-byte payload length (1..=MTU)
//! - The payload
//! - A `"\r\n"` terminator
//!
//! The receiver resynchronizes silently on any malformed header byte and
//! never reports a partial frame.

#[cfg(feature = "async")]
pub mod async_codec;
pub mod codec;
pub mod config;
pub mod error;
pub mod framed;
pub mod receiver;

#[cfg(feature = "async")]
pub use async_codec::SerialCodec;
pub use codec::{
    encode, encode_frame, Frame, FRAME_TERMINATOR, HEADER_SIZE, SYNC, SYNC_FIRST, SYNC_SECOND,
};
pub use config::{FrameConfig, FramingMode, DEFAULT_MTU, MAX_PACKET_MTU};
pub use error::{FrameError, Result};
pub use framed::FramedLine;
pub use receiver::{Corruption, FrameReceiver, ReceiverState, ReceiverStats};
