//! Serial line abstraction for point-to-point links.
//!
//! Provides the pieces every serial transport needs regardless of framing:
//! - [`SerialLine`]: byte-at-a-time access to a UART-like line
//! - [`Clock`] and [`Millis`]: a wrapping millisecond clock
//! - [`SerialAddress`]: the single implicit peer of a serial link
//! - [`Transport`]: the operation surface shared with richer transports
//!
//! This is the lowest layer of serlink. Framing and link startup build on
//! top of the traits defined here.

pub mod address;
pub mod clock;
pub mod error;
pub mod line;
pub mod memory;
pub mod traits;

#[cfg(unix)]
pub mod tty;

pub use address::SerialAddress;
pub use clock::{Clock, ManualClock, Millis, SystemClock};
pub use error::{Result, TransportError};
pub use line::{SerialLine, BAUD_RATE};
pub use memory::MemoryLine;
pub use traits::Transport;

#[cfg(unix)]
pub use tty::TtyLine;
