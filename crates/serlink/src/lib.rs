//! Packet framing and startup synchronization for point-to-point serial links.
//!
//! serlink sits at the bottom of a device protocol stack: it waits out the
//! noisy period after power-on, then delimits variable-length packets inside
//! the raw byte stream of a UART.
//!
//! # Crate Structure
//!
//! - [`transport`]: serial line abstraction, clocks, in-memory and tty lines
//! - [`frame`]: wire format, encoder and the resynchronizing receiver
//! - [`link`]: startup drain and the ready-to-use [`link::SerialTransport`]
//!
//! # Example
//!
//! ```
//! use serlink::link::{DrainTiming, LinkConfig, SerialTransport};
//! use serlink::transport::{ManualClock, MemoryLine, Millis, SerialAddress};
//!
//! let (a, b) = MemoryLine::pair();
//! let clock = ManualClock::stepping(Millis(0), 1);
//! let config = LinkConfig {
//!     drain: DrainTiming { wait_input_ms: 10, drain_quiet_ms: 5 },
//!     ..LinkConfig::default()
//! };
//!
//! let mut left = SerialTransport::create(a, &clock, config).unwrap();
//! let mut right = SerialTransport::create(b, &clock, config).unwrap();
//!
//! left.send(b"ping", &SerialAddress).unwrap();
//! let mut buf = [0u8; 64];
//! let mut src = SerialAddress;
//! let n = right.poll_receive(&mut buf, &mut src).unwrap();
//! assert_eq!(&buf[..n], b"ping");
//! ```

/// Re-export transport types.
pub mod transport {
    pub use serlink_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use serlink_frame::*;
}

/// Re-export link types.
pub mod link {
    pub use serlink_link::*;
}
