//! Point-to-point serial link.
//!
//! Composes the startup drain with packet framing: create a
//! [`SerialTransport`] once (this absorbs power-on line noise), then poll it
//! from the outer loop to send and receive frames.

pub mod error;
pub mod startup;
pub mod transport;

pub use error::{LinkError, Result};
pub use startup::{
    run_startup_drain, DrainReport, DrainStep, DrainTiming, StartupDrain, StartupState,
    DRAIN_QUIET_MS, WAIT_INPUT_MS,
};
pub use transport::{LinkConfig, SerialTransport};
