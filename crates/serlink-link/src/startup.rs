//! Startup drain for freshly powered serial links.
//!
//! Resets on small boards are often followed by a burst of garbage on the
//! line. Before the link is handed over, wait up to 5 s for input; if any
//! arrives, keep discarding it until the line has been quiet for 1 s.
//!
//! ```text
//!            byte                 byte (re-arm)
//! WaitInput ──────▶ DrainInput ◀──────┐
//!     │                 │  └──────────┘
//!     │ 5000 ms         │ 1000 ms quiet
//!     ▼                 ▼
//!            Operational
//! ```

use serlink_transport::{Clock, Millis, SerialLine};
use tracing::{debug, info};

use crate::error::Result;

/// How long to wait for the first byte after power-on.
pub const WAIT_INPUT_MS: u32 = 5000;

/// How long the line must stay quiet before draining ends.
pub const DRAIN_QUIET_MS: u32 = 1000;

/// Timeouts for the startup drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainTiming {
    /// Give up waiting for input after this long in `WaitInput`.
    pub wait_input_ms: u32,
    /// Quiet period that ends `DrainInput`.
    pub drain_quiet_ms: u32,
}

impl Default for DrainTiming {
    fn default() -> Self {
        Self {
            wait_input_ms: WAIT_INPUT_MS,
            drain_quiet_ms: DRAIN_QUIET_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupState {
    WaitInput,
    DrainInput,
    Operational,
}

/// What the caller must do after a [`StartupDrain::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainStep {
    /// Nothing yet; poll again.
    Pending,
    /// Read and discard one byte from the line.
    Consume,
    /// The link is ready.
    Operational,
}

/// The startup drain state machine, independent of any line or clock.
#[derive(Debug, Clone)]
pub struct StartupDrain {
    state: StartupState,
    entered: Millis,
    timing: DrainTiming,
    consumed: usize,
}

impl StartupDrain {
    pub fn new(now: Millis, timing: DrainTiming) -> Self {
        Self {
            state: StartupState::WaitInput,
            entered: now,
            timing,
            consumed: 0,
        }
    }

    /// Advance the machine. The timeout is checked before input, so a byte
    /// arriving exactly at the deadline is left on the line.
    pub fn poll(&mut self, now: Millis, byte_available: bool) -> DrainStep {
        let timeout = match self.state {
            StartupState::WaitInput => self.timing.wait_input_ms,
            StartupState::DrainInput => self.timing.drain_quiet_ms,
            StartupState::Operational => return DrainStep::Operational,
        };

        if i64::from(now.since(self.entered)) >= i64::from(timeout) {
            self.state = StartupState::Operational;
            self.entered = now;
            DrainStep::Operational
        } else if byte_available {
            self.state = StartupState::DrainInput;
            self.entered = now;
            self.consumed += 1;
            DrainStep::Consume
        } else {
            DrainStep::Pending
        }
    }

    pub fn state(&self) -> StartupState {
        self.state
    }

    /// Clock reading when the current state was entered.
    pub fn entered(&self) -> Millis {
        self.entered
    }

    /// Bytes the machine has asked to discard so far.
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

/// Outcome of a completed drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrainReport {
    pub bytes_drained: usize,
    pub started: Millis,
    pub finished: Millis,
}

impl DrainReport {
    pub fn elapsed_ms(&self) -> i32 {
        self.finished.since(self.started)
    }
}

/// Busy-poll `line` until the startup drain reaches `Operational`.
///
/// Bounded by the drain timeouts as long as the line eventually goes quiet.
/// Only line I/O failures are errors.
pub fn run_startup_drain<L, C>(line: &mut L, clock: &C, timing: &DrainTiming) -> Result<DrainReport>
where
    L: SerialLine + ?Sized,
    C: Clock + ?Sized,
{
    let started = clock.now();
    let mut drain = StartupDrain::new(started, *timing);
    let mut drained = 0usize;

    loop {
        let now = clock.now();
        let available = line.has_input()?;
        match drain.poll(now, available) {
            DrainStep::Pending => std::hint::spin_loop(),
            DrainStep::Consume => {
                // The line may report input that a read then fails to return.
                if line.read_byte()?.is_some() {
                    drained += 1;
                    if drained == 1 {
                        debug!(at = %now, "input during startup, draining");
                    }
                }
            }
            DrainStep::Operational => {
                let report = DrainReport {
                    bytes_drained: drained,
                    started,
                    finished: now,
                };
                info!(
                    bytes_drained = report.bytes_drained,
                    elapsed_ms = report.elapsed_ms(),
                    "serial link operational"
                );
                return Ok(report);
            }
        }
    }
}
