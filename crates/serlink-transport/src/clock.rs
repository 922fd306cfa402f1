//! Wrapping millisecond clock.
//!
//! Small devices count milliseconds in a 32-bit register that rolls over
//! roughly every 49.7 days. All elapsed-time math therefore goes through
//! [`Millis::since`], which subtracts with wraparound and reinterprets the
//! result as signed.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// A clock reading in milliseconds since an arbitrary epoch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Millis(pub u32);

impl Millis {
    pub const ZERO: Millis = Millis(0);

    /// Milliseconds elapsed from `earlier` to `self`.
    ///
    /// Correct across a counter rollover as long as the true distance is
    /// below `i32::MAX` milliseconds.
    pub fn since(self, earlier: Millis) -> i32 {
        self.0.wrapping_sub(earlier.0) as i32
    }

    /// The reading `ms` milliseconds after this one.
    pub fn wrapping_add(self, ms: u32) -> Millis {
        Millis(self.0.wrapping_add(ms))
    }

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Source of monotonic time for polling loops.
pub trait Clock {
    /// Current reading.
    fn now(&self) -> Millis;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Millis {
        (**self).now()
    }
}

/// Wall-clock-free monotonic time backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Millis {
        // Truncation is the rollover.
        Millis(self.origin.elapsed().as_millis() as u32)
    }
}

/// Simulated clock for tests and host-side replays.
///
/// Clones share the same time. A stepping clock advances by a fixed amount
/// on every [`Clock::now`] read, which models a busy-poll loop whose
/// iterations each cost a little time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU32>,
    step: u32,
}

impl ManualClock {
    /// A clock frozen at `start` until advanced.
    pub fn new(start: Millis) -> Self {
        Self {
            now: Arc::new(AtomicU32::new(start.0)),
            step: 0,
        }
    }

    /// A clock that moves `step` milliseconds forward on every read and
    /// returns the advanced time.
    pub fn stepping(start: Millis, step: u32) -> Self {
        Self {
            now: Arc::new(AtomicU32::new(start.0)),
            step,
        }
    }

    /// Current time without stepping.
    pub fn peek(&self) -> Millis {
        Millis(self.now.load(Ordering::SeqCst))
    }

    pub fn advance(&self, ms: u32) {
        let _ = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.wrapping_add(ms))
            });
    }

    pub fn set(&self, at: Millis) {
        self.now.store(at.0, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Millis {
        if self.step == 0 {
            return self.peek();
        }
        let before = self
            .now
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |t| {
                Some(t.wrapping_add(self.step))
            })
            .unwrap_or_else(|t| t);
        Millis(before).wrapping_add(self.step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn since_simple_difference() {
        assert_eq!(Millis(1500).since(Millis(500)), 1000);
        assert_eq!(Millis(500).since(Millis(1500)), -1000);
    }

    #[test]
    fn since_survives_rollover() {
        let before = Millis(u32::MAX - 99);
        let after = before.wrapping_add(300);
        assert_eq!(after, Millis(200));
        assert_eq!(after.since(before), 300);
    }

    #[test]
    fn manual_clock_is_shared_between_clones() {
        let clock = ManualClock::new(Millis(10));
        let other = clock.clone();

        other.advance(90);
        assert_eq!(clock.now(), Millis(100));

        clock.set(Millis(7));
        assert_eq!(other.peek(), Millis(7));
    }

    #[test]
    fn stepping_clock_advances_after_each_read() {
        let clock = ManualClock::stepping(Millis(0), 1);

        assert_eq!(clock.now(), Millis(1));
        assert_eq!(clock.now(), Millis(2));
        assert_eq!(clock.peek(), Millis(2));
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let first = clock.now();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(clock.now().since(first) >= 5);
    }

    #[test]
    fn display_includes_unit() {
        assert_eq!(Millis(42).to_string(), "42ms");
    }
}
