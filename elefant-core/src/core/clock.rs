//! Injectable time source for the autosave scheduler.
//!
//! The debounce delay and the "Saved" display window are both driven by an
//! abstract [`Clock`] so that every timing-dependent transition can be tested
//! deterministically, without real wall-clock delay.

use std::cell::Cell;

/// A monotonic-enough source of the current time in epoch milliseconds.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// Wall-clock implementation used by the real application.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
///
/// Intended for tests and simulations: hold on to a clone of the `Rc` you
/// hand the session and call [`advance`](Self::advance) to fire debounce
/// deadlines and display windows on demand.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<i64>,
}

impl ManualClock {
    pub fn new(start_ms: i64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Moves the clock forward by `delta_ms`.
    pub fn advance(&self, delta_ms: i64) {
        self.now.set(self.now.get() + delta_ms);
    }

    /// Sets the clock to an absolute instant.
    pub fn set(&self, now_ms: i64) {
        self.now.set(now_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> i64 {
        self.now.get()
    }
}
