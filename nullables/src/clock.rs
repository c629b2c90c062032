//! Nullable clock — deterministic ticks for testing.

use covault_types::Tick;
use std::cell::Cell;

/// A deterministic block counter for testing.
///
/// Time only advances when you tell it to.
pub struct NullClock {
    current: Cell<u64>,
}

impl NullClock {
    pub fn new(initial_tick: u64) -> Self {
        Self {
            current: Cell::new(initial_tick),
        }
    }

    /// Get the current tick.
    pub fn now(&self) -> Tick {
        Tick::new(self.current.get())
    }

    /// Advance by a number of ticks.
    pub fn advance(&self, ticks: u64) {
        self.current.set(self.current.get() + ticks);
    }

    /// Set the counter to a specific tick.
    pub fn set(&self, tick: u64) {
        self.current.set(tick);
    }
}
