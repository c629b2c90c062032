//! Tick type used for all expiry arithmetic.
//!
//! Ticks are the host environment's monotonic block counter. The core never
//! reads a clock itself; every operation receives the current tick as an
//! argument.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the host's monotonically non-decreasing block counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tick(u64);

impl Tick {
    /// Tick zero.
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// This tick advanced by a number of ticks (saturating).
    pub fn offset(self, ticks: u64) -> Self {
        Self(self.0.saturating_add(ticks))
    }

    /// Ticks elapsed since this tick (relative to `now`).
    pub fn elapsed_since(&self, now: Tick) -> u64 {
        now.0.saturating_sub(self.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
