//! Time representation used throughout the engine.
//!
//! The engine never reads a wall clock itself; every entry point receives a
//! `timestamp` from the host (see [`crate::Bridge::on_one_second_tick`]).
//! Durations are always whole seconds, matching the granularity of the
//! 802.1Q timer variables (`mDelayWhile`, `fdWhile`, ...).

use core::ops::{Add, Sub};

/// A host-supplied point in time, opaque except for subtraction.
///
/// Mirrors the way the teacher crate keeps `Time` as a thin wrapper instead
/// of depending on `std::time` (so the engine stays usable under `no_std`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Timestamp(pub u32);

impl Timestamp {
    pub const fn new(seconds: u32) -> Self {
        Timestamp(seconds)
    }
}

impl Sub for Timestamp {
    type Output = u32;

    fn sub(self, rhs: Self) -> u32 {
        self.0.saturating_sub(rhs.0)
    }
}

impl Add<u32> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: u32) -> Timestamp {
        Timestamp(self.0.saturating_add(rhs))
    }
}

/// A countdown timer quantized to whole seconds.
///
/// Every per-port-per-tree timer (`fdWhile`, `rrWhile`, `rbWhile`, `tcWhile`)
/// and every per-port timer (`helloWhen`, `mDelayWhile`, `edgeDelayWhile`) is
/// one of these. [`Self::tick`] implements the decrement step of Port Timers
/// (spec §4.10): any nonzero timer is decremented by exactly one on every
/// call, never going below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Countdown(pub u16);

impl Countdown {
    pub const fn new(seconds: u16) -> Self {
        Countdown(seconds)
    }

    pub const fn is_active(self) -> bool {
        self.0 > 0
    }

    /// Decrement by one second if nonzero. Returns true if this tick caused
    /// the timer to reach zero (an "expiry" edge, used by state machines
    /// whose `CheckConditions` fire only on `== 0`).
    pub fn tick(&mut self) -> bool {
        if self.0 > 0 {
            self.0 -= 1;
            self.0 == 0
        } else {
            false
        }
    }

    pub fn set(&mut self, seconds: u16) {
        self.0 = seconds;
    }

    pub const fn get(self) -> u16 {
        self.0
    }
}
