//! Simulation-time clocks
//!
//! Every timed behavior owns its own `Timer`. Timers only move when the tick
//! advances them, so a paused or replayed session sees exactly the same
//! timings regardless of wall-clock time.

use serde::{Deserialize, Serialize};

/// Elapsed-time accumulator for one behavior
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    elapsed: f32,
}

impl Timer {
    pub const fn new() -> Self {
        Self { elapsed: 0.0 }
    }

    /// Timer that reads as if `secs` had already passed
    pub const fn started_at(secs: f32) -> Self {
        Self { elapsed: secs }
    }

    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt.max(0.0);
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn restart(&mut self) {
        self.elapsed = 0.0;
    }

    #[inline]
    pub fn has_elapsed(&self, secs: f32) -> bool {
        self.elapsed >= secs
    }
}

/// Boolean that switches itself off after a fixed duration.
///
/// Reactivating while active restarts the full duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedFlag {
    active: bool,
    timer: Timer,
    duration: f32,
}

impl TimedFlag {
    pub const fn new(duration: f32) -> Self {
        Self {
            active: false,
            timer: Timer::new(),
            duration,
        }
    }

    pub fn activate(&mut self) {
        self.active = true;
        self.timer.restart();
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.timer.advance(dt);
        if self.timer.elapsed() > self.duration {
            self.active = false;
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Seconds left before the flag drops (0 when inactive)
    pub fn remaining(&self) -> f32 {
        if self.active {
            (self.duration - self.timer.elapsed()).max(0.0)
        } else {
            0.0
        }
    }
}
