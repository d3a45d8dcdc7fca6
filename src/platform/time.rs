//! Time sources and frame pacing

use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use crate::consts::MAX_FRAME_DT;

/// Monotonic clock, in seconds since an arbitrary origin
pub trait TimeSource {
    fn now(&self) -> f64;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone)]
pub struct SystemTimeSource {
    origin: Instant,
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Hand-driven clock for tests and replays. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualTimeSource {
    now: Rc<Cell<f64>>,
}

impl ManualTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs.max(0.0));
    }
}

impl TimeSource for ManualTimeSource {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Turns a time source into per-frame deltas.
///
/// Frames arriving sooner than `min_interval` after the last accepted one
/// yield `None` (the time keeps accumulating toward the next frame). Long
/// stalls are clamped to `MAX_FRAME_DT`.
#[derive(Debug)]
pub struct FrameClock<T: TimeSource> {
    source: T,
    last: f64,
    min_interval: f32,
}

impl<T: TimeSource> FrameClock<T> {
    pub fn new(source: T, min_interval: f32) -> Self {
        let last = source.now();
        Self {
            source,
            last,
            min_interval: min_interval.max(0.0),
        }
    }

    /// Seconds since the last accepted frame, if enough time has passed
    pub fn next_delta(&mut self) -> Option<f32> {
        let now = self.source.now();
        let elapsed = (now - self.last) as f32;
        if elapsed <= self.min_interval {
            return None;
        }
        self.last = now;
        Some(elapsed.min(MAX_FRAME_DT))
    }
}
