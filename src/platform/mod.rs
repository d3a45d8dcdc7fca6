//! Platform abstraction layer
//!
//! Keeps the simulation away from the outside world:
//! - Time (injectable monotonic sources, frame pacing)
//! - Input (per-tick commands instead of raw device state)

pub mod input;
pub mod time;

pub use input::{InputSource, ScriptedInput};
pub use time::{FrameClock, ManualTimeSource, SystemTimeSource, TimeSource};
