//! Space Shooters - simulation core for a wave-based arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, waves, timers, collisions)
//! - `flow`: Screen-flow state machine around the simulation
//! - `platform`: Time and input abstractions
//! - `persistence`: File-backed high score store
//! - `settings`: JSON configuration

pub mod flow;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;

pub use flow::{FlowCommand, Game, Screen};
pub use highscores::{Badge, HighScores, ScoreEntry, ScoreStore};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Nominal simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Frames closer together than this are not stepped
    pub const MIN_FRAME_INTERVAL: f32 = 0.016;
    /// Largest delta a single step may consume (long stalls are clamped)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Player
    pub const PLAYER_START: Vec2 = Vec2::new(370.0, 500.0);
    pub const PLAYER_SIZE: Vec2 = Vec2::new(60.0, 60.0);
    pub const PLAYER_SPEED: f32 = 360.0;
    pub const PLAYER_LIVES: u32 = 3;
    /// How far past an edge the player travels before wrapping
    pub const WRAP_MARGIN: f32 = 40.0;
    /// Power-up and fire-mode duration (seconds)
    pub const BUFF_DURATION: f32 = 5.0;

    /// Player bullets
    pub const BULLET_SIZE: Vec2 = Vec2::new(5.0, 15.0);
    pub const BULLET_SPEED: f32 = 600.0;
    /// Horizontal muzzle offset from the player's left edge
    pub const MUZZLE_OFFSET: f32 = 30.0;
    pub const SPREAD_SPACING: f32 = 10.0;
    pub const SPREAD_STEP_DEG: f32 = 10.0;
    pub const FAN_SHOTS: usize = 7;
    pub const FAN_HALF_ANGLE_DEG: f32 = 60.0;

    /// Invaders
    pub const INVADER_SIZE: Vec2 = Vec2::new(50.0, 50.0);
    pub const INVADER_ENTRY_SPEED: f32 = 100.0;
    /// Distance at which an entering invader snaps to its slot
    pub const ALIGN_EPSILON: f32 = 1.0;
    pub const DIVE_INTERVAL: f32 = 5.0;
    pub const DIVE_SPEED: f32 = 100.0;
    pub const DIVE_RETURN_SPEED: f32 = 80.0;
    pub const DIVE_DEPTH: f32 = 150.0;

    /// Enemy bombs
    pub const BOMB_SIZE: Vec2 = Vec2::new(12.0, 12.0);
    pub const BOMB_INTERVAL: f32 = 1.5;
    pub const MAX_BOMBS_PER_BATCH: usize = 3;

    /// Monster (boss)
    pub const MONSTER_SPAWN: Vec2 = Vec2::new(300.0, 100.0);
    pub const MONSTER_SIZE: Vec2 = Vec2::new(180.0, 180.0);
    pub const MONSTER_HEALTH: u32 = 30;
    pub const MONSTER_SPEED: f32 = 100.0;
    pub const MONSTER_MIN_X: f32 = 100.0;
    pub const MONSTER_MAX_X: f32 = 600.0;
    pub const BEAM_COOLDOWN: f32 = 2.0;
    pub const BEAM_DURATION: f32 = 1.0;
    pub const BEAM_WIDTH: f32 = 40.0;
    pub const MONSTER_LIFETIME: f32 = 25.0;
    pub const MONSTER_WARNING: f32 = 2.0;
    /// Boss trigger window, whole seconds in [MIN, MAX)
    pub const MONSTER_TRIGGER_MIN: u32 = 10;
    pub const MONSTER_TRIGGER_MAX: u32 = 20;
    pub const MONSTER_KILL_SCORE: u64 = 80;
    pub const MONSTER_ESCAPE_SCORE: u64 = 40;

    /// Add-ons (pickups and hazards)
    pub const ADDON_SIZE: Vec2 = Vec2::new(32.0, 32.0);
    pub const ADDON_FALL_SPEED: f32 = 120.0;
    pub const ADDON_INTERVAL: f32 = 6.0;
    pub const ADDON_SPAWN_SPAN: u32 = 760;
    pub const DANGER_AVOID_BONUS: u64 = 5;

    /// Death effects
    pub const EXPLOSION_DURATION: f32 = 0.6;
    pub const EXPLOSION_SCALE: f32 = 0.08;
    pub const MONSTER_EXPLOSION_SCALE: f32 = 0.5;

    /// Banner display window (seconds)
    pub const BANNER_DURATION: f32 = 2.0;
}

/// Wrap a position around the arena edges (toroidal topology).
///
/// A coordinate that leaves by more than `WRAP_MARGIN` on one side reappears
/// at the opposite edge; the other axis is untouched.
#[inline]
pub fn wrap_position(mut pos: Vec2) -> Vec2 {
    use consts::{ARENA_HEIGHT, ARENA_WIDTH, WRAP_MARGIN};
    if pos.x < -WRAP_MARGIN {
        pos.x = ARENA_WIDTH;
    } else if pos.x > ARENA_WIDTH {
        pos.x = -WRAP_MARGIN;
    }
    if pos.y < -WRAP_MARGIN {
        pos.y = ARENA_HEIGHT;
    } else if pos.y > ARENA_HEIGHT {
        pos.y = -WRAP_MARGIN;
    }
    pos
}

/// Unit direction for a shot tilted `deg` degrees from straight up
#[inline]
pub fn shot_direction(deg: f32) -> Vec2 {
    let rad = deg.to_radians();
    Vec2::new(rad.sin(), -rad.cos())
}

#[cfg(test)]
mod tests {
    use super::consts::*;
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_each_edge() {
        assert_eq!(wrap_position(Vec2::new(-41.0, 200.0)), Vec2::new(ARENA_WIDTH, 200.0));
        assert_eq!(wrap_position(Vec2::new(801.0, 200.0)), Vec2::new(-WRAP_MARGIN, 200.0));
        assert_eq!(wrap_position(Vec2::new(300.0, -41.0)), Vec2::new(300.0, ARENA_HEIGHT));
        assert_eq!(wrap_position(Vec2::new(300.0, 601.0)), Vec2::new(300.0, -WRAP_MARGIN));
    }

    #[test]
    fn test_shot_direction() {
        let up = shot_direction(0.0);
        assert!(up.x.abs() < 1e-6 && (up.y + 1.0).abs() < 1e-6);
        let right = shot_direction(90.0);
        assert!((right.x - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_wrap_keeps_other_axis(x in -100.0f32..900.0, y in -100.0f32..700.0) {
            let wrapped = wrap_position(Vec2::new(x, y));
            if (-WRAP_MARGIN..=ARENA_WIDTH).contains(&x) {
                prop_assert_eq!(wrapped.x, x);
            }
            if (-WRAP_MARGIN..=ARENA_HEIGHT).contains(&y) {
                prop_assert_eq!(wrapped.y, y);
            }
            prop_assert!(wrapped.x >= -WRAP_MARGIN && wrapped.x <= ARENA_WIDTH);
            prop_assert!(wrapped.y >= -WRAP_MARGIN && wrapped.y <= ARENA_HEIGHT);
        }
    }
}
