//! Invader behavior state machine
//!
//! Every invader flies from its spawn point to a formation slot (Entering),
//! then holds there and becomes eligible to drop bombs. Gamma invaders add a
//! dive-and-return cycle on top of the held state.
//!
//! Per-subtype behavior lives in a static dispatch table (`KindProfile`)
//! rather than in separate types.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::snapshot::VisualTag;
use super::state::Bomb;
use super::timer::Timer;
use crate::consts::*;

/// Invader subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvaderKind {
    Alpha,
    Beta,
    Gamma,
}

/// Static per-subtype behavior
#[derive(Debug)]
pub struct KindProfile {
    /// Starting (and maximum) health
    pub health: u32,
    /// Seconds between bombs once aligned
    pub bomb_cooldown: f32,
    /// Fall speed of this subtype's bombs
    pub bomb_speed: f32,
    /// Points awarded when destroyed
    pub score: u64,
    pub tag: VisualTag,
    /// Movement update for this subtype
    pub update: fn(&mut Invader, f32),
}

static ALPHA: KindProfile = KindProfile {
    health: 1,
    bomb_cooldown: 5.0,
    bomb_speed: 180.0,
    score: 10,
    tag: VisualTag::Alpha,
    update: update_formation,
};

static BETA: KindProfile = KindProfile {
    health: 2,
    bomb_cooldown: 3.0,
    bomb_speed: 180.0,
    score: 20,
    tag: VisualTag::Beta,
    update: update_formation,
};

static GAMMA: KindProfile = KindProfile {
    health: 2,
    bomb_cooldown: 2.0,
    bomb_speed: 220.0,
    score: 30,
    tag: VisualTag::Gamma,
    update: update_diver,
};

impl InvaderKind {
    #[inline]
    pub fn profile(self) -> &'static KindProfile {
        match self {
            InvaderKind::Alpha => &ALPHA,
            InvaderKind::Beta => &BETA,
            InvaderKind::Gamma => &GAMMA,
        }
    }
}

/// Where an invader is in its movement cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Motion {
    /// Flying toward the formation slot
    Entering,
    /// Parked in the formation slot
    Holding,
    /// Gamma only: dropping below the formation row
    Diving,
    /// Gamma only: climbing back to the formation row
    Returning,
}

/// An ordinary (non-boss) enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invader {
    pub kind: InvaderKind,
    pub pos: Vec2,
    /// Formation slot
    pub target: Vec2,
    pub motion: Motion,
    pub health: u32,
    pub bomb_timer: Timer,
    pub dive_timer: Timer,
    /// Extra per-instance wait added to every dive interval
    pub dive_delay: f32,
}

impl Invader {
    pub fn new(kind: InvaderKind, start: Vec2, target: Vec2, dive_delay: f32) -> Self {
        Self {
            kind,
            pos: start,
            target,
            motion: Motion::Entering,
            health: kind.profile().health,
            bomb_timer: Timer::new(),
            dive_timer: Timer::new(),
            dive_delay,
        }
    }

    #[inline]
    pub fn profile(&self) -> &'static KindProfile {
        self.kind.profile()
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, INVADER_SIZE)
    }

    /// True once the formation slot has been reached
    #[inline]
    pub fn is_aligned(&self) -> bool {
        self.motion != Motion::Entering
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Apply one point of damage (health never drops below zero)
    pub fn take_hit(&mut self) {
        self.health = self.health.saturating_sub(1);
    }

    pub fn is_bomb_ready(&self) -> bool {
        self.is_aligned() && self.bomb_timer.has_elapsed(self.profile().bomb_cooldown)
    }

    /// Release a bomb from the invader's underside and restart its cooldown
    pub fn drop_bomb(&mut self) -> Bomb {
        self.bomb_timer.restart();
        let origin = self.bounds().bottom_center() - Vec2::new(BOMB_SIZE.x * 0.5, 0.0);
        Bomb::new(origin, self.profile().bomb_speed)
    }

    /// Advance this invader's clocks and movement by `dt` seconds
    pub fn update(&mut self, dt: f32) {
        self.bomb_timer.advance(dt);
        self.dive_timer.advance(dt);
        (self.profile().update)(self, dt);
    }

    fn approach_target(&mut self, dt: f32) {
        let to_target = self.target - self.pos;
        let dist = to_target.length();
        if dist < ALIGN_EPSILON {
            self.pos = self.target;
            self.motion = Motion::Holding;
        } else {
            let step = (INVADER_ENTRY_SPEED * dt).min(dist);
            self.pos += to_target / dist * step;
        }
    }
}

/// Alpha / Beta: enter, then hold position
fn update_formation(invader: &mut Invader, dt: f32) {
    if invader.motion == Motion::Entering {
        invader.approach_target(dt);
    }
}

/// Gamma: enter, hold, then dive and return on a repeating cycle
fn update_diver(invader: &mut Invader, dt: f32) {
    match invader.motion {
        Motion::Entering => invader.approach_target(dt),
        Motion::Holding => {
            if invader.dive_timer.elapsed() > invader.dive_delay + DIVE_INTERVAL {
                invader.motion = Motion::Diving;
                invader.dive_timer.restart();
            }
        }
        Motion::Diving => {
            if invader.pos.y < invader.target.y + DIVE_DEPTH {
                invader.pos.y += DIVE_SPEED * dt;
            } else {
                invader.motion = Motion::Returning;
                invader.dive_timer.restart();
            }
        }
        Motion::Returning => {
            if invader.pos.y > invader.target.y {
                invader.pos.y = (invader.pos.y - DIVE_RETURN_SPEED * dt).max(invader.target.y);
            } else {
                invader.motion = Motion::Holding;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(invader: &mut Invader, secs: f32) {
        let steps = (secs / SIM_DT).round() as usize;
        for _ in 0..steps {
            invader.update(SIM_DT);
        }
    }

    #[test]
    fn test_profiles_match_subtypes() {
        assert_eq!(InvaderKind::Alpha.profile().health, 1);
        assert_eq!(InvaderKind::Beta.profile().health, 2);
        assert_eq!(InvaderKind::Gamma.profile().health, 2);
        assert_eq!(InvaderKind::Alpha.profile().bomb_cooldown, 5.0);
        assert_eq!(InvaderKind::Beta.profile().bomb_cooldown, 3.0);
        assert_eq!(InvaderKind::Gamma.profile().bomb_cooldown, 2.0);
        let total: u64 = [InvaderKind::Alpha, InvaderKind::Beta, InvaderKind::Gamma]
            .iter()
            .map(|k| k.profile().score)
            .sum();
        assert_eq!(total, 60);
    }

    #[test]
    fn test_entering_snaps_to_target() {
        let target = Vec2::new(100.0, 50.0);
        let mut invader = Invader::new(InvaderKind::Alpha, Vec2::new(-50.0, 50.0), target, 0.0);
        assert!(!invader.is_aligned());

        // 150 units at 100 u/s
        run(&mut invader, 1.6);
        assert!(invader.is_aligned());
        assert_eq!(invader.pos, target);
    }

    #[test]
    fn test_bomb_ready_requires_alignment_and_cooldown() {
        let target = Vec2::new(100.0, 50.0);
        let mut invader = Invader::new(InvaderKind::Beta, target + Vec2::new(0.5, 0.0), target, 0.0);
        invader.bomb_timer = Timer::started_at(10.0);
        assert!(!invader.is_bomb_ready(), "entering invaders never bomb");

        invader.update(SIM_DT);
        assert!(invader.is_aligned());
        assert!(invader.is_bomb_ready());

        // Readiness persists until a bomb is actually dropped
        run(&mut invader, 1.0);
        assert!(invader.is_bomb_ready());

        let bomb = invader.drop_bomb();
        assert_eq!(bomb.speed, 180.0);
        assert!(!invader.is_bomb_ready());
        run(&mut invader, 3.1);
        assert!(invader.is_bomb_ready());
    }

    #[test]
    fn test_damage_saturates_at_zero() {
        let mut invader = Invader::new(InvaderKind::Alpha, Vec2::ZERO, Vec2::ZERO, 0.0);
        invader.take_hit();
        invader.take_hit();
        assert_eq!(invader.health, 0);
        assert!(invader.is_dead());
    }

    #[test]
    fn test_gamma_dive_cycle() {
        let target = Vec2::new(200.0, 100.0);
        let mut invader = Invader::new(InvaderKind::Gamma, target, target, 1.0);
        invader.update(SIM_DT);
        assert_eq!(invader.motion, Motion::Holding);

        // Holds for delay + interval (6 s)
        run(&mut invader, 5.5);
        assert_eq!(invader.motion, Motion::Holding);
        assert_eq!(invader.pos.y, target.y);
        run(&mut invader, 1.0);
        assert_eq!(invader.motion, Motion::Diving);

        // Dives at least 150 units below the row before turning back
        let mut deepest = invader.pos.y;
        for _ in 0..200 {
            if invader.motion == Motion::Returning {
                break;
            }
            invader.update(SIM_DT);
            deepest = deepest.max(invader.pos.y);
        }
        assert_eq!(invader.motion, Motion::Returning);
        assert!(deepest >= target.y + DIVE_DEPTH);

        // Climbs back at 80 u/s
        run(&mut invader, 2.2);
        assert_eq!(invader.motion, Motion::Holding);
        assert_eq!(invader.pos.y, target.y);
        assert_eq!(invader.pos.x, target.x);
    }

    #[test]
    fn test_alpha_never_dives() {
        let target = Vec2::new(200.0, 100.0);
        let mut invader = Invader::new(InvaderKind::Alpha, target, target, 0.0);
        run(&mut invader, 20.0);
        assert_eq!(invader.motion, Motion::Holding);
        assert_eq!(invader.pos, target);
    }
}
