//! Monster (boss) state machine
//!
//! Patrols horizontally between fixed bounds, periodically stops to fire a
//! beam straight down, and leaves the arena either destroyed or escaped.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::timer::Timer;
use crate::consts::*;

/// Current behavior phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MonsterPhase {
    /// Moving side to side, beam off
    Patrolling,
    /// Stationary, beam on
    Firing,
}

/// How a boss encounter ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossOutcome {
    Destroyed,
    Escaped,
}

impl BossOutcome {
    pub fn score(&self) -> u64 {
        match self {
            BossOutcome::Destroyed => MONSTER_KILL_SCORE,
            BossOutcome::Escaped => MONSTER_ESCAPE_SCORE,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            BossOutcome::Destroyed => "Monster Destroyed!",
            BossOutcome::Escaped => "Monster Escaped!",
        }
    }
}

/// The boss entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub pos: Vec2,
    pub health: u32,
    /// +1 moving right, -1 moving left
    pub direction: f32,
    pub phase: MonsterPhase,
    /// Time since the last phase switch
    pub phase_timer: Timer,
    /// Time since spawn
    pub lifetime: Timer,
    /// The current beam has already cost the player a life
    beam_landed: bool,
    /// An outcome has been reported
    resolved: bool,
}

impl Monster {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            health: MONSTER_HEALTH,
            direction: 1.0,
            phase: MonsterPhase::Patrolling,
            phase_timer: Timer::new(),
            lifetime: Timer::new(),
            beam_landed: false,
            resolved: false,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, MONSTER_SIZE)
    }

    /// Beam hitbox while firing: hangs from the bottom centre to the arena floor
    pub fn beam_bounds(&self) -> Option<Rect> {
        if self.phase != MonsterPhase::Firing {
            return None;
        }
        let top = self.pos.y + MONSTER_SIZE.y;
        let left = self.pos.x + MONSTER_SIZE.x * 0.5 - BEAM_WIDTH * 0.5;
        let height = (ARENA_HEIGHT - top).max(0.0);
        Some(Rect::new(Vec2::new(left, top), Vec2::new(BEAM_WIDTH, height)))
    }

    #[inline]
    pub fn is_firing(&self) -> bool {
        self.phase == MonsterPhase::Firing
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub fn take_hit(&mut self) {
        self.health = self.health.saturating_sub(1);
    }

    /// Remaining health for the health bar, 0-100
    pub fn health_percent(&self) -> f32 {
        self.health as f32 / MONSTER_HEALTH as f32 * 100.0
    }

    pub fn update(&mut self, dt: f32) {
        self.lifetime.advance(dt);
        self.phase_timer.advance(dt);

        match self.phase {
            MonsterPhase::Patrolling => {
                self.pos.x += self.direction * MONSTER_SPEED * dt;
                if self.pos.x < MONSTER_MIN_X || self.pos.x > MONSTER_MAX_X {
                    self.pos.x = self.pos.x.clamp(MONSTER_MIN_X, MONSTER_MAX_X);
                    self.direction = -self.direction;
                }
                if self.phase_timer.has_elapsed(BEAM_COOLDOWN) {
                    self.phase = MonsterPhase::Firing;
                    self.phase_timer.restart();
                    self.beam_landed = false;
                }
            }
            MonsterPhase::Firing => {
                if self.phase_timer.has_elapsed(BEAM_DURATION) {
                    self.phase = MonsterPhase::Patrolling;
                    self.phase_timer.restart();
                }
            }
        }
    }

    /// Check the beam against `target`; a beam lands at most once per firing phase
    pub fn beam_strikes(&mut self, target: &Rect) -> bool {
        if self.beam_landed {
            return false;
        }
        match self.beam_bounds() {
            Some(beam) if beam.intersects(target) => {
                self.beam_landed = true;
                true
            }
            _ => false,
        }
    }

    /// Report the encounter's outcome, at most once per monster
    pub fn resolve(&mut self) -> Option<BossOutcome> {
        if self.resolved {
            return None;
        }
        let outcome = if self.is_dead() {
            BossOutcome::Destroyed
        } else if self.lifetime.has_elapsed(MONSTER_LIFETIME) {
            BossOutcome::Escaped
        } else {
            return None;
        };
        self.resolved = true;
        Some(outcome)
    }
}
