//! Timed triggers
//!
//! Three independent clocks: the boss lifecycle (wait, warn, fight), the
//! add-on drop cadence, and the batched bomb drop. Each owns its own `Timer`
//! and restart rule; the tick advances them all before anything moves.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::invader::Invader;
use super::monster::Monster;
use super::snapshot::BannerKind;
use super::state::{AddOn, AddOnKind, GameEvent, GameState};
use super::timer::Timer;
use crate::consts::*;

/// Where the boss lifecycle currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossStage {
    /// Counting toward the randomized trigger time
    Waiting,
    /// Warning banner up, boss arrives when it ends
    Warning,
    /// Boss on screen until destroyed or escaped
    Active,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossSchedule {
    stage: BossStage,
    clock: Timer,
    /// Seconds of waiting before the warning starts
    trigger_at: f32,
}

impl BossSchedule {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut schedule = Self {
            stage: BossStage::Waiting,
            clock: Timer::new(),
            trigger_at: 0.0,
        };
        schedule.rearm(rng);
        schedule
    }

    /// Back to waiting with a fresh trigger time in [10, 20)
    pub fn rearm<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.stage = BossStage::Waiting;
        self.clock.restart();
        self.trigger_at = rng.random_range(MONSTER_TRIGGER_MIN..MONSTER_TRIGGER_MAX) as f32;
    }

    #[inline]
    pub fn stage(&self) -> BossStage {
        self.stage
    }

    #[inline]
    pub fn trigger_at(&self) -> f32 {
        self.trigger_at
    }

    pub fn advance(&mut self, dt: f32) {
        self.clock.advance(dt);
    }
}

/// All timed triggers for one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scheduler {
    pub boss: BossSchedule,
    pub addon_timer: Timer,
    pub bomb_timer: Timer,
}

impl Scheduler {
    pub fn new<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            boss: BossSchedule::new(rng),
            addon_timer: Timer::new(),
            bomb_timer: Timer::new(),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.boss.advance(dt);
        self.addon_timer.advance(dt);
        self.bomb_timer.advance(dt);
    }
}

/// Drive the boss lifecycle: trigger the warning on level 1, then spawn the
/// boss and clear the ordinary invaders once the warning has run its course.
pub fn update_boss_lifecycle(state: &mut GameState) {
    let boss = &mut state.scheduler.boss;
    match boss.stage {
        BossStage::Waiting => {
            if state.monster.is_none() && state.session.level() == 1 && boss.clock.has_elapsed(boss.trigger_at) {
                boss.stage = BossStage::Warning;
                boss.clock.restart();
                log::info!("Monster approaching");
                state.show_banner(BannerKind::BossWarning, "MONSTER APPROACHING".to_string());
                state.events.push(GameEvent::BossWarning);
            }
        }
        BossStage::Warning => {
            if boss.clock.has_elapsed(MONSTER_WARNING) {
                boss.stage = BossStage::Active;
                boss.clock.restart();
                let cleared = state.invaders.len();
                state.invaders.clear();
                state.monster = Some(Monster::new(MONSTER_SPAWN));
                state.banners.retain(|b| b.kind != BannerKind::BossWarning);
                log::info!("Monster spawned ({} invaders cleared)", cleared);
                state.events.push(GameEvent::BossSpawned);
            }
        }
        BossStage::Active => {}
    }
}

/// Drop one add-on at a random column every interval
pub fn spawn_addons(state: &mut GameState) {
    if state.scheduler.addon_timer.elapsed() <= ADDON_INTERVAL {
        return;
    }
    state.scheduler.addon_timer.restart();

    let x = state.rng.random_range(0..ADDON_SPAWN_SPAN) as f32;
    let kind = AddOnKind::from_roll(state.rng.random_range(0..3));
    state.addons.push(AddOn::new(kind, x));
    log::debug!("Add-on {:?} spawned at x={}", kind, x);
    state.events.push(GameEvent::AddOnSpawned { kind });
}

/// Pick at most `MAX_BOMBS_PER_BATCH` bomb-ready invaders, uniformly and
/// without replacement. Returns their indices.
pub fn select_bombers<R: Rng + ?Sized>(invaders: &[Invader], rng: &mut R) -> Vec<usize> {
    let mut ready: Vec<usize> = invaders
        .iter()
        .enumerate()
        .filter(|(_, inv)| inv.is_bomb_ready())
        .map(|(i, _)| i)
        .collect();
    ready.shuffle(rng);
    ready.truncate(MAX_BOMBS_PER_BATCH);
    ready
}

/// Batched bomb drop; suspended while the boss is on screen
pub fn drop_bombs(state: &mut GameState) {
    if state.monster.is_some() || !state.scheduler.bomb_timer.has_elapsed(BOMB_INTERVAL) {
        return;
    }
    state.scheduler.bomb_timer.restart();

    let chosen = select_bombers(&state.invaders, &mut state.rng);
    if chosen.is_empty() {
        return;
    }
    for &idx in &chosen {
        if let Some(invader) = state.invaders.get_mut(idx) {
            let bomb = invader.drop_bomb();
            state.bombs.push(bomb);
        }
    }
    log::debug!("{} bombs dropped", chosen.len());
    state.events.push(GameEvent::BombsDropped { count: chosen.len() });
}
