//! Game state and core simulation types
//!
//! The session exclusively owns every entity collection. Nothing outside the
//! tick holds a reference into them; renderers read a `RenderSnapshot`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::invader::{Invader, InvaderKind};
use super::monster::{BossOutcome, Monster};
use super::scheduler::Scheduler;
use super::snapshot::{Banner, BannerKind, VisualTag};
use super::timer::{TimedFlag, Timer};
use super::waves::{SpawnDescriptor, WaveDirector};
use crate::consts::*;
use crate::{shot_direction, wrap_position};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen, no time elapses
    Paused,
    /// Lives exhausted; terminal for this session
    GameOver,
}

/// Notable things that happened during a tick (drained by the caller)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WaveStarted { level: u32, wave: u32, invaders: usize },
    InvaderDestroyed { kind: InvaderKind },
    BombsDropped { count: usize },
    AddOnSpawned { kind: AddOnKind },
    AddOnCollected { kind: AddOnKind },
    HazardAvoided,
    PlayerHit { lives: u32 },
    BossWarning,
    BossSpawned,
    BossResolved { outcome: BossOutcome },
    GameOver { score: u64 },
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub lives: u32,
    /// Wide fan fire plus damage immunity
    pub power_up: TimedFlag,
    /// Cosmetic "on fire" state
    pub fire_mode: TimedFlag,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: PLAYER_START,
            lives: PLAYER_LIVES,
            power_up: TimedFlag::new(BUFF_DURATION),
            fire_mode: TimedFlag::new(BUFF_DURATION),
        }
    }
}

impl Player {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, PLAYER_SIZE)
    }

    #[inline]
    pub fn is_powered_up(&self) -> bool {
        self.power_up.is_active()
    }

    /// Move by a per-axis direction (-1, 0 or 1 on each axis) and wrap at the edges
    pub fn steer(&mut self, direction: Vec2, dt: f32) {
        self.pos = wrap_position(self.pos + direction * PLAYER_SPEED * dt);
    }

    pub fn advance_buffs(&mut self, dt: f32) {
        self.power_up.advance(dt);
        self.fire_mode.advance(dt);
    }

    /// Grant the power-up; catching another while it is running lights fire mode
    pub fn activate_power_up(&mut self) {
        if self.power_up.is_active() {
            self.fire_mode.activate();
        }
        self.power_up.activate();
    }

    /// Bullets for one trigger pull at the given level
    pub fn fire(&self, level: u32) -> Vec<Bullet> {
        let muzzle = Vec2::new(self.pos.x + MUZZLE_OFFSET, self.pos.y);

        if self.power_up.is_active() {
            let step = 2.0 * FAN_HALF_ANGLE_DEG / (FAN_SHOTS - 1) as f32;
            return (0..FAN_SHOTS)
                .map(|i| Bullet::new(muzzle, shot_direction(-FAN_HALF_ANGLE_DEG + i as f32 * step)))
                .collect();
        }

        let count = match level {
            0 | 1 => 1,
            2 => 2,
            _ => 3,
        };
        if count == 1 {
            return vec![Bullet::new(muzzle, Vec2::NEG_Y)];
        }

        let start_x = muzzle.x - SPREAD_SPACING * (count - 1) as f32 / 2.0;
        (0..count)
            .map(|i| {
                let pos = Vec2::new(start_x + i as f32 * SPREAD_SPACING, muzzle.y);
                let angle = -SPREAD_STEP_DEG + SPREAD_STEP_DEG * i as f32;
                Bullet::new(pos, shot_direction(angle))
            })
            .collect()
    }
}

/// A player shot travelling in a straight line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Unit direction
    pub dir: Vec2,
}

impl Bullet {
    pub fn new(pos: Vec2, dir: Vec2) -> Self {
        Self {
            pos,
            dir: dir.normalize_or(Vec2::NEG_Y),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.dir * BULLET_SPEED * dt;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, BULLET_SIZE)
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.y < -10.0 || self.pos.x < -10.0 || self.pos.x > ARENA_WIDTH + 10.0
    }
}

/// A bomb dropped by an invader, falling straight down
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub pos: Vec2,
    pub speed: f32,
}

impl Bomb {
    pub fn new(pos: Vec2, speed: f32) -> Self {
        Self { pos, speed }
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos.y += self.speed * dt;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, BOMB_SIZE)
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.y > ARENA_HEIGHT
    }
}

/// Falling pickup / hazard types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddOnKind {
    PowerUp,
    ExtraLife,
    Danger,
}

impl AddOnKind {
    /// Spawn roll order: 0 PowerUp, 1 Danger, 2 ExtraLife
    pub fn from_roll(roll: u32) -> Self {
        match roll % 3 {
            0 => AddOnKind::PowerUp,
            1 => AddOnKind::Danger,
            _ => AddOnKind::ExtraLife,
        }
    }

    /// Hazards reward the player for letting them fall past
    #[inline]
    pub fn is_hazard(&self) -> bool {
        matches!(self, AddOnKind::Danger)
    }

    pub fn avoid_bonus(&self) -> u64 {
        if self.is_hazard() { DANGER_AVOID_BONUS } else { 0 }
    }

    pub fn tag(&self) -> VisualTag {
        match self {
            AddOnKind::PowerUp => VisualTag::PowerUp,
            AddOnKind::ExtraLife => VisualTag::ExtraLife,
            AddOnKind::Danger => VisualTag::Danger,
        }
    }

    /// Effect on contact. Danger ignores the power-up shield.
    pub fn apply(&self, player: &mut Player) {
        match self {
            AddOnKind::PowerUp => player.activate_power_up(),
            AddOnKind::ExtraLife => player.lives += 1,
            AddOnKind::Danger => player.lives = player.lives.saturating_sub(1),
        }
    }
}

/// A falling pickup or hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddOn {
    pub kind: AddOnKind,
    pub pos: Vec2,
}

impl AddOn {
    pub fn new(kind: AddOnKind, x: f32) -> Self {
        Self {
            kind,
            pos: Vec2::new(x, 0.0),
        }
    }

    pub fn fall(&mut self, dt: f32) {
        self.pos.y += ADDON_FALL_SPEED * dt;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, ADDON_SIZE)
    }

    pub fn is_off_screen(&self) -> bool {
        self.pos.y > ARENA_HEIGHT
    }
}

/// Short-lived death effect marker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub pos: Vec2,
    pub scale: f32,
    pub timer: Timer,
}

impl Explosion {
    pub fn new(pos: Vec2, scale: f32) -> Self {
        Self {
            pos,
            scale,
            timer: Timer::new(),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.timer.elapsed() > EXPLOSION_DURATION
    }
}

/// Score and progression counters.
///
/// Only the collision/resolution pipeline awards points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    score: u64,
    pub director: WaveDirector,
}

impl Session {
    #[inline]
    pub fn score(&self) -> u64 {
        self.score
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.director.level()
    }

    #[inline]
    pub fn wave(&self) -> u32 {
        self.director.wave()
    }

    pub(crate) fn award(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
    }
}

/// Complete game state for one play session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Callsign used when the final score is submitted
    pub player_name: String,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub session: Session,
    pub player: Player,
    pub invaders: Vec<Invader>,
    /// At most one boss at a time
    pub monster: Option<Monster>,
    pub bullets: Vec<Bullet>,
    pub bombs: Vec<Bomb>,
    pub addons: Vec<AddOn>,
    pub explosions: Vec<Explosion>,
    pub scheduler: Scheduler,
    /// Timed on-screen messages
    pub banners: Vec<Banner>,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given seed; the first wave is already in flight
    pub fn new(seed: u64, player_name: impl Into<String>) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let scheduler = Scheduler::new(&mut rng);
        let mut state = Self {
            seed,
            rng,
            player_name: player_name.into(),
            time_ticks: 0,
            phase: GamePhase::Playing,
            session: Session::default(),
            player: Player::default(),
            invaders: Vec::new(),
            monster: None,
            bullets: Vec::new(),
            bombs: Vec::new(),
            addons: Vec::new(),
            explosions: Vec::new(),
            scheduler,
            banners: Vec::new(),
            events: Vec::new(),
        };

        state.show_banner(BannerKind::GameStarting, "GAME STARTING...".to_string());
        let formation = state.session.director.current_formation();
        state.spawn_formation(formation);

        state
    }

    /// Destroy every entity and re-arm every timer (same seed, same name)
    pub fn reset(&mut self) {
        let name = std::mem::take(&mut self.player_name);
        *self = Self::new(self.seed, name);
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.session.level()
    }

    #[inline]
    pub fn wave(&self) -> u32 {
        self.session.wave()
    }

    #[inline]
    pub fn score(&self) -> u64 {
        self.session.score()
    }

    pub fn is_boss_active(&self) -> bool {
        self.monster.is_some()
    }

    /// Freeze the simulation (no-op unless playing)
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
        }
    }

    /// Unfreeze the simulation (no-op unless paused)
    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
        }
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Turn spawn descriptors into live invaders and announce the wave
    pub fn spawn_formation(&mut self, formation: Vec<SpawnDescriptor>) {
        let (level, wave) = (self.level(), self.wave());
        let count = formation.len();
        for descriptor in formation {
            let dive_delay = match descriptor.kind {
                InvaderKind::Gamma => self.rng.random_range(1u32..=3) as f32,
                _ => 0.0,
            };
            self.invaders.push(Invader::new(
                descriptor.kind,
                descriptor.start,
                descriptor.target,
                dive_delay,
            ));
        }
        log::info!("Level {} wave {}: {} invaders", level, wave, count);
        self.show_banner(BannerKind::WaveAnnouncement, format!("LEVEL {} - WAVE {}", level, wave));
        self.events.push(GameEvent::WaveStarted {
            level,
            wave,
            invaders: count,
        });
    }

    /// Show a timed banner, replacing any banner of the same kind
    pub fn show_banner(&mut self, kind: BannerKind, text: String) {
        self.banners.retain(|b| b.kind != kind);
        self.banners.push(Banner::new(kind, text));
    }
}
