//! Read-only render snapshot
//!
//! The only view of the simulation the outside world gets. Built after the
//! tick finishes, owns copies of everything it shows.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geom::Rect;
use super::state::{GamePhase, GameState};
use super::timer::Timer;
use crate::consts::*;

/// What a sprite should look like. Renderers map these to textures and
/// fall back to placeholder shapes; the simulation never depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualTag {
    Player,
    PlayerPowered,
    PlayerOnFire,
    Alpha,
    Beta,
    Gamma,
    Monster,
    Beam,
    Bullet,
    Bomb,
    PowerUp,
    ExtraLife,
    Danger,
    Explosion,
}

/// A single drawable entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub tag: VisualTag,
    pub bounds: Rect,
    /// Draw scale (1.0 unless an effect says otherwise)
    pub scale: f32,
}

impl Sprite {
    fn new(tag: VisualTag, bounds: Rect) -> Self {
        Self {
            tag,
            bounds,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonsterView {
    pub bounds: Rect,
    /// 0-100, for the health bar
    pub health_percent: f32,
    pub beam: Option<Rect>,
}

/// Which transient message a banner carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BannerKind {
    GameStarting,
    WaveAnnouncement,
    BossWarning,
    BossOutcome,
}

/// A transient on-screen message with its own display clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub text: String,
    pub timer: Timer,
}

impl Banner {
    pub fn new(kind: BannerKind, text: String) -> Self {
        Self {
            kind,
            text,
            timer: Timer::new(),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.timer.advance(dt);
    }

    pub fn is_expired(&self) -> bool {
        self.timer.elapsed() > BANNER_DURATION
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub wave: u32,
    pub player: Sprite,
    pub invaders: Vec<Sprite>,
    pub monster: Option<MonsterView>,
    pub bullets: Vec<Sprite>,
    pub bombs: Vec<Sprite>,
    pub addons: Vec<Sprite>,
    pub explosions: Vec<Sprite>,
    /// Active banner texts, oldest first
    pub messages: Vec<String>,
}

impl RenderSnapshot {
    /// Total sprites on screen (player and boss included)
    pub fn sprite_count(&self) -> usize {
        1 + self.invaders.len()
            + usize::from(self.monster.is_some())
            + self.bullets.len()
            + self.bombs.len()
            + self.addons.len()
            + self.explosions.len()
    }
}

/// Capture the current state for rendering
pub fn snapshot(state: &GameState) -> RenderSnapshot {
    let player_tag = if state.player.fire_mode.is_active() {
        VisualTag::PlayerOnFire
    } else if state.player.is_powered_up() {
        VisualTag::PlayerPowered
    } else {
        VisualTag::Player
    };

    RenderSnapshot {
        tick: state.time_ticks,
        phase: state.phase,
        score: state.score(),
        lives: state.player.lives,
        level: state.level(),
        wave: state.wave(),
        player: Sprite::new(player_tag, state.player.bounds()),
        invaders: state
            .invaders
            .iter()
            .map(|i| Sprite::new(i.profile().tag, i.bounds()))
            .collect(),
        monster: state.monster.as_ref().map(|m| MonsterView {
            bounds: m.bounds(),
            health_percent: m.health_percent(),
            beam: m.beam_bounds(),
        }),
        bullets: state
            .bullets
            .iter()
            .map(|b| Sprite::new(VisualTag::Bullet, b.bounds()))
            .collect(),
        bombs: state
            .bombs
            .iter()
            .map(|b| Sprite::new(VisualTag::Bomb, b.bounds()))
            .collect(),
        addons: state
            .addons
            .iter()
            .map(|a| Sprite::new(a.kind.tag(), a.bounds()))
            .collect(),
        explosions: state
            .explosions
            .iter()
            .map(|e| Sprite {
                tag: VisualTag::Explosion,
                bounds: Rect::new(e.pos, Vec2::splat(e.scale * 100.0)),
                scale: e.scale,
            })
            .collect(),
        messages: state.banners.iter().map(|b| b.text.clone()).collect(),
    }
}
