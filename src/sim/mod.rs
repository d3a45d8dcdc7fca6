//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only moves when the tick advances it
//! - Seeded RNG only (one stream per session)
//! - Stable iteration order (collection order, removals highest index first)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geom;
pub mod invader;
pub mod monster;
pub mod scheduler;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timer;
pub mod waves;

pub use collision::{Resolution, enter_game_over, remove_indices, resolve};
pub use geom::Rect;
pub use invader::{Invader, InvaderKind, KindProfile, Motion};
pub use monster::{BossOutcome, Monster, MonsterPhase};
pub use scheduler::{BossSchedule, BossStage, Scheduler};
pub use snapshot::{Banner, BannerKind, MonsterView, RenderSnapshot, Sprite, VisualTag, snapshot};
pub use state::{
    AddOn, AddOnKind, Bomb, Bullet, Explosion, GameEvent, GamePhase, GameState, Player, Session,
};
pub use tick::{TickInput, TickSignal, autopilot, tick};
pub use timer::{TimedFlag, Timer};
pub use waves::{Layout, Mix, SpawnDescriptor, WaveDirector, formation};
