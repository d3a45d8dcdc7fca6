//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.
//! Order per tick: timers, movement, spawn triggers, collisions (with
//! progression and the game-over check), cleanup.

use glam::Vec2;

use super::collision;
use super::scheduler::{drop_bombs, spawn_addons, update_boss_lifecycle};
use super::state::{GamePhase, GameState};
use crate::consts::*;
use crate::highscores::ScoreStore;

/// Autopilot fires every this many ticks
const AUTOPILOT_FIRE_TICKS: u64 = 12;
/// Threats closer than this (vertically) make the autopilot sidestep
const AUTOPILOT_THREAT_RANGE: f32 = 160.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub move_up: bool,
    pub move_down: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Trigger pulled this tick (one volley per pull)
    pub fire: bool,
    /// Pause toggle
    pub pause: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Per-axis movement direction
    pub fn direction(&self) -> Vec2 {
        let x = f32::from(i8::from(self.move_right) - i8::from(self.move_left));
        let y = f32::from(i8::from(self.move_down) - i8::from(self.move_up));
        Vec2::new(x, y)
    }
}

/// What the screen-flow controller should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickSignal {
    Continue,
    Paused,
    GameOver,
}

/// Advance the game state by one timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, scores: &mut dyn ScoreStore) -> TickSignal {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.pause();
                return TickSignal::Paused;
            }
            GamePhase::Paused => state.resume(),
            GamePhase::GameOver => {}
        }
    }

    // Nothing moves while paused or after game over
    match state.phase {
        GamePhase::Paused => return TickSignal::Paused,
        GamePhase::GameOver => return TickSignal::GameOver,
        GamePhase::Playing => {}
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }
    let input = &input;

    state.time_ticks += 1;

    // Timers
    state.scheduler.advance(dt);
    state.player.advance_buffs(dt);
    for banner in &mut state.banners {
        banner.advance(dt);
    }
    for explosion in &mut state.explosions {
        explosion.timer.advance(dt);
    }

    // Movement
    state.player.steer(input.direction(), dt);
    if input.fire {
        let volley = state.player.fire(state.level());
        state.bullets.extend(volley);
    }
    for bullet in &mut state.bullets {
        bullet.advance(dt);
    }
    if let Some(monster) = state.monster.as_mut() {
        monster.update(dt);
    } else {
        for invader in &mut state.invaders {
            invader.update(dt);
        }
    }
    for bomb in &mut state.bombs {
        bomb.advance(dt);
    }
    for addon in &mut state.addons {
        addon.fall(dt);
    }

    // Spawn triggers
    update_boss_lifecycle(state);
    drop_bombs(state);
    spawn_addons(state);

    // Collisions, progression, terminal check
    collision::resolve(state, scores);

    // Cleanup (add-ons are culled by the resolver, which scores dodged hazards)
    state.bullets.retain(|b| !b.is_off_screen());
    state.bombs.retain(|b| !b.is_off_screen());
    state.explosions.retain(|e| !e.is_finished());
    state.banners.retain(|b| !b.is_expired());

    match state.phase {
        GamePhase::GameOver => TickSignal::GameOver,
        GamePhase::Paused => TickSignal::Paused,
        GamePhase::Playing => TickSignal::Continue,
    }
}

/// Demo-mode pilot: sidestep the nearest falling threat, otherwise line up
/// under a target and fire on a fixed cadence. Never moves vertically.
pub fn autopilot(state: &GameState, input: &mut TickInput) {
    let center = state.player.bounds().center();
    input.move_up = false;
    input.move_down = false;
    input.move_left = false;
    input.move_right = false;

    let bombs = state.bombs.iter().map(|b| b.bounds().center());
    let hazards = state
        .addons
        .iter()
        .filter(|a| a.kind.is_hazard())
        .map(|a| a.bounds().center());
    let threat = bombs
        .chain(hazards)
        .filter(|p| {
            p.y < center.y
                && center.y - p.y < AUTOPILOT_THREAT_RANGE
                && (p.x - center.x).abs() < PLAYER_SIZE.x
        })
        .min_by(|a, b| a.distance(center).total_cmp(&b.distance(center)));

    if let Some(threat) = threat {
        if threat.x < center.x {
            input.move_right = true;
        } else {
            input.move_left = true;
        }
        return;
    }

    let target_x = match &state.monster {
        Some(monster) => Some(monster.bounds().center().x),
        None => state
            .invaders
            .iter()
            .filter(|inv| inv.is_aligned())
            .map(|inv| inv.bounds().center().x)
            .min_by(|a, b| (a - center.x).abs().total_cmp(&(b - center.x).abs())),
    };

    if let Some(x) = target_x {
        let offset = x - center.x;
        if offset > 8.0 {
            input.move_right = true;
        } else if offset < -8.0 {
            input.move_left = true;
        }
        input.fire = state.time_ticks % AUTOPILOT_FIRE_TICKS == 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::HighScores;
    use crate::sim::monster::BossOutcome;
    use crate::sim::scheduler::BossStage;
    use crate::sim::state::{Bomb, Explosion, GameEvent};

    fn run(state: &mut GameState, input: &TickInput, ticks: usize, scores: &mut HighScores) -> TickSignal {
        let mut signal = TickSignal::Continue;
        for _ in 0..ticks {
            signal = tick(state, input, SIM_DT, scores);
        }
        signal
    }

    #[test]
    fn test_tick_pause() {
        let mut state = GameState::new(12345, "ACE");
        let mut scores = HighScores::new();
        run(&mut state, &TickInput::default(), 30, &mut scores);
        let ticks = state.time_ticks;
        let addon_clock = state.scheduler.addon_timer.elapsed();
        let first_pos = state.invaders[0].pos;

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        assert_eq!(tick(&mut state, &pause, SIM_DT, &mut scores), TickSignal::Paused);
        assert_eq!(state.phase, GamePhase::Paused);

        // Time does not pass while paused
        assert_eq!(run(&mut state, &TickInput::default(), 600, &mut scores), TickSignal::Paused);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.scheduler.addon_timer.elapsed(), addon_clock);
        assert_eq!(state.invaders[0].pos, first_pos);

        // Toggling again resumes on the same tick
        assert_eq!(tick(&mut state, &pause, SIM_DT, &mut scores), TickSignal::Continue);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.time_ticks, ticks + 1);
    }

    #[test]
    fn test_fire_spawns_bullet() {
        let mut state = GameState::new(1, "ACE");
        let mut scores = HighScores::new();
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, SIM_DT, &mut scores);
        assert_eq!(state.bullets.len(), 1);
        assert!(state.bullets[0].pos.y < PLAYER_START.y);
    }

    #[test]
    fn test_player_wraps_through_tick() {
        let mut state = GameState::new(1, "ACE");
        let mut scores = HighScores::new();
        state.player.pos = Vec2::new(-WRAP_MARGIN, 300.0);
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &left, SIM_DT, &mut scores);
        assert_eq!(state.player.pos, Vec2::new(ARENA_WIDTH, 300.0));

        state.player.pos = Vec2::new(200.0, ARENA_HEIGHT + 1.0);
        tick(&mut state, &TickInput::default(), SIM_DT, &mut scores);
        assert_eq!(state.player.pos, Vec2::new(200.0, -WRAP_MARGIN));
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut state = GameState::new(9, "ACE");
        let mut scores = HighScores::new();
        state.player.lives = 1;
        let pos = state.player.pos + Vec2::new(20.0, 20.0);
        state.bombs.push(Bomb::new(pos, 0.0));

        assert_eq!(tick(&mut state, &TickInput::default(), SIM_DT, &mut scores), TickSignal::GameOver);
        assert_eq!(state.player.lives, 0);
        let ticks = state.time_ticks;

        state.bombs.push(Bomb::new(pos, 0.0));
        assert_eq!(run(&mut state, &TickInput::default(), 10, &mut scores), TickSignal::GameOver);
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.player.lives, 0);
        assert_eq!(scores.scores().len(), 1);
    }

    #[test]
    fn test_cleanup_drops_finished_effects() {
        let mut state = GameState::new(1, "ACE");
        let mut scores = HighScores::new();
        state.explosions.push(Explosion::new(Vec2::new(10.0, 10.0), EXPLOSION_SCALE));
        run(&mut state, &TickInput::default(), 30, &mut scores);
        assert_eq!(state.explosions.len(), 1);
        run(&mut state, &TickInput::default(), 10, &mut scores);
        assert!(state.explosions.is_empty());

        // Both opening banners expire after two seconds
        run(&mut state, &TickInput::default(), 90, &mut scores);
        assert!(state.banners.is_empty());
    }

    #[test]
    fn test_same_seed_same_session() {
        let demo = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut a = GameState::new(2024, "ACE");
        let mut b = GameState::new(2024, "ACE");
        let mut scores_a = HighScores::new();
        let mut scores_b = HighScores::new();

        for _ in 0..3000 {
            let sa = tick(&mut a, &demo, SIM_DT, &mut scores_a);
            let sb = tick(&mut b, &demo, SIM_DT, &mut scores_b);
            assert_eq!(sa, sb);
        }
        assert_eq!(a.score(), b.score());
        assert_eq!(a.player.lives, b.player.lives);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!((a.level(), a.wave()), (b.level(), b.wave()));
        assert_eq!(a.invaders.len(), b.invaders.len());
        assert_eq!(a.addons.len(), b.addons.len());
        let bombs_a: Vec<_> = a.bombs.iter().map(|x| x.pos).collect();
        let bombs_b: Vec<_> = b.bombs.iter().map(|x| x.pos).collect();
        assert_eq!(bombs_a, bombs_b);
    }

    #[test]
    fn test_autopilot_makes_progress() {
        let demo = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut state = GameState::new(77, "BOT");
        let mut scores = HighScores::new();
        run(&mut state, &demo, 1200, &mut scores);
        assert!(state.score() > 0);
    }

    #[test]
    fn test_invader_health_invariant() {
        let demo = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        let mut state = GameState::new(31337, "BOT");
        let mut scores = HighScores::new();
        for _ in 0..2000 {
            if tick(&mut state, &demo, SIM_DT, &mut scores) == TickSignal::GameOver {
                break;
            }
            assert!(state.invaders.iter().all(|i| !i.is_dead()));
        }
    }

    /// Tick with the player shielded and no falling hazards, until `done`
    /// holds or `max_ticks` pass. Returns the number of ticks run.
    fn tick_shielded_until(
        state: &mut GameState,
        scores: &mut HighScores,
        max_ticks: usize,
        done: impl Fn(&GameState) -> bool,
    ) -> usize {
        for n in 0..max_ticks {
            if done(state) {
                return n;
            }
            state.player.power_up.activate();
            state.addons.clear();
            state.bombs.clear();
            assert_eq!(tick(state, &TickInput::default(), SIM_DT, scores), TickSignal::Continue);
        }
        max_ticks
    }

    #[test]
    fn test_boss_returns_after_escape() {
        let mut state = GameState::new(31337, "ACE");
        let mut scores = HighScores::new();
        let budget = ((MONSTER_TRIGGER_MAX as f32 + MONSTER_WARNING + 1.0) / SIM_DT) as usize;

        tick_shielded_until(&mut state, &mut scores, budget, |s| s.monster.is_some());
        assert!(state.monster.is_some(), "first boss arrives");
        assert_eq!(state.scheduler.boss.stage(), BossStage::Active);
        assert!(state.invaders.is_empty());
        let score_before = state.score();

        let lifetime = ((MONSTER_LIFETIME + 1.0) / SIM_DT) as usize;
        tick_shielded_until(&mut state, &mut scores, lifetime, |s| s.monster.is_none());
        assert!(state.monster.is_none(), "boss escapes");
        assert_eq!(state.score(), score_before + MONSTER_ESCAPE_SCORE);
        assert!(
            state
                .events
                .iter()
                .any(|e| *e == GameEvent::BossResolved { outcome: BossOutcome::Escaped })
        );

        // Re-armed with a fresh trigger
        let boss = &state.scheduler.boss;
        assert_eq!(boss.stage(), BossStage::Waiting);
        let trigger = boss.trigger_at();
        assert!(trigger >= MONSTER_TRIGGER_MIN as f32 && trigger < MONSTER_TRIGGER_MAX as f32);
        assert_eq!(state.level(), 1);

        tick_shielded_until(&mut state, &mut scores, budget, |s| {
            s.scheduler.boss.stage() == BossStage::Warning
        });
        assert_eq!(state.scheduler.boss.stage(), BossStage::Warning);
        tick_shielded_until(&mut state, &mut scores, budget, |s| s.monster.is_some());
        assert!(state.monster.is_some(), "second boss arrives");
        assert_eq!(state.level(), 1);
        assert_eq!(state.monster.as_ref().map(|m| m.health), Some(MONSTER_HEALTH));
    }

    #[test]
    fn test_direction_from_input() {
        let input = TickInput {
            move_left: true,
            move_down: true,
            ..Default::default()
        };
        assert_eq!(input.direction(), Vec2::new(-1.0, 1.0));
        let both = TickInput {
            move_left: true,
            move_right: true,
            ..Default::default()
        };
        assert_eq!(both.direction(), Vec2::ZERO);
    }
}
