//! Collision resolution and scoring
//!
//! Runs once per tick after everything has moved. Each pass collects the
//! indices it wants gone, then erases them highest-first so earlier indices
//! stay valid. Score and lives are only ever changed from here.

use glam::Vec2;

use super::monster::BossOutcome;
use super::snapshot::BannerKind;
use super::state::{Explosion, GameEvent, GamePhase, GameState};
use crate::consts::*;
use crate::highscores::ScoreStore;

/// What one resolution pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Bullets that struck something
    pub hits: usize,
    /// Invaders destroyed
    pub kills: usize,
    pub boss_outcome: Option<BossOutcome>,
    pub lives_lost: u32,
    /// The session ended during this pass
    pub game_over: bool,
}

/// Erase every listed index from `items`.
///
/// Indices are sorted descending and deduplicated first; out-of-range
/// entries are ignored.
pub fn remove_indices<T>(items: &mut Vec<T>, mut indices: Vec<usize>) {
    indices.sort_unstable_by(|a, b| b.cmp(a));
    indices.dedup();
    for idx in indices {
        if idx < items.len() {
            items.remove(idx);
        }
    }
}

/// Resolve all interactions for the current tick
pub fn resolve(state: &mut GameState, scores: &mut dyn ScoreStore) -> Resolution {
    let mut res = Resolution::default();
    if state.phase != GamePhase::Playing {
        return res;
    }

    resolve_bullet_hits(state, &mut res);
    resolve_deaths(state, &mut res);

    if resolve_player_damage(state, scores, &mut res) {
        return res;
    }
    if resolve_addons(state, scores, &mut res) {
        return res;
    }

    check_progression(state);
    res
}

/// Each bullet strikes at most one target: the boss if it overlaps, otherwise
/// the first live invader in list order.
fn resolve_bullet_hits(state: &mut GameState, res: &mut Resolution) {
    let mut spent = Vec::new();

    for (i, bullet) in state.bullets.iter().enumerate() {
        let bounds = bullet.bounds();

        if let Some(monster) = state.monster.as_mut() {
            if !monster.is_dead() && monster.bounds().intersects(&bounds) {
                monster.take_hit();
                spent.push(i);
                continue;
            }
        }

        if let Some(invader) = state
            .invaders
            .iter_mut()
            .find(|inv| !inv.is_dead() && inv.bounds().intersects(&bounds))
        {
            invader.take_hit();
            spent.push(i);
        }
    }

    res.hits += spent.len();
    remove_indices(&mut state.bullets, spent);
}

/// Remove dead invaders and settle the boss encounter
fn resolve_deaths(state: &mut GameState, res: &mut Resolution) {
    let mut dead = Vec::new();
    for (i, invader) in state.invaders.iter().enumerate() {
        if invader.is_dead() {
            let profile = invader.profile();
            state.session.award(profile.score);
            state.explosions.push(Explosion::new(invader.pos, EXPLOSION_SCALE));
            state.events.push(GameEvent::InvaderDestroyed { kind: invader.kind });
            dead.push(i);
        }
    }
    res.kills += dead.len();
    remove_indices(&mut state.invaders, dead);

    let Some(outcome) = state.monster.as_mut().and_then(|m| m.resolve()) else {
        return;
    };
    if let Some(monster) = state.monster.take() {
        if outcome == BossOutcome::Destroyed {
            state
                .explosions
                .push(Explosion::new(monster.pos + Vec2::splat(40.0), MONSTER_EXPLOSION_SCALE));
        }
    }
    state.session.award(outcome.score());
    state.scheduler.boss.rearm(&mut state.rng);
    state.show_banner(BannerKind::BossOutcome, outcome.message().to_string());
    state.events.push(GameEvent::BossResolved { outcome });
    log::info!("{} (+{})", outcome.message(), outcome.score());
    res.boss_outcome = Some(outcome);
}

/// Beam, then bombs, then invader contact. Returns true if the game ended.
fn resolve_player_damage(state: &mut GameState, scores: &mut dyn ScoreStore, res: &mut Resolution) -> bool {
    if state.player.is_powered_up() {
        return false;
    }
    let player = state.player.bounds();

    let beam_hit = state
        .monster
        .as_mut()
        .is_some_and(|monster| monster.beam_strikes(&player));
    if beam_hit && lose_life(state, scores, res) {
        return true;
    }

    let mut struck = Vec::new();
    let mut ended = false;
    for (i, bomb) in state.bombs.iter().enumerate() {
        if bomb.bounds().intersects(&player) {
            struck.push(i);
        }
    }
    for _ in 0..struck.len() {
        if lose_life(state, scores, res) {
            ended = true;
            break;
        }
    }
    remove_indices(&mut state.bombs, struck);
    if ended {
        return true;
    }

    let mut rammed = Vec::new();
    for (i, invader) in state.invaders.iter().enumerate() {
        if invader.bounds().intersects(&player) {
            rammed.push(i);
        }
    }
    for _ in 0..rammed.len() {
        if lose_life(state, scores, res) {
            ended = true;
            break;
        }
    }
    remove_indices(&mut state.invaders, rammed);
    ended
}

/// Collect touched add-ons, reward dodged hazards that fell off the bottom.
/// Returns true if the game ended.
fn resolve_addons(state: &mut GameState, scores: &mut dyn ScoreStore, res: &mut Resolution) -> bool {
    let player = state.player.bounds();
    let mut gone = Vec::new();
    let mut ended = false;

    for i in 0..state.addons.len() {
        let addon = &state.addons[i];
        let kind = addon.kind;
        if addon.bounds().intersects(&player) {
            let before = state.player.lives;
            kind.apply(&mut state.player);
            res.lives_lost += before.saturating_sub(state.player.lives);
            state.events.push(GameEvent::AddOnCollected { kind });
            gone.push(i);
            if state.player.lives == 0 {
                enter_game_over(state, scores);
                res.game_over = true;
                ended = true;
                break;
            }
        } else if addon.is_off_screen() {
            if kind.is_hazard() {
                state.session.award(kind.avoid_bonus());
                state.events.push(GameEvent::HazardAvoided);
            }
            gone.push(i);
        }
    }

    remove_indices(&mut state.addons, gone);
    ended
}

/// Spawn the next formation once the field is clear
fn check_progression(state: &mut GameState) {
    if !state.invaders.is_empty() || state.monster.is_some() {
        return;
    }
    let formation = state.session.director.next_formation();
    state.spawn_formation(formation);
}

/// Take one life; ends the game at zero. Returns true if the game ended.
fn lose_life(state: &mut GameState, scores: &mut dyn ScoreStore, res: &mut Resolution) -> bool {
    state.player.lives = state.player.lives.saturating_sub(1);
    res.lives_lost += 1;
    state.events.push(GameEvent::PlayerHit {
        lives: state.player.lives,
    });
    if state.player.lives == 0 {
        enter_game_over(state, scores);
        res.game_over = true;
        return true;
    }
    false
}

/// Terminal transition. Idempotent: the score is submitted only on the
/// first call.
pub fn enter_game_over(state: &mut GameState, scores: &mut dyn ScoreStore) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    let score = state.score();
    let ranking = scores.submit(&state.player_name, score);
    log::info!(
        "Game over: {} scored {} (top score {})",
        state.player_name,
        score,
        ranking.first().map(|e| e.score).unwrap_or(score)
    );
    state.events.push(GameEvent::GameOver { score });
}
