//! Space Shooters entry point
//!
//! Headless driver: loads settings, opens the score file, enters a name and
//! lets the demo pilot play at the target frame rate, logging a summary of
//! each second of play.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use space_shooters::flow::{Frame, RenderSink};
use space_shooters::persistence::FileScoreStore;
use space_shooters::platform::{FrameClock, ScriptedInput, SystemTimeSource};
use space_shooters::sim::{TickInput, TickSignal};
use space_shooters::{FlowCommand, Game, HighScores, Screen, ScoreStore, Settings};

/// Render sink that logs a one-line summary about once a second
struct LogSink {
    frames: u64,
    every: u64,
}

impl RenderSink for LogSink {
    fn render(&mut self, frame: &Frame) {
        self.frames += 1;
        if self.frames % self.every != 0 {
            return;
        }
        if let Some(snap) = &frame.snapshot {
            log::info!(
                "[{:?}] L{}W{} score={} lives={} invaders={} bombs={} boss={} {}",
                frame.screen,
                snap.level,
                snap.wave,
                snap.score,
                snap.lives,
                snap.invaders.len(),
                snap.bombs.len(),
                snap.monster
                    .map(|m| format!("{:.0}%", m.health_percent))
                    .unwrap_or_else(|| "-".to_string()),
                snap.messages.join(" | ")
            );
        } else {
            log::info!("[{:?}]", frame.screen);
        }
    }
}

fn run<S: ScoreStore>(settings: &Settings, scores: S) -> Vec<space_shooters::ScoreEntry> {
    let seed = settings.resolve_seed();
    log::info!("Seed {}", seed);

    let mut game = Game::new(scores, seed);
    let mut input = ScriptedInput::new();
    input.push(FlowCommand::Play);
    input.type_text(&settings.player_name);
    input.push(FlowCommand::SubmitName);
    input.hold(TickInput {
        idle_mode: settings.autopilot,
        ..Default::default()
    });

    let mut sink = LogSink {
        frames: 0,
        every: u64::from(settings.target_fps.max(1)),
    };
    let mut clock = FrameClock::new(SystemTimeSource::new(), settings.min_frame_interval);
    let pace = Duration::from_secs_f32(settings.frame_interval());

    loop {
        let Some(dt) = clock.next_delta() else {
            thread::sleep(Duration::from_millis(1));
            continue;
        };

        let signal = game.run_frame(&mut input, &mut sink, dt);
        if signal == Some(TickSignal::GameOver) || game.screen() == Screen::GameOver {
            break;
        }
        if game.screen() != Screen::Playing && game.screen() != Screen::Paused {
            log::warn!("Driver stopped on {:?}", game.screen());
            break;
        }
        let ticks = game.session().map(|s| s.time_ticks).unwrap_or(0);
        if settings.max_ticks.is_some_and(|max| ticks >= max) {
            log::info!("Tick limit reached");
            break;
        }
        thread::sleep(pace);
    }

    if let Some(state) = game.session() {
        log::info!(
            "Session over: level {} wave {}, score {}",
            state.level(),
            state.wave(),
            state.score()
        );
    }
    game.scores().scores().to_vec()
}

fn main() {
    env_logger::init();
    log::info!("Space Shooters (headless) starting...");

    let settings = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Settings::load_or_default(&path),
        None => Settings::default(),
    };

    let ranking = match FileScoreStore::open(&settings.highscore_path) {
        Ok(store) => run(&settings, store),
        Err(err) => {
            log::warn!("{}; keeping scores in memory", err);
            run(&settings, HighScores::new())
        }
    };

    println!("\n  TOP SCORES");
    if ranking.is_empty() {
        println!("  (none yet)");
    }
    for (i, entry) in ranking.iter().enumerate() {
        println!("  {}. {:<12} {:>6}  {}", i + 1, entry.name, entry.score, entry.badge);
    }
}
