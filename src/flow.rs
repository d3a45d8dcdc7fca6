//! Screen flow
//!
//! A small finite-state machine around the simulation. The controller owns
//! the current session, the score store and the name buffer; rendering and
//! input are handed in per frame.

use serde::Serialize;

use crate::consts::SIM_DT;
use crate::highscores::{ScoreEntry, ScoreStore};
use crate::platform::InputSource;
use crate::sim::{GameState, RenderSnapshot, TickInput, TickSignal, snapshot, tick};

/// Maximum simulation substeps per frame
const MAX_SUBSTEPS: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Screen {
    Menu,
    Instructions,
    NameInput,
    Playing,
    Paused,
    GameOver,
    HighScore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowCommand {
    Play,
    ShowInstructions,
    ShowHighScores,
    Back,
    TypeChar(char),
    Backspace,
    SubmitName,
    Pause,
    Resume,
    Quit,
}

/// Transition table. `None` means the command is ignored on this screen
/// (or, for name editing, handled without leaving it).
pub fn transition(screen: Screen, command: FlowCommand) -> Option<Screen> {
    use FlowCommand::*;
    match (screen, command) {
        (Screen::Menu, Play) => Some(Screen::NameInput),
        (Screen::Menu, ShowInstructions) => Some(Screen::Instructions),
        (Screen::Menu, ShowHighScores) => Some(Screen::HighScore),
        (Screen::Instructions | Screen::HighScore | Screen::GameOver, Back) => Some(Screen::Menu),
        (Screen::NameInput, SubmitName) => Some(Screen::Playing),
        (Screen::Playing, Pause) => Some(Screen::Paused),
        (Screen::Paused, Resume) => Some(Screen::Playing),
        (Screen::Paused, Quit) => Some(Screen::Menu),
        _ => None,
    }
}

/// Everything a renderer needs to draw the current screen
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub screen: Screen,
    /// Name being typed (NameInput) or the session's callsign
    pub name: String,
    /// Submit was attempted with an empty name
    pub name_warning: bool,
    /// Present on Playing and Paused
    pub snapshot: Option<RenderSnapshot>,
    pub high_scores: Vec<ScoreEntry>,
    /// Set on GameOver
    pub final_score: Option<u64>,
}

/// Consumer of finished frames
pub trait RenderSink {
    fn render(&mut self, frame: &Frame);
}

/// Screen-flow controller
pub struct Game<S: ScoreStore> {
    screen: Screen,
    scores: S,
    name: String,
    name_warning: bool,
    session: Option<GameState>,
    base_seed: u64,
    sessions_started: u64,
    accumulator: f32,
    fire_latched: bool,
    pause_latched: bool,
    final_score: Option<u64>,
}

impl<S: ScoreStore> Game<S> {
    pub fn new(scores: S, seed: u64) -> Self {
        Self {
            screen: Screen::Menu,
            scores,
            name: String::new(),
            name_warning: false,
            session: None,
            base_seed: seed,
            sessions_started: 0,
            accumulator: 0.0,
            fire_latched: false,
            pause_latched: false,
            final_score: None,
        }
    }

    #[inline]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn scores(&self) -> &S {
        &self.scores
    }

    pub fn session(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_warning(&self) -> bool {
        self.name_warning
    }

    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    /// Apply one screen command
    pub fn handle(&mut self, command: FlowCommand) -> Screen {
        if self.screen == Screen::NameInput {
            match command {
                FlowCommand::TypeChar(c) if c.is_ascii_graphic() => {
                    self.name.push(c);
                    self.name_warning = false;
                    return self.screen;
                }
                FlowCommand::Backspace => {
                    self.name.pop();
                    return self.screen;
                }
                FlowCommand::SubmitName if self.name.is_empty() => {
                    self.name_warning = true;
                    return self.screen;
                }
                _ => {}
            }
        }

        let Some(next) = transition(self.screen, command) else {
            return self.screen;
        };

        match (self.screen, next) {
            (Screen::Menu, Screen::NameInput) => {
                self.name_warning = false;
            }
            (Screen::NameInput, Screen::Playing) => self.start_session(),
            (Screen::Playing, Screen::Paused) => {
                if let Some(state) = self.session.as_mut() {
                    state.pause();
                }
                self.fire_latched = false;
                self.pause_latched = false;
            }
            (Screen::Paused, Screen::Playing) => {
                if let Some(state) = self.session.as_mut() {
                    state.resume();
                }
                self.accumulator = 0.0;
            }
            (Screen::Paused, Screen::Menu) => {
                log::info!("Session abandoned");
                self.session = None;
            }
            (Screen::GameOver, Screen::Menu) => {
                self.session = None;
            }
            _ => {}
        }

        log::debug!("Screen {:?} -> {:?}", self.screen, next);
        self.screen = next;
        next
    }

    fn start_session(&mut self) {
        let seed = self.base_seed.wrapping_add(self.sessions_started);
        self.sessions_started += 1;
        self.session = Some(GameState::new(seed, self.name.clone()));
        self.accumulator = 0.0;
        self.fire_latched = false;
        self.pause_latched = false;
        self.final_score = None;
        log::info!("{} starting a session (seed {})", self.name, seed);
    }

    /// Advance the session by `dt` seconds in fixed substeps.
    ///
    /// Trigger and pause presses are latched until a substep consumes them,
    /// so a frame shorter than `SIM_DT` does not lose them. Returns the last
    /// tick signal, or `None` when nothing is being played.
    pub fn step(&mut self, input: &TickInput, dt: f32) -> Option<TickSignal> {
        if !matches!(self.screen, Screen::Playing | Screen::Paused) {
            return None;
        }
        let state = self.session.as_mut()?;

        if self.screen == Screen::Paused {
            if !input.pause {
                return Some(TickSignal::Paused);
            }
            // Resume without stepping; the next frame starts a clean accumulator
            state.resume();
            self.accumulator = 0.0;
            self.screen = Screen::Playing;
            log::debug!("Resumed from tick input");
            return Some(TickSignal::Continue);
        }

        self.fire_latched |= input.fire;
        self.pause_latched |= input.pause;
        self.accumulator += dt;

        let mut signal = None;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let substep = TickInput {
                fire: std::mem::take(&mut self.fire_latched),
                pause: std::mem::take(&mut self.pause_latched),
                ..input.clone()
            };
            let result = tick(state, &substep, SIM_DT, &mut self.scores);
            self.accumulator -= SIM_DT;
            substeps += 1;
            signal = Some(result);
            if result != TickSignal::Continue {
                break;
            }
        }
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        for event in state.drain_events() {
            log::debug!("{:?}", event);
        }

        match signal {
            Some(TickSignal::Paused) => {
                self.screen = Screen::Paused;
                self.fire_latched = false;
            }
            Some(TickSignal::Continue) => self.screen = Screen::Playing,
            Some(TickSignal::GameOver) => {
                let score = state.score();
                self.final_score = Some(score);
                self.screen = Screen::GameOver;
                self.accumulator = 0.0;
                self.fire_latched = false;
                self.pause_latched = false;
                log::info!("Final score {}", score);
            }
            None => {}
        }
        signal
    }

    /// Build the frame for the current screen
    pub fn frame(&self) -> Frame {
        let snapshot = match self.screen {
            Screen::Playing | Screen::Paused | Screen::GameOver => self.session.as_ref().map(snapshot),
            _ => None,
        };
        Frame {
            screen: self.screen,
            name: self.name.clone(),
            name_warning: self.name_warning,
            snapshot,
            high_scores: self.scores.scores().to_vec(),
            final_score: self.final_score,
        }
    }

    /// One full frame: poll input, apply commands, step, render
    pub fn run_frame<I, R>(&mut self, input: &mut I, sink: &mut R, dt: f32) -> Option<TickSignal>
    where
        I: InputSource + ?Sized,
        R: RenderSink + ?Sized,
    {
        for command in input.poll_commands() {
            self.handle(command);
        }
        let tick_input = input.poll_tick();
        let signal = self.step(&tick_input, dt);
        sink.render(&self.frame());
        signal
    }
}
