//! Input sources
//!
//! The core never reads devices. Once per frame the flow controller asks its
//! input source for screen commands and for the tick's movement/fire state.

use std::collections::VecDeque;

use crate::flow::FlowCommand;
use crate::sim::TickInput;

pub trait InputSource {
    /// Screen-flow commands issued since the last poll, in order
    fn poll_commands(&mut self) -> Vec<FlowCommand>;

    /// Gameplay input for the next tick
    fn poll_tick(&mut self) -> TickInput;
}

/// Replays queued commands and holds a fixed gameplay input
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    commands: VecDeque<FlowCommand>,
    held: TickInput,
    /// One-shot flags cleared after they are polled once
    pending_fire: bool,
    pending_pause: bool,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: FlowCommand) {
        self.commands.push_back(command);
    }

    /// Queue one `TypeChar` per character
    pub fn type_text(&mut self, text: &str) {
        self.commands.extend(text.chars().map(FlowCommand::TypeChar));
    }

    /// Input repeated on every tick until changed
    pub fn hold(&mut self, input: TickInput) {
        self.held = input;
    }

    /// Pull the trigger on the next tick only
    pub fn tap_fire(&mut self) {
        self.pending_fire = true;
    }

    /// Toggle pause on the next tick only
    pub fn tap_pause(&mut self) {
        self.pending_pause = true;
    }
}

impl InputSource for ScriptedInput {
    fn poll_commands(&mut self) -> Vec<FlowCommand> {
        self.commands.drain(..).collect()
    }

    fn poll_tick(&mut self) -> TickInput {
        let mut input = self.held.clone();
        input.fire |= std::mem::take(&mut self.pending_fire);
        input.pause |= std::mem::take(&mut self.pending_pause);
        input
    }
}
