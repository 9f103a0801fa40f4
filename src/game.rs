//! Frame driver
//!
//! Owns the simulation state, the input latch, the fixed-timestep clock and
//! the audio manager. Each host frame runs every tick that is due, forwarding
//! events to audio, then renders once from the finished state.

use std::sync::Arc;

use crate::audio::AudioManager;
use crate::platform::{FixedTimestep, InputState, Key};
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, TileGrid, autopilot_input, tick};
use crate::tuning::Tuning;

/// How a finished run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunRecord {
    /// `GameOver` or `Win`
    pub outcome: GamePhase,
    pub score: u64,
    pub ticks: u64,
}

/// Game instance holding all state
pub struct Game {
    state: GameState,
    input: InputState,
    clock: FixedTimestep,
    audio: AudioManager,
    runs: Vec<RunRecord>,
    /// Demo mode - the autopilot supplies input
    pub idle_mode: bool,
}

impl Game {
    pub fn new(grid: Arc<TileGrid>, tuning: Tuning, seed: u64, audio: AudioManager) -> Self {
        log::info!("Game initialized with seed: {}", seed);
        Self {
            state: GameState::new(grid, tuning, seed),
            input: InputState::new(),
            clock: FixedTimestep::default(),
            audio,
            runs: Vec::new(),
            idle_mode: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn key_down(&mut self, key: Key) {
        self.input.key_down(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.input.key_up(key);
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    /// Runs finished so far, oldest first
    pub fn runs(&self) -> &[RunRecord] {
        &self.runs
    }

    /// Advance by `dt` wall-clock seconds, then render once.
    /// Returns the number of ticks run.
    pub fn frame<R>(&mut self, dt: f64, render: R) -> u32
    where
        R: FnOnce(&GameState),
    {
        let ticks = self.clock.advance(dt);
        self.run_ticks(ticks);
        render(&self.state);
        ticks
    }

    /// Run `n` ticks without consulting the clock
    pub fn run_ticks(&mut self, n: u32) {
        for _ in 0..n {
            let input = self.next_input();
            self.step(&input);
        }
    }

    fn next_input(&self) -> TickInput {
        if self.idle_mode {
            autopilot_input(&self.state)
        } else {
            self.input.tick_input()
        }
    }

    fn step(&mut self, input: &TickInput) {
        tick(&mut self.state, input);
        // One-shot presses are spent once a tick has seen them
        self.input.consume();
        for event in self.state.drain_events() {
            self.dispatch(event);
        }
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::GameOver | GameEvent::Victory => {
                log::info!("{:?} (score {})", event, self.state.score);
                self.runs.push(RunRecord {
                    outcome: self.state.phase,
                    score: self.state.score,
                    ticks: self.state.time_ticks,
                });
            }
            GameEvent::RunStarted | GameEvent::BossSpawned => {
                log::info!("{:?} (score {})", event, self.state.score)
            }
            _ => log::debug!("{:?}", event),
        }
        self.audio.on_event(event);
    }
}
