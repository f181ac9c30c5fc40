//! Game driver
//!
//! Owns the simulation, input mapper and score store. Runs the fixed
//! timestep loop and fans simulation events out to persistence and input.

use crate::consts::*;
use crate::highscores::{Scoreboard, now_timestamp};
use crate::input::{Action, InputMapper};
use crate::persistence::{ScoreStore, sanitize_name};
use crate::playfield::ConfigError;
use crate::renderer::{FrameSink, FrameSnapshot};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, tick};

/// Longest frame delta fed to the accumulator (seconds)
const MAX_FRAME_DT: f32 = 0.1;

/// A running game bound to a score store
pub struct Game<S: ScoreStore> {
    pub state: GameState,
    input: InputMapper,
    store: S,
    player_name: String,
    accumulator: f32,
    /// Wall clock for scoreboard timestamps
    clock: fn() -> f64,
}

impl<S: ScoreStore> Game<S> {
    pub fn new(settings: &Settings, store: S, seed: u64) -> Result<Self, ConfigError> {
        let playfield = settings.playfield()?;
        let high_score = store.load_high_score();
        let player_name = store.load_player_name();
        log::info!("Starting run with seed {seed}, high score {high_score}, player {player_name:?}");

        let mut input = InputMapper::new(settings.bindings.clone());
        input.set_idle_mode(settings.idle_mode);

        Ok(Self {
            state: GameState::new(seed, playfield, high_score),
            input,
            store,
            player_name,
            accumulator: 0.0,
            clock: now_timestamp,
        })
    }

    /// Replace the wall clock used for scoreboard dates
    pub fn with_clock(mut self, clock: fn() -> f64) -> Self {
        self.clock = clock;
        self
    }

    /// Feed a raw key event
    pub fn handle_key(&mut self, code: u16, pressed: bool) -> Option<Action> {
        self.input.handle_key(code, pressed)
    }

    pub fn set_idle_mode(&mut self, idle: bool) {
        self.input.set_idle_mode(idle);
    }

    /// Advance by a wall-clock frame delta. Returns the ticks run.
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Run exactly one simulation tick
    pub fn step(&mut self) {
        let input = self.input.take_tick_input();
        tick(&mut self.state, &input, SIM_DT);
        self.dispatch_events();
    }

    /// Present the current state to a sink
    pub fn render(&self, sink: &mut impl FrameSink) {
        sink.present(&self.snapshot());
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot::capture(&self.state)
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.store.load_scoreboard()
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn set_player_name(&mut self, name: &str) {
        self.player_name = sanitize_name(name);
        if let Err(err) = self.store.store_player_name(&self.player_name) {
            log::warn!("Could not save player name: {err}");
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::RunFinished { score } => {
                    let timestamp = (self.clock)();
                    if let Err(err) = self
                        .store
                        .record_finished_run(&self.player_name, score, timestamp)
                    {
                        log::warn!("Could not record run of {score}: {err}");
                    }
                }
                GameEvent::NewHighScore { score } => {
                    log::info!("New high score: {score}");
                    if let Err(err) = self.store.store_high_score(score) {
                        log::warn!("Could not save high score {score}: {err}");
                    }
                }
                GameEvent::Respawned { .. } => self.input.clear(),
                GameEvent::Jumped
                | GameEvent::Landed
                | GameEvent::PlatformScored { .. } => {}
            }
        }
    }
}
