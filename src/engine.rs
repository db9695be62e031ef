//! Host-facing facade
//!
//! Input can arrive at any time between frames (key handlers, touch, UI
//! buttons). It is latched here and drained once per `frame` call, which is
//! the only thing a scheduler needs to drive.

use crate::settings::Settings;
use crate::sim::{
    FrameClock, GameEvent, GameState, PauseCommand, RunPhase, Scene, SpriteHandle, TickInput,
    tick,
};
use crate::tuning::Tuning;

/// What the host gets back from a frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutput {
    /// Delta used for this frame (reference frames)
    pub delta: f32,
    /// Distance score plus bonus, non-decreasing within a run
    pub score: u64,
    pub phase: RunPhase,
    /// True on the one frame a run ends
    pub game_over_edge: bool,
    pub events: Vec<GameEvent>,
}

/// Owns a game state and turns timestamps plus latched input into frames
pub struct Engine {
    state: GameState,
    clock: FrameClock,
    pending: TickInput,
    settings: Settings,
}

impl Engine {
    pub fn new(seed: u64, tuning: Tuning, settings: Settings) -> Self {
        let mut state = GameState::new(seed, tuning);
        state.apply_settings(&settings);
        log::info!(
            "Engine created (seed {}, quality {})",
            seed,
            settings.quality.as_str()
        );
        Self {
            state,
            clock: FrameClock::new(),
            pending: TickInput::default(),
            settings,
        }
    }

    /// Default balance and preferences
    pub fn with_seed(seed: u64) -> Self {
        Self::new(seed, Tuning::default(), Settings::default())
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.state.apply_settings(&settings);
        self.settings = settings;
    }

    // === Latched input ===

    pub fn request_jump(&mut self) {
        self.pending.jump = true;
    }

    pub fn request_pause_toggle(&mut self) {
        self.pending.pause = PauseCommand::Toggle;
    }

    pub fn pause(&mut self) {
        self.pending.pause = PauseCommand::Pause;
    }

    pub fn resume(&mut self) {
        self.pending.pause = PauseCommand::Resume;
    }

    pub fn start(&mut self) {
        self.pending.start = true;
        self.pending.quit = false;
    }

    pub fn restart(&mut self) {
        self.start();
    }

    pub fn quit(&mut self) {
        self.pending.quit = true;
        self.pending.start = false;
    }

    /// Let the autopilot play (attract mode)
    pub fn set_idle_mode(&mut self, idle: bool) {
        self.pending.idle_mode = idle;
    }

    // === Host notifications ===

    pub fn set_sprite(&mut self, sprite: SpriteHandle) {
        if sprite.resolved().is_none() {
            log::debug!("No sprite set, drawing placeholder");
        }
        self.state.sprite = sprite;
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.set_viewport(width, height);
    }

    /// Scheduler hook: advance one frame at wall-clock `now_ms`
    pub fn frame(&mut self, now_ms: f64) -> FrameOutput {
        let input = self.take_input();
        if input.start {
            self.clock.reset();
        }
        let delta = self.clock.advance(now_ms);
        let events = tick(&mut self.state, &input, delta);
        let game_over_edge = events
            .iter()
            .any(|e| matches!(e, GameEvent::GameOver { .. }));

        FrameOutput {
            delta,
            score: self.state.score(),
            phase: self.state.phase,
            game_over_edge,
            events,
        }
    }

    /// Drain one-shot inputs, keep the persistent ones
    fn take_input(&mut self) -> TickInput {
        let input = std::mem::take(&mut self.pending);
        self.pending.idle_mode = input.idle_mode;
        input
    }

    pub fn score(&self) -> u64 {
        self.state.score()
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.state.phase == RunPhase::GameOver
    }

    pub fn scene(&self) -> Scene {
        Scene::build(&self.state)
    }
}
