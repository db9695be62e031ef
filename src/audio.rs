//! Sound event routing
//!
//! The simulation never plays audio. It emits `GameEvent`s; this module maps
//! them to sound cues and forwards them, at the configured volume, to whatever
//! synthesizer the host plugs in.

use crate::settings::Settings;
use crate::sim::{CollectibleTier, GameEvent};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ground jump
    Jump,
    DoubleJump,
    TripleJump,
    /// Fourth (and any later) air jump
    QuadJump,
    PickupGem,
    PickupBox,
    PickupKey,
    /// Combo grew, pitch rises with the count
    ComboStep { count: u32 },
    NearMiss,
    /// Buff acquired
    PowerUp,
    ShieldBreak,
    Death,
    /// Distance milestone reached
    Milestone,
    GameOver,
}

impl SoundEffect {
    /// Cue for a simulation event, if it makes a sound
    pub fn from_event(event: &GameEvent) -> Option<Self> {
        let effect = match event {
            GameEvent::Jump { number } => match number {
                0 | 1 => SoundEffect::Jump,
                2 => SoundEffect::DoubleJump,
                3 => SoundEffect::TripleJump,
                _ => SoundEffect::QuadJump,
            },
            GameEvent::Pickup { tier, .. } => match tier {
                CollectibleTier::Gem => SoundEffect::PickupGem,
                CollectibleTier::Box => SoundEffect::PickupBox,
                CollectibleTier::Key => SoundEffect::PickupKey,
            },
            GameEvent::ComboStep { count } => SoundEffect::ComboStep { count: *count },
            GameEvent::NearMiss { .. } => SoundEffect::NearMiss,
            GameEvent::PowerUp { .. } => SoundEffect::PowerUp,
            GameEvent::ShieldBreak => SoundEffect::ShieldBreak,
            GameEvent::Death => SoundEffect::Death,
            GameEvent::Milestone { .. } => SoundEffect::Milestone,
            GameEvent::GameOver { .. } => SoundEffect::GameOver,
            GameEvent::RunStarted
            | GameEvent::ComboLost { .. }
            | GameEvent::BuffExpired { .. }
            | GameEvent::Paused
            | GameEvent::Resumed
            | GameEvent::Quit => return None,
        };
        Some(effect)
    }
}

/// Something that can actually make noise
pub trait AudioSink {
    /// Play `effect` at `volume` (0.0 - 1.0, already mixed)
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("sfx {:?} @ {:.2}", effect, volume);
    }
}

/// Applies mute/volume preferences and forwards cues to a sink
pub struct AudioRouter<S: AudioSink> {
    sink: S,
    /// Mixed volume from the player's settings (0.0 when muted)
    volume: f32,
}

impl<S: AudioSink> AudioRouter<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        Self {
            sink,
            volume: settings.effective_volume(),
        }
    }

    /// Pick up changed volume or mute preferences
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.volume = settings.effective_volume();
    }

    /// Play one cue. Silent when muted or at zero volume.
    pub fn play(&mut self, effect: SoundEffect) -> bool {
        if self.volume <= 0.0 {
            return false;
        }
        self.sink.play(effect, self.volume);
        true
    }

    /// Forward every audible event of a frame. Returns how many cues played.
    pub fn dispatch(&mut self, events: &[GameEvent]) -> usize {
        events
            .iter()
            .filter_map(SoundEffect::from_event)
            .filter(|&effect| self.play(effect))
            .count()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_inner(self) -> S {
        self.sink
    }
}
