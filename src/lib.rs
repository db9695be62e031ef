//! Gub Runner - side-scrolling endless runner simulation core
//!
//! Core modules:
//! - `sim`: Per-frame simulation (spawning, physics, collisions, combo, effects, lifecycle)
//! - `engine`: Host-facing facade that latches input and drives `sim::tick` from timestamps
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (effects quality, accessibility, audio levels)
//! - `audio`: Routing of simulation events to an external sound collaborator

pub mod audio;
pub mod engine;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use engine::{Engine, FrameOutput};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Length of one reference frame in milliseconds (60 Hz)
    pub const REFERENCE_FRAME_MS: f64 = 16.67;
    /// Largest delta a single frame may report (a backgrounded tab resumes smoothly)
    pub const MAX_DELTA: f32 = 4.0;

    /// Distance from the bottom of the viewport to the ground line
    pub const GROUND_MARGIN: f32 = 40.0;
    /// Viewport used before the host reports its size
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 800.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 400.0;

    /// Player lane and sprite size
    pub const PLAYER_X: f32 = 80.0;
    pub const PLAYER_SIZE: f32 = 48.0;
    /// Maximum number of trail ghosts behind an airborne player
    pub const TRAIL_LENGTH: usize = 6;

    /// Entity sizes
    pub const COLLECTIBLE_SIZE: f32 = 26.0;
    pub const POWERUP_SIZE: f32 = 30.0;

    /// Bob amplitudes used when building the scene (pixels)
    pub const COLLECTIBLE_BOB: f32 = 5.0;
    pub const POWERUP_BOB: f32 = 7.0;

    /// Number of background clouds
    pub const CLOUD_COUNT: usize = 8;
}

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Per-reference-frame decay factor raised to the frame delta.
///
/// `decay(0.85, 2.0)` is the same as applying `* 0.85` on two consecutive 60 Hz frames.
#[inline]
pub fn decay(factor: f32, delta: f32) -> f32 {
    factor.powf(delta)
}

/// Move `current` toward `target` by `rate` of the gap per reference frame, frame-rate independent
#[inline]
pub fn approach(current: f32, target: f32, rate: f32, delta: f32) -> f32 {
    lerp(current, target, 1.0 - decay(1.0 - rate, delta))
}
