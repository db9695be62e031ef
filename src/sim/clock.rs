//! Wall-clock to frame-delta conversion
//!
//! The simulation counts time in reference frames (1/60 s). The host hands
//! in millisecond timestamps from whatever clock it has.

use crate::consts::{MAX_DELTA, REFERENCE_FRAME_MS};

/// Converts successive timestamps into a normalized delta
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the timestamp history; the next frame reports a delta of exactly 1.0
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Record a frame timestamp and return the elapsed time in reference frames
    pub fn advance(&mut self, now_ms: f64) -> f32 {
        let delta = match self.last_ms {
            None => 1.0,
            Some(last) => (((now_ms - last) / REFERENCE_FRAME_MS) as f32).clamp(0.0, MAX_DELTA),
        };
        self.last_ms = Some(now_ms);
        delta
    }
}
