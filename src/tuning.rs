//! Data-driven game balance
//!
//! Every gameplay number lives here so balance passes never touch simulation code.
//! Values are expressed per reference frame (60 Hz); the simulation scales them by delta.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// A step in the combo multiplier table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboTier {
    /// Combo count at which this tier starts
    pub at: u32,
    /// Score multiplier while in this tier
    pub multiplier: u32,
}

/// What happens when a buff is picked up while it is already running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BuffRefresh {
    /// Reset the countdown to the full duration
    #[default]
    Refresh,
    /// Add the full duration, capped at twice the duration
    Extend,
}

/// Game balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World speed ===
    pub start_speed: f32,
    pub speed_growth: f32,
    pub max_speed: f32,
    /// Scroll multiplier while the slow buff runs
    pub slow_factor: f32,

    // === Player ===
    pub gravity: f32,
    pub jump_strength: f32,
    /// Fraction of `jump_strength` for the 1st, 2nd, ... jump of a chain
    pub jump_fractions: Vec<f32>,
    pub max_jumps: u8,

    // === Obstacles ===
    /// Inward padding applied to obstacle hitboxes
    pub obstacle_padding: f32,
    pub obstacle_cull_x: f32,
    pub spawn_gap_start: u64,
    pub spawn_gap_min: u64,
    /// Distance needed to shave one frame off the spawn gap
    pub spawn_gap_distance_step: f32,
    /// Probability that a due spawn is skipped
    pub spawn_skip_chance: f32,
    /// Roll above which a paired obstacle appears
    pub pair_threshold: f32,
    pub pair_min_distance: f32,
    pub pair_offset: f32,
    /// Roll above which a single tall obstacle appears
    pub tall_threshold: f32,

    // === Collectibles ===
    pub item_cull_x: f32,
    pub collectible_interval: u64,
    pub key_threshold: f32,
    pub box_threshold: f32,
    pub collectible_speed: f32,

    // === Power-ups ===
    pub powerup_interval: u64,
    /// Roll that must be exceeded for a due power-up to spawn
    pub powerup_threshold: f32,
    pub powerup_min_distance: f32,
    pub powerup_speed: f32,
    pub shield_duration: f32,
    pub magnet_duration: f32,
    pub slow_duration: f32,
    pub buff_refresh: BuffRefresh,
    pub magnet_radius: f32,
    /// Fraction of the remaining distance a magnetised item covers per frame
    pub magnet_pull: f32,

    // === Scoring ===
    pub combo_window: f32,
    /// Ascending by `at`
    pub combo_tiers: Vec<ComboTier>,
    pub near_miss_bonus: u64,
    pub near_miss_vertical: f32,
    pub near_miss_horizontal: f32,
    /// Distance units per score point
    pub score_divisor: f32,
    pub milestone_step: u64,

    // === Lifecycle ===
    /// Frames between a fatal hit and the game-over signal
    pub death_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            start_speed: 2.5,
            speed_growth: 0.00012,
            max_speed: 12.0,
            slow_factor: 0.6,

            gravity: 0.8,
            jump_strength: 15.0,
            jump_fractions: vec![1.0, 0.85, 0.75, 0.65],
            max_jumps: 4,

            obstacle_padding: 6.0,
            obstacle_cull_x: -60.0,
            spawn_gap_start: 80,
            spawn_gap_min: 60,
            spawn_gap_distance_step: 600.0,
            spawn_skip_chance: 0.35,
            pair_threshold: 0.82,
            pair_min_distance: 600.0,
            pair_offset: 100.0,
            tall_threshold: 0.55,

            item_cull_x: -20.0,
            collectible_interval: 110,
            key_threshold: 0.92,
            box_threshold: 0.62,
            collectible_speed: 0.9,

            powerup_interval: 550,
            powerup_threshold: 0.45,
            powerup_min_distance: 400.0,
            powerup_speed: 0.85,
            shield_duration: 300.0,
            magnet_duration: 480.0,
            slow_duration: 360.0,
            buff_refresh: BuffRefresh::Refresh,
            magnet_radius: 220.0,
            magnet_pull: 0.07,

            combo_window: 120.0,
            combo_tiers: vec![
                ComboTier { at: 2, multiplier: 2 },
                ComboTier { at: 5, multiplier: 3 },
                ComboTier { at: 10, multiplier: 5 },
            ],
            near_miss_bonus: 50,
            near_miss_vertical: 18.0,
            near_miss_horizontal: 14.0,
            score_divisor: 10.0,
            milestone_step: 500,

            death_delay: 14.0,
        }
    }
}

impl Tuning {
    /// Parse a tuning table; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut tuning: Self = serde_json::from_str(json)?;
        tuning.combo_tiers.sort_by_key(|t| t.at);
        Ok(tuning)
    }

    /// Load a tuning file, falling back to defaults if it is missing or malformed
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("Invalid tuning file {}: {}", path.display(), err);
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Could not read tuning file {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    /// Upward velocity for the `number`-th jump of a chain (1-based)
    pub fn jump_velocity(&self, number: u8) -> f32 {
        let idx = usize::from(number.max(1) - 1);
        let fraction = self
            .jump_fractions
            .get(idx)
            .or(self.jump_fractions.last())
            .copied()
            .unwrap_or(1.0);
        self.jump_strength * fraction
    }

    /// Frames between obstacle spawns at the given distance
    pub fn spawn_gap(&self, distance: f32) -> u64 {
        let step = self.spawn_gap_distance_step.max(1.0);
        let shave = (distance.max(0.0) / step).floor() as u64;
        self.spawn_gap_start
            .saturating_sub(shave)
            .max(self.spawn_gap_min)
    }

    /// Full duration of a buff
    pub fn buff_duration(&self, kind: crate::sim::PowerUpKind) -> f32 {
        use crate::sim::PowerUpKind;
        match kind {
            PowerUpKind::Shield => self.shield_duration,
            PowerUpKind::Magnet => self.magnet_duration,
            PowerUpKind::Slow => self.slow_duration,
        }
    }
}
