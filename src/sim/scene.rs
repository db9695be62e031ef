//! Renderer-facing snapshot of a frame
//!
//! Everything a drawing layer needs, with presentation-only math (bob, tilt,
//! HUD ratios) already applied. Serializable so a host can ship it across an
//! FFI or IPC boundary as JSON.

use glam::Vec2;
use serde::Serialize;

use super::combo::{multiplier, next_threshold, tier_progress};
use super::effects::Cloud;
use super::state::{
    CollectibleTier, GameState, ObstacleKind, Particle, PowerUpKind, RunPhase, ScorePopup,
    TrailPoint, Viewport,
};
use crate::consts::{COLLECTIBLE_BOB, POWERUP_BOB};

/// Shield time below which the HUD flashes (frames)
const SHIELD_EXPIRING: f32 = 60.0;
/// Other buffs start flashing a little earlier
const BUFF_EXPIRING: f32 = 90.0;
/// Solid block color drawn when no sprite is set
const PLACEHOLDER_COLOR: u32 = 0x22c55eff;

/// How to draw the runner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum PlayerVisual {
    Sprite(String),
    Placeholder { color: u32 },
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub size: Vec2,
    pub scale: Vec2,
    /// Rotation in radians, nose-up while rising
    pub tilt: f32,
    /// Vertical running bob (pixels)
    pub bob: f32,
    pub visual: PlayerVisual,
    pub trail: Vec<TrailPoint>,
    /// (jumps left, max jumps) while airborne
    pub jump_indicator: Option<(u8, u8)>,
    pub shielded: bool,
    /// Magnet radius to draw around the player
    pub magnet_radius: Option<f32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuffView {
    pub kind: PowerUpKind,
    pub remaining: f32,
    pub expiring: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ObstacleView {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ObstacleKind,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct CollectibleView {
    pub pos: Vec2,
    pub size: Vec2,
    pub tier: CollectibleTier,
}

#[derive(Debug, Clone, Serialize)]
pub struct PowerUpView {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerUpKind,
}

/// Combo HUD, only present while a chain of two or more is alive
#[derive(Debug, Clone, Serialize)]
pub struct ComboView {
    pub count: u32,
    pub multiplier: u32,
    pub timer_fraction: f32,
    pub next_threshold: Option<u32>,
    pub progress: f32,
}

/// One frame, ready to draw
#[derive(Debug, Clone, Serialize)]
pub struct Scene {
    pub phase: RunPhase,
    pub paused: bool,
    pub score: u64,
    pub viewport: Viewport,
    pub ground_y: f32,
    pub player: PlayerView,
    pub buffs: Vec<BuffView>,
    pub obstacles: Vec<ObstacleView>,
    pub collectibles: Vec<CollectibleView>,
    pub powerups: Vec<PowerUpView>,
    pub particles: Vec<Particle>,
    pub popups: Vec<ScorePopup>,
    pub clouds: Vec<Cloud>,
    pub shake_offset: Vec2,
    pub landing_flash: f32,
    pub combo: Option<ComboView>,
    /// 0..=1 progress from start speed toward top speed
    pub speed_progress: f32,
    /// 0..=1 intensity of the speed lines overlay
    pub speed_lines: f32,
    /// Red flash for the first frames after a fatal hit
    pub death_flash: bool,
    /// Blue tint while slow-mo is active
    pub slow_tint: bool,
}

impl Scene {
    pub fn build(state: &GameState) -> Self {
        let time = state.frames as f32 * 0.05;
        let speed = state.speed.min(state.tuning.max_speed);

        Self {
            phase: state.phase,
            paused: state.phase == RunPhase::Paused,
            score: state.score(),
            viewport: state.viewport,
            ground_y: state.ground(),
            player: player_view(state),
            buffs: buff_views(state),
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    pos: o.pos,
                    size: o.size,
                    kind: o.kind,
                    label: o.kind.label(),
                })
                .collect(),
            collectibles: state
                .collectibles
                .iter()
                .map(|c| CollectibleView {
                    pos: c.pos + Vec2::new(0.0, (time + c.bob).sin() * COLLECTIBLE_BOB),
                    size: c.size,
                    tier: c.tier,
                })
                .collect(),
            powerups: state
                .powerups
                .iter()
                .map(|p| PowerUpView {
                    pos: p.pos + Vec2::new(0.0, (time + p.bob).sin() * POWERUP_BOB),
                    size: p.size,
                    kind: p.kind,
                })
                .collect(),
            particles: state.effects.particles.clone(),
            popups: state.effects.popups.clone(),
            clouds: if state.effects.clouds_enabled {
                state.effects.clouds.clone()
            } else {
                Vec::new()
            },
            shake_offset: state.effects.shake.offset,
            landing_flash: state.effects.landing_flash,
            combo: combo_view(state),
            speed_progress: ratio(speed - state.tuning.start_speed, 7.0),
            speed_lines: ratio(speed - 3.5, 5.0),
            death_flash: state.phase == RunPhase::Dying && state.death_timer > 10.0,
            slow_tint: state.player.buffs.slow.is_active(),
        }
    }
}

/// `value / span` clamped to 0..=1, zero for an empty span
fn ratio(value: f32, span: f32) -> f32 {
    if span <= 0.0 {
        return 0.0;
    }
    (value / span).clamp(0.0, 1.0)
}

fn player_view(state: &GameState) -> PlayerView {
    let player = &state.player;
    let airborne = player.jumping;
    let visual = match state.sprite.resolved() {
        Some(src) => PlayerVisual::Sprite(src.to_string()),
        None => PlayerVisual::Placeholder {
            color: PLACEHOLDER_COLOR,
        },
    };

    PlayerView {
        pos: player.pos,
        size: player.size,
        scale: player.scale,
        tilt: if airborne { -player.vy * 0.015 } else { 0.0 },
        bob: if airborne || state.phase != RunPhase::Running {
            0.0
        } else {
            (state.frames as f32 * 0.18).sin() * 2.0
        },
        visual,
        trail: player.trail.clone(),
        jump_indicator: airborne.then_some((player.jumps_left, player.max_jumps)),
        shielded: player.buffs.shield.is_active(),
        magnet_radius: player
            .buffs
            .magnet
            .is_active()
            .then_some(state.tuning.magnet_radius),
    }
}

fn buff_views(state: &GameState) -> Vec<BuffView> {
    PowerUpKind::ALL
        .into_iter()
        .filter_map(|kind| {
            let timer = state.player.buffs.get(kind);
            if !timer.is_active() {
                return None;
            }
            let threshold = match kind {
                PowerUpKind::Shield => SHIELD_EXPIRING,
                _ => BUFF_EXPIRING,
            };
            Some(BuffView {
                kind,
                remaining: timer.remaining,
                expiring: timer.remaining < threshold,
            })
        })
        .collect()
}

fn combo_view(state: &GameState) -> Option<ComboView> {
    let combo = &state.combo;
    if combo.count < 2 {
        return None;
    }
    let tiers = &state.tuning.combo_tiers;
    Some(ComboView {
        count: combo.count,
        multiplier: multiplier(tiers, combo.count),
        timer_fraction: combo.timer_fraction(state.tuning.combo_window),
        next_threshold: next_threshold(tiers, combo.count),
        progress: tier_progress(tiers, combo.count),
    })
}
