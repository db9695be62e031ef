//! Frame-driven spawning of obstacles, collectibles and power-ups
//!
//! No scheduler: each Running frame asks "is anything due?" from the frame
//! counter and the distance travelled.

use glam::Vec2;
use rand::Rng;

use super::state::{
    Collectible, CollectibleTier, GameState, Obstacle, ObstacleKind, PowerUp, PowerUpKind,
};
use crate::consts::{COLLECTIBLE_SIZE, POWERUP_SIZE};

/// Run every spawner once for the current frame
pub fn spawn_entities(state: &mut GameState) {
    spawn_obstacles(state);
    spawn_collectible(state);
    spawn_powerup(state);
}

/// Obstacle spawner: shrinking gap, random skips, occasional paired pattern
pub fn spawn_obstacles(state: &mut GameState) {
    let gap = state.tuning.spawn_gap(state.distance);
    if state.frames.saturating_sub(state.last_spawn_frame) < gap {
        return;
    }
    if state.rng.random::<f32>() <= state.tuning.spawn_skip_chance {
        return;
    }
    state.last_spawn_frame = state.frames;

    let x = state.viewport.width;
    let ground = state.ground();
    let roll = state.rng.random::<f32>();
    let t = &state.tuning;

    if roll > t.pair_threshold && state.distance > t.pair_min_distance {
        // Two low blocks back to back: clearing both takes a chain of jumps
        let height = 30.0 + state.rng.random::<f32>() * 8.0;
        let offset = t.pair_offset;
        for dx in [0.0, offset] {
            state.obstacles.push(obstacle(ObstacleKind::Low, x + dx, ground, 28.0, height));
        }
        log::debug!("Spawned obstacle pair at frame {}", state.frames);
    } else if roll > t.tall_threshold {
        let height = 48.0 + state.rng.random::<f32>() * 20.0;
        state.obstacles.push(obstacle(ObstacleKind::Tall, x, ground, 26.0, height));
    } else {
        let (kind, height) = if state.rng.random_bool(0.5) {
            (ObstacleKind::Low, 28.0 + state.rng.random::<f32>() * 10.0)
        } else {
            (ObstacleKind::Tall, 38.0 + state.rng.random::<f32>() * 12.0)
        };
        state.obstacles.push(obstacle(kind, x, ground, 30.0, height));
    }
}

fn obstacle(kind: ObstacleKind, x: f32, ground: f32, width: f32, height: f32) -> Obstacle {
    Obstacle {
        pos: Vec2::new(x, ground - height),
        size: Vec2::new(width, height),
        kind,
        passed: false,
    }
}

/// Collectible spawner: fixed cadence, weighted tier
pub fn spawn_collectible(state: &mut GameState) {
    let interval = state.tuning.collectible_interval.max(1);
    if state.frames % interval != 0 {
        return;
    }
    let roll = state.rng.random::<f32>();
    let tier = if roll > state.tuning.key_threshold {
        CollectibleTier::Key
    } else if roll > state.tuning.box_threshold {
        CollectibleTier::Box
    } else {
        CollectibleTier::Gem
    };
    let y = state.ground() - 80.0 - state.rng.random::<f32>() * 80.0;
    let bob = state.rng.random::<f32>() * std::f32::consts::TAU;
    state.collectibles.push(Collectible {
        pos: Vec2::new(state.viewport.width, y),
        size: Vec2::splat(COLLECTIBLE_SIZE),
        tier,
        bob,
    });
}

/// Power-up spawner: long cadence, distance gate, coin flip, uniform kind
pub fn spawn_powerup(state: &mut GameState) {
    let interval = state.tuning.powerup_interval.max(1);
    if state.frames % interval != 0 {
        return;
    }
    if state.rng.random::<f32>() <= state.tuning.powerup_threshold
        || state.distance <= state.tuning.powerup_min_distance
    {
        return;
    }
    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let y = state.ground() - 100.0 - state.rng.random::<f32>() * 50.0;
    let bob = state.rng.random::<f32>() * std::f32::consts::TAU;
    log::debug!("Spawned {:?} power-up at frame {}", kind, state.frames);
    state.powerups.push(PowerUp {
        pos: Vec2::new(state.viewport.width, y),
        size: Vec2::splat(POWERUP_SIZE),
        kind,
        bob,
    });
}
