//! Run lifecycle: Idle -> Running -> Dying -> GameOver, with Paused beside Running
//!
//! Every transition normalizes invalid requests instead of failing: pausing a
//! run that is not Running does nothing, restarting from Paused resumes first.

use glam::Vec2;

use super::effects::colors;
use super::state::{GameEvent, GameState, ParticleKind, RunPhase};

/// Start a fresh run from any phase. From Running or Dying this is a restart.
pub fn start(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    resume(state, events);
    let from = state.phase;
    state.reset_run();
    state.phase = RunPhase::Running;
    log::info!("Run started (from {:?}, seed {})", from, state.seed);
    events.push(GameEvent::RunStarted);
    true
}

pub fn restart(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    start(state, events)
}

/// Running -> Paused. Anything else is ignored.
pub fn pause(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    if state.phase != RunPhase::Running {
        return false;
    }
    state.phase = RunPhase::Paused;
    log::info!("Paused at distance {:.0}", state.distance);
    events.push(GameEvent::Paused);
    true
}

/// Paused -> Running. Anything else is ignored.
pub fn resume(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    if state.phase != RunPhase::Paused {
        return false;
    }
    state.phase = RunPhase::Running;
    log::info!("Resumed");
    events.push(GameEvent::Resumed);
    true
}

pub fn toggle_pause(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    match state.phase {
        RunPhase::Running => pause(state, events),
        RunPhase::Paused => resume(state, events),
        _ => false,
    }
}

/// Abandon the run and go back to Idle with empty stores
pub fn quit(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    resume(state, events);
    if state.phase == RunPhase::Idle {
        return false;
    }
    log::info!("Quit run at score {}", state.score());
    state.reset_run();
    state.phase = RunPhase::Idle;
    events.push(GameEvent::Quit);
    true
}

/// Fatal hit: burst, shake, and start the death delay
pub fn enter_dying(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.phase = RunPhase::Dying;
    state.death_timer = state.tuning.death_delay;

    let center = state.player.center();
    let head = Vec2::new(center.x, state.player.pos.y);
    state
        .effects
        .spawn_particles(center, colors::DEATH, 35, ParticleKind::Explosion);
    state
        .effects
        .spawn_particles(head, colors::WHITE, 12, ParticleKind::Sparkle);
    state.effects.trigger_shake(16.0);

    log::info!(
        "Fatal hit at distance {:.0}, score {}",
        state.distance,
        state.score()
    );
    events.push(GameEvent::Death);
}

/// Count down the death delay; the world stays frozen, effects keep playing
pub fn update_dying(state: &mut GameState, delta: f32, events: &mut Vec<GameEvent>) {
    state.death_timer -= delta;
    state.effects.update(delta, state.viewport.width);

    if state.death_timer <= 0.0 {
        state.death_timer = 0.0;
        state.phase = RunPhase::GameOver;
        let stats = state.current_stats();
        state.stats = stats;
        log::info!(
            "Game over: score {}, {} items, {} near misses, best combo {}",
            stats.score,
            stats.items_collected,
            stats.near_misses,
            stats.max_combo
        );
        events.push(GameEvent::GameOver { stats });
    }
}
