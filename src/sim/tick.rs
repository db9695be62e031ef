//! Per-frame simulation step
//!
//! Advances the run by one variable-length frame. The host samples input once,
//! hands it in as a `TickInput`, and reads back the frame's events.

use glam::Vec2;

use super::effects::colors;
use super::state::{GameEvent, GameState, ParticleKind, RunPhase};
use super::{autopilot, lifecycle, physics, spawn};
use crate::consts::MAX_DELTA;

/// Pause request for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PauseCommand {
    #[default]
    None,
    Toggle,
    Pause,
    Resume,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump pressed since the last frame
    pub jump: bool,
    pub pause: PauseCommand,
    /// Start a run (restart if one is already going)
    pub start: bool,
    /// Abandon the run
    pub quit: bool,
    /// Idle/demo mode - autopilot presses jump
    pub idle_mode: bool,
}

/// Advance the game state by one frame of `delta` reference frames
pub fn tick(state: &mut GameState, input: &TickInput, delta: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let delta = if delta.is_finite() {
        delta.clamp(0.0, MAX_DELTA)
    } else {
        0.0
    };

    if input.start {
        lifecycle::start(state, &mut events);
    }
    if input.quit {
        lifecycle::quit(state, &mut events);
    }
    match input.pause {
        PauseCommand::None => {}
        PauseCommand::Toggle => {
            lifecycle::toggle_pause(state, &mut events);
        }
        PauseCommand::Pause => {
            lifecycle::pause(state, &mut events);
        }
        PauseCommand::Resume => {
            lifecycle::resume(state, &mut events);
        }
    }

    match state.phase {
        RunPhase::Running => step_running(state, input, delta, &mut events),
        RunPhase::Dying => lifecycle::update_dying(state, delta, &mut events),
        RunPhase::Idle | RunPhase::Paused | RunPhase::GameOver => {}
    }

    events
}

fn step_running(state: &mut GameState, input: &TickInput, delta: f32, events: &mut Vec<GameEvent>) {
    state.frames += 1;
    state.distance += state.speed * state.slow_multiplier() * delta;
    state.speed += state.tuning.speed_growth * delta;
    check_milestones(state, events);

    if input.jump || (input.idle_mode && autopilot::should_jump(state)) {
        physics::jump(state, events);
    }
    physics::integrate_player(state, delta);
    update_timers(state, delta, events);
    spawn::spawn_entities(state);

    if physics::resolve_obstacles(state, delta, events) {
        lifecycle::enter_dying(state, events);
    } else {
        physics::resolve_collectibles(state, delta, events);
        physics::resolve_powerups(state, delta, events);
    }

    state.effects.update(delta, state.viewport.width);
}

/// Celebrate every `milestone_step` distance points
fn check_milestones(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let step = state.tuning.milestone_step.max(1);
    while state.distance_score() >= state.milestone_next {
        let score = state.milestone_next;
        state.milestone_next += step;

        let anchor = Vec2::new(state.viewport.width / 2.0, state.viewport.height / 3.0);
        state.effects.add_popup(
            Vec2::new(anchor.x - 60.0, anchor.y),
            format!("{} GUBS!", state.distance_score()),
            colors::MILESTONE,
            26.0,
        );
        state
            .effects
            .spawn_particles(anchor, colors::MILESTONE, 14, ParticleKind::Sparkle);
        log::debug!("Milestone {score}");
        events.push(GameEvent::Milestone { score });
    }
}

/// Buff countdowns and the combo window
fn update_timers(state: &mut GameState, delta: f32, events: &mut Vec<GameEvent>) {
    for kind in state.player.buffs.update(delta) {
        events.push(GameEvent::BuffExpired { kind });
    }
    if let Some(count) = state.combo.update(delta) {
        events.push(GameEvent::ComboLost { count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, ObstacleKind, PowerUpKind};
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn running(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        lifecycle::start(&mut state, &mut Vec::new());
        state
    }

    fn idle_input() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_idle_state_does_not_advance() {
        let mut state = GameState::new(1, Tuning::default());
        let events = tick(&mut state, &idle_input(), 1.0);
        assert!(events.is_empty());
        assert_eq!(state.frames, 0);
        assert_eq!(state.distance, 0.0);
    }

    #[test]
    fn test_running_advances_distance_and_speed() {
        let mut state = running(1);
        tick(&mut state, &idle_input(), 1.0);
        assert_eq!(state.frames, 1);
        assert!((state.distance - 2.5).abs() < 1e-5);
        assert!((state.speed - 2.50012).abs() < 1e-5);
    }

    #[test]
    fn test_slow_buff_scales_distance() {
        let mut state = running(1);
        state.player.buffs.slow.remaining = 100.0;
        tick(&mut state, &idle_input(), 1.0);
        assert!((state.distance - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_paused_state_is_frozen() {
        let mut state = running(1);
        tick(&mut state, &idle_input(), 1.0);
        let events = tick(
            &mut state,
            &TickInput {
                pause: PauseCommand::Pause,
                ..Default::default()
            },
            1.0,
        );
        assert_eq!(events, vec![GameEvent::Paused]);
        let frames = state.frames;
        let distance = state.distance;
        // Jump while paused is dropped
        tick(
            &mut state,
            &TickInput {
                jump: true,
                ..Default::default()
            },
            1.0,
        );
        assert_eq!(state.frames, frames);
        assert_eq!(state.distance, distance);
        assert!(!state.player.jumping);
    }

    #[test]
    fn test_jump_only_while_running() {
        let mut state = GameState::new(1, Tuning::default());
        let events = tick(
            &mut state,
            &TickInput {
                jump: true,
                ..Default::default()
            },
            1.0,
        );
        assert!(events.is_empty());
        assert_eq!(state.player.jumps_left, state.player.max_jumps);
    }

    #[test]
    fn test_milestone_every_step() {
        let mut state = running(1);
        state.distance = 4990.0;
        let events = tick(&mut state, &idle_input(), 4.0);
        assert!(events.contains(&GameEvent::Milestone { score: 500 }));
        assert_eq!(state.milestone_next, 1000);
        let again = tick(&mut state, &idle_input(), 1.0);
        assert!(!again.iter().any(|e| matches!(e, GameEvent::Milestone { .. })));
    }

    #[test]
    fn test_fatal_hit_then_game_over_after_delay() {
        let mut state = running(1);
        let ground = state.ground();
        let x = state.player.pos.x + 20.0;
        state.obstacles.push(Obstacle {
            pos: Vec2::new(x, ground - 40.0),
            size: Vec2::new(30.0, 40.0),
            kind: ObstacleKind::Low,
            passed: false,
        });
        let events = tick(&mut state, &idle_input(), 1.0);
        assert!(events.contains(&GameEvent::Death));
        assert_eq!(state.phase, RunPhase::Dying);
        let frozen = state.obstacles[0].pos;
        let score = state.score();

        let mut overs = 0;
        for _ in 0..20 {
            let events = tick(&mut state, &idle_input(), 1.0);
            overs += events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                .count();
            assert_eq!(state.obstacles[0].pos, frozen);
            assert_eq!(state.score(), score);
        }
        assert_eq!(overs, 1);
        assert_eq!(state.phase, RunPhase::GameOver);
    }

    #[test]
    fn test_milestone_popup_shows_current_score() {
        let mut state = running(1);
        state.distance = 5020.0;
        // 5020 + 2.5 * 4 = 5030 distance, 503 points: crosses the 500 threshold
        let events = tick(&mut state, &idle_input(), 4.0);
        assert!(events.contains(&GameEvent::Milestone { score: 500 }));
        assert_eq!(state.effects.popups.len(), 1);
        assert_eq!(state.effects.popups[0].text, "503 GUBS!");
        assert_eq!(state.milestone_next, 1000);
    }

    #[test]
    fn test_dying_freezes_airborne_player() {
        let mut state = running(1);
        let ground = state.ground();
        state.player.jumping = true;
        state.player.vy = 5.0;
        state.player.pos.y -= 100.0;
        let x = state.player.pos.x + 20.0;
        // Tall enough to catch the player in mid-air
        state.obstacles.push(Obstacle {
            pos: Vec2::new(x, ground - 160.0),
            size: Vec2::new(30.0, 160.0),
            kind: ObstacleKind::Tall,
            passed: false,
        });
        tick(&mut state, &idle_input(), 1.0);
        assert_eq!(state.phase, RunPhase::Dying);
        let pos = state.player.pos;
        let vy = state.player.vy;
        assert!(vy != 0.0);

        for _ in 0..20 {
            tick(&mut state, &idle_input(), 1.0);
            assert_eq!(state.player.pos, pos);
            assert_eq!(state.player.vy, vy);
        }
        assert_eq!(state.phase, RunPhase::GameOver);
    }

    #[test]
    fn test_resize_mid_run_keeps_obstacles_grounded() {
        let mut state = running(1);
        let ground = state.ground();
        state.obstacles.push(Obstacle {
            pos: Vec2::new(400.0, ground - 40.0),
            size: Vec2::new(30.0, 40.0),
            kind: ObstacleKind::Low,
            passed: false,
        });
        state.set_viewport(800.0, 600.0);
        let ground = state.ground();
        assert_eq!(state.obstacles[0].pos.y, ground - 40.0);
        assert_eq!(state.player.pos.y, ground - state.player.size.y);

        let mut died = false;
        for _ in 0..200 {
            let events = tick(&mut state, &idle_input(), 1.0);
            if events.contains(&GameEvent::Death) {
                died = true;
                break;
            }
        }
        assert!(died, "walked through a grounded obstacle after resize");
    }

    #[test]
    fn test_shield_then_death() {
        let mut state = running(1);
        state.player.buffs.shield.remaining = 300.0;
        let ground = state.ground();
        let x = state.player.pos.x + 20.0;
        for _ in 0..2 {
            state.obstacles.push(Obstacle {
                pos: Vec2::new(x, ground - 40.0),
                size: Vec2::new(30.0, 40.0),
                kind: ObstacleKind::Low,
                passed: false,
            });
        }
        let events = tick(&mut state, &idle_input(), 1.0);
        assert!(events.contains(&GameEvent::ShieldBreak));
        assert!(events.contains(&GameEvent::Death));
        assert_eq!(state.phase, RunPhase::Dying);
    }

    #[test]
    fn test_buff_expiry_event() {
        let mut state = running(1);
        state.player.buffs.magnet.remaining = 0.5;
        let events = tick(&mut state, &idle_input(), 1.0);
        assert!(events.contains(&GameEvent::BuffExpired {
            kind: PowerUpKind::Magnet
        }));
    }

    #[test]
    fn test_non_finite_delta_is_inert() {
        let mut state = running(1);
        tick(&mut state, &idle_input(), f32::NAN);
        assert_eq!(state.distance, 0.0);
    }

    proptest! {
        #[test]
        fn prop_score_non_decreasing(
            seed in any::<u64>(),
            frames in proptest::collection::vec((any::<bool>(), 0.0f32..4.0), 1..300),
        ) {
            let mut state = running(seed);
            let mut last = state.score();
            for (jump, delta) in frames {
                tick(&mut state, &TickInput { jump, ..Default::default() }, delta);
                let score = state.score();
                prop_assert!(score >= last);
                last = score;
                prop_assert!(state.player.jumps_left <= state.player.max_jumps);
            }
        }
    }
}
