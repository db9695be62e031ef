//! Demo-mode jump decisions (attract screen, headless soak runs)

use super::state::GameState;

/// Frames of lead the autopilot leaves before a ground takeoff
const TAKEOFF_LEAD: f32 = 9.0;
/// Horizontal slack added to the takeoff window (pixels)
const TAKEOFF_SLACK: f32 = 6.0;
/// Frames ahead an airborne player looks before spending another jump
const AIR_LOOKAHEAD: f32 = 6.0;

/// Should the autopilot press jump this frame?
pub fn should_jump(state: &GameState) -> bool {
    let player = state.player.bounds();
    let speed = state.scroll_speed().max(0.1);

    // Closest obstacle that has not yet fully passed the player
    let Some(threat) = state
        .obstacles
        .iter()
        .map(|o| o.bounds())
        .filter(|b| b.right() >= player.left())
        .min_by(|a, b| a.left().total_cmp(&b.left()))
    else {
        return false;
    };
    let gap = threat.left() - player.right();

    if state.is_grounded() {
        return gap <= speed * TAKEOFF_LEAD + TAKEOFF_SLACK;
    }

    // Falling onto it: burn an air jump
    state.player.vy < 0.0
        && state.player.jumps_left > 0
        && gap < speed * AIR_LOOKAHEAD
        && player.bottom() > threat.top() - 12.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, ObstacleKind};
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn state_with_obstacle(x: f32) -> GameState {
        let mut state = GameState::new(1, Tuning::default());
        state.reset_run();
        let ground = state.ground();
        state.obstacles.push(Obstacle {
            pos: Vec2::new(x, ground - 40.0),
            size: Vec2::new(30.0, 40.0),
            kind: ObstacleKind::Tall,
            passed: false,
        });
        state
    }

    #[test]
    fn test_idle_on_empty_track() {
        let mut state = GameState::new(1, Tuning::default());
        state.reset_run();
        assert!(!should_jump(&state));
    }

    #[test]
    fn test_waits_for_far_obstacle() {
        let state = state_with_obstacle(600.0);
        assert!(!should_jump(&state));
    }

    #[test]
    fn test_jumps_near_obstacle() {
        // Player right edge is at 128; 2.5 * 9 + 6 = 28.5 px window
        let state = state_with_obstacle(150.0);
        assert!(should_jump(&state));
    }

    #[test]
    fn test_ignores_passed_obstacle() {
        let state = state_with_obstacle(10.0);
        assert!(!should_jump(&state));
    }
}
