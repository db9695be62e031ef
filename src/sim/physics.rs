//! Player motion and per-category collision resolution

use glam::Vec2;

use super::collision::{has_cleared, is_near_miss, magnet_pull, overlaps_padded};
use super::combo::multiplier;
use super::effects::colors;
use super::state::{GameEvent, GameState, ParticleKind};
use crate::approach;

/// Squash/stretch recovery per reference frame
const SCALE_RELAX: f32 = 0.12;

/// Try to jump. A request with no jumps left does nothing.
pub fn jump(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    let player = &mut state.player;
    if player.jumps_left == 0 {
        return false;
    }

    let number = player.max_jumps.saturating_sub(player.jumps_left) + 1;
    player.vy = state.tuning.jump_velocity(number);
    player.jumping = true;
    player.jumps_left -= 1;
    player.scale = Vec2::new(0.75, 1.3);

    let feet = Vec2::new(player.pos.x + player.size.x / 2.0, player.pos.y + player.size.y);
    let center = player.center();
    let dust = if number == 1 { 8 } else { 12 };
    state.effects.spawn_particles(feet, colors::DUST, dust, ParticleKind::Dust);

    let sparkle = match number {
        1 => None,
        2 => Some((colors::JUMP_2, 6)),
        3 => Some((colors::JUMP_3, 8)),
        _ => Some((colors::JUMP_4, 10)),
    };
    if let Some((color, count)) = sparkle {
        state.effects.spawn_particles(center, color, count, ParticleKind::Sparkle);
    }

    events.push(GameEvent::Jump { number });
    true
}

/// Gravity, ground contact, squash/stretch relaxation and trail
pub fn integrate_player(state: &mut GameState, delta: f32) {
    let ground = state.ground();
    let player = &mut state.player;

    // Semi-implicit Euler: velocity first, then position with the new velocity
    player.vy -= state.tuning.gravity * delta;
    player.pos.y -= player.vy * delta;

    let floor = ground - player.size.y;
    if player.pos.y >= floor {
        if player.jumping {
            player.scale = Vec2::new(1.25, 0.75);
            state.effects.flash_landing();
            let feet = Vec2::new(player.pos.x + player.size.x / 2.0, ground);
            state.effects.spawn_particles(feet, colors::LANDING_DUST, 5, ParticleKind::Dust);
        }
        player.pos.y = floor;
        player.vy = 0.0;
        player.jumping = false;
        player.jumps_left = player.max_jumps;
    }

    player.scale.x = approach(player.scale.x, 1.0, SCALE_RELAX, delta);
    player.scale.y = approach(player.scale.y, 1.0, SCALE_RELAX, delta);

    if player.jumping && state.trails_enabled {
        player.record_trail();
    } else {
        player.fade_trail(delta);
    }
}

/// Scroll obstacles, resolve hits and near misses, cull off-screen ones.
///
/// Returns true on a fatal hit; obstacles after the fatal one are left untouched.
pub fn resolve_obstacles(state: &mut GameState, delta: f32, events: &mut Vec<GameEvent>) -> bool {
    let speed = state.scroll_speed();
    let GameState {
        player,
        obstacles,
        effects,
        tuning,
        stats,
        bonus_score,
        ..
    } = state;
    let player_box = player.bounds();
    let mut fatal = false;

    obstacles.retain_mut(|o| {
        if fatal {
            return true;
        }
        o.pos.x -= speed * delta;
        let b = o.bounds();

        // Gone past the left edge: never collided with again
        if b.right() < tuning.obstacle_cull_x {
            return false;
        }

        if overlaps_padded(&player_box, &b, tuning.obstacle_padding) {
            if player.buffs.shield.is_active() {
                player.buffs.shield.consume();
                effects.spawn_particles(b.center(), colors::SHIELD, 18, ParticleKind::Explosion);
                effects.add_popup(Vec2::new(b.left(), b.top() - 20.0), "BLOCKED!", colors::SHIELD, 20.0);
                effects.trigger_shake(6.0);
                events.push(GameEvent::ShieldBreak);
                return false;
            }
            fatal = true;
            return true;
        }

        if !o.passed && has_cleared(&player_box, &b) {
            o.passed = true;
            if is_near_miss(
                &player_box,
                &b,
                tuning.near_miss_vertical,
                tuning.near_miss_horizontal,
            ) {
                let bonus = tuning.near_miss_bonus;
                *bonus_score += bonus;
                stats.near_misses += 1;
                effects.add_popup(
                    Vec2::new(b.right(), b.top() - 12.0),
                    format!("CLOSE! +{bonus}"),
                    colors::NEAR_MISS,
                    15.0,
                );
                effects.spawn_particles(
                    Vec2::new(b.center().x, b.top()),
                    colors::NEAR_MISS,
                    8,
                    ParticleKind::Sparkle,
                );
                events.push(GameEvent::NearMiss { bonus });
            }
        }
        true
    });

    fatal
}

/// Scroll collectibles, apply the magnet, award pickups, cull
pub fn resolve_collectibles(state: &mut GameState, delta: f32, events: &mut Vec<GameEvent>) {
    let speed = state.scroll_speed() * state.tuning.collectible_speed;
    let GameState {
        player,
        collectibles,
        effects,
        tuning,
        combo,
        stats,
        bonus_score,
        ..
    } = state;
    let magnet = player.buffs.magnet.is_active();
    let player_box = player.bounds();
    let target = player.center();

    collectibles.retain_mut(|c| {
        c.pos.x -= speed * delta;
        if magnet
            && let Some(step) = magnet_pull(
                c.bounds().center(),
                target,
                tuning.magnet_radius,
                tuning.magnet_pull,
                delta,
            )
        {
            c.pos += step;
        }

        let b = c.bounds();
        if overlaps_padded(&player_box, &b, 0.0) {
            let count = combo.register_pickup(tuning.combo_window);
            let mult = multiplier(&tuning.combo_tiers, count);
            let points = c.tier.base_points() * u64::from(mult);
            *bonus_score += points;
            stats.items_collected += 1;

            let color = c.tier.color();
            effects.spawn_particles(b.center(), color, 12, ParticleKind::Sparkle);
            let (text, size) = if mult > 1 {
                (format!("+{points} x{mult}"), 22.0)
            } else {
                (format!("+{points}"), 16.0)
            };
            effects.add_popup(Vec2::new(b.left(), b.top() - 15.0), text, color, size);

            events.push(GameEvent::Pickup {
                tier: c.tier,
                points,
                multiplier: mult,
            });
            if count > 1 {
                events.push(GameEvent::ComboStep { count });
            }
            return false;
        }
        b.right() >= tuning.item_cull_x
    });
}

/// Scroll power-ups, activate buffs on pickup, cull
pub fn resolve_powerups(state: &mut GameState, delta: f32, events: &mut Vec<GameEvent>) {
    let speed = state.scroll_speed() * state.tuning.powerup_speed;
    let GameState {
        player,
        powerups,
        effects,
        tuning,
        ..
    } = state;
    let player_box = player.bounds();

    powerups.retain_mut(|p| {
        p.pos.x -= speed * delta;
        let b = p.bounds();
        if overlaps_padded(&player_box, &b, 0.0) {
            player
                .buffs
                .get_mut(p.kind)
                .activate(tuning.buff_duration(p.kind), tuning.buff_refresh);
            effects.add_popup(Vec2::new(b.left(), b.top() - 20.0), p.kind.label(), p.kind.color(), 22.0);
            effects.spawn_particles(b.center(), colors::WHITE, 20, ParticleKind::Sparkle);
            events.push(GameEvent::PowerUp { kind: p.kind });
            log::debug!("Picked up {:?}", p.kind);
            return false;
        }
        b.right() >= tuning.item_cull_x
    });
}
