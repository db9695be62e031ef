//! Cosmetic effects: particles, score popups, screen shake, landing flash, clouds
//!
//! Nothing here feeds back into gameplay. The subsystem owns its own RNG so
//! toggling effects in settings never changes what the spawner rolls.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{Particle, ParticleKind, ScorePopup};
use crate::consts::{CLOUD_COUNT, DEFAULT_VIEWPORT_WIDTH};
use crate::decay;

/// RGBA colors used by gameplay feedback
pub mod colors {
    pub const DUST: u32 = 0xa0a0a080;
    pub const LANDING_DUST: u32 = 0xa0a0a066;
    pub const JUMP_2: u32 = 0x64c8ff80;
    pub const JUMP_3: u32 = 0xc864ff99;
    pub const JUMP_4: u32 = 0xffd700b3;
    pub const SHIELD: u32 = 0xfbbf24ff;
    pub const DEATH: u32 = 0xef4444ff;
    pub const WHITE: u32 = 0xffffffff;
    pub const NEAR_MISS: u32 = 0xf59e0bff;
    pub const MILESTONE: u32 = 0x10b981ff;
}

/// Default particle budget when no settings have been applied
pub const DEFAULT_MAX_PARTICLES: usize = 400;

/// Shake below this intensity snaps to zero
const SHAKE_FLOOR: f32 = 0.5;

/// Screen shake state
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Shake {
    pub intensity: f32,
    /// Offset the renderer applies this frame
    pub offset: Vec2,
}

/// A background cloud drifting slower than the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    /// Center-left anchor
    pub pos: Vec2,
    pub size: Vec2,
    pub speed: f32,
}

/// All cosmetic state of a run
#[derive(Debug, Clone)]
pub struct Effects {
    pub particles: Vec<Particle>,
    pub popups: Vec<ScorePopup>,
    pub shake: Shake,
    /// Flash under the player on landing (0-1)
    pub landing_flash: f32,
    pub clouds: Vec<Cloud>,
    pub max_particles: usize,
    pub shake_enabled: bool,
    pub clouds_enabled: bool,
    rng: Pcg32,
}

impl Effects {
    pub fn new(seed: u64) -> Self {
        let mut fx = Self {
            particles: Vec::with_capacity(DEFAULT_MAX_PARTICLES),
            popups: Vec::with_capacity(16),
            shake: Shake::default(),
            landing_flash: 0.0,
            clouds: Vec::with_capacity(CLOUD_COUNT),
            max_particles: DEFAULT_MAX_PARTICLES,
            shake_enabled: true,
            clouds_enabled: true,
            rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
        };
        fx.seed_clouds(DEFAULT_VIEWPORT_WIDTH);
        fx
    }

    /// Drop everything transient from the previous run
    pub fn reset(&mut self, viewport_width: f32) {
        self.particles.clear();
        self.popups.clear();
        self.shake = Shake::default();
        self.landing_flash = 0.0;
        self.seed_clouds(viewport_width);
    }

    /// Scatter a fresh cloud layer
    pub fn seed_clouds(&mut self, viewport_width: f32) {
        self.clouds.clear();
        let span = viewport_width.max(2000.0);
        for _ in 0..CLOUD_COUNT {
            let cloud = Cloud {
                pos: Vec2::new(
                    self.rng.random::<f32>() * span,
                    25.0 + self.rng.random::<f32>() * 100.0,
                ),
                size: Vec2::new(
                    60.0 + self.rng.random::<f32>() * 100.0,
                    18.0 + self.rng.random::<f32>() * 25.0,
                ),
                speed: 0.1 + self.rng.random::<f32>() * 0.3,
            };
            self.clouds.push(cloud);
        }
    }

    /// Emit a burst of particles at `pos`
    pub fn spawn_particles(&mut self, pos: Vec2, color: u32, count: usize, kind: ParticleKind) {
        if self.max_particles == 0 {
            return;
        }
        let spread = if kind == ParticleKind::Explosion { 8.0 } else { 4.0 };
        let lift = if kind == ParticleKind::Dust { 2.0 } else { 0.0 };
        for _ in 0..count {
            let vel = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * spread,
                (self.rng.random::<f32>() - 0.5) * spread - lift,
            );
            let size = match kind {
                ParticleKind::Explosion => 3.0 + self.rng.random::<f32>() * 5.0,
                ParticleKind::Sparkle => 2.0 + self.rng.random::<f32>() * 3.0,
                ParticleKind::Dust => 3.0,
            };
            self.particles.push(Particle {
                pos,
                vel,
                color,
                life: 1.0,
                size,
                kind,
            });
        }
        self.enforce_particle_cap();
    }

    /// Trim the oldest particles down to the budget
    pub fn enforce_particle_cap(&mut self) {
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// Float a line of text up from `pos`
    pub fn add_popup(&mut self, pos: Vec2, text: impl Into<String>, color: u32, size: f32) {
        self.popups.push(ScorePopup {
            pos,
            life: 1.0,
            text: text.into(),
            color,
            size,
        });
    }

    /// Kick the camera; a new trigger replaces the current intensity
    pub fn trigger_shake(&mut self, intensity: f32) {
        if self.shake_enabled {
            self.shake.intensity = intensity;
        }
    }

    pub fn flash_landing(&mut self) {
        self.landing_flash = 0.7;
    }

    /// Advance every cosmetic element by one frame
    pub fn update(&mut self, delta: f32, viewport_width: f32) {
        self.update_particles(delta);
        self.update_popups(delta);
        self.update_shake(delta);

        if self.landing_flash > 0.0 {
            self.landing_flash = (self.landing_flash - 0.08 * delta).max(0.0);
        }

        if self.clouds_enabled {
            self.update_clouds(delta, viewport_width);
        }
    }

    fn update_particles(&mut self, delta: f32) {
        for p in &mut self.particles {
            p.pos += p.vel * delta;
            p.life -= 0.03 * delta;
            match p.kind {
                ParticleKind::Dust => {
                    p.vel.y -= 0.15 * delta;
                    p.vel.x *= decay(0.95, delta);
                }
                ParticleKind::Explosion => {
                    p.vel.y += 0.15 * delta;
                    p.vel.x *= decay(0.97, delta);
                }
                ParticleKind::Sparkle => {
                    p.vel.y += 0.08 * delta;
                }
            }
        }
        self.particles.retain(|p| p.life > 0.0);
    }

    fn update_popups(&mut self, delta: f32) {
        for popup in &mut self.popups {
            popup.pos.y -= 1.2 * delta;
            popup.life -= 0.02 * delta;
        }
        self.popups.retain(|p| p.life > 0.0);
    }

    fn update_shake(&mut self, delta: f32) {
        let shake = &mut self.shake;
        if shake.intensity > SHAKE_FLOOR {
            shake.offset = Vec2::new(
                (self.rng.random::<f32>() - 0.5) * shake.intensity,
                (self.rng.random::<f32>() - 0.5) * shake.intensity,
            );
            shake.intensity *= decay(0.85, delta);
        } else {
            *shake = Shake::default();
        }
    }

    fn update_clouds(&mut self, delta: f32, viewport_width: f32) {
        for cloud in &mut self.clouds {
            cloud.pos.x -= cloud.speed * delta;
            if cloud.pos.x + cloud.size.x < 0.0 {
                cloud.pos.x = viewport_width + self.rng.random::<f32>() * 200.0;
                cloud.pos.y = 20.0 + self.rng.random::<f32>() * 100.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particles_decay_and_die() {
        let mut fx = Effects::new(7);
        fx.spawn_particles(Vec2::new(100.0, 100.0), colors::DUST, 5, ParticleKind::Dust);
        assert_eq!(fx.particles.len(), 5);

        // life drops 0.03 per frame: gone after ~34 frames
        for _ in 0..33 {
            fx.update(1.0, 800.0);
        }
        assert_eq!(fx.particles.len(), 5);
        fx.update(1.0, 800.0);
        assert!(fx.particles.is_empty());
    }

    #[test]
    fn test_motion_profiles() {
        let mut fx = Effects::new(7);
        fx.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.0),
            color: colors::DUST,
            life: 1.0,
            size: 3.0,
            kind: ParticleKind::Dust,
        });
        fx.particles.push(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, 0.0),
            color: colors::DEATH,
            life: 1.0,
            size: 3.0,
            kind: ParticleKind::Explosion,
        });
        fx.update(1.0, 800.0);
        let dust = &fx.particles[0];
        let boom = &fx.particles[1];
        assert!(dust.vel.y < 0.0, "dust drifts up");
        assert!(boom.vel.y > 0.0, "explosion falls");
        assert!((dust.vel.x - 0.95).abs() < 1e-5);
        assert!((boom.vel.x - 0.97).abs() < 1e-5);
    }

    #[test]
    fn test_particle_cap() {
        let mut fx = Effects::new(7);
        fx.max_particles = 10;
        fx.spawn_particles(Vec2::ZERO, colors::WHITE, 25, ParticleKind::Sparkle);
        assert_eq!(fx.particles.len(), 10);

        fx.max_particles = 0;
        fx.enforce_particle_cap();
        fx.spawn_particles(Vec2::ZERO, colors::WHITE, 25, ParticleKind::Sparkle);
        assert!(fx.particles.is_empty());
    }

    #[test]
    fn test_popup_rises_and_fades() {
        let mut fx = Effects::new(7);
        fx.add_popup(Vec2::new(10.0, 100.0), "+100", 0x06b6d4ff, 16.0);
        fx.update(1.0, 800.0);
        assert!((fx.popups[0].pos.y - 98.8).abs() < 1e-4);
        for _ in 0..60 {
            fx.update(1.0, 800.0);
        }
        assert!(fx.popups.is_empty());
    }

    #[test]
    fn test_shake_decays_geometrically_then_snaps() {
        let mut fx = Effects::new(7);
        fx.trigger_shake(16.0);
        fx.update(1.0, 800.0);
        assert!((fx.shake.intensity - 13.6).abs() < 1e-4);
        assert!(fx.shake.offset.x.abs() <= 8.0);
        for _ in 0..40 {
            fx.update(1.0, 800.0);
        }
        assert_eq!(fx.shake, Shake::default());
    }

    #[test]
    fn test_shake_disabled() {
        let mut fx = Effects::new(7);
        fx.shake_enabled = false;
        fx.trigger_shake(16.0);
        assert_eq!(fx.shake.intensity, 0.0);
    }

    #[test]
    fn test_clouds_wrap() {
        let mut fx = Effects::new(7);
        fx.clouds[0].pos.x = -fx.clouds[0].size.x - 1.0;
        fx.update(1.0, 800.0);
        assert!(fx.clouds[0].pos.x >= 800.0);
    }

    #[test]
    fn test_reset_clears_transients() {
        let mut fx = Effects::new(7);
        fx.spawn_particles(Vec2::ZERO, colors::WHITE, 5, ParticleKind::Sparkle);
        fx.add_popup(Vec2::ZERO, "x", colors::WHITE, 10.0);
        fx.trigger_shake(6.0);
        fx.flash_landing();
        fx.reset(800.0);
        assert!(fx.particles.is_empty());
        assert!(fx.popups.is_empty());
        assert_eq!(fx.shake.intensity, 0.0);
        assert_eq!(fx.landing_flash, 0.0);
        assert_eq!(fx.clouds.len(), CLOUD_COUNT);
    }
}
