//! Game state and core simulation types
//!
//! Everything a run owns lives in `GameState`. The host only writes `TickInput`
//! and reads the score, phase, events and `Scene`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::combo::{Buffs, Combo};
use super::effects::Effects;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Not started
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Running, suspended by the player
    Paused,
    /// Fatal hit taken, waiting out the death delay
    Dying,
    /// Run ended, host notified
    GameOver,
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Short and low ("RUG")
    Low,
    /// Tall ("REKT")
    Tall,
}

impl ObstacleKind {
    pub fn label(&self) -> &'static str {
        match self {
            ObstacleKind::Low => "RUG",
            ObstacleKind::Tall => "REKT",
        }
    }
}

/// Collectible value tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleTier {
    Gem,
    Box,
    Key,
}

impl CollectibleTier {
    /// Points before the combo multiplier
    pub fn base_points(&self) -> u64 {
        match self {
            CollectibleTier::Gem => 100,
            CollectibleTier::Box => 500,
            CollectibleTier::Key => 1000,
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            CollectibleTier::Gem => 0x06b6d4ff,
            CollectibleTier::Box => 0x8b5cf6ff,
            CollectibleTier::Key => 0xeab308ff,
        }
    }
}

/// Buff kinds carried by power-ups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Shield,
    Magnet,
    Slow,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Shield, PowerUpKind::Magnet, PowerUpKind::Slow];

    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Shield => "SHIELD!",
            PowerUpKind::Magnet => "MAGNET!",
            PowerUpKind::Slow => "SLOW-MO!",
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            PowerUpKind::Shield => 0xfbbf24ff,
            PowerUpKind::Magnet => 0xa855f7ff,
            PowerUpKind::Slow => 0x3b82f6ff,
        }
    }
}

/// Particle motion profiles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Slows down and drifts upward
    Dust,
    /// Falls and loses horizontal speed
    Explosion,
    /// Mild downward drift
    Sparkle,
}

/// Trail ghost behind the player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    pub pos: Vec2,
    pub alpha: f32,
}

/// The runner
#[derive(Debug, Clone)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Vertical velocity, positive is up
    pub vy: f32,
    pub jumps_left: u8,
    pub max_jumps: u8,
    pub jumping: bool,
    /// Squash/stretch, relaxes toward (1, 1)
    pub scale: Vec2,
    /// Newest first, at most `TRAIL_LENGTH`
    pub trail: Vec<TrailPoint>,
    pub buffs: Buffs,
}

impl Player {
    pub fn new(ground: f32, max_jumps: u8) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, ground - PLAYER_SIZE),
            size: Vec2::splat(PLAYER_SIZE),
            vy: 0.0,
            jumps_left: max_jumps,
            max_jumps,
            jumping: false,
            scale: Vec2::ONE,
            trail: Vec::with_capacity(TRAIL_LENGTH + 1),
            buffs: Buffs::default(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Record current position to trail (call each frame while airborne)
    pub fn record_trail(&mut self) {
        self.trail.insert(0, TrailPoint { pos: self.pos, alpha: 0.5 });
        self.trail.truncate(TRAIL_LENGTH);
    }

    /// Fade the trail out once grounded
    pub fn fade_trail(&mut self, delta: f32) {
        for point in &mut self.trail {
            point.alpha -= 0.08 * delta;
        }
        self.trail.retain(|t| t.alpha > 0.0);
    }
}

/// An obstacle resting on the ground
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: ObstacleKind,
    /// Set once the obstacle has scrolled past the player (near-miss evaluated)
    pub passed: bool,
}

impl Obstacle {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A score item
#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub pos: Vec2,
    pub size: Vec2,
    pub tier: CollectibleTier,
    /// Idle bob phase (radians)
    pub bob: f32,
}

impl Collectible {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A buff pickup
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUp {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerUpKind,
    pub bob: f32,
}

impl PowerUp {
    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// RGBA
    pub color: u32,
    /// 0-1, decreases over time
    pub life: f32,
    pub size: f32,
    pub kind: ParticleKind,
}

/// Floating text that rises and fades
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePopup {
    pub pos: Vec2,
    pub life: f32,
    pub text: String,
    pub color: u32,
    pub size: f32,
}

/// Viewport reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    /// Ground line (y of the running surface)
    pub fn ground(&self) -> f32 {
        (self.height - GROUND_MARGIN).max(PLAYER_SIZE)
    }
}

/// Opaque reference to the player sprite chosen by the host
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpriteHandle(pub Option<String>);

impl SpriteHandle {
    pub fn new(src: impl Into<String>) -> Self {
        Self(Some(src.into()))
    }

    /// The handle if it names something
    pub fn resolved(&self) -> Option<&str> {
        self.0.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Per-run counters reported at game over
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub score: u64,
    pub distance: f32,
    pub near_misses: u32,
    pub items_collected: u32,
    pub max_combo: u32,
}

/// Discrete things that happened during a frame (sound cues, host signals)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    /// `number` is 1 for a ground jump, 2..=max for air jumps
    Jump { number: u8 },
    Pickup {
        tier: CollectibleTier,
        points: u64,
        multiplier: u32,
    },
    ComboStep { count: u32 },
    ComboLost { count: u32 },
    NearMiss { bonus: u64 },
    PowerUp { kind: PowerUpKind },
    BuffExpired { kind: PowerUpKind },
    ShieldBreak,
    Death,
    Milestone { score: u64 },
    Paused,
    Resumed,
    GameOver { stats: RunStats },
    Quit,
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed
    pub seed: u64,
    /// Gameplay RNG (spawning)
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: RunPhase,
    pub viewport: Viewport,
    pub sprite: SpriteHandle,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    pub powerups: Vec<PowerUp>,
    /// Cosmetic state (not gameplay-affecting)
    pub effects: Effects,
    pub combo: Combo,
    /// Scrolled distance
    pub distance: f32,
    /// Base scroll speed (grows every frame, capped when applied)
    pub speed: f32,
    /// Running frames this run
    pub frames: u64,
    /// Frames left in the Dying phase
    pub death_timer: f32,
    /// Points from pickups and near misses
    pub bonus_score: u64,
    /// Next distance score that triggers a milestone
    pub milestone_next: u64,
    pub last_spawn_frame: u64,
    pub stats: RunStats,
    /// Whether the trail ghost is recorded
    pub trails_enabled: bool,
}

impl GameState {
    /// Create an idle game state with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let viewport = Viewport::default();
        let player = Player::new(viewport.ground(), tuning.max_jumps);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RunPhase::Idle,
            viewport,
            sprite: SpriteHandle::default(),
            player,
            obstacles: Vec::with_capacity(16),
            collectibles: Vec::with_capacity(16),
            powerups: Vec::with_capacity(4),
            effects: Effects::new(seed),
            combo: Combo::default(),
            distance: 0.0,
            speed: tuning.start_speed,
            frames: 0,
            death_timer: 0.0,
            bonus_score: 0,
            milestone_next: tuning.milestone_step,
            last_spawn_frame: 0,
            stats: RunStats::default(),
            trails_enabled: true,
            tuning,
        }
    }

    /// Apply player preferences that the simulation respects
    pub fn apply_settings(&mut self, settings: &crate::Settings) {
        self.effects.max_particles = settings.max_particles();
        self.effects.shake_enabled = settings.effective_screen_shake();
        self.effects.clouds_enabled = settings.quality.clouds_enabled();
        self.trails_enabled = settings.trails;
        if !self.trails_enabled {
            self.player.trail.clear();
        }
        self.effects.enforce_particle_cap();
    }

    /// Restore every per-run field to its initial value
    pub fn reset_run(&mut self) {
        let ground = self.viewport.ground();
        self.player = Player::new(ground, self.tuning.max_jumps);
        self.obstacles.clear();
        self.collectibles.clear();
        self.powerups.clear();
        self.effects.reset(self.viewport.width);
        self.combo = Combo::default();
        self.distance = 0.0;
        self.speed = self.tuning.start_speed;
        self.frames = 0;
        self.death_timer = 0.0;
        self.bonus_score = 0;
        self.milestone_next = self.tuning.milestone_step;
        self.last_spawn_frame = 0;
        self.stats = RunStats::default();
    }

    /// Ground line for the current viewport
    pub fn ground(&self) -> f32 {
        self.viewport.ground()
    }

    /// Score earned from distance alone
    pub fn distance_score(&self) -> u64 {
        (self.distance.max(0.0) / self.tuning.score_divisor.max(f32::EPSILON)).floor() as u64
    }

    /// Total score shown to the player
    pub fn score(&self) -> u64 {
        self.distance_score() + self.bonus_score
    }

    /// Scroll speed applied this frame (cap and slow buff included)
    pub fn scroll_speed(&self) -> f32 {
        self.speed.min(self.tuning.max_speed) * self.slow_multiplier()
    }

    pub fn slow_multiplier(&self) -> f32 {
        if self.player.buffs.slow.is_active() {
            self.tuning.slow_factor
        } else {
            1.0
        }
    }

    pub fn is_grounded(&self) -> bool {
        !self.player.jumping && self.player.pos.y >= self.ground() - self.player.size.y
    }

    /// Snapshot of the run counters
    pub fn current_stats(&self) -> RunStats {
        RunStats {
            score: self.score(),
            distance: self.distance,
            max_combo: self.combo.max_combo.max(self.combo.count),
            ..self.stats
        }
    }

    /// Resize the viewport. The world moves with the ground line so
    /// grounded obstacles stay grounded and relative heights are kept.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        let old_ground = self.ground();
        self.viewport = Viewport {
            width: width.max(1.0),
            height: height.max(1.0),
        };
        let shift = Vec2::new(0.0, self.ground() - old_ground);
        if shift.y == 0.0 {
            return;
        }

        self.player.pos += shift;
        for point in &mut self.player.trail {
            point.pos += shift;
        }
        for o in &mut self.obstacles {
            o.pos += shift;
        }
        for c in &mut self.collectibles {
            c.pos += shift;
        }
        for p in &mut self.powerups {
            p.pos += shift;
        }
        log::debug!("Viewport {}x{}, world shifted {:+.0}", width, height, shift.y);
    }
}
