//! Per-frame simulation
//!
//! All gameplay logic lives here:
//! - Variable timestep, measured in 60 Hz reference frames
//! - Seeded RNG for spawning, a separate one for cosmetics
//! - Entity stores compacted with `retain`, never spliced mid-iteration
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod clock;
pub mod collision;
pub mod combo;
pub mod effects;
pub mod lifecycle;
pub mod physics;
pub mod scene;
pub mod spawn;
pub mod state;
pub mod tick;

pub use clock::FrameClock;
pub use collision::Aabb;
pub use combo::{BuffTimer, Buffs, Combo};
pub use effects::Effects;
pub use scene::{PlayerVisual, Scene};
pub use state::{
    Collectible, CollectibleTier, GameEvent, GameState, Obstacle, ObstacleKind, Particle,
    ParticleKind, Player, PowerUp, PowerUpKind, RunPhase, RunStats, ScorePopup, SpriteHandle,
    Viewport,
};
pub use tick::{PauseCommand, TickInput, tick};
