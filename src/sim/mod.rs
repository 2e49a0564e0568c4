//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through `tick(dt)`
//! - Injected RNG only
//! - Stable iteration order (pipes in spawn order)
//! - No rendering or platform dependencies

pub mod body;
pub mod collision;
pub mod obstacles;
pub mod rng;
pub mod state;
pub mod tick;

pub use body::PhysicsBody;
pub use collision::{Aabb, body_box, body_hits_pipe, has_crossed, pipe_column};
pub use obstacles::{Obstacle, ObstacleField, SpawnRules};
pub use rng::{RandomSource, seeded};
pub use state::{
    CeilingPolicy, CrashCause, GameEvent, GamePhase, ObstacleView, PlayField, SimulationCore,
    Snapshot,
};
