//! Flap Sim - a deterministic side-scrolling arcade core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, pipes, collisions, scoring)
//! - `difficulty`: Data-driven game balance presets
//! - `platform`: Host-side clock and fixed-timestep pacing
//! - `replay`: Recorded input tapes for deterministic playback
//! - `autopilot`: Snapshot-only bot used by the headless host

pub mod autopilot;
pub mod difficulty;
pub mod error;
pub mod platform;
pub mod replay;
pub mod sim;

pub use difficulty::{Difficulty, DifficultyConfig};
pub use error::{ConfigError, InvalidCall, LoadError, SimError};
pub use sim::{CeilingPolicy, GameEvent, GamePhase, SimulationCore, Snapshot};

/// Game configuration constants
pub mod consts {
    /// Reference frame rate that difficulty values are authored against.
    /// Gravity is units/frame², speeds are units/frame at this rate.
    pub const FRAMES_PER_SECOND: f32 = 60.0;

    /// Fixed simulation timestep used by hosts (one reference frame)
    pub const SIM_DT: f32 = 1.0 / FRAMES_PER_SECOND;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the accumulator will absorb (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Bird bounding box
    pub const BODY_WIDTH: f32 = 32.0;
    pub const BODY_HEIGHT: f32 = 32.0;
    /// Bird's fixed left edge, as a fraction of the field width
    pub const BODY_X_FRACTION: f32 = 0.25;

    /// Pipe width in field units
    pub const PIPE_WIDTH: f32 = 52.0;
    /// Keep-out bands above and below any gap
    pub const GAP_MARGIN_TOP: f32 = 50.0;
    pub const GAP_MARGIN_BOTTOM: f32 = 50.0;

    /// Pipes whose right edge is left of this are garbage
    pub const RECYCLE_LEFT_BOUND: f32 = 0.0;
}

/// Convert host seconds to reference frames
#[inline]
pub fn seconds_to_frames(dt: f32) -> f32 {
    dt * consts::FRAMES_PER_SECOND
}
