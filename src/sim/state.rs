//! Game state and core simulation types
//!
//! `SimulationCore` exclusively owns the bird and the pipes. Hosts read it
//! through `snapshot()`; nothing outside the core mutates either.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::body::PhysicsBody;
use super::obstacles::{ObstacleField, SpawnRules};
use super::rng::{RandomSource, seeded};
use crate::consts::*;
use crate::difficulty::DifficultyConfig;
use crate::error::{ConfigError, InvalidCall, SimError};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first flap; physics paused
    Idle,
    /// Simulation running
    Active,
    /// Crashed; only `reset()` leaves this phase
    Over,
}

/// What the bird hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrashCause {
    Floor,
    Ceiling,
    Pipe,
}

impl fmt::Display for CrashCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CrashCause::Floor => "floor",
            CrashCause::Ceiling => "ceiling",
            CrashCause::Pipe => "pipe",
        })
    }
}

/// What happens when the bird reaches the top of the field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CeilingPolicy {
    /// Touching the ceiling ends the run
    #[default]
    Crash,
    /// The bird is pinned at the ceiling and keeps flying
    Clamp,
}

/// Something a tick did that a host may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new pipe entered at the right edge
    PipeSpawned { gap_top: f32 },
    /// The bird cleared a pipe; carries the new score
    PipePassed { score: u32 },
    /// The run ended
    Crashed { cause: CrashCause },
}

/// Play field dimensions and the bird's fixed column
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayField {
    pub width: f32,
    pub height: f32,
}

impl PlayField {
    /// Bird's fixed left edge
    #[inline]
    pub fn body_x(&self) -> f32 {
        self.width * BODY_X_FRACTION
    }

    /// Lowest valid top edge for the bird
    #[inline]
    pub fn floor(&self) -> f32 {
        self.height - BODY_HEIGHT
    }

    /// Where the bird waits before a run
    #[inline]
    pub fn start_position(&self) -> f32 {
        self.height / 2.0
    }
}

/// Read-only pipe data for renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleView {
    pub x: f32,
    pub gap_top: f32,
    pub gap_bottom: f32,
}

/// Immutable copy of everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub best_score: u32,
    pub body_x: f32,
    pub body_position: f32,
    pub body_velocity: f32,
    pub obstacles: Vec<ObstacleView>,
    /// Total horizontal scroll this run (ground parallax)
    pub distance: f32,
    /// Active ticks simulated this run
    pub ticks: u64,
    pub field_width: f32,
    pub field_height: f32,
    /// Why the run ended, once it has
    pub crash: Option<CrashCause>,
}

/// The authoritative game state for one session
#[derive(Debug, Clone)]
pub struct SimulationCore<R = Pcg32> {
    pub(crate) config: DifficultyConfig,
    pub(crate) rules: SpawnRules,
    pub(crate) field: PlayField,
    pub(crate) ceiling: CeilingPolicy,
    pub(crate) body: PhysicsBody,
    pub(crate) obstacles: ObstacleField,
    pub(crate) phase: GamePhase,
    pub(crate) score: u32,
    pub(crate) best_score: u32,
    pub(crate) distance: f32,
    pub(crate) ticks: u64,
    pub(crate) crash: Option<CrashCause>,
    pub(crate) rng: R,
}

impl SimulationCore<Pcg32> {
    /// Core driven by a seeded PCG stream
    pub fn seeded(
        config: DifficultyConfig,
        field_width: f32,
        field_height: f32,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::new(config, field_width, field_height, seeded(seed))
    }
}

impl<R: RandomSource> SimulationCore<R> {
    /// Build a core in `Idle`. Rejects tables that cannot be played on this
    /// field.
    pub fn new(
        config: DifficultyConfig,
        field_width: f32,
        field_height: f32,
        rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate(field_width, field_height)?;
        let rules = SpawnRules::new(&config, field_width, field_height)?;
        let field = PlayField {
            width: field_width,
            height: field_height,
        };

        Ok(Self {
            config,
            rules,
            field,
            ceiling: CeilingPolicy::default(),
            body: PhysicsBody::new(field.start_position()),
            obstacles: ObstacleField::new(),
            phase: GamePhase::Idle,
            score: 0,
            best_score: 0,
            distance: 0.0,
            ticks: 0,
            crash: None,
            rng,
        })
    }

    pub fn with_ceiling_policy(mut self, policy: CeilingPolicy) -> Self {
        self.ceiling = policy;
        self
    }

    /// Back to `Idle` with a fresh bird and an empty field.
    ///
    /// The RNG stream and the session best score carry over.
    pub fn reset(&mut self) {
        self.body = PhysicsBody::new(self.field.start_position());
        self.obstacles.clear();
        self.score = 0;
        self.distance = 0.0;
        self.ticks = 0;
        self.crash = None;
        if self.phase != GamePhase::Idle {
            log::debug!("{:?} -> Idle (reset)", self.phase);
        }
        self.phase = GamePhase::Idle;
    }

    /// Swap the difficulty table between runs, then reset.
    pub fn select_difficulty(&mut self, config: DifficultyConfig) -> Result<(), SimError> {
        if self.phase == GamePhase::Active {
            return Err(InvalidCall::RunInProgress.into());
        }
        config.validate(self.field.width, self.field.height)?;
        self.rules = SpawnRules::new(&config, self.field.width, self.field.height)?;
        self.config = config;
        self.reset();
        Ok(())
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.score,
            best_score: self.best_score,
            body_x: self.field.body_x(),
            body_position: self.body.position(),
            body_velocity: self.body.velocity(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    x: o.x,
                    gap_top: o.gap_top,
                    gap_bottom: o.gap_bottom,
                })
                .collect(),
            distance: self.distance,
            ticks: self.ticks,
            field_width: self.field.width,
            field_height: self.field.height,
            crash: self.crash,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    pub fn field(&self) -> PlayField {
        self.field
    }

    pub fn ceiling_policy(&self) -> CeilingPolicy {
        self.ceiling
    }

    pub fn body(&self) -> &PhysicsBody {
        &self.body
    }

    pub fn obstacles(&self) -> &ObstacleField {
        &self.obstacles
    }
}
