//! Recorded input tapes
//!
//! A `Replay` is everything needed to rebuild a run: the seed, the table,
//! the field, and the `(jump, dt)` sequence the host fed in. Playing it back
//! against a fresh core reproduces the run bit for bit, which is how a
//! claimed result is checked.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::difficulty::DifficultyConfig;
use crate::error::{ConfigError, InvalidCall, LoadError};
use crate::sim::{CeilingPolicy, GameEvent, GamePhase, RandomSource, SimulationCore, Snapshot};

/// One host step: an optional flap followed by a tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplayStep {
    #[serde(default)]
    pub jump: bool,
    pub dt: f32,
}

/// A single recorded run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Replay {
    pub seed: u64,
    pub config: DifficultyConfig,
    pub field_width: f32,
    pub field_height: f32,
    #[serde(default)]
    pub ceiling: CeilingPolicy,
    pub steps: Vec<ReplayStep>,
}

/// Why a replay does not back up a claimed result
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("score mismatch: claimed {claimed}, replay computed {computed}")]
    ScoreMismatch { claimed: u32, computed: u32 },

    #[error("phase mismatch: claimed {claimed:?}, replay computed {computed:?}")]
    PhaseMismatch {
        claimed: GamePhase,
        computed: GamePhase,
    },

    #[error("final state diverges from the claim after {ticks} ticks")]
    StateMismatch { ticks: u64 },
}

impl Replay {
    pub fn new(
        seed: u64,
        config: DifficultyConfig,
        field_width: f32,
        field_height: f32,
        ceiling: CeilingPolicy,
    ) -> Self {
        Self {
            seed,
            config,
            field_width,
            field_height,
            ceiling,
            steps: Vec::new(),
        }
    }

    /// Total simulated seconds on the tape
    pub fn duration(&self) -> f32 {
        self.steps.iter().map(|s| s.dt).sum()
    }

    /// Rebuild the run on a fresh seeded core.
    ///
    /// Calls the core refuses are skipped exactly as they were when the
    /// tape was recorded.
    pub fn play(&self) -> Result<SimulationCore, ConfigError> {
        let mut core =
            SimulationCore::seeded(self.config, self.field_width, self.field_height, self.seed)?
                .with_ceiling_policy(self.ceiling);

        for step in &self.steps {
            if step.jump {
                let _ = core.jump();
            }
            let _ = core.tick(step.dt);
        }
        Ok(core)
    }

    /// Replay the tape and compare the result against a claimed snapshot
    pub fn verify(&self, claimed: &Snapshot) -> Result<(), ReplayError> {
        let computed = self.play()?.snapshot();

        if computed.score != claimed.score {
            return Err(ReplayError::ScoreMismatch {
                claimed: claimed.score,
                computed: computed.score,
            });
        }
        if computed.phase != claimed.phase {
            return Err(ReplayError::PhaseMismatch {
                claimed: claimed.phase,
                computed: computed.phase,
            });
        }
        if computed != *claimed {
            return Err(ReplayError::StateMismatch {
                ticks: computed.ticks,
            });
        }
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LoadError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!(
            "Saved replay ({} steps) to {}",
            self.steps.len(),
            path.display()
        );
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path)?;
        let replay = Self::from_json(&json)?;
        log::debug!("Loaded replay: seed {}, {} steps", replay.seed, replay.steps.len());
        Ok(replay)
    }
}

/// Drives a core while writing down every step.
///
/// Start it on a core freshly built from the same seed; the tape covers
/// that one run.
#[derive(Debug, Clone)]
pub struct ReplayRecorder {
    replay: Replay,
}

impl ReplayRecorder {
    pub fn new<R: RandomSource>(seed: u64, core: &SimulationCore<R>) -> Self {
        let field = core.field();
        Self {
            replay: Replay::new(
                seed,
                *core.config(),
                field.width,
                field.height,
                core.ceiling_policy(),
            ),
        }
    }

    /// Flap if asked, then tick. A refused flap is ignored the same way
    /// playback ignores it.
    pub fn step<R: RandomSource>(
        &mut self,
        core: &mut SimulationCore<R>,
        jump: bool,
        dt: f32,
    ) -> Result<Vec<GameEvent>, InvalidCall> {
        self.replay.steps.push(ReplayStep { jump, dt });
        if jump {
            let _ = core.jump();
        }
        core.tick(dt)
    }

    pub fn len(&self) -> usize {
        self.replay.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replay.steps.is_empty()
    }

    pub fn replay(&self) -> &Replay {
        &self.replay
    }

    pub fn finish(self) -> Replay {
        self.replay
    }
}
