//! Snapshot-driven bot for headless runs
//!
//! Reads nothing but a `Snapshot` and the table it is playing, so it works
//! the same against a live core or a replay.

use crate::consts::*;
use crate::difficulty::DifficultyConfig;
use crate::sim::{GamePhase, ObstacleView, Snapshot};

/// Flaps to keep the bird inside the next gap
#[derive(Debug, Clone)]
pub struct Autopilot {
    config: DifficultyConfig,
    /// Clearance kept from the gap edges
    pub margin: f32,
}

impl Autopilot {
    pub fn new(config: DifficultyConfig) -> Self {
        Self {
            config,
            margin: 4.0,
        }
    }

    /// Decide whether to flap before the next tick
    pub fn should_flap(&self, snapshot: &Snapshot) -> bool {
        match snapshot.phase {
            GamePhase::Idle => return true,
            GamePhase::Over => return false,
            GamePhase::Active => {}
        }

        let (ceiling, floor) = match next_obstacle(snapshot) {
            Some(pipe) => (pipe.gap_top, pipe.gap_bottom),
            // Open sky: hold around the middle of the field
            None => (
                snapshot.field_height * 0.35,
                snapshot.field_height * 0.65,
            ),
        };

        // Where the bird's bottom edge ends up one frame from now if we wait
        let velocity = snapshot.body_velocity;
        let next_bottom = snapshot.body_position + velocity + 0.5 * self.config.gravity + BODY_HEIGHT;
        if velocity < 0.0 || next_bottom < floor - self.margin {
            return false;
        }

        // Don't flap into the upper lip
        let rise = self.config.jump_impulse * self.config.jump_impulse / (2.0 * self.config.gravity);
        snapshot.body_position - rise > ceiling.max(0.0) + self.margin
    }
}

/// First pipe whose right edge is still ahead of the bird's left edge
fn next_obstacle(snapshot: &Snapshot) -> Option<&ObstacleView> {
    snapshot
        .obstacles
        .iter()
        .find(|pipe| pipe.x + PIPE_WIDTH >= snapshot.body_x)
}
