//! Kinematic state of the player-controlled bird
//!
//! Pure kinematics: no bounds, no collisions. The owning core decides what
//! a position means.

use serde::{Deserialize, Serialize};

/// Vertical position and velocity of the bird (positive = downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhysicsBody {
    position: f32,
    velocity: f32,
}

impl PhysicsBody {
    pub fn new(position: f32) -> Self {
        Self {
            position,
            velocity: 0.0,
        }
    }

    #[inline]
    pub fn position(&self) -> f32 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Advance under constant acceleration for `dt` time units.
    ///
    /// Uses the closed-form step (`x += v·dt + g·dt²/2`), so splitting an
    /// interval into more steps lands on the same state.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        debug_assert!(dt > 0.0, "integrate called with dt = {dt}");
        self.position += self.velocity * dt + 0.5 * gravity * dt * dt;
        self.velocity += gravity * dt;
    }

    /// Set velocity outright. Flaps do not accumulate.
    pub fn apply_impulse(&mut self, velocity: f32) {
        self.velocity = velocity;
    }

    /// Pin to a position and kill velocity in the pinned direction
    pub(crate) fn clamp_to(&mut self, position: f32) {
        self.position = position;
        self.velocity = self.velocity.max(0.0);
    }
}
