//! Collision and crossing tests for rectangular geometry
//!
//! Everything in the arcade field is a box: the bird, and the column each
//! pipe sweeps. Overlap is strict, so touching an edge is safe.

use glam::Vec2;

use super::obstacles::Obstacle;
use crate::consts::*;

/// Axis-aligned box in field coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Box from a top-left corner and a size
    pub fn from_origin(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin, origin + size)
    }

    /// Strict overlap on the x axis
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x && self.min.x < other.max.x
    }

    /// Whether the vertical span `[top, bottom]` fully contains this box
    #[inline]
    pub fn within_y(&self, top: f32, bottom: f32) -> bool {
        self.min.y >= top && self.max.y <= bottom
    }
}

/// The bird's box at a given vertical position
pub fn body_box(body_x: f32, position: f32) -> Aabb {
    Aabb::from_origin(
        Vec2::new(body_x, position),
        Vec2::new(BODY_WIDTH, BODY_HEIGHT),
    )
}

/// Full-height column swept by a pipe
pub fn pipe_column(pipe: &Obstacle, field_height: f32) -> Aabb {
    Aabb::new(Vec2::new(pipe.x, 0.0), Vec2::new(pipe.right(), field_height))
}

/// Whether the bird hits a pipe.
///
/// Only pipes overlapping the bird's column count; among those, the bird is
/// safe exactly when its whole box sits inside the gap.
pub fn body_hits_pipe(body: &Aabb, pipe: &Obstacle, field_height: f32) -> bool {
    body.overlaps_x(&pipe_column(pipe, field_height))
        && !body.within_y(pipe.gap_top, pipe.gap_bottom)
}

/// Whether a leftward-moving edge went from `prev` to `new` across
/// `threshold` this step.
///
/// The whole band `[new, prev]` is tested, so a step that jumps straight
/// over the threshold still counts.
#[inline]
pub fn has_crossed(prev: f32, new: f32, threshold: f32) -> bool {
    prev >= threshold && new < threshold
}
