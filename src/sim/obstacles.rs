//! Pipes: spawning, scrolling and garbage collection
//!
//! Pipes always enter at the right edge and scroll left at one shared speed,
//! so spawn order, storage order and ascending `x` are the same thing.

use super::rng::RandomSource;
use crate::consts::*;
use crate::difficulty::DifficultyConfig;
use crate::error::ConfigError;

/// A pipe pair with a passable gap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Left edge (field units, decreases over time)
    pub x: f32,
    /// Top of the gap
    pub gap_top: f32,
    /// Bottom of the gap (`gap_top + gap_size`)
    pub gap_bottom: f32,
    /// Latched once this pipe has credited the score
    pub scored: bool,
}

impl Obstacle {
    pub fn new(x: f32, gap_top: f32, gap_size: f32) -> Self {
        Self {
            x,
            gap_top,
            gap_bottom: gap_top + gap_size,
            scored: false,
        }
    }

    /// Right edge
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + PIPE_WIDTH
    }
}

/// Validated spawn parameters for one field and difficulty.
///
/// Building one is where an impossible gap is rejected; once built, spawning
/// cannot fail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRules {
    /// Where new pipes enter (the field's right edge)
    pub spawn_x: f32,
    pub gap_size: f32,
    pub spacing: f32,
    gap_top_min: f32,
    gap_top_max: f32,
}

impl SpawnRules {
    pub fn new(
        config: &DifficultyConfig,
        field_width: f32,
        field_height: f32,
    ) -> Result<Self, ConfigError> {
        let (gap_top_min, gap_top_max) =
            config
                .gap_top_range(field_height)
                .ok_or(ConfigError::GapTooLarge {
                    gap_size: config.gap_size,
                    field_height,
                    margins: GAP_MARGIN_TOP + GAP_MARGIN_BOTTOM,
                })?;
        Ok(Self {
            spawn_x: field_width,
            gap_size: config.gap_size,
            spacing: config.spawn_spacing,
            gap_top_min,
            gap_top_max,
        })
    }

    /// Inclusive range a gap top is drawn from
    pub fn gap_top_range(&self) -> (f32, f32) {
        (self.gap_top_min, self.gap_top_max)
    }
}

/// Ordered collection of live pipes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleField {
    obstacles: Vec<Obstacle>,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn one pipe at the right edge with a random gap.
    ///
    /// Fails only if the gap cannot fit the field, which is a configuration
    /// problem rather than a gameplay one.
    pub fn spawn<R: RandomSource + ?Sized>(
        &mut self,
        field_width: f32,
        field_height: f32,
        config: &DifficultyConfig,
        rng: &mut R,
    ) -> Result<&Obstacle, ConfigError> {
        let rules = SpawnRules::new(config, field_width, field_height)?;
        Ok(self.spawn_with(&rules, rng))
    }

    /// Spawn one pipe under pre-validated rules
    pub fn spawn_with<R: RandomSource + ?Sized>(
        &mut self,
        rules: &SpawnRules,
        rng: &mut R,
    ) -> &Obstacle {
        let (min, max) = rules.gap_top_range();
        let gap_top = rng.next_float(min, max);
        self.obstacles
            .push(Obstacle::new(rules.spawn_x, gap_top, rules.gap_size));
        log::trace!("Spawned pipe at x={} gap_top={}", rules.spawn_x, gap_top);
        &self.obstacles[self.obstacles.len() - 1]
    }

    /// Scroll every pipe left by `dx`
    pub fn advance(&mut self, dx: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.x -= dx;
        }
    }

    /// Drop pipes whose right edge is left of `left_bound`.
    ///
    /// Only pipes that already latched `scored` are dropped; a pipe that
    /// crossed the bird and the bound in the same step waits one more step so
    /// its point is credited first. Returns how many were removed.
    pub fn recycle(&mut self, left_bound: f32) -> usize {
        let before = self.obstacles.len();
        self.obstacles
            .retain(|o| !(o.scored && o.right() < left_bound));
        before - self.obstacles.len()
    }

    /// Whether the field is ready for its next pipe
    pub fn needs_spawn(&self, spawn_x: f32, spacing: f32) -> bool {
        match self.obstacles.last() {
            None => true,
            Some(last) => spawn_x - last.x > spacing,
        }
    }

    /// Spawn at most one pipe if the newest one has scrolled far enough
    pub fn maybe_spawn<R: RandomSource + ?Sized>(
        &mut self,
        rules: &SpawnRules,
        rng: &mut R,
    ) -> Option<&Obstacle> {
        if self.needs_spawn(rules.spawn_x, rules.spacing) {
            Some(self.spawn_with(rules, rng))
        } else {
            None
        }
    }

    /// Latch every unscored pipe whose right edge crossed `threshold` during
    /// a scroll of `dx`. Returns how many were latched.
    pub fn latch_passed(&mut self, threshold: f32, dx: f32) -> u32 {
        let mut passed = 0;
        for obstacle in self.obstacles.iter_mut().filter(|o| !o.scored) {
            let now = obstacle.right();
            if super::collision::has_crossed(now + dx, now, threshold) {
                obstacle.scored = true;
                passed += 1;
            }
        }
        passed
    }

    pub fn clear(&mut self) {
        self.obstacles.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Obstacle> {
        self.obstacles.iter()
    }

    pub fn as_slice(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, obstacle: Obstacle) {
        self.obstacles.push(obstacle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::difficulty::Difficulty;
    use crate::sim::rng::{seeded, testing::FixedRandom};

    fn scenario_config() -> DifficultyConfig {
        DifficultyConfig {
            gravity: 20.0,
            jump_impulse: -8.0,
            horizontal_speed: 60.0,
            gap_size: 150.0,
            spawn_spacing: 200.0,
        }
    }

    #[test]
    fn test_spawn_uses_injected_random_gap() {
        let mut field = ObstacleField::new();
        let mut rng = FixedRandom(200.0);

        let pipe = *field
            .spawn(400.0, 600.0, &scenario_config(), &mut rng)
            .unwrap();

        assert_eq!(pipe.x, 400.0);
        assert_eq!(pipe.gap_top, 200.0);
        assert_eq!(pipe.gap_bottom, 350.0);
        assert!(!pipe.scored);
    }

    #[test]
    fn test_spawn_rejects_oversized_gap() {
        let mut field = ObstacleField::new();
        let mut config = scenario_config();
        config.gap_size = 550.0;

        let result = field.spawn(400.0, 600.0, &config, &mut seeded(1));
        assert!(matches!(result, Err(ConfigError::GapTooLarge { .. })));
        assert!(field.is_empty());
    }

    #[test]
    fn test_gap_top_stays_within_margins() {
        let config = Difficulty::Hard.config();
        let rules = SpawnRules::new(&config, 400.0, 600.0).unwrap();
        let mut field = ObstacleField::new();
        let mut rng = seeded(99);
        for _ in 0..200 {
            let pipe = *field.spawn_with(&rules, &mut rng);
            assert!(pipe.gap_top >= GAP_MARGIN_TOP);
            assert!(pipe.gap_bottom <= 600.0 - GAP_MARGIN_BOTTOM);
        }
    }

    #[test]
    fn test_advance_moves_every_pipe() {
        let mut field = ObstacleField::new();
        field.push(Obstacle::new(300.0, 100.0, 150.0));
        field.push(Obstacle::new(400.0, 100.0, 150.0));
        field.advance(25.0);
        let xs: Vec<f32> = field.iter().map(|o| o.x).collect();
        assert_eq!(xs, vec![275.0, 375.0]);
    }

    #[test]
    fn test_maybe_spawn_respects_spacing() {
        let rules = SpawnRules::new(&scenario_config(), 400.0, 600.0).unwrap();
        let mut field = ObstacleField::new();
        let mut rng = FixedRandom(200.0);

        assert!(field.maybe_spawn(&rules, &mut rng).is_some());
        // Newest pipe still at the edge
        assert!(field.maybe_spawn(&rules, &mut rng).is_none());

        field.advance(200.0);
        // Exactly `spacing` away is not yet "more than" spacing
        assert!(field.maybe_spawn(&rules, &mut rng).is_none());

        field.advance(0.5);
        assert!(field.maybe_spawn(&rules, &mut rng).is_some());
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn test_maybe_spawn_never_batches() {
        let rules = SpawnRules::new(&scenario_config(), 400.0, 600.0).unwrap();
        let mut field = ObstacleField::new();
        let mut rng = FixedRandom(200.0);
        field.maybe_spawn(&rules, &mut rng);

        // A huge scroll still only earns one new pipe
        field.advance(5000.0);
        field.maybe_spawn(&rules, &mut rng);
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn test_recycle_only_drops_scored_pipes() {
        let mut field = ObstacleField::new();
        let mut gone = Obstacle::new(-100.0, 100.0, 150.0);
        gone.scored = true;
        let unscored = Obstacle::new(-100.0, 100.0, 150.0);
        let mut visible = Obstacle::new(-20.0, 100.0, 150.0);
        visible.scored = true;
        field.push(gone);
        field.push(unscored);
        field.push(visible);

        assert_eq!(field.recycle(RECYCLE_LEFT_BOUND), 1);
        assert_eq!(field.len(), 2);
        assert!(!field.as_slice()[0].scored);
    }

    #[test]
    fn test_latch_passed_scores_once() {
        let mut field = ObstacleField::new();
        // Right edge moves 102 -> 98 across a threshold of 100
        field.push(Obstacle::new(102.0 - PIPE_WIDTH, 200.0, 150.0));
        field.advance(4.0);
        assert_eq!(field.latch_passed(100.0, 4.0), 1);

        field.advance(4.0);
        assert_eq!(field.latch_passed(100.0, 4.0), 0);
        assert!(field.as_slice()[0].scored);
    }
}
