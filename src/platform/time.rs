//! Time sources and the fixed-timestep accumulator
//!
//! Hosts measure real frame time with a `Clock`, feed it to a
//! `FixedTimestep`, and call `tick(step)` once per step it hands back. The
//! simulation then sees the same sequence of `dt` values at any frame rate.

use std::time::{Duration, Instant};

use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};

/// Monotonic time since some fixed origin
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Clock that only moves when told to (headless runs, tests)
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now
    }
}

/// Accumulates real frame time and releases it in fixed steps
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_substeps: u32,
    max_frame_time: f32,
    accumulator: f32,
    last_time: Option<Duration>,
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FixedTimestep {
    /// `step` is in seconds and must be positive.
    pub fn new(step: f32) -> Self {
        debug_assert!(
            step.is_finite() && step > 0.0,
            "fixed timestep must be positive, got {step}"
        );
        Self {
            step,
            max_substeps: MAX_SUBSTEPS,
            max_frame_time: MAX_FRAME_TIME,
            accumulator: 0.0,
            last_time: None,
        }
    }

    pub fn with_max_substeps(mut self, max_substeps: u32) -> Self {
        self.max_substeps = max_substeps;
        self
    }

    /// Seconds per step
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Add one frame's worth of real time; returns how many steps to run.
    ///
    /// Long frames are clamped and at most `max_substeps` steps are released
    /// per frame. Whole steps still owed after the cap are dropped, so a
    /// stalled host never spirals.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt.min(self.max_frame_time);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < self.max_substeps {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == self.max_substeps && self.accumulator >= self.step {
            log::trace!("Dropping {:.4}s of simulation backlog", self.accumulator);
            self.accumulator %= self.step;
        }
        steps
    }

    /// Like `advance`, measuring the frame from successive clock readings.
    /// The first reading only sets the baseline.
    pub fn advance_to(&mut self, now: Duration) -> u32 {
        let Some(last) = self.last_time.replace(now) else {
            return 0;
        };
        self.advance(now.saturating_sub(last).as_secs_f32())
    }

    /// Fraction of a step left in the accumulator (render interpolation)
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.last_time = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_independent_of_frame_rate() {
        // One simulated second at 30, 60 and 144 fps
        for fps in [30u32, 60, 144] {
            let mut stepper = FixedTimestep::new(1.0 / 60.0);
            let mut steps = 0;
            for _ in 0..fps {
                steps += stepper.advance(1.0 / fps as f32);
            }
            assert!((59..=60).contains(&steps), "{fps} fps gave {steps} steps");
        }
    }

    #[test]
    fn test_long_frames_are_capped() {
        let mut stepper = FixedTimestep::new(1.0 / 64.0);
        // A five-second stall only releases the clamped 0.1s frame
        let steps = stepper.advance(5.0);
        assert_eq!(steps, 6);

        let mut stepper = FixedTimestep::new(1.0 / 240.0).with_max_substeps(4);
        assert_eq!(stepper.advance(0.1), 4);
    }

    #[test]
    fn test_capped_frames_leave_no_backlog() {
        // Four 1/240s steps cannot keep up with 0.1s frames
        let mut stepper = FixedTimestep::new(1.0 / 240.0).with_max_substeps(4);
        for _ in 0..1000 {
            assert_eq!(stepper.advance(0.1), 4);
        }
        assert!(stepper.alpha() < 1.0);

        // Once the host catches up, only the sub-step remainder is owed
        let owed: u32 = (0..1000).map(|_| stepper.advance(1.0e-6)).sum();
        assert!(owed <= 1, "carried {owed} steps of backlog");
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "fixed timestep must be positive")]
    fn test_rejects_non_positive_step() {
        let _ = FixedTimestep::new(0.0);
    }

    #[test]
    fn test_rejects_bad_frame_times() {
        let mut stepper = FixedTimestep::default();
        assert_eq!(stepper.advance(0.0), 0);
        assert_eq!(stepper.advance(-1.0), 0);
        assert_eq!(stepper.advance(f32::NAN), 0);
        assert_eq!(stepper.alpha(), 0.0);
    }

    #[test]
    fn test_advance_to_uses_clock_deltas() {
        let mut clock = ManualClock::new();
        let mut stepper = FixedTimestep::new(0.01);

        assert_eq!(stepper.advance_to(clock.now()), 0);
        clock.advance(Duration::from_millis(25));
        assert_eq!(stepper.advance_to(clock.now()), 2);
        assert!((stepper.alpha() - 0.5).abs() < 1e-3);

        stepper.reset();
        assert_eq!(stepper.advance_to(clock.now()), 0);
    }

    #[test]
    fn test_monotonic_clock_moves_forward() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
