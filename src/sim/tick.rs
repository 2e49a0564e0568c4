//! Fixed-order simulation tick
//!
//! Advances a `SimulationCore` by one host-supplied interval. Hosts pace the
//! calls; see `platform::FixedTimestep` for the accumulator.

use super::collision::{body_box, body_hits_pipe};
use super::rng::RandomSource;
use super::state::{CeilingPolicy, CrashCause, GameEvent, GamePhase, SimulationCore};
use crate::consts::*;
use crate::error::InvalidCall;
use crate::seconds_to_frames;

impl<R: RandomSource> SimulationCore<R> {
    /// Flap. The first flap also starts the run.
    pub fn jump(&mut self) -> Result<(), InvalidCall> {
        match self.phase {
            GamePhase::Over => return Err(InvalidCall::RunOver),
            GamePhase::Idle => {
                log::debug!("Idle -> Active");
                self.phase = GamePhase::Active;
            }
            GamePhase::Active => {}
        }
        self.body.apply_impulse(self.config.jump_impulse);
        Ok(())
    }

    /// Advance the run by `dt` seconds.
    ///
    /// Order is fixed: integrate, bounds, scroll, pipe collision, recycle,
    /// spawn, score. A crash stops the tick where it happens. Returns the
    /// events produced, in order. A refused call leaves the core untouched.
    pub fn tick(&mut self, dt: f32) -> Result<Vec<GameEvent>, InvalidCall> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(InvalidCall::NonPositiveDt { dt });
        }
        let frames = seconds_to_frames(dt);
        let dx = self.config.horizontal_speed * frames;
        if !frames.is_finite() || !dx.is_finite() {
            return Err(InvalidCall::DtTooLarge { dt });
        }
        match self.phase {
            GamePhase::Over => return Err(InvalidCall::RunOver),
            GamePhase::Idle => return Ok(Vec::new()),
            GamePhase::Active => {}
        }

        let mut events = Vec::new();
        self.ticks += 1;

        self.body.integrate(frames, self.config.gravity);

        if let Some(cause) = self.check_bounds() {
            self.crash(cause, &mut events);
            return Ok(events);
        }

        self.obstacles.advance(dx);
        self.distance += dx;

        let bird = body_box(self.field.body_x(), self.body.position());
        if self
            .obstacles
            .iter()
            .any(|pipe| body_hits_pipe(&bird, pipe, self.field.height))
        {
            self.crash(CrashCause::Pipe, &mut events);
            return Ok(events);
        }

        self.obstacles.recycle(RECYCLE_LEFT_BOUND);

        if let Some(pipe) = self.obstacles.maybe_spawn(&self.rules, &mut self.rng) {
            events.push(GameEvent::PipeSpawned {
                gap_top: pipe.gap_top,
            });
        }

        let passed = self.obstacles.latch_passed(self.field.body_x(), dx);
        for _ in 0..passed {
            self.score += 1;
            events.push(GameEvent::PipePassed { score: self.score });
        }
        self.best_score = self.best_score.max(self.score);

        Ok(events)
    }

    /// Floor is always terminal; the ceiling follows the policy. A body
    /// that left the number line counts as off the bottom.
    fn check_bounds(&mut self) -> Option<CrashCause> {
        let position = self.body.position();
        if !position.is_finite() || position >= self.field.floor() {
            return Some(CrashCause::Floor);
        }
        if position <= 0.0 {
            match self.ceiling {
                CeilingPolicy::Crash => return Some(CrashCause::Ceiling),
                CeilingPolicy::Clamp => self.body.clamp_to(0.0),
            }
        }
        None
    }

    fn crash(&mut self, cause: CrashCause, events: &mut Vec<GameEvent>) {
        log::debug!(
            "Active -> Over: hit {} at score {} after {} ticks",
            cause,
            self.score,
            self.ticks
        );
        self.phase = GamePhase::Over;
        self.crash = Some(cause);
        events.push(GameEvent::Crashed { cause });
    }
}
