//! Platform abstraction layer
//!
//! Host-side helpers that sit outside the deterministic core:
//! - Monotonic time sources
//! - Fixed-timestep pacing

pub mod time;

pub use time::{Clock, FixedTimestep, ManualClock, MonotonicClock};
