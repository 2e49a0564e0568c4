//! Error types for configuration, host calls and file loading

use thiserror::Error;

/// A difficulty table or play field that cannot host a run.
///
/// Raised when a core is constructed or a difficulty is selected, never
/// from inside `tick`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f32 },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("jump impulse must point upward (negative), got {value}")]
    DownwardImpulse { value: f32 },

    #[error("gap size {gap_size} leaves no room in a field of height {field_height} ({margins} reserved for margins)")]
    GapTooLarge {
        gap_size: f32,
        field_height: f32,
        margins: f32,
    },

    #[error("gap size {gap_size} is not taller than the bird ({body_height})")]
    GapTooNarrow { gap_size: f32, body_height: f32 },

    #[error("spawn spacing {spacing} is narrower than a pipe ({pipe_width})")]
    SpacingTooTight { spacing: f32, pipe_width: f32 },

    #[error("play field {width}x{height} is too small")]
    FieldTooSmall { width: f32, height: f32 },

    #[error("unknown difficulty preset: {0:?}")]
    UnknownPreset(String),
}

/// A host call that the core refused. The core is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidCall {
    #[error("tick duration must be positive and finite, got {dt}")]
    NonPositiveDt { dt: f32 },

    #[error("tick duration {dt} is too large to simulate")]
    DtTooLarge { dt: f32 },

    #[error("run is over; reset() before continuing")]
    RunOver,

    #[error("difficulty can only change between runs")]
    RunInProgress,
}

/// Any failure surfaced by the core
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    InvalidCall(#[from] InvalidCall),
}

/// Failure reading a difficulty table or replay from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
