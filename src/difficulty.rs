//! Difficulty presets and the tuning table a run is played with
//!
//! Values are authored per reference frame (see `consts::FRAMES_PER_SECOND`),
//! the same way the hand-tuned arcade tables always were.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, LoadError};

/// Named difficulty presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Every preset, easiest first
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// The next harder preset (saturates at `Hard`)
    pub fn next(&self) -> Self {
        match self {
            Difficulty::Easy => Difficulty::Medium,
            Difficulty::Medium | Difficulty::Hard => Difficulty::Hard,
        }
    }

    /// Tuning table for this preset
    pub fn config(&self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                gravity: 0.4,
                jump_impulse: -8.0,
                horizontal_speed: 2.0,
                gap_size: 180.0,
                spawn_spacing: 250.0,
            },
            Difficulty::Medium => DifficultyConfig {
                gravity: 0.6,
                jump_impulse: -10.0,
                horizontal_speed: 3.0,
                gap_size: 140.0,
                spawn_spacing: 280.0,
            },
            Difficulty::Hard => DifficultyConfig {
                gravity: 0.8,
                jump_impulse: -11.0,
                horizontal_speed: 4.0,
                gap_size: 120.0,
                spawn_spacing: 300.0,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "med" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

/// Tuning for one run. Immutable once the run starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Downward acceleration (units/frame²)
    pub gravity: f32,
    /// Velocity a flap sets (units/frame, negative = upward)
    pub jump_impulse: f32,
    /// Pipe scroll speed (units/frame)
    pub horizontal_speed: f32,
    /// Height of the passable gap (units)
    pub gap_size: f32,
    /// Minimum horizontal distance between consecutive pipes (units)
    pub spawn_spacing: f32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Difficulty::default().config()
    }
}

impl From<Difficulty> for DifficultyConfig {
    fn from(preset: Difficulty) -> Self {
        preset.config()
    }
}

impl DifficultyConfig {
    /// Parse a table from JSON. Validation against a field happens when the
    /// table is handed to a core.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a table from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded difficulty table: {:?}", config);
        Ok(config)
    }

    /// Check the table against a play field of the given size
    pub fn validate(&self, field_width: f32, field_height: f32) -> Result<(), ConfigError> {
        validate_field(field_width, field_height)?;

        positive("gravity", self.gravity)?;
        positive("horizontal_speed", self.horizontal_speed)?;
        positive("gap_size", self.gap_size)?;
        positive("spawn_spacing", self.spawn_spacing)?;

        finite("jump_impulse", self.jump_impulse)?;
        if self.jump_impulse >= 0.0 {
            return Err(ConfigError::DownwardImpulse {
                value: self.jump_impulse,
            });
        }

        let margins = GAP_MARGIN_TOP + GAP_MARGIN_BOTTOM;
        if self.gap_size >= field_height - margins {
            return Err(ConfigError::GapTooLarge {
                gap_size: self.gap_size,
                field_height,
                margins,
            });
        }
        if self.gap_size <= BODY_HEIGHT {
            return Err(ConfigError::GapTooNarrow {
                gap_size: self.gap_size,
                body_height: BODY_HEIGHT,
            });
        }
        if self.spawn_spacing < PIPE_WIDTH {
            return Err(ConfigError::SpacingTooTight {
                spacing: self.spawn_spacing,
                pipe_width: PIPE_WIDTH,
            });
        }

        Ok(())
    }

    /// Valid range for a pipe's `gap_top`, or `None` if the gap cannot fit
    pub fn gap_top_range(&self, field_height: f32) -> Option<(f32, f32)> {
        let min = GAP_MARGIN_TOP;
        let max = field_height - GAP_MARGIN_BOTTOM - self.gap_size;
        (max >= min).then_some((min, max))
    }
}

fn validate_field(width: f32, height: f32) -> Result<(), ConfigError> {
    let too_small = ConfigError::FieldTooSmall { width, height };
    if !width.is_finite() || !height.is_finite() {
        return Err(too_small);
    }
    // The bird must fit beside its fixed column and between the gap margins.
    let body_fits_width = width * BODY_X_FRACTION + BODY_WIDTH < width;
    let body_fits_height = height > GAP_MARGIN_TOP + GAP_MARGIN_BOTTOM + BODY_HEIGHT;
    if !body_fits_width || !body_fits_height {
        return Err(too_small);
    }
    Ok(())
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_get_strictly_harder() {
        for pair in Difficulty::ALL.windows(2) {
            let (easier, harder) = (pair[0].config(), pair[1].config());
            assert!(harder.gravity > easier.gravity);
            assert!(harder.horizontal_speed > easier.horizontal_speed);
            assert!(harder.gap_size < easier.gap_size);
        }
    }

    #[test]
    fn test_presets_validate_on_classic_field() {
        for preset in Difficulty::ALL {
            assert_eq!(preset.config().validate(400.0, 600.0), Ok(()), "{preset}");
        }
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("easy".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!(" Med ".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(
            "nightmare".parse::<Difficulty>(),
            Err(ConfigError::UnknownPreset("nightmare".to_string()))
        );
    }

    #[test]
    fn test_difficulty_next_saturates() {
        assert_eq!(Difficulty::Easy.next(), Difficulty::Medium);
        assert_eq!(Difficulty::Medium.next(), Difficulty::Hard);
        assert_eq!(Difficulty::Hard.next(), Difficulty::Hard);
    }

    #[test]
    fn test_rejects_non_positive_speed_and_gravity() {
        let mut config = Difficulty::Easy.config();
        config.horizontal_speed = 0.0;
        assert_eq!(
            config.validate(400.0, 600.0),
            Err(ConfigError::NonPositive {
                field: "horizontal_speed",
                value: 0.0
            })
        );

        let mut config = Difficulty::Easy.config();
        config.gravity = -1.0;
        assert!(matches!(
            config.validate(400.0, 600.0),
            Err(ConfigError::NonPositive { field: "gravity", .. })
        ));

        let mut config = Difficulty::Easy.config();
        config.gravity = f32::NAN;
        assert!(matches!(
            config.validate(400.0, 600.0),
            Err(ConfigError::NonFinite { field: "gravity", .. })
        ));
    }

    #[test]
    fn test_rejects_downward_jump() {
        let mut config = Difficulty::Easy.config();
        config.jump_impulse = 3.0;
        assert_eq!(
            config.validate(400.0, 600.0),
            Err(ConfigError::DownwardImpulse { value: 3.0 })
        );
    }

    #[test]
    fn test_rejects_gap_larger_than_field() {
        let mut config = Difficulty::Easy.config();
        config.gap_size = 500.0;
        assert!(matches!(
            config.validate(400.0, 600.0),
            Err(ConfigError::GapTooLarge { .. })
        ));
        assert_eq!(config.gap_top_range(600.0), Some((50.0, 50.0)));

        config.gap_size = 501.0;
        assert_eq!(config.gap_top_range(600.0), None);
    }

    #[test]
    fn test_rejects_gap_narrower_than_bird() {
        let mut config = Difficulty::Easy.config();
        config.gap_size = BODY_HEIGHT;
        assert!(matches!(
            config.validate(400.0, 600.0),
            Err(ConfigError::GapTooNarrow { .. })
        ));
    }

    #[test]
    fn test_rejects_tight_spacing() {
        let mut config = Difficulty::Easy.config();
        config.spawn_spacing = PIPE_WIDTH - 1.0;
        assert!(matches!(
            config.validate(400.0, 600.0),
            Err(ConfigError::SpacingTooTight { .. })
        ));
    }

    #[test]
    fn test_rejects_tiny_field() {
        let config = Difficulty::Easy.config();
        assert!(matches!(
            config.validate(40.0, 600.0),
            Err(ConfigError::FieldTooSmall { .. })
        ));
        assert!(matches!(
            config.validate(400.0, 120.0),
            Err(ConfigError::FieldTooSmall { .. })
        ));
        assert!(matches!(
            config.validate(f32::INFINITY, 600.0),
            Err(ConfigError::FieldTooSmall { .. })
        ));
    }

    #[test]
    fn test_config_json_round_trip_fields() {
        let json = r#"{
            "gravity": 0.5,
            "jump_impulse": -9.0,
            "horizontal_speed": 2.5,
            "gap_size": 160.0,
            "spawn_spacing": 260.0
        }"#;
        let config = DifficultyConfig::from_json(json).unwrap();
        assert_eq!(config.gap_size, 160.0);
        assert_eq!(config.validate(400.0, 600.0), Ok(()));

        assert!(matches!(
            DifficultyConfig::from_json(r#"{"gravity": 0.5}"#),
            Err(LoadError::Json(_))
        ));
    }
}
