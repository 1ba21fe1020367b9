//! # Configuration
//!
//! Application constants, with defaults matching the study app, optionally
//! overridden from a YAML file.
//!
//! ## Example
//! ```yaml
//! max-count-per-track: 16
//! default-bpm: 90
//! octave-min: 3
//! ```
//! Keys left out keep their defaults.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ChordError;
use crate::timeline::DEFAULT_MAX_COUNT;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct AppConfig {
    /// Counts available on each compose track
    pub max_count_per_track: u32,
    pub default_bpm: u32,
    /// Length given to new events, in counts
    pub default_length: u32,
    pub default_octave: i32,
    /// Octave selector bounds
    pub octave_min: i32,
    pub octave_max: i32,
    /// Lowest and highest keys drawn on the keyboard (A0..C8)
    pub keyboard_min_midi: i32,
    pub keyboard_max_midi: i32,
    /// Sampled instrument requested from the player
    pub instrument: String,
    /// How long a played key stays highlighted
    pub highlight_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_count_per_track: DEFAULT_MAX_COUNT,
            default_bpm: 120,
            default_length: 1,
            default_octave: 4,
            octave_min: 2,
            octave_max: 6,
            keyboard_min_midi: 21,
            keyboard_max_midi: 108,
            instrument: "acoustic_grand_piano".to_string(),
            highlight_ms: 1000,
        }
    }
}

impl AppConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ChordError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: AppConfig =
            serde_yaml::from_str(yaml).map_err(|e| ChordError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ChordError> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<(), ChordError> {
        if self.max_count_per_track == 0 {
            return Err(ChordError::ConfigError(
                "max-count-per-track must be positive".to_string(),
            ));
        }
        if self.default_bpm == 0 {
            return Err(ChordError::ConfigError("default-bpm must be positive".to_string()));
        }
        if self.default_length == 0 || self.default_length > self.max_count_per_track {
            return Err(ChordError::ConfigError(format!(
                "default-length must be between 1 and {}",
                self.max_count_per_track
            )));
        }
        if self.octave_min > self.octave_max {
            return Err(ChordError::ConfigError(format!(
                "octave-min {} is above octave-max {}",
                self.octave_min, self.octave_max
            )));
        }
        if self.keyboard_min_midi > self.keyboard_max_midi {
            return Err(ChordError::ConfigError(format!(
                "keyboard-min-midi {} is above keyboard-max-midi {}",
                self.keyboard_min_midi, self.keyboard_max_midi
            )));
        }
        Ok(())
    }

    /// Clamp an octave selection into the configured range.
    pub fn clamp_octave(&self, octave: i32) -> i32 {
        octave.clamp(self.octave_min, self.octave_max)
    }
}
