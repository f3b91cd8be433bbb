//! Configuration system
//!
//! File-backed settings for the picker. Formats are chosen by extension:
//! `.toml` or `.ron`.

pub use serde::{Deserialize, Serialize};

use crate::scene::PickLayers;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_str_with_format(&contents, path)
    }

    /// Parse configuration text, using `path` only to pick the format
    fn from_str_with_format(contents: &str, path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Serialize configuration in the format implied by `path`
    fn to_string_with_format(&self, path: &str) -> Result<String, ConfigError> {
        if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = self.to_string_with_format(path)?;
        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Settings applied by [`crate::picking::Picker`] to every query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Only nodes whose layers intersect this mask are considered
    pub layer_mask: u32,

    /// Hits farther than this (collider-local distance) are dropped
    pub max_distance: Option<f32>,

    /// Whether per-collider pick distances cut off scene-wide picks
    pub respect_pick_distance: bool,
}

impl PickerConfig {
    /// Restrict picking to the given layers
    #[must_use]
    pub fn with_layer_mask(mut self, layers: PickLayers) -> Self {
        self.layer_mask = layers.bits();
        self
    }

    /// Drop hits beyond `distance`
    #[must_use]
    pub fn with_max_distance(mut self, distance: f32) -> Self {
        self.max_distance = Some(distance);
        self
    }

    /// Layer mask as flags; unknown bits are kept
    pub fn layers(&self) -> PickLayers {
        PickLayers::from_bits_retain(self.layer_mask)
    }

    /// Whether a hit at `distance` is within the configured range
    pub fn accepts_distance(&self, distance: f32) -> bool {
        self.max_distance.map_or(true, |max| distance <= max)
    }
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            layer_mask: PickLayers::ALL.bits(),
            max_distance: None,
            respect_pick_distance: true,
        }
    }
}

impl Config for PickerConfig {}
