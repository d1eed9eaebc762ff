use std::path::Path;

use mapbridge_core::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Bridge configuration, read from TOML.
///
/// ```toml
/// [defaults]
/// polyline_width = 4.0
/// heatmap_radius = 30
/// stroke_color = { r = 1.0, g = 0.0, b = 0.0, a = 1.0 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub defaults: EntityDefaults,
}

/// Initial styling of a newly created entity, before the request's own fields
/// are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDefaults {
    pub marker_anchor: (f32, f32),
    pub info_window_anchor: (f32, f32),
    pub polyline_width: f32,
    pub polygon_stroke_width: f32,
    pub circle_stroke_width: f32,
    pub stroke_color: Color,
    pub polygon_fill_color: Color,
    pub circle_fill_color: Color,
    pub heatmap_radius: u32,
    pub heatmap_opacity: f64,
    pub ground_overlay_anchor: (f32, f32),
    pub ground_overlay_zoom_level: f32,
}

impl Default for EntityDefaults {
    fn default() -> Self {
        EntityDefaults {
            marker_anchor: (0.5, 1.0),
            info_window_anchor: (0.5, 0.0),
            polyline_width: 10.0,
            polygon_stroke_width: 10.0,
            circle_stroke_width: 1.0,
            stroke_color: Color::BLACK,
            polygon_fill_color: Color::BLACK,
            circle_fill_color: Color::CLEAR,
            heatmap_radius: crate::tile_overlay::DEFAULT_RADIUS,
            heatmap_opacity: crate::tile_overlay::DEFAULT_OPACITY,
            ground_overlay_anchor: (0.5, 0.5),
            ground_overlay_zoom_level: 6.0,
        }
    }
}

impl BridgeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: BridgeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let radius = self.defaults.heatmap_radius;
        if !crate::tile_overlay::radius_in_range(radius) {
            return Err(ConfigError::Invalid {
                field: "defaults.heatmap_radius",
                reason: format!("{radius} is outside 10..50"),
            });
        }
        Ok(())
    }
}

/// Loads the configuration at `path`, falling back to defaults when the file
/// is missing or malformed.
pub fn load_config(path: impl AsRef<Path>) -> BridgeConfig {
    let path = path.as_ref();
    match BridgeConfig::from_file(path) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "using default bridge config");
            BridgeConfig::default()
        }
    }
}
