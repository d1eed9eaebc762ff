//! Tile overlays backed by a heatmap tile provider.
//!
//! The heatmap is described entirely by data: weighted points, a blur radius,
//! an opacity and a color gradient. Rasterization happens on the native side.

use mapbridge_core::codec::{
    color_to_value, float_value, to_coordinate, to_indexed_color_sequence, to_number_sequence,
};
use mapbridge_core::{CodecError, Color, Coordinate, Mapping, MappingExt};
use serde_json::{Value, json};

use crate::config::EntityDefaults;
use crate::entity::{Entity, EntityOptions, MapEntity};
use crate::handle::Handle;
use crate::kind::EntityKind;

pub const DEFAULT_RADIUS: u32 = 20;
pub const DEFAULT_OPACITY: f64 = 0.7;
pub const DEFAULT_COLOR_MAP_SIZE: u32 = 1000;
pub const DEFAULT_INTENSITY: f64 = 1.0;

/// Blur radius in pixels must lie strictly between 10 and 50.
pub fn radius_in_range(radius: u32) -> bool {
    radius > 10 && radius < 50
}

/// A heatmap point with its intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedCoordinate {
    pub coordinate: Coordinate,
    pub intensity: f64,
}

impl WeightedCoordinate {
    /// Negative intensities are replaced by the default intensity.
    pub fn new(coordinate: Coordinate, intensity: f64) -> Self {
        let intensity = if intensity >= 0.0 {
            intensity
        } else {
            DEFAULT_INTENSITY
        };
        WeightedCoordinate {
            coordinate,
            intensity,
        }
    }

    fn from_value(value: &Value) -> Result<Self, CodecError> {
        let map = value
            .as_object()
            .ok_or_else(|| CodecError::mismatch("$", "mapping"))?;
        let intensity = map.opt_f64("intensity")?.unwrap_or(DEFAULT_INTENSITY);
        Ok(WeightedCoordinate::new(to_coordinate(map)?, intensity))
    }

    fn to_value(self) -> Value {
        json!({
            "lat": self.coordinate.latitude,
            "lng": self.coordinate.longitude,
            "intensity": self.intensity,
        })
    }
}

/// Color ramp mapping intensity fractions to colors.
///
/// Colors and start points pair up one to one; start points strictly increase.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    colors: Vec<Color>,
    start_points: Vec<f64>,
    color_map_size: u32,
}

impl Gradient {
    pub fn new(
        colors: Vec<Color>,
        start_points: Vec<f64>,
        color_map_size: u32,
    ) -> Result<Self, CodecError> {
        if colors.len() != start_points.len() {
            return Err(CodecError::invalid(
                "startPoints",
                format!(
                    "{} start points for {} colors",
                    start_points.len(),
                    colors.len()
                ),
            ));
        }
        if colors.is_empty() {
            return Err(CodecError::invalid("colors", "no colors defined"));
        }
        if let Some(i) = (1..start_points.len()).find(|&i| start_points[i] <= start_points[i - 1])
        {
            return Err(CodecError::invalid(
                format!("startPoints[{i}]"),
                "start points must strictly increase",
            ));
        }
        Ok(Gradient {
            colors,
            start_points,
            color_map_size,
        })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn start_points(&self) -> &[f64] {
        &self.start_points
    }

    pub fn color_map_size(&self) -> u32 {
        self.color_map_size
    }

    /// Color elements that fail to parse are skipped together with their
    /// start point, so only the raw sequence lengths have to agree.
    fn from_mapping(map: &Mapping) -> Result<Self, CodecError> {
        let raw_colors = map.require_sequence("colors")?;
        let raw_starts = to_number_sequence(map.require_sequence("startPoints")?)
            .map_err(|e| e.within("startPoints"))?;
        if raw_colors.len() != raw_starts.len() {
            return Err(CodecError::invalid(
                "startPoints",
                format!(
                    "{} start points for {} colors",
                    raw_starts.len(),
                    raw_colors.len()
                ),
            ));
        }
        let (colors, start_points) = to_indexed_color_sequence(raw_colors)
            .into_iter()
            .map(|(i, color)| (color, raw_starts[i]))
            .unzip();
        let size = map.opt_u32("colorMapSize")?.unwrap_or(DEFAULT_COLOR_MAP_SIZE);
        Gradient::new(colors, start_points, size)
    }

    fn to_value(&self) -> Value {
        json!({
            "colors": self.colors.iter().map(color_to_value).collect::<Vec<_>>(),
            "startPoints": self.start_points,
            "colorMapSize": self.color_map_size,
        })
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Gradient {
            colors: vec![
                Color::from_rgba8(102, 225, 0, 255),
                Color::from_rgba8(255, 0, 0, 255),
            ],
            start_points: vec![0.2, 1.0],
            color_map_size: DEFAULT_COLOR_MAP_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub data: Vec<WeightedCoordinate>,
    pub radius: u32,
    pub opacity: f64,
    pub gradient: Gradient,
}

impl Heatmap {
    fn to_value(&self) -> Value {
        json!({
            "weightedData": self.data.iter().map(|w| w.to_value()).collect::<Vec<_>>(),
            "radius": self.radius,
            "opacity": self.opacity,
            "gradient": self.gradient.to_value(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatmapOptions {
    pub data: Option<Vec<WeightedCoordinate>>,
    pub radius: Option<u32>,
    pub opacity: Option<f64>,
    pub gradient: Option<Gradient>,
}

impl HeatmapOptions {
    fn from_mapping(map: &Mapping) -> Result<Self, CodecError> {
        let data = match map.opt_sequence("weightedData")? {
            None => None,
            Some([]) => {
                return Err(CodecError::invalid("weightedData", "heatmap data is empty"));
            }
            Some(items) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        WeightedCoordinate::from_value(item)
                            .map_err(|e| e.within(&format!("weightedData[{i}]")))
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
        };
        let radius = map.opt_u32("radius")?;
        if let Some(r) = radius.filter(|r| !radius_in_range(*r)) {
            return Err(CodecError::invalid(
                "radius",
                format!("{r} is outside 10..50"),
            ));
        }
        let gradient = map
            .opt_mapping("gradient")?
            .map(|g| Gradient::from_mapping(g).map_err(|e| e.within("gradient")))
            .transpose()?;
        Ok(HeatmapOptions {
            data,
            radius,
            opacity: map.opt_f64("opacity")?,
            gradient,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileOverlay {
    id: String,
    pub heatmap: Heatmap,
    pub z_index: f32,
    pub visible: bool,
    pub transparency: f32,
    pub fade_in: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileOverlayOptions {
    pub provider: Option<HeatmapOptions>,
    pub z_index: Option<f32>,
    pub visible: Option<bool>,
    pub transparency: Option<f32>,
    pub fade_in: Option<bool>,
}

impl EntityOptions for TileOverlayOptions {
    fn from_mapping(map: &Mapping) -> Result<Self, CodecError> {
        let provider = map
            .opt_mapping("tileProvider")?
            .map(|p| HeatmapOptions::from_mapping(p).map_err(|e| e.within("tileProvider")))
            .transpose()?;
        Ok(TileOverlayOptions {
            provider,
            z_index: map.opt_f32("zIndex")?,
            visible: map.opt_bool("visible")?,
            transparency: map.opt_f32("transparency")?,
            fade_in: map.opt_bool("fadeIn")?,
        })
    }

    fn missing_for_create(&self) -> Option<&'static str> {
        match &self.provider {
            None => Some("tileProvider"),
            Some(p) if p.data.is_none() => Some("tileProvider.weightedData"),
            Some(_) => None,
        }
    }
}

impl MapEntity for TileOverlay {
    const KIND: EntityKind = EntityKind::TileOverlay;

    type Options = TileOverlayOptions;

    fn create(id: &str, defaults: &EntityDefaults) -> Self {
        TileOverlay {
            id: id.to_string(),
            heatmap: Heatmap {
                data: Vec::new(),
                radius: defaults.heatmap_radius,
                opacity: defaults.heatmap_opacity,
                gradient: Gradient::default(),
            },
            z_index: 0.0,
            visible: true,
            transparency: 0.0,
            fade_in: true,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, o: &TileOverlayOptions) {
        if let Some(p) = &o.provider {
            if let Some(data) = &p.data {
                self.heatmap.data.clone_from(data);
            }
            if let Some(radius) = p.radius {
                self.heatmap.radius = radius;
            }
            if let Some(opacity) = p.opacity {
                self.heatmap.opacity = opacity;
            }
            if let Some(gradient) = &p.gradient {
                self.heatmap.gradient = gradient.clone();
            }
        }
        if let Some(z) = o.z_index {
            self.z_index = z;
        }
        if let Some(visible) = o.visible {
            self.visible = visible;
        }
        if let Some(transparency) = o.transparency {
            self.transparency = transparency;
        }
        if let Some(fade_in) = o.fade_in {
            self.fade_in = fade_in;
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "kind": Self::KIND.as_str(),
            "id": self.id,
            "tileProvider": self.heatmap.to_value(),
            "zIndex": float_value(self.z_index),
            "visible": self.visible,
            "transparency": float_value(self.transparency),
            "fadeIn": self.fade_in,
        })
    }

    fn into_entity(handle: Handle<Self>) -> Entity {
        Entity::TileOverlay(handle)
    }

    fn from_entity(entity: &Entity) -> Option<Handle<Self>> {
        match entity {
            Entity::TileOverlay(h) => Some(h.clone()),
            _ => None,
        }
    }
}
