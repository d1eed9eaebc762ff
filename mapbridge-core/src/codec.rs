//! Conversion between structured values and geometry/styling types.
//!
//! Every `to_*` parser has a `*_to_value` builder that is its structural
//! inverse, and a `render_*` wrapper producing text for the scripting layer.

use serde_json::{Value, json};
use tracing::warn;

use crate::error::CodecError;
use crate::geometry::{Bounds, CameraState, Color, Coordinate, Location, Path};
use crate::value::{Mapping, MappingExt};

pub const LAT: &str = "lat";
pub const LNG: &str = "lng";

/// Reads `lat` and `lng`.
pub fn to_coordinate(map: &Mapping) -> Result<Coordinate, CodecError> {
    Ok(Coordinate::new(map.require_f64(LAT)?, map.require_f64(LNG)?))
}

/// Reads a coordinate from a value that must be a mapping.
pub fn coordinate_from_value(value: &Value) -> Result<Coordinate, CodecError> {
    let map = value
        .as_object()
        .ok_or_else(|| CodecError::mismatch("$", "mapping"))?;
    to_coordinate(map)
}

/// Reads the coordinate nested under `key`.
pub fn nested_coordinate(map: &Mapping, key: &str) -> Result<Option<Coordinate>, CodecError> {
    map.opt_mapping(key)?
        .map(|inner| to_coordinate(inner).map_err(|e| e.within(key)))
        .transpose()
}

pub fn to_bounds(map: &Mapping) -> Result<Bounds, CodecError> {
    let southwest = nested_coordinate(map, "southwest")?
        .ok_or_else(|| CodecError::missing("southwest"))?;
    let northeast = nested_coordinate(map, "northeast")?
        .ok_or_else(|| CodecError::missing("northeast"))?;
    Ok(Bounds::new(southwest, northeast))
}

/// Reads `target`, `zoom`, `bearing` and `tilt`. Only the target is required.
pub fn to_camera_state(map: &Mapping) -> Result<CameraState, CodecError> {
    let target =
        nested_coordinate(map, "target")?.ok_or_else(|| CodecError::missing("target"))?;
    Ok(CameraState::new(
        target,
        map.opt_f32("zoom")?.unwrap_or(0.0),
        map.opt_f32("bearing")?.unwrap_or(0.0),
        map.opt_f32("tilt")?.unwrap_or(0.0),
    ))
}

fn channel(map: &Mapping, short: &str, long: &str, default: f32) -> Result<f32, CodecError> {
    match map.opt_f32(short)? {
        Some(v) => Ok(v),
        None => Ok(map.opt_f32(long)?.unwrap_or(default)),
    }
}

/// Reads `r`, `g`, `b`, `a` (or `red`, `green`, `blue`, `alpha`).
///
/// Absent channels default to opaque black. A channel of the wrong shape is
/// still a `TypeMismatch`.
pub fn to_color(map: &Mapping) -> Result<Color, CodecError> {
    Ok(Color::rgba(
        channel(map, "r", "red", 0.0)?,
        channel(map, "g", "green", 0.0)?,
        channel(map, "b", "blue", 0.0)?,
        channel(map, "a", "alpha", 1.0)?,
    ))
}

/// Reads the color nested under `key`.
pub fn nested_color(map: &Mapping, key: &str) -> Result<Option<Color>, CodecError> {
    map.opt_mapping(key)?
        .map(|inner| to_color(inner).map_err(|e| e.within(key)))
        .transpose()
}

/// Maps [`to_color`] over `items`, skipping elements that are not mappings
/// or fail to parse.
pub fn to_color_sequence(items: &[Value]) -> Vec<Color> {
    to_indexed_color_sequence(items)
        .into_iter()
        .map(|(_, color)| color)
        .collect()
}

/// Like [`to_color_sequence`], but keeps each color's position in `items` so
/// callers can drop values paired with a skipped element.
pub fn to_indexed_color_sequence(items: &[Value]) -> Vec<(usize, Color)> {
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let Some(map) = item.as_object() else {
                warn!(index = i, "skipping non-mapping color element");
                return None;
            };
            match to_color(map) {
                Ok(color) => Some((i, color)),
                Err(e) => {
                    warn!(index = i, error = %e, "skipping malformed color element");
                    None
                }
            }
        })
        .collect()
}

pub fn to_path(items: &[Value]) -> Result<Path, CodecError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| coordinate_from_value(item).map_err(|e| e.within(&format!("[{i}]"))))
        .collect()
}

/// Reads the path nested under `key`.
pub fn nested_path(map: &Mapping, key: &str) -> Result<Option<Path>, CodecError> {
    map.opt_sequence(key)?
        .map(|items| to_path(items).map_err(|e| e.within(key)))
        .transpose()
}

/// Absent (or null) yields no holes; otherwise a sequence of paths.
pub fn to_hole_sequence(value: Option<&Value>) -> Result<Vec<Path>, CodecError> {
    let items = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(CodecError::mismatch("$", "sequence")),
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let at = format!("[{i}]");
            let inner = item
                .as_array()
                .ok_or_else(|| CodecError::mismatch(at.clone(), "sequence"))?;
            to_path(inner).map_err(|e| e.within(&at))
        })
        .collect()
}

pub fn to_number_sequence(items: &[Value]) -> Result<Vec<f64>, CodecError> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_f64()
                .ok_or_else(|| CodecError::mismatch(format!("[{i}]"), "number"))
        })
        .collect()
}

/// Reads a location fix. Unknown accuracy, speed and course default to -1.
pub fn to_location(map: &Mapping) -> Result<Location, CodecError> {
    let timestamp = match map.field("timestamp") {
        None => 0,
        Some(v) => v
            .as_i64()
            .or_else(|| v.as_f64().map(|f| f as i64))
            .ok_or_else(|| CodecError::mismatch("timestamp", "number"))?,
    };
    Ok(Location {
        coordinate: to_coordinate(map)?,
        timestamp,
        horizontal_accuracy: map.opt_f64("horizontalAccuracy")?.unwrap_or(-1.0),
        speed: map.opt_f32("speed")?.unwrap_or(-1.0),
        course: map.opt_f32("course")?.unwrap_or(-1.0),
    })
}

/// Widens an `f32` through its shortest decimal form so rendered text reads
/// `0.1` rather than `0.10000000149011612`.
pub fn float_value(x: f32) -> Value {
    json!(x.to_string().parse::<f64>().unwrap_or(f64::from(x)))
}

pub fn coordinate_to_value(c: &Coordinate) -> Value {
    json!({ "lat": c.latitude, "lng": c.longitude })
}

pub fn path_to_value(path: &[Coordinate]) -> Value {
    Value::Array(path.iter().map(coordinate_to_value).collect())
}

pub fn holes_to_value(holes: &[Path]) -> Value {
    Value::Array(holes.iter().map(|h| path_to_value(h)).collect())
}

pub fn bounds_to_value(b: &Bounds) -> Value {
    json!({
        "southwest": coordinate_to_value(&b.southwest),
        "northeast": coordinate_to_value(&b.northeast),
    })
}

pub fn camera_state_to_value(s: &CameraState) -> Value {
    json!({
        "target": coordinate_to_value(&s.target),
        "zoom": float_value(s.zoom),
        "bearing": float_value(s.bearing),
        "tilt": float_value(s.tilt),
    })
}

pub fn color_to_value(c: &Color) -> Value {
    json!({
        "r": float_value(c.r),
        "g": float_value(c.g),
        "b": float_value(c.b),
        "a": float_value(c.a),
    })
}

pub fn number_sequence_to_value(numbers: &[f64]) -> Value {
    json!(numbers)
}

pub fn location_to_value(l: &Location) -> Value {
    json!({
        "lat": l.coordinate.latitude,
        "lng": l.coordinate.longitude,
        "timestamp": l.timestamp,
        "horizontalAccuracy": l.horizontal_accuracy,
        "speed": float_value(l.speed),
        "course": float_value(l.course),
    })
}

pub fn render_coordinate(c: &Coordinate) -> String {
    coordinate_to_value(c).to_string()
}

pub fn render_path(path: &[Coordinate]) -> String {
    path_to_value(path).to_string()
}

pub fn render_holes(holes: &[Path]) -> String {
    holes_to_value(holes).to_string()
}

pub fn render_bounds(b: &Bounds) -> String {
    bounds_to_value(b).to_string()
}

pub fn render_camera_state(s: &CameraState) -> String {
    camera_state_to_value(s).to_string()
}

pub fn render_color(c: &Color) -> String {
    color_to_value(c).to_string()
}

pub fn render_number_sequence(numbers: &[f64]) -> String {
    number_sequence_to_value(numbers).to_string()
}

pub fn render_location(l: &Location) -> String {
    location_to_value(l).to_string()
}
