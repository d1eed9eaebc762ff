use mapbridge_core::codec::{color_to_value, coordinate_to_value, float_value, nested_color, nested_coordinate};
use mapbridge_core::{CodecError, Color, Coordinate, Mapping, MappingExt};
use serde_json::{Value, json};

use crate::config::EntityDefaults;
use crate::entity::{Entity, EntityOptions, MapEntity};
use crate::handle::Handle;
use crate::kind::EntityKind;

#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    id: String,
    pub center: Coordinate,
    /// Metres.
    pub radius: f64,
    pub stroke_width: f32,
    pub stroke_color: Color,
    pub fill_color: Color,
    pub z_index: f32,
    pub visible: bool,
    pub clickable: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircleOptions {
    pub center: Option<Coordinate>,
    pub radius: Option<f64>,
    pub stroke_width: Option<f32>,
    pub stroke_color: Option<Color>,
    pub fill_color: Option<Color>,
    pub z_index: Option<f32>,
    pub visible: Option<bool>,
    pub clickable: Option<bool>,
}

impl EntityOptions for CircleOptions {
    fn from_mapping(map: &Mapping) -> Result<Self, CodecError> {
        Ok(CircleOptions {
            center: nested_coordinate(map, "center")?,
            radius: map.opt_f64("radius")?,
            stroke_width: map.opt_f32("strokeWidth")?,
            stroke_color: nested_color(map, "strokeColor")?,
            fill_color: nested_color(map, "fillColor")?,
            z_index: map.opt_f32("zIndex")?,
            visible: map.opt_bool("visible")?,
            clickable: map.opt_bool("clickable")?,
        })
    }

    fn missing_for_create(&self) -> Option<&'static str> {
        self.center.is_none().then_some("center")
    }
}

impl MapEntity for Circle {
    const KIND: EntityKind = EntityKind::Circle;

    type Options = CircleOptions;

    fn create(id: &str, defaults: &EntityDefaults) -> Self {
        Circle {
            id: id.to_string(),
            center: Coordinate::default(),
            radius: 0.0,
            stroke_width: defaults.circle_stroke_width,
            stroke_color: defaults.stroke_color,
            fill_color: defaults.circle_fill_color,
            z_index: 0.0,
            visible: true,
            clickable: false,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, o: &CircleOptions) {
        if let Some(center) = o.center {
            self.center = center;
        }
        if let Some(radius) = o.radius {
            self.radius = radius;
        }
        if let Some(width) = o.stroke_width {
            self.stroke_width = width;
        }
        if let Some(color) = o.stroke_color {
            self.stroke_color = color;
        }
        if let Some(color) = o.fill_color {
            self.fill_color = color;
        }
        if let Some(z) = o.z_index {
            self.z_index = z;
        }
        if let Some(visible) = o.visible {
            self.visible = visible;
        }
        if let Some(clickable) = o.clickable {
            self.clickable = clickable;
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "kind": Self::KIND.as_str(),
            "id": self.id,
            "center": coordinate_to_value(&self.center),
            "radius": self.radius,
            "strokeWidth": float_value(self.stroke_width),
            "strokeColor": color_to_value(&self.stroke_color),
            "fillColor": color_to_value(&self.fill_color),
            "zIndex": float_value(self.z_index),
            "visible": self.visible,
            "clickable": self.clickable,
        })
    }

    fn into_entity(handle: Handle<Self>) -> Entity {
        Entity::Circle(handle)
    }

    fn from_entity(entity: &Entity) -> Option<Handle<Self>> {
        match entity {
            Entity::Circle(h) => Some(h.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Circle::create("c", &EntityDefaults::default());
        assert_eq!(c.radius, 0.0);
        assert_eq!(c.stroke_width, 1.0);
        assert_eq!(c.stroke_color, Color::BLACK);
        assert_eq!(c.fill_color, Color::CLEAR);
    }

    #[test]
    fn radius_must_be_numeric() {
        let map = json!({"center": {"lat": 0, "lng": 0}, "radius": "100m"});
        let err = CircleOptions::from_mapping(map.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, CodecError::TypeMismatch { ref field, .. } if field == "radius"));
    }
}
