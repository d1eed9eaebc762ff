use mapbridge_core::codec::{color_to_value, float_value, nested_color, nested_path, path_to_value};
use mapbridge_core::{CodecError, Color, Mapping, MappingExt, Path};
use serde_json::{Value, json};

use crate::config::EntityDefaults;
use crate::entity::{Entity, EntityOptions, MapEntity};
use crate::handle::Handle;
use crate::kind::EntityKind;
use crate::stroke::{Cap, JointType, nested_cap, nested_joint_type};

#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    id: String,
    pub points: Path,
    pub z_index: f32,
    pub visible: bool,
    pub clickable: bool,
    pub color: Color,
    pub geodesic: bool,
    pub width: f32,
    pub start_cap: Cap,
    pub end_cap: Cap,
    pub joint_type: JointType,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolylineOptions {
    pub points: Option<Path>,
    pub z_index: Option<f32>,
    pub visible: Option<bool>,
    pub clickable: Option<bool>,
    pub color: Option<Color>,
    pub geodesic: Option<bool>,
    pub width: Option<f32>,
    pub start_cap: Option<Cap>,
    pub end_cap: Option<Cap>,
    pub joint_type: Option<JointType>,
}

impl EntityOptions for PolylineOptions {
    fn from_mapping(map: &Mapping) -> Result<Self, CodecError> {
        Ok(PolylineOptions {
            points: nested_path(map, "points")?,
            z_index: map.opt_f32("zIndex")?,
            visible: map.opt_bool("visible")?,
            clickable: map.opt_bool("clickable")?,
            color: nested_color(map, "color")?,
            geodesic: map.opt_bool("geodesic")?,
            width: map.opt_f32("width")?,
            start_cap: nested_cap(map, "startCap")?,
            end_cap: nested_cap(map, "endCap")?,
            joint_type: nested_joint_type(map, "jointType")?,
        })
    }

    fn missing_for_create(&self) -> Option<&'static str> {
        self.points.is_none().then_some("points")
    }
}

impl MapEntity for Polyline {
    const KIND: EntityKind = EntityKind::Polyline;

    type Options = PolylineOptions;

    fn create(id: &str, defaults: &EntityDefaults) -> Self {
        Polyline {
            id: id.to_string(),
            points: Vec::new(),
            z_index: 0.0,
            visible: true,
            clickable: false,
            color: defaults.stroke_color,
            geodesic: false,
            width: defaults.polyline_width,
            start_cap: Cap::Butt,
            end_cap: Cap::Butt,
            joint_type: JointType::Default,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, o: &PolylineOptions) {
        if let Some(points) = &o.points {
            self.points.clone_from(points);
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
        if let Some(color) = o.color {
            self.color = color;
        }
        if let Some(geodesic) = o.geodesic {
            self.geodesic = geodesic;
        }
        if let Some(width) = o.width {
            self.width = width;
        }
        if let Some(cap) = &o.start_cap {
            self.start_cap = cap.clone();
        }
        if let Some(cap) = &o.end_cap {
            self.end_cap = cap.clone();
        }
        if let Some(joint) = o.joint_type {
            self.joint_type = joint;
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "kind": Self::KIND.as_str(),
            "id": self.id,
            "points": path_to_value(&self.points),
            "zIndex": float_value(self.z_index),
            "visible": self.visible,
            "clickable": self.clickable,
            "color": color_to_value(&self.color),
            "geodesic": self.geodesic,
            "width": float_value(self.width),
            "startCap": self.start_cap.to_value(),
            "endCap": self.end_cap.to_value(),
            "jointType": self.joint_type.as_str(),
        })
    }

    fn into_entity(handle: Handle<Self>) -> Entity {
        Entity::Polyline(handle)
    }

    fn from_entity(entity: &Entity) -> Option<Handle<Self>> {
        match entity {
            Entity::Polyline(h) => Some(h.clone()),
            _ => None,
        }
    }
}
