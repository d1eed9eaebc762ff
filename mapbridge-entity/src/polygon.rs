use mapbridge_core::codec::{
    color_to_value, float_value, holes_to_value, nested_color, nested_path, path_to_value,
    to_hole_sequence,
};
use mapbridge_core::{CodecError, Color, Mapping, MappingExt, Path};
use serde_json::{Value, json};

use crate::config::EntityDefaults;
use crate::entity::{Entity, EntityOptions, MapEntity};
use crate::handle::Handle;
use crate::kind::EntityKind;
use crate::stroke::{JointType, nested_joint_type};

/// Filled outline with optional holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    id: String,
    pub points: Path,
    pub holes: Vec<Path>,
    pub z_index: f32,
    pub visible: bool,
    pub clickable: bool,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub geodesic: bool,
    pub stroke_width: f32,
    pub stroke_joint_type: JointType,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolygonOptions {
    pub points: Option<Path>,
    pub holes: Option<Vec<Path>>,
    pub z_index: Option<f32>,
    pub visible: Option<bool>,
    pub clickable: Option<bool>,
    pub fill_color: Option<Color>,
    pub stroke_color: Option<Color>,
    pub geodesic: Option<bool>,
    pub stroke_width: Option<f32>,
    pub stroke_joint_type: Option<JointType>,
}

impl EntityOptions for PolygonOptions {
    fn from_mapping(map: &Mapping) -> Result<Self, CodecError> {
        let holes = match map.field("holes") {
            None => None,
            some => Some(to_hole_sequence(some).map_err(|e| e.within("holes"))?),
        };
        Ok(PolygonOptions {
            points: nested_path(map, "points")?,
            holes,
            z_index: map.opt_f32("zIndex")?,
            visible: map.opt_bool("visible")?,
            clickable: map.opt_bool("clickable")?,
            fill_color: nested_color(map, "fillColor")?,
            stroke_color: nested_color(map, "strokeColor")?,
            geodesic: map.opt_bool("geodesic")?,
            stroke_width: map.opt_f32("strokeWidth")?,
            stroke_joint_type: nested_joint_type(map, "strokeJointType")?,
        })
    }

    fn missing_for_create(&self) -> Option<&'static str> {
        self.points.is_none().then_some("points")
    }
}

impl MapEntity for Polygon {
    const KIND: EntityKind = EntityKind::Polygon;

    type Options = PolygonOptions;

    fn create(id: &str, defaults: &EntityDefaults) -> Self {
        Polygon {
            id: id.to_string(),
            points: Vec::new(),
            holes: Vec::new(),
            z_index: 0.0,
            visible: true,
            clickable: false,
            fill_color: defaults.polygon_fill_color,
            stroke_color: defaults.stroke_color,
            geodesic: false,
            stroke_width: defaults.polygon_stroke_width,
            stroke_joint_type: JointType::Default,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, o: &PolygonOptions) {
        if let Some(points) = &o.points {
            self.points.clone_from(points);
        }
        if let Some(holes) = &o.holes {
            self.holes.clone_from(holes);
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
        if let Some(color) = o.fill_color {
            self.fill_color = color;
        }
        if let Some(color) = o.stroke_color {
            self.stroke_color = color;
        }
        if let Some(geodesic) = o.geodesic {
            self.geodesic = geodesic;
        }
        if let Some(width) = o.stroke_width {
            self.stroke_width = width;
        }
        if let Some(joint) = o.stroke_joint_type {
            self.stroke_joint_type = joint;
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "kind": Self::KIND.as_str(),
            "id": self.id,
            "points": path_to_value(&self.points),
            "holes": holes_to_value(&self.holes),
            "zIndex": float_value(self.z_index),
            "visible": self.visible,
            "clickable": self.clickable,
            "fillColor": color_to_value(&self.fill_color),
            "strokeColor": color_to_value(&self.stroke_color),
            "geodesic": self.geodesic,
            "strokeWidth": float_value(self.stroke_width),
            "strokeJointType": self.stroke_joint_type.as_str(),
        })
    }

    fn into_entity(handle: Handle<Self>) -> Entity {
        Entity::Polygon(handle)
    }

    fn from_entity(entity: &Entity) -> Option<Handle<Self>> {
        match entity {
            Entity::Polygon(h) => Some(h.clone()),
            _ => None,
        }
    }
}
