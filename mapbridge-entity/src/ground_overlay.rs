use mapbridge_core::codec::{bounds_to_value, coordinate_to_value, float_value, nested_coordinate, to_bounds};
use mapbridge_core::{Bounds, CodecError, Coordinate, Mapping, MappingExt};
use serde_json::{Value, json};

use crate::config::EntityDefaults;
use crate::entity::{Entity, EntityOptions, MapEntity};
use crate::handle::Handle;
use crate::kind::EntityKind;

/// Where a ground overlay image is laid on the map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Stretched over a bounds rectangle.
    Bounds(Bounds),
    /// Anchored at a point, sized by the zoom level it is drawn at.
    Position(Coordinate),
    /// Anchored at a point with a ground size in metres. Without a height the
    /// image keeps its aspect ratio.
    Sized {
        position: Coordinate,
        width: f32,
        height: Option<f32>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroundOverlay {
    id: String,
    pub placement: Placement,
    pub zoom_level: f32,
    pub image: Option<String>,
    pub anchor: (f32, f32),
    pub bearing: f32,
    pub transparency: f32,
    pub z_index: f32,
    pub clickable: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroundOverlayOptions {
    pub bounds: Option<Bounds>,
    pub position: Option<Coordinate>,
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub zoom_level: Option<f32>,
    pub image: Option<String>,
    pub anchor_u: Option<f32>,
    pub anchor_v: Option<f32>,
    pub bearing: Option<f32>,
    pub transparency: Option<f32>,
    pub z_index: Option<f32>,
    pub clickable: Option<bool>,
    pub visible: Option<bool>,
}

impl EntityOptions for GroundOverlayOptions {
    fn from_mapping(map: &Mapping) -> Result<Self, CodecError> {
        let bounds = map
            .opt_mapping("bounds")?
            .map(|b| to_bounds(b).map_err(|e| e.within("bounds")))
            .transpose()?;
        let position = nested_coordinate(map, "position")?;
        let width = map.opt_f32("width")?;
        let height = map.opt_f32("height")?;
        if height.is_some() && width.is_none() {
            return Err(CodecError::invalid("height", "height given without width"));
        }
        if width.is_some() && position.is_none() {
            return Err(CodecError::invalid("width", "width given without position"));
        }
        Ok(GroundOverlayOptions {
            bounds,
            position,
            width,
            height,
            zoom_level: map.opt_f32("zoomLevel")?,
            image: map.opt_str("image")?.map(str::to_string),
            anchor_u: map.opt_f32("anchorU")?,
            anchor_v: map.opt_f32("anchorV")?,
            bearing: map.opt_f32("bearing")?,
            transparency: map.opt_f32("transparency")?,
            z_index: map.opt_f32("zIndex")?,
            clickable: map.opt_bool("clickable")?,
            visible: map.opt_bool("visible")?,
        })
    }

    fn missing_for_create(&self) -> Option<&'static str> {
        (self.bounds.is_none() && self.position.is_none()).then_some("bounds")
    }
}

impl MapEntity for GroundOverlay {
    const KIND: EntityKind = EntityKind::GroundOverlay;

    type Options = GroundOverlayOptions;

    fn create(id: &str, defaults: &EntityDefaults) -> Self {
        GroundOverlay {
            id: id.to_string(),
            placement: Placement::Position(Coordinate::default()),
            zoom_level: defaults.ground_overlay_zoom_level,
            image: None,
            anchor: defaults.ground_overlay_anchor,
            bearing: 0.0,
            transparency: 0.0,
            z_index: 0.0,
            clickable: true,
            visible: true,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    /// Bounds take precedence when both placement forms are given.
    fn apply(&mut self, o: &GroundOverlayOptions) {
        if let Some(bounds) = o.bounds {
            self.placement = Placement::Bounds(bounds);
        } else if let Some(position) = o.position {
            self.placement = match o.width {
                Some(width) => Placement::Sized {
                    position,
                    width,
                    height: o.height,
                },
                None => Placement::Position(position),
            };
        }
        if let Some(zoom) = o.zoom_level {
            self.zoom_level = zoom;
        }
        if let Some(image) = &o.image {
            self.image = Some(image.clone());
        }
        if let Some(u) = o.anchor_u {
            self.anchor.0 = u;
        }
        if let Some(v) = o.anchor_v {
            self.anchor.1 = v;
        }
        if let Some(bearing) = o.bearing {
            self.bearing = bearing;
        }
        if let Some(transparency) = o.transparency {
            self.transparency = transparency;
        }
        if let Some(z) = o.z_index {
            self.z_index = z;
        }
        if let Some(clickable) = o.clickable {
            self.clickable = clickable;
        }
        if let Some(visible) = o.visible {
            self.visible = visible;
        }
    }

    fn to_value(&self) -> Value {
        let mut value = json!({
            "kind": Self::KIND.as_str(),
            "id": self.id,
            "zoomLevel": float_value(self.zoom_level),
            "image": self.image,
            "anchorU": float_value(self.anchor.0),
            "anchorV": float_value(self.anchor.1),
            "bearing": float_value(self.bearing),
            "transparency": float_value(self.transparency),
            "zIndex": float_value(self.z_index),
            "clickable": self.clickable,
            "visible": self.visible,
        });
        if let Value::Object(map) = &mut value {
            match &self.placement {
                Placement::Bounds(b) => map.insert("bounds".into(), bounds_to_value(b)),
                Placement::Position(p) => map.insert("position".into(), coordinate_to_value(p)),
                Placement::Sized {
                    position,
                    width,
                    height,
                } => {
                    map.insert("position".into(), coordinate_to_value(position));
                    if let Some(h) = height {
                        map.insert("height".into(), float_value(*h));
                    }
                    map.insert("width".into(), float_value(*width))
                }
            };
        }
        value
    }

    fn into_entity(handle: Handle<Self>) -> Entity {
        Entity::GroundOverlay(handle)
    }

    fn from_entity(entity: &Entity) -> Option<Handle<Self>> {
        match entity {
            Entity::GroundOverlay(h) => Some(h.clone()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(v: Value) -> GroundOverlayOptions {
        GroundOverlayOptions::from_mapping(v.as_object().unwrap()).unwrap()
    }

    #[test]
    fn placement_forms() {
        let mut g = GroundOverlay::create("g", &EntityDefaults::default());
        assert_eq!(g.zoom_level, 6.0);
        assert_eq!(g.anchor, (0.5, 0.5));

        g.apply(&options(json!({"position": {"lat": 1, "lng": 2}, "zoomLevel": 9})));
        assert_eq!(g.placement, Placement::Position(Coordinate::new(1.0, 2.0)));
        assert_eq!(g.zoom_level, 9.0);

        g.apply(&options(json!({
            "bounds": {"southwest": {"lat": 0, "lng": 0}, "northeast": {"lat": 1, "lng": 1}},
            "position": {"lat": 5, "lng": 5}
        })));
        assert!(matches!(g.placement, Placement::Bounds(_)));
    }

    #[test]
    fn sized_placement() {
        let mut g = GroundOverlay::create("g", &EntityDefaults::default());
        g.apply(&options(json!({"position": {"lat": 1, "lng": 2}, "width": 500})));
        assert_eq!(
            g.placement,
            Placement::Sized {
                position: Coordinate::new(1.0, 2.0),
                width: 500.0,
                height: None,
            }
        );

        g.apply(&options(json!({"position": {"lat": 1, "lng": 2}, "width": 500, "height": 250.5})));
        let rendered = g.to_value();
        assert_eq!(rendered["width"], 500.0);
        assert_eq!(rendered["height"], 250.5);
        let back = options(rendered);
        assert_eq!(back.width, Some(500.0));
        assert_eq!(back.height, Some(250.5));

        // A position alone switches back to zoom-level sizing.
        g.apply(&options(json!({"position": {"lat": 3, "lng": 4}})));
        assert_eq!(g.placement, Placement::Position(Coordinate::new(3.0, 4.0)));
    }

    #[test]
    fn size_needs_an_anchor() {
        let err = GroundOverlayOptions::from_mapping(json!({"width": 10}).as_object().unwrap())
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidValue { ref field, .. } if field == "width"));

        let err = GroundOverlayOptions::from_mapping(
            json!({"position": {"lat": 0, "lng": 0}, "height": 10})
                .as_object()
                .unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::InvalidValue { ref field, .. } if field == "height"));
    }

    #[test]
    fn create_requires_placement() {
        assert_eq!(options(json!({"image": "a.png"})).missing_for_create(), Some("bounds"));
        assert_eq!(
            options(json!({"position": {"lat": 0, "lng": 0}})).missing_for_create(),
            None
        );
    }

    #[test]
    fn bounds_error_path() {
        let err = GroundOverlayOptions::from_mapping(
            json!({"bounds": {"southwest": {"lat": 0, "lng": 0}}})
                .as_object()
                .unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, CodecError::MissingField(ref f) if f == "bounds.northeast"));
    }
}
