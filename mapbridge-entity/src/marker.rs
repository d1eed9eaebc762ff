use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use mapbridge_core::codec::{coordinate_to_value, float_value, nested_coordinate};
use mapbridge_core::{CodecError, Coordinate, Mapping, MappingExt};
use serde_json::{Value, json};

use crate::config::EntityDefaults;
use crate::entity::{Entity, EntityOptions, MapEntity};
use crate::handle::Handle;
use crate::kind::EntityKind;

#[derive(Debug, Clone, PartialEq)]
pub enum MarkerIcon {
    Default,
    /// Default pin tinted with a hue in degrees.
    Hue(f32),
    /// Bundled image asset.
    Asset { path: String, name: String, scale: f32 },
    /// Base64-encoded PNG, passed through undecoded.
    Bytes(String),
}

impl MarkerIcon {
    /// At most one icon form may appear in a request.
    fn from_mapping(map: &Mapping) -> Result<Option<Self>, CodecError> {
        let hue = map.opt_f32("iconHue")?;
        let bytes = map.opt_str("iconBytes")?;
        let path = map.opt_str("icon")?;
        let name = map.opt_str("iconAssetName")?;
        let scale = map.opt_f32("iconScale")?;

        let asset = path.is_some() || name.is_some();
        let forms = [
            hue.map(|_| "iconHue"),
            bytes.map(|_| "iconBytes"),
            asset.then_some("icon"),
        ];
        let given: Vec<&str> = forms.into_iter().flatten().collect();
        if given.len() > 1 {
            return Err(CodecError::invalid(
                given[1],
                format!("conflicts with {}", given[0]),
            ));
        }
        if scale.is_some() && !asset {
            return Err(CodecError::invalid("iconScale", "iconScale given without icon"));
        }

        if let Some(hue) = hue {
            return Ok(Some(MarkerIcon::Hue(hue)));
        }
        if let Some(bytes) = bytes {
            STANDARD
                .decode(bytes)
                .map_err(|e| CodecError::invalid("iconBytes", e.to_string()))?;
            return Ok(Some(MarkerIcon::Bytes(bytes.to_string())));
        }
        Ok(asset.then(|| {
            let path = path.or(name).unwrap_or_default().to_string();
            let name = name.map(str::to_string).unwrap_or_else(|| path.clone());
            MarkerIcon::Asset {
                path,
                name,
                scale: scale.unwrap_or(1.0),
            }
        }))
    }

    fn write_to(&self, map: &mut Mapping) {
        match self {
            MarkerIcon::Default => {}
            MarkerIcon::Hue(hue) => {
                map.insert("iconHue".into(), float_value(*hue));
            }
            MarkerIcon::Asset { path, name, scale } => {
                map.insert("icon".into(), json!(path));
                map.insert("iconAssetName".into(), json!(name));
                map.insert("iconScale".into(), float_value(*scale));
            }
            MarkerIcon::Bytes(bytes) => {
                map.insert("iconBytes".into(), json!(bytes));
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    id: String,
    pub position: Coordinate,
    pub z_index: f32,
    pub title: String,
    pub snippet: String,
    pub draggable: bool,
    pub visible: bool,
    pub flat: bool,
    pub rotation: f32,
    pub alpha: f32,
    pub anchor: (f32, f32),
    pub info_window_anchor: (f32, f32),
    pub icon: MarkerIcon,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerOptions {
    pub position: Option<Coordinate>,
    pub z_index: Option<f32>,
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub draggable: Option<bool>,
    pub visible: Option<bool>,
    pub flat: Option<bool>,
    pub rotation: Option<f32>,
    pub alpha: Option<f32>,
    pub anchor_u: Option<f32>,
    pub anchor_v: Option<f32>,
    pub info_window_anchor_u: Option<f32>,
    pub info_window_anchor_v: Option<f32>,
    pub icon: Option<MarkerIcon>,
}

impl EntityOptions for MarkerOptions {
    fn from_mapping(map: &Mapping) -> Result<Self, CodecError> {
        Ok(MarkerOptions {
            position: nested_coordinate(map, "position")?,
            z_index: map.opt_f32("zIndex")?,
            title: map.opt_str("title")?.map(str::to_string),
            snippet: map.opt_str("snippet")?.map(str::to_string),
            draggable: map.opt_bool("draggable")?,
            visible: map.opt_bool("visible")?,
            flat: map.opt_bool("flat")?,
            rotation: map.opt_f32("rotation")?,
            alpha: map.opt_f32("alpha")?,
            anchor_u: map.opt_f32("anchorU")?,
            anchor_v: map.opt_f32("anchorV")?,
            info_window_anchor_u: map.opt_f32("infoWindowAnchorU")?,
            info_window_anchor_v: map.opt_f32("infoWindowAnchorV")?,
            icon: MarkerIcon::from_mapping(map)?,
        })
    }

    fn missing_for_create(&self) -> Option<&'static str> {
        self.position.is_none().then_some("position")
    }
}

impl MapEntity for Marker {
    const KIND: EntityKind = EntityKind::Marker;

    type Options = MarkerOptions;

    fn create(id: &str, defaults: &EntityDefaults) -> Self {
        Marker {
            id: id.to_string(),
            position: Coordinate::default(),
            z_index: 0.0,
            title: String::new(),
            snippet: String::new(),
            draggable: false,
            visible: true,
            flat: false,
            rotation: 0.0,
            alpha: 1.0,
            anchor: defaults.marker_anchor,
            info_window_anchor: defaults.info_window_anchor,
            icon: MarkerIcon::Default,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn apply(&mut self, o: &MarkerOptions) {
        if let Some(position) = o.position {
            self.position = position;
        }
        if let Some(z) = o.z_index {
            self.z_index = z;
        }
        if let Some(title) = &o.title {
            self.title.clone_from(title);
        }
        if let Some(snippet) = &o.snippet {
            self.snippet.clone_from(snippet);
        }
        if let Some(draggable) = o.draggable {
            self.draggable = draggable;
        }
        if let Some(visible) = o.visible {
            self.visible = visible;
        }
        if let Some(flat) = o.flat {
            self.flat = flat;
        }
        if let Some(rotation) = o.rotation {
            self.rotation = rotation;
        }
        if let Some(alpha) = o.alpha {
            self.alpha = alpha;
        }
        if let Some(u) = o.anchor_u {
            self.anchor.0 = u;
        }
        if let Some(v) = o.anchor_v {
            self.anchor.1 = v;
        }
        if let Some(u) = o.info_window_anchor_u {
            self.info_window_anchor.0 = u;
        }
        if let Some(v) = o.info_window_anchor_v {
            self.info_window_anchor.1 = v;
        }
        if let Some(icon) = &o.icon {
            self.icon = icon.clone();
        }
    }

    fn to_value(&self) -> Value {
        let mut value = json!({
            "kind": Self::KIND.as_str(),
            "id": self.id,
            "position": coordinate_to_value(&self.position),
            "zIndex": float_value(self.z_index),
            "title": self.title,
            "snippet": self.snippet,
            "draggable": self.draggable,
            "visible": self.visible,
            "flat": self.flat,
            "rotation": float_value(self.rotation),
            "alpha": float_value(self.alpha),
            "anchorU": float_value(self.anchor.0),
            "anchorV": float_value(self.anchor.1),
            "infoWindowAnchorU": float_value(self.info_window_anchor.0),
            "infoWindowAnchorV": float_value(self.info_window_anchor.1),
        });
        if let Value::Object(map) = &mut value {
            self.icon.write_to(map);
        }
        value
    }

    fn into_entity(handle: Handle<Self>) -> Entity {
        Entity::Marker(handle)
    }

    fn from_entity(entity: &Entity) -> Option<Handle<Self>> {
        match entity {
            Entity::Marker(h) => Some(h.clone()),
            _ => None,
        }
    }
}
