//! Line caps and joints shared by polylines and polygon outlines.

use mapbridge_core::codec::float_value;
use mapbridge_core::{CodecError, Mapping, MappingExt};
use serde_json::{Value, json};

pub const DEFAULT_CAP_REF_WIDTH: f32 = 10.0;

/// Shape drawn at the start or end vertex of a polyline.
///
/// On the wire a plain cap is its name (`"round"`). A custom cap is a mapping
/// `{"type": "custom", "image": <asset path>, "refWidth": <px>}`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cap {
    #[default]
    Butt,
    Round,
    Square,
    /// Bitmap centered on the vertex, scaled against `ref_width`.
    Custom { image: String, ref_width: f32 },
}

impl Cap {
    fn named(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "butt" => Some(Cap::Butt),
            "round" => Some(Cap::Round),
            "square" => Some(Cap::Square),
            _ => None,
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, CodecError> {
        match value {
            Value::String(name) => Cap::named(name)
                .ok_or_else(|| CodecError::invalid("$", format!("unknown cap {name:?}"))),
            Value::Object(map) => {
                let kind = map.require_str("type")?;
                if !kind.eq_ignore_ascii_case("custom") {
                    return Cap::named(kind)
                        .ok_or_else(|| CodecError::invalid("type", format!("unknown cap {kind:?}")));
                }
                Ok(Cap::Custom {
                    image: map.require_str("image")?.to_string(),
                    ref_width: map.opt_f32("refWidth")?.unwrap_or(DEFAULT_CAP_REF_WIDTH),
                })
            }
            _ => Err(CodecError::mismatch("$", "string or mapping")),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Cap::Butt => json!("butt"),
            Cap::Round => json!("round"),
            Cap::Square => json!("square"),
            Cap::Custom { image, ref_width } => json!({
                "type": "custom",
                "image": image,
                "refWidth": float_value(*ref_width),
            }),
        }
    }
}

/// Reads the cap under `key`, prefixing errors with it.
pub fn nested_cap(map: &Mapping, key: &str) -> Result<Option<Cap>, CodecError> {
    map.field(key)
        .map(|v| Cap::from_value(v).map_err(|e| e.within(key)))
        .transpose()
}

/// How interior vertices of a stroke are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JointType {
    #[default]
    Default,
    Bevel,
    Round,
}

impl JointType {
    pub const ALL: [JointType; 3] = [JointType::Default, JointType::Bevel, JointType::Round];

    /// Maps the SDK's numeric joint code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(JointType::Default),
            1 => Some(JointType::Bevel),
            2 => Some(JointType::Round),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JointType::Default => "default",
            JointType::Bevel => "bevel",
            JointType::Round => "round",
        }
    }

    /// Accepts the name (any case) or the numeric code.
    pub fn from_value(value: &Value) -> Result<Self, CodecError> {
        if let Some(name) = value.as_str() {
            return JointType::ALL
                .into_iter()
                .find(|j| j.as_str().eq_ignore_ascii_case(name))
                .ok_or_else(|| CodecError::invalid("$", format!("unknown joint type {name:?}")));
        }
        let code = value
            .as_u64()
            .ok_or_else(|| CodecError::mismatch("$", "string or joint code"))?;
        u32::try_from(code)
            .ok()
            .and_then(JointType::from_code)
            .ok_or_else(|| CodecError::invalid("$", format!("unknown joint code {code}")))
    }
}

/// Reads the joint type under `key`, prefixing errors with it.
pub fn nested_joint_type(
    map: &Mapping,
    key: &str,
) -> Result<Option<JointType>, CodecError> {
    map.field(key)
        .map(|v| JointType::from_value(v).map_err(|e| e.within(key)))
        .transpose()
}
