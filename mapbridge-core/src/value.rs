//! The structured wire value exchanged with the scripting layer.
//!
//! Payloads are JSON text. Parsing keeps key order (`preserve_order`) so that a
//! rendered mapping lists its fields in the order they were written.

use serde_json::Value;

use crate::error::CodecError;

/// Recursive scalar / sequence / mapping value.
pub type StructuredValue = Value;

/// String-keyed mapping of structured values.
pub type Mapping = serde_json::Map<String, Value>;

/// Parses `text` as a mapping.
///
/// Syntax errors are `MalformedPayload`; well-formed text of another shape is a
/// `TypeMismatch` at the root.
pub fn parse_mapping(text: &str) -> Result<Mapping, CodecError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Object(map) => Ok(map),
        _ => Err(CodecError::mismatch("$", "mapping")),
    }
}

/// Parses `text` as a sequence.
pub fn parse_sequence(text: &str) -> Result<Vec<Value>, CodecError> {
    match serde_json::from_str::<Value>(text)? {
        Value::Array(items) => Ok(items),
        _ => Err(CodecError::mismatch("$", "sequence")),
    }
}

/// Renders a mapping back to text.
pub fn render_mapping(mapping: &Mapping) -> String {
    Value::Object(mapping.clone()).to_string()
}

/// Renders a sequence back to text.
pub fn render_sequence(items: &[Value]) -> String {
    Value::Array(items.to_vec()).to_string()
}

/// Name of a value's shape, used in diagnostics.
pub fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Typed field access on a [`Mapping`].
///
/// A key bound to `null` reads as absent. A present key of the wrong shape is
/// always a `TypeMismatch`, including for optional fields.
pub trait MappingExt {
    fn field(&self, key: &str) -> Option<&Value>;

    fn require(&self, key: &str) -> Result<&Value, CodecError> {
        self.field(key).ok_or_else(|| CodecError::missing(key))
    }

    fn opt_f64(&self, key: &str) -> Result<Option<f64>, CodecError> {
        self.field(key)
            .map(|v| v.as_f64().ok_or_else(|| CodecError::mismatch(key, "number")))
            .transpose()
    }

    fn require_f64(&self, key: &str) -> Result<f64, CodecError> {
        self.opt_f64(key)?.ok_or_else(|| CodecError::missing(key))
    }

    /// Numbers outside the `f32` range are `InvalidValue`, never infinity.
    fn opt_f32(&self, key: &str) -> Result<Option<f32>, CodecError> {
        self.opt_f64(key)?
            .map(|v| {
                let narrowed = v as f32;
                if narrowed.is_finite() {
                    Ok(narrowed)
                } else {
                    Err(CodecError::invalid(key, "out of f32 range"))
                }
            })
            .transpose()
    }

    fn opt_u32(&self, key: &str) -> Result<Option<u32>, CodecError> {
        self.field(key)
            .map(|v| as_u32(v).ok_or_else(|| CodecError::mismatch(key, "unsigned integer")))
            .transpose()
    }

    fn opt_bool(&self, key: &str) -> Result<Option<bool>, CodecError> {
        self.field(key)
            .map(|v| v.as_bool().ok_or_else(|| CodecError::mismatch(key, "boolean")))
            .transpose()
    }

    fn opt_str(&self, key: &str) -> Result<Option<&str>, CodecError> {
        self.field(key)
            .map(|v| v.as_str().ok_or_else(|| CodecError::mismatch(key, "string")))
            .transpose()
    }

    fn require_str(&self, key: &str) -> Result<&str, CodecError> {
        self.opt_str(key)?.ok_or_else(|| CodecError::missing(key))
    }

    fn opt_mapping(&self, key: &str) -> Result<Option<&Mapping>, CodecError> {
        self.field(key)
            .map(|v| v.as_object().ok_or_else(|| CodecError::mismatch(key, "mapping")))
            .transpose()
    }

    fn require_mapping(&self, key: &str) -> Result<&Mapping, CodecError> {
        self.opt_mapping(key)?.ok_or_else(|| CodecError::missing(key))
    }

    fn opt_sequence(&self, key: &str) -> Result<Option<&[Value]>, CodecError> {
        self.field(key)
            .map(|v| {
                v.as_array()
                    .map(Vec::as_slice)
                    .ok_or_else(|| CodecError::mismatch(key, "sequence"))
            })
            .transpose()
    }

    fn require_sequence(&self, key: &str) -> Result<&[Value], CodecError> {
        self.opt_sequence(key)?.ok_or_else(|| CodecError::missing(key))
    }
}

impl MappingExt for Mapping {
    fn field(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|v| !v.is_null())
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    // Scripting layers often send whole numbers as floats.
    let f = value.as_f64()?;
    if f.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&f) {
        Some(f as u32)
    } else {
        None
    }
}
