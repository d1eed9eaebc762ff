use thiserror::Error;

/// Error type for every conversion across the scripting boundary.
///
/// Field paths are dotted from the root of the payload being converted, with
/// sequence positions in brackets (`points[2].lng`). The root itself is `$`.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("missing field: {0}")]
    MissingField(String),

    #[error("type mismatch at {field}: expected {expected}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
    },

    #[error("unknown entity kind: {0}")]
    UnknownEntityKind(String),

    #[error("invalid value at {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl CodecError {
    pub fn missing(field: impl Into<String>) -> Self {
        CodecError::MissingField(field.into())
    }

    pub fn mismatch(field: impl Into<String>, expected: &'static str) -> Self {
        CodecError::TypeMismatch {
            field: field.into(),
            expected,
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Prefixes the field path carried by this error with `parent`.
    ///
    /// Used when a nested conversion fails so the reported path points into the
    /// enclosing payload rather than the sub-mapping alone.
    pub fn within(self, parent: &str) -> Self {
        match self {
            CodecError::MissingField(field) => CodecError::MissingField(join_path(parent, &field)),
            CodecError::TypeMismatch { field, expected } => CodecError::TypeMismatch {
                field: join_path(parent, &field),
                expected,
            },
            CodecError::InvalidValue { field, reason } => CodecError::InvalidValue {
                field: join_path(parent, &field),
                reason,
            },
            other => other,
        }
    }
}

fn join_path(parent: &str, field: &str) -> String {
    if field == "$" {
        parent.to_string()
    } else if field.starts_with('[') {
        format!("{parent}{field}")
    } else {
        format!("{parent}.{field}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_paths() {
        let err = CodecError::missing("lat").within("southwest");
        assert!(matches!(err, CodecError::MissingField(ref f) if f == "southwest.lat"));

        let err = CodecError::mismatch("lng", "number")
            .within("[2]")
            .within("points");
        assert!(matches!(err, CodecError::TypeMismatch { ref field, .. } if field == "points[2].lng"));
    }

    #[test]
    fn root_path_collapses() {
        let err = CodecError::mismatch("$", "mapping").within("target");
        assert!(matches!(err, CodecError::TypeMismatch { ref field, .. } if field == "target"));
    }

    #[test]
    fn display() {
        let err = CodecError::UnknownEntityKind("Balloon".into());
        assert_eq!(err.to_string(), "unknown entity kind: Balloon");
    }
}
