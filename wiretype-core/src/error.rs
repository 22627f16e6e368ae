//! Error types for decoding generated messages.

use crate::types::JsonKind;
use thiserror::Error;

/// One step of the path from the decoded root value to the failing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// Named field of a record.
    Field(String),
    /// Position inside a sequence.
    Index(usize),
    /// Key inside a string-keyed map.
    Key(String),
}

/// What went wrong while decoding a value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeErrorKind {
    /// A required record field is absent.
    #[error("missing required field")]
    MissingField,

    /// The JSON value has a different kind than the schema requires.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind required by the schema.
        expected: JsonKind,
        /// Kind actually present in the input.
        found: JsonKind,
    },

    /// A string is not one of the literals of a closed enumeration.
    #[error("unknown variant '{found}', expected one of [{}]", .expected.join(", "))]
    UnknownVariant {
        /// Literal found in the input.
        found: String,
        /// Accepted literals, in declaration order.
        expected: Vec<String>,
    },
}

/// Error returned by generated `decode` functions.
///
/// The path is recorded outermost first, so a failure on the `line` field of
/// the third breakpoint in `arguments` renders as `arguments.breakpoints[2].line`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    path: Vec<PathSegment>,
    kind: DecodeErrorKind,
}

impl DecodeError {
    /// Creates an error at the root of the decoded value.
    #[must_use]
    pub fn new(kind: DecodeErrorKind) -> Self {
        Self {
            path: Vec::new(),
            kind,
        }
    }

    /// Creates a missing field error for `field`.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(DecodeErrorKind::MissingField).at_field(field)
    }

    /// Creates a kind mismatch error for `value`.
    #[must_use]
    pub fn type_mismatch(expected: JsonKind, value: &serde_json::Value) -> Self {
        Self::new(DecodeErrorKind::TypeMismatch {
            expected,
            found: JsonKind::of(value),
        })
    }

    /// Creates an unknown enumeration literal error.
    #[must_use]
    pub fn unknown_variant(found: impl Into<String>, expected: &[&str]) -> Self {
        Self::new(DecodeErrorKind::UnknownVariant {
            found: found.into(),
            expected: expected.iter().map(|s| (*s).to_string()).collect(),
        })
    }

    /// Prefixes the path with a record field.
    #[must_use]
    pub fn at_field(self, field: impl Into<String>) -> Self {
        self.prefixed(PathSegment::Field(field.into()))
    }

    /// Prefixes the path with a sequence index.
    #[must_use]
    pub fn at_index(self, index: usize) -> Self {
        self.prefixed(PathSegment::Index(index))
    }

    /// Prefixes the path with a map key.
    #[must_use]
    pub fn at_key(self, key: impl Into<String>) -> Self {
        self.prefixed(PathSegment::Key(key.into()))
    }

    fn prefixed(mut self, segment: PathSegment) -> Self {
        self.path.insert(0, segment);
        self
    }

    /// Returns the path from the root value to the failing value.
    #[must_use]
    pub fn path(&self) -> &[PathSegment] {
        &self.path
    }

    /// Returns what went wrong.
    #[must_use]
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    /// Renders the path as `a.b[3]["key"]`, or `<root>` when empty.
    #[must_use]
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            return "<root>".to_string();
        }

        let mut out = String::new();
        for segment in &self.path {
            match segment {
                PathSegment::Field(name) => {
                    if !out.is_empty() {
                        out.push('.');
                    }
                    out.push_str(name);
                }
                PathSegment::Index(index) => {
                    out.push_str(&format!("[{}]", index));
                }
                PathSegment::Key(key) => {
                    out.push_str(&format!("[{:?}]", key));
                }
            }
        }
        out
    }
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at `{}`", self.kind, self.path_string())
    }
}

impl std::error::Error for DecodeError {}

/// Result type alias for decode operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_field_path() {
        let err = DecodeError::missing_field("line");
        assert_eq!(err.path(), &[PathSegment::Field("line".to_string())]);
        assert_eq!(err.kind(), &DecodeErrorKind::MissingField);
        assert_eq!(err.to_string(), "missing required field at `line`");
    }

    #[test]
    fn test_nested_path_rendering() {
        let err = DecodeError::missing_field("line")
            .at_index(2)
            .at_field("breakpoints")
            .at_field("arguments");
        assert_eq!(err.path_string(), "arguments.breakpoints[2].line");
    }

    #[test]
    fn test_map_key_rendering() {
        let err = DecodeError::type_mismatch(JsonKind::String, &json!(1)).at_key("PATH");
        assert_eq!(err.path_string(), "[\"PATH\"]");
        assert_eq!(
            err.to_string(),
            "expected string, found integer at `[\"PATH\"]`"
        );
    }

    #[test]
    fn test_root_path() {
        let err = DecodeError::type_mismatch(JsonKind::Object, &json!([]));
        assert!(err.path().is_empty());
        assert_eq!(err.path_string(), "<root>");
    }

    #[test]
    fn test_unknown_variant_display() {
        let err = DecodeError::unknown_variant("pause", &["step", "breakpoint"]);
        assert_eq!(
            err.to_string(),
            "unknown variant 'pause', expected one of [step, breakpoint] at `<root>`"
        );
    }
}
