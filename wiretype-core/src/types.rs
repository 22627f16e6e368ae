//! Shared representations for the JSON shapes a schema can describe.
//!
//! Generated code maps schema unions that have no natural Rust counterpart
//! onto the types in this module.

use crate::codec::JsonCodec;
use crate::error::DecodeError;
use serde_json::Value;

/// Kind of a JSON value, as reported in decode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonKind {
    /// `null`.
    Null,
    /// `true` or `false`.
    Boolean,
    /// A number representable as `i64`.
    Integer,
    /// Any other number.
    Number,
    /// A string.
    String,
    /// An array.
    Array,
    /// An object.
    Object,
}

impl JsonKind {
    /// Classifies a JSON value.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(n) if n.is_i64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Returns the lowercase name used in error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for JsonKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value declared as `"type": ["integer", "string"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntOrString {
    /// Integer alternative.
    Int(i64),
    /// String alternative.
    String(String),
}

impl From<i64> for IntOrString {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<String> for IntOrString {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for IntOrString {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl JsonCodec for IntOrString {
    fn encode(&self) -> Value {
        match self {
            Self::Int(i) => Value::from(*i),
            Self::String(s) => Value::String(s.clone()),
        }
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .ok_or_else(|| DecodeError::type_mismatch(JsonKind::Integer, value)),
            Value::String(s) => Ok(Self::String(s.clone())),
            _ => Err(DecodeError::type_mismatch(JsonKind::Integer, value)),
        }
    }
}

/// Value declared as `"type": ["string", "null"]`.
///
/// Kept distinct from `Option<String>` so that an optional nullable string
/// round-trips without collapsing the two layers of absence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NullableString(pub Option<String>);

impl NullableString {
    /// Creates a null value.
    #[must_use]
    pub const fn null() -> Self {
        Self(None)
    }

    /// Returns the string, if present.
    #[must_use]
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl From<Option<String>> for NullableString {
    fn from(value: Option<String>) -> Self {
        Self(value)
    }
}

impl From<&str> for NullableString {
    fn from(value: &str) -> Self {
        Self(Some(value.to_string()))
    }
}

impl JsonCodec for NullableString {
    fn encode(&self) -> Value {
        match &self.0 {
            Some(s) => Value::String(s.clone()),
            None => Value::Null,
        }
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(Self(None)),
            Value::String(s) => Ok(Self(Some(s.clone()))),
            _ => Err(DecodeError::type_mismatch(JsonKind::String, value)),
        }
    }
}
