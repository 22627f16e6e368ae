//! Helpers used by generated `encode` implementations.

use crate::codec::JsonCodec;
use serde_json::{Map, Value};

/// Builds a JSON object field by field, in call order.
///
/// # Example
/// ```
/// use wiretype_core::ObjectEncoder;
///
/// let column: Option<i64> = None;
/// let json = ObjectEncoder::with_capacity(2)
///     .field("line", &3i64)
///     .field("column", &column)
///     .finish();
/// assert_eq!(json.to_string(), r#"{"line":3,"column":null}"#);
/// ```
#[derive(Debug, Default)]
pub struct ObjectEncoder {
    object: Map<String, Value>,
}

impl ObjectEncoder {
    /// Creates an empty encoder.
    #[must_use]
    pub fn new() -> Self {
        Self { object: Map::new() }
    }

    /// Creates an encoder sized for `capacity` fields.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            object: Map::with_capacity(capacity),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn field<T: JsonCodec>(mut self, name: &str, value: &T) -> Self {
        self.object.insert(name.to_string(), value.encode());
        self
    }

    /// Returns the number of fields written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.object.len()
    }

    /// Returns true if no field has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.object.is_empty()
    }

    /// Finishes the object.
    #[must_use]
    pub fn finish(self) -> Value {
        Value::Object(self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object() {
        let encoder = ObjectEncoder::new();
        assert!(encoder.is_empty());
        assert_eq!(encoder.finish(), json!({}));
    }

    #[test]
    fn test_field_order_is_call_order() {
        let json = ObjectEncoder::new()
            .field("z", &1i64)
            .field("a", &"x".to_string())
            .finish();
        assert_eq!(json.to_string(), r#"{"z":1,"a":"x"}"#);
    }

    #[test]
    fn test_absent_optional_is_null() {
        let missing: Option<bool> = None;
        let encoder = ObjectEncoder::with_capacity(1).field("flag", &missing);
        assert_eq!(encoder.len(), 1);
        assert_eq!(encoder.finish(), json!({"flag": null}));
    }
}
