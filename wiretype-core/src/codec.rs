//! The [`JsonCodec`] trait and its implementations for the building blocks
//! generated types are made of.

use crate::error::DecodeError;
use crate::types::JsonKind;
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Conversion between a typed value and its JSON encoding.
///
/// Every type emitted by the generator implements this trait. Encoding is
/// total; decoding fails with a [`DecodeError`] naming the path of the
/// offending value.
///
/// # Example
/// ```ignore
/// // Generated record usage
/// let position = Position { line: 3, column: None };
/// let json = position.encode();
/// assert_eq!(Position::decode(&json)?, position);
/// ```
pub trait JsonCodec: Sized {
    /// Encodes the value as JSON.
    fn encode(&self) -> Value;

    /// Decodes a value from JSON.
    ///
    /// # Errors
    /// Returns `DecodeError` if the JSON does not match the schema.
    fn decode(value: &Value) -> Result<Self, DecodeError>;
}

impl JsonCodec for i64 {
    fn encode(&self) -> Value {
        Value::from(*self)
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        value
            .as_i64()
            .ok_or_else(|| DecodeError::type_mismatch(JsonKind::Integer, value))
    }
}

impl JsonCodec for f64 {
    fn encode(&self) -> Value {
        Value::from(*self)
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        value
            .as_f64()
            .ok_or_else(|| DecodeError::type_mismatch(JsonKind::Number, value))
    }
}

impl JsonCodec for bool {
    fn encode(&self) -> Value {
        Value::Bool(*self)
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        value
            .as_bool()
            .ok_or_else(|| DecodeError::type_mismatch(JsonKind::Boolean, value))
    }
}

impl JsonCodec for String {
    fn encode(&self) -> Value {
        Value::String(self.clone())
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| DecodeError::type_mismatch(JsonKind::String, value))
    }
}

/// Untyped values pass through unchanged.
impl JsonCodec for Value {
    fn encode(&self) -> Value {
        self.clone()
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        Ok(value.clone())
    }
}

/// `None` encodes as `null`; `null` decodes as `None`.
impl<T: JsonCodec> JsonCodec for Option<T> {
    fn encode(&self) -> Value {
        match self {
            Some(inner) => inner.encode(),
            None => Value::Null,
        }
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Null => Ok(None),
            other => T::decode(other).map(Some),
        }
    }
}

impl<T: JsonCodec> JsonCodec for Box<T> {
    fn encode(&self) -> Value {
        self.as_ref().encode()
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        T::decode(value).map(Box::new)
    }
}

impl<T: JsonCodec> JsonCodec for Vec<T> {
    fn encode(&self) -> Value {
        Value::Array(self.iter().map(JsonCodec::encode).collect())
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let items = value
            .as_array()
            .ok_or_else(|| DecodeError::type_mismatch(JsonKind::Array, value))?;

        items
            .iter()
            .enumerate()
            .map(|(index, item)| T::decode(item).map_err(|e| e.at_index(index)))
            .collect()
    }
}

impl<T: JsonCodec> JsonCodec for IndexMap<String, T> {
    fn encode(&self) -> Value {
        let mut object = Map::with_capacity(self.len());
        for (key, item) in self {
            object.insert(key.clone(), item.encode());
        }
        Value::Object(object)
    }

    fn decode(value: &Value) -> Result<Self, DecodeError> {
        let object = value
            .as_object()
            .ok_or_else(|| DecodeError::type_mismatch(JsonKind::Object, value))?;

        let mut out = IndexMap::with_capacity(object.len());
        for (key, item) in object {
            let decoded = T::decode(item).map_err(|e| e.at_key(key.clone()))?;
            out.insert(key.clone(), decoded);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeErrorKind, PathSegment};
    use serde_json::json;

    #[test]
    fn test_primitive_round_trip() {
        assert_eq!(i64::decode(&42i64.encode()).expect("i64"), 42);
        assert_eq!(f64::decode(&2.5f64.encode()).expect("f64"), 2.5);
        assert!(bool::decode(&true.encode()).expect("bool"));
        assert_eq!(
            String::decode(&"hi".to_string().encode()).expect("string"),
            "hi"
        );
    }

    #[test]
    fn test_real_accepts_integer_literal() {
        assert_eq!(f64::decode(&json!(3)).expect("integer as real"), 3.0);
    }

    #[test]
    fn test_integer_rejects_string() {
        let err = i64::decode(&json!("3")).expect_err("kind mismatch");
        assert_eq!(
            err.kind(),
            &DecodeErrorKind::TypeMismatch {
                expected: JsonKind::Integer,
                found: JsonKind::String,
            }
        );
    }

    #[test]
    fn test_option_null() {
        let none: Option<i64> = None;
        assert_eq!(none.encode(), Value::Null);
        assert_eq!(Option::<i64>::decode(&Value::Null).expect("null"), None);
        assert_eq!(Option::<i64>::decode(&json!(5)).expect("some"), Some(5));
    }

    #[test]
    fn test_vec_error_carries_index() {
        let err = Vec::<i64>::decode(&json!([1, 2, "x"])).expect_err("bad element");
        assert_eq!(err.path(), &[PathSegment::Index(2)]);
    }

    #[test]
    fn test_map_preserves_order() {
        let value = json!({"b": "1", "a": "2"});
        let map = IndexMap::<String, String>::decode(&value).expect("map");
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["b".to_string(), "a".to_string()]);
        assert_eq!(map.encode(), value);
    }

    #[test]
    fn test_map_error_carries_key() {
        let err = IndexMap::<String, String>::decode(&json!({"HOME": 1})).expect_err("bad");
        assert_eq!(err.path(), &[PathSegment::Key("HOME".to_string())]);
    }

    #[test]
    fn test_value_passthrough() {
        let value = json!({"anything": [1, "two", null]});
        assert_eq!(Value::decode(&value).expect("value"), value);
    }

    #[test]
    fn test_box_delegates() {
        let boxed = Box::new(9i64);
        assert_eq!(boxed.encode(), json!(9));
        assert_eq!(*Box::<i64>::decode(&json!(9)).expect("box"), 9);
    }
}
