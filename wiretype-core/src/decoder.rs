//! Helpers used by generated `decode` implementations.
//!
//! Generated record decoders look up each field by its wire name and attach
//! the field name to any error raised while decoding the field's value.

use crate::codec::JsonCodec;
use crate::error::DecodeError;
use crate::types::JsonKind;
use serde_json::{Map, Value};

/// Returns the object map of `value`.
///
/// # Errors
/// Returns a kind mismatch if `value` is not a JSON object.
pub fn expect_object(value: &Value) -> Result<&Map<String, Value>, DecodeError> {
    value
        .as_object()
        .ok_or_else(|| DecodeError::type_mismatch(JsonKind::Object, value))
}

/// Decodes a required field.
///
/// # Errors
/// Returns `MissingField` if `name` is absent, or the field's own decode
/// error prefixed with `name`.
pub fn decode_field<T: JsonCodec>(object: &Map<String, Value>, name: &str) -> Result<T, DecodeError> {
    match object.get(name) {
        Some(value) => T::decode(value).map_err(|e| e.at_field(name)),
        None => Err(DecodeError::missing_field(name)),
    }
}

/// Decodes an optional field. Absent and `null` both decode as `None`.
///
/// # Errors
/// Returns the field's decode error prefixed with `name`.
pub fn decode_optional_field<T: JsonCodec>(
    object: &Map<String, Value>,
    name: &str,
) -> Result<Option<T>, DecodeError> {
    match object.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => T::decode(value).map(Some).map_err(|e| e.at_field(name)),
    }
}

/// Decodes a field whose type has its own `null`, such as [`Value`] or
/// [`crate::NullableString`]. An absent field decodes like `null`.
///
/// # Errors
/// Returns the field's decode error prefixed with `name`.
pub fn decode_nullable_field<T: JsonCodec>(
    object: &Map<String, Value>,
    name: &str,
) -> Result<T, DecodeError> {
    T::decode(object.get(name).unwrap_or(&Value::Null)).map_err(|e| e.at_field(name))
}
