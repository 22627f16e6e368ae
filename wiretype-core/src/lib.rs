//! # Wiretype Core
//!
//! Runtime types and traits used by code generated from a wiretype schema.
//!
//! This crate provides:
//! - The [`JsonCodec`] trait implemented by every generated type
//! - Encoder and decoder helpers used by generated record codecs
//! - Structured [`DecodeError`]s that carry the offending field path
//! - Shared representations for schema unions ([`IntOrString`], [`NullableString`])

pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod types;

pub use codec::JsonCodec;
pub use decoder::{decode_field, decode_nullable_field, decode_optional_field, expect_object};
pub use encoder::ObjectEncoder;
pub use error::{DecodeError, DecodeErrorKind, PathSegment, Result};
pub use types::{IntOrString, JsonKind, NullableString};

/// Generic JSON value that generated codecs encode to and decode from.
pub use serde_json::Value;

/// JSON object map, order-preserving.
pub use serde_json::Map;

/// Ordered string-keyed map used for `additionalProperties` schemas.
pub use indexmap::IndexMap;
