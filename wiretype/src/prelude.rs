//! Prelude module for convenient imports.
//!
//! ```ignore
//! use wiretype::prelude::*;
//! ```

// Runtime types
pub use wiretype_core::{
    DecodeError, DecodeErrorKind, IntOrString, JsonCodec, NullableString, ObjectEncoder,
    PathSegment, Value,
};
pub use wiretype_core::{Result as DecodeResult, decode_field, decode_optional_field, expect_object};

// Schema types
pub use wiretype_schema::{
    DependencyGraph, ParseError, SchemaDocument, SchemaError, SchemaIr, TypeNode, merge,
    parse_document,
};

// Codegen types
pub use wiretype_codegen::{CodegenError, Generator, GeneratorConfig};
