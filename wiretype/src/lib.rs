//! # Wiretype
//!
//! Compiles a JSON-Schema-like protocol description into one Rust module of
//! typed records, string enumerations and aliases, each with a JSON
//! encoder/decoder, plus an optional request dispatcher.
//!
//! ## Features
//!
//! - **Forward references** - definitions may reference entities declared later
//! - **`allOf` composition** - inherited message envelopes are merged field by field
//! - **Deterministic output** - the same schema always yields the same module
//! - **Structured decode errors** - every failure names the offending field path
//!
//! ## Quick Start
//!
//! ```ignore
//! // build.rs
//! let out = std::path::Path::new(&std::env::var("OUT_DIR")?).join("protocol.rs");
//! wiretype::codegen::generate_to_file(
//!     std::path::Path::new("schemas/protocol.json"),
//!     &out,
//!     &wiretype::codegen::GeneratorConfig::default(),
//! )?;
//!
//! // lib.rs
//! include!(concat!(env!("OUT_DIR"), "/protocol.rs"));
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`] - Runtime codec trait and decode errors used by generated code
//! - [`schema`] - Schema loading, type resolution, merging and ordering
//! - [`codegen`] - Rust code generation from resolved schemas

pub mod prelude;

/// Runtime types and traits used by generated code.
pub mod core {
    pub use wiretype_core::*;
}

/// Schema loading, resolution and ordering.
pub mod schema {
    pub use wiretype_schema::*;
}

/// Code generation from resolved schemas.
pub mod codegen {
    pub use wiretype_codegen::*;
}

// Re-export commonly used items at the crate root
pub use wiretype_codegen::{CodegenError, Generator, GeneratorConfig, generate_from_str};
pub use wiretype_core::{DecodeError, JsonCodec, Value};
pub use wiretype_schema::{SchemaError, SchemaIr, TypeNode};
