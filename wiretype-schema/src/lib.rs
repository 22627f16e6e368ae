//! # Wiretype Schema
//!
//! Loads a JSON-Schema-like protocol description and compiles it into a
//! resolved, dependency-ordered type model.
//!
//! This crate provides:
//! - Document loading (`definitions` map)
//! - Type resolution with forward references and `allOf` composition
//! - The type-merge algebra used for `allOf`
//! - Fixed-point resolution with deadlock detection
//! - Dependency analysis and deterministic topological ordering
//! - Intermediate representation for code generation

pub mod document;
pub mod driver;
pub mod error;
pub mod graph;
pub mod ir;
pub mod resolver;
pub mod types;
pub mod unify;
pub mod validation;

pub use document::{SchemaDocument, parse_document, parse_document_file};
pub use driver::ResolutionDriver;
pub use error::{ParseError, SchemaError};
pub use graph::{Dependencies, DependencyGraph};
pub use ir::{SchemaIr, to_pascal_case, to_snake_case};
pub use resolver::{DEFINITIONS_PREFIX, Resolution, TypeResolver};
pub use types::{EnumerationType, Field, PrimitiveKind, RecordType, TypeNode};
pub use unify::{merge, merge_all};
pub use validation::validate_types;
