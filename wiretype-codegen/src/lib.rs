//! # Wiretype Codegen
//!
//! Code generation from JSON protocol schemas.
//!
//! This crate provides:
//! - Rust type generation for every resolved schema entity
//! - `JsonCodec` encoder/decoder implementations
//! - Request/response dispatcher generation
//! - Build script integration

pub mod config;
pub mod error;
pub mod generator;
pub mod rust;

pub use config::GeneratorConfig;
pub use error::CodegenError;
pub use generator::Generator;

use std::path::Path;

/// Generates Rust code from a JSON schema string with the default
/// configuration.
///
/// # Arguments
/// * `json` - Schema document content
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if parsing, resolution, or generation fails.
pub fn generate_from_str(json: &str) -> Result<String, CodegenError> {
    generate_with_config(json, &GeneratorConfig::default())
}

/// Generates Rust code from a JSON schema string.
///
/// # Errors
/// Returns `CodegenError` if parsing, resolution, or generation fails.
pub fn generate_with_config(json: &str, config: &GeneratorConfig) -> Result<String, CodegenError> {
    let document = wiretype_schema::parse_document(json)?;
    let ir = wiretype_schema::SchemaIr::from_document(&document)?;
    Generator::with_config(&ir, config.clone()).generate()
}

/// Generates Rust code from a JSON schema file.
///
/// # Arguments
/// * `path` - Path to the schema file
///
/// # Returns
/// Generated Rust code as a string.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, or generation fails.
pub fn generate_from_file(path: &Path, config: &GeneratorConfig) -> Result<String, CodegenError> {
    let json = std::fs::read_to_string(path)?;
    generate_with_config(&json, config)
}

/// Generates Rust code from a schema file and writes it to `out`.
///
/// Intended for build scripts:
///
/// ```ignore
/// let out = std::path::Path::new(&std::env::var("OUT_DIR")?).join("protocol.rs");
/// wiretype_codegen::generate_to_file(
///     std::path::Path::new("schemas/protocol.json"),
///     &out,
///     &wiretype_codegen::GeneratorConfig::default(),
/// )?;
/// ```
///
/// # Errors
/// Returns `CodegenError` if generation or writing fails.
pub fn generate_to_file(
    schema: &Path,
    out: &Path,
    config: &GeneratorConfig,
) -> Result<(), CodegenError> {
    let code = generate_from_file(schema, config)?;
    std::fs::write(out, code)?;
    Ok(())
}
