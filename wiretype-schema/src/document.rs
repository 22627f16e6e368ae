//! Schema document loading.
//!
//! A document is a JSON object whose `definitions` member maps entity names
//! to raw schema nodes. Everything else at the top level (`$schema`, `title`,
//! `description`, ...) is ignored.

use crate::error::ParseError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

/// Loaded schema document: entity name to raw schema node, in document order.
#[derive(Debug, Clone, Default)]
pub struct SchemaDocument {
    definitions: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    definitions: Option<Value>,
}

impl SchemaDocument {
    /// Creates a document from an already loaded definitions map.
    #[must_use]
    pub fn from_definitions(definitions: Map<String, Value>) -> Self {
        Self { definitions }
    }

    /// Returns the raw node of an entity.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.definitions.get(name)
    }

    /// Returns true if the document defines `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Iterates entity names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Iterates entities in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.definitions.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Returns true if the document defines no entity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Parses a schema document from a JSON string.
///
/// # Errors
/// Returns `ParseError` if the JSON is invalid or has no `definitions` object.
pub fn parse_document(json: &str) -> Result<SchemaDocument, ParseError> {
    let raw: RawDocument = serde_json::from_str(json)?;

    match raw.definitions {
        Some(Value::Object(definitions)) => Ok(SchemaDocument::from_definitions(definitions)),
        Some(other) => Err(ParseError::InvalidStructure {
            message: format!("'definitions' must be an object, found {}", kind_name(&other)),
        }),
        None => Err(ParseError::MissingDefinitions),
    }
}

/// Parses a schema document from a file.
///
/// # Errors
/// Returns `ParseError` if the file cannot be read or parsed.
pub fn parse_document_file(path: &Path) -> Result<SchemaDocument, ParseError> {
    let json = std::fs::read_to_string(path)?;
    parse_document(&json)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
