//! Intermediate representation for code generation.
//!
//! This module provides the resolved, validated and ordered view of a schema
//! document that the generator walks.

use crate::document::{SchemaDocument, parse_document};
use crate::driver::ResolutionDriver;
use crate::error::SchemaError;
use crate::graph::{Dependencies, DependencyGraph};
use crate::types::TypeNode;
use crate::validation::validate_types;
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::info;

/// Intermediate representation of a schema for code generation.
#[derive(Debug, Clone)]
pub struct SchemaIr {
    /// Resolved entities, in document order.
    pub types: IndexMap<String, TypeNode>,
    /// Emission order: dependencies before dependents.
    pub order: Vec<String>,
    /// Dependency graph the order was computed from.
    pub graph: DependencyGraph,
    positions: HashMap<String, usize>,
}

impl SchemaIr {
    /// Resolves, validates and orders a loaded document.
    ///
    /// # Errors
    /// Returns `SchemaError` if resolution, validation or ordering fails.
    pub fn from_document(document: &SchemaDocument) -> Result<Self, SchemaError> {
        let types = ResolutionDriver::new(document).run()?;
        validate_types(&types)?;

        let graph = DependencyGraph::from_types(&types);
        let order = graph.sort()?;
        let positions = order
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), index))
            .collect();

        info!(entities = order.len(), "schema resolved");

        Ok(Self {
            types,
            order,
            graph,
            positions,
        })
    }

    /// Parses and resolves a schema document from a JSON string.
    ///
    /// # Errors
    /// Returns `SchemaError` if parsing or resolution fails.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let document = parse_document(json)?;
        Self::from_document(&document)
    }

    /// Gets a resolved type by name.
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&TypeNode> {
        self.types.get(name)
    }

    /// Returns the position of an entity in the emission order.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Returns the direct dependencies of an entity.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Option<&Dependencies> {
        self.graph.dependencies(name)
    }

    /// Iterates entities in emission order.
    pub fn ordered(&self) -> impl Iterator<Item = (&str, &TypeNode)> {
        self.order
            .iter()
            .filter_map(|name| self.types.get(name).map(|node| (name.as_str(), node)))
    }
}

/// Converts a camelCase or PascalCase name to snake_case.
///
/// Runs of capitals are kept together: `clientID` becomes `client_id`.
#[must_use]
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            result.push('_');
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                result.push('_');
            }
        }
        result.extend(c.to_lowercase());
    }

    result
}

/// Converts a string to PascalCase.
///
/// Any non-alphanumeric character starts a new word.
#[must_use]
pub fn to_pascal_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;

    for c in s.chars() {
        if !c.is_alphanumeric() {
            capitalize_next = true;
        } else if capitalize_next {
            result.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            result.push(c);
        }
    }

    result
}
