//! Validation of a resolved type table.
//!
//! Runs after resolution and before ordering, so that every reference that
//! reaches code generation names a resolved entity.

use crate::error::SchemaError;
use crate::types::{EnumerationType, TypeNode};
use indexmap::IndexMap;

/// Validates a resolved table.
///
/// # Errors
/// Returns `SchemaError::DanglingReference` if an entity references a name
/// that is not in the table, or `SchemaError::Validation` for an empty
/// enumeration.
pub fn validate_types(types: &IndexMap<String, TypeNode>) -> Result<(), SchemaError> {
    for (name, node) in types {
        validate_references(types, name, node)?;
        validate_node(name, node)?;
    }
    Ok(())
}

/// Checks that every reference of `node` resolves.
fn validate_references(
    types: &IndexMap<String, TypeNode>,
    entity: &str,
    node: &TypeNode,
) -> Result<(), SchemaError> {
    match node.references().into_iter().find(|target| !types.contains_key(target)) {
        Some(target) => Err(SchemaError::DanglingReference {
            entity: entity.to_string(),
            target,
        }),
        None => Ok(()),
    }
}

fn validate_node(entity: &str, node: &TypeNode) -> Result<(), SchemaError> {
    match node {
        TypeNode::Enumeration(enumeration) => validate_enumeration(entity, enumeration),
        TypeNode::Optional(inner) | TypeNode::Sequence(inner) | TypeNode::StringKeyedMap(inner) => {
            validate_node(entity, inner)
        }
        TypeNode::Record(record) => {
            for (field, field_type) in &record.fields {
                if field.is_empty() {
                    return Err(SchemaError::Validation {
                        message: format!("Empty field name in '{}'", entity),
                    });
                }
                validate_node(entity, &field_type.node)?;
            }
            Ok(())
        }
        TypeNode::Primitive(_)
        | TypeNode::IntOrString
        | TypeNode::NullableString
        | TypeNode::AnyJson
        | TypeNode::Reference(_) => Ok(()),
    }
}

fn validate_enumeration(entity: &str, enumeration: &EnumerationType) -> Result<(), SchemaError> {
    if enumeration.values.is_empty() {
        return Err(SchemaError::Validation {
            message: format!(
                "Enumeration '{}' in '{}' has no values",
                enumeration.name, entity
            ),
        });
    }
    Ok(())
}
