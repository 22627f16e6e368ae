//! Type-merge algebra for `allOf` composition.
//!
//! Rules, first match wins:
//! 1. equal nodes merge to themselves;
//! 2. two records merge field by field (union, shared fields merged);
//! 3. `AnyJson` yields to the other side;
//! 4. two enumerations intersect, an empty intersection is an error;
//! 5. a plain string yields to an enumeration;
//! 6. two optionals merge their inner types;
//! 7. an optional `AnyJson` yields to the other side, dropping optionality;
//! 8. anything else is an error.

use crate::error::SchemaError;
use crate::types::{EnumerationType, PrimitiveKind, RecordType, TypeNode};
use indexmap::IndexSet;

/// Merges two nodes.
///
/// The result keeps the left operand's name and description when both sides
/// carry one.
///
/// # Errors
/// Returns `SchemaError::Unification` for incompatible operands and
/// `SchemaError::DisjointEnumerations` when two enumerations share no literal.
pub fn merge(left: TypeNode, right: TypeNode) -> Result<TypeNode, SchemaError> {
    if left == right {
        return Ok(left);
    }

    match (left, right) {
        (TypeNode::Record(left), TypeNode::Record(right)) => {
            merge_records(left, right).map(TypeNode::Record)
        }
        (TypeNode::AnyJson, other) | (other, TypeNode::AnyJson) => Ok(other),
        (TypeNode::Enumeration(left), TypeNode::Enumeration(right)) => {
            intersect(left, right).map(TypeNode::Enumeration)
        }
        (TypeNode::Primitive(PrimitiveKind::String), e @ TypeNode::Enumeration(_))
        | (e @ TypeNode::Enumeration(_), TypeNode::Primitive(PrimitiveKind::String)) => Ok(e),
        (TypeNode::Optional(left), TypeNode::Optional(right)) => {
            Ok(TypeNode::optional(merge(*left, *right)?))
        }
        (TypeNode::Optional(inner), other) | (other, TypeNode::Optional(inner))
            if inner.is_any_json() =>
        {
            Ok(other)
        }
        (left, right) => Err(SchemaError::Unification {
            path: Vec::new(),
            left: left.to_string(),
            right: right.to_string(),
        }),
    }
}

/// Folds a list of nodes with [`merge`], left to right.
///
/// `AnyJson` is the identity of the fold, so an empty list yields `AnyJson`.
///
/// # Errors
/// Returns the first merge error.
pub fn merge_all<I>(nodes: I) -> Result<TypeNode, SchemaError>
where
    I: IntoIterator<Item = TypeNode>,
{
    nodes.into_iter().try_fold(TypeNode::AnyJson, merge)
}

fn merge_records(left: RecordType, right: RecordType) -> Result<RecordType, SchemaError> {
    let RecordType {
        name,
        description,
        mut fields,
    } = left;

    for (field_name, incoming) in right.fields {
        match fields.get_mut(&field_name) {
            Some(existing) => {
                let current = std::mem::replace(&mut existing.node, TypeNode::AnyJson);
                existing.node = merge(current, incoming.node).map_err(|e| e.within(&field_name))?;
                if existing.description.is_none() {
                    existing.description = incoming.description;
                }
            }
            None => {
                fields.insert(field_name, incoming);
            }
        }
    }

    Ok(RecordType {
        name,
        description: description.or(right.description),
        fields,
    })
}

fn intersect(
    left: EnumerationType,
    right: EnumerationType,
) -> Result<EnumerationType, SchemaError> {
    let values: IndexSet<String> = left
        .values
        .iter()
        .filter(|value| right.values.contains(*value))
        .cloned()
        .collect();

    if values.is_empty() {
        return Err(SchemaError::DisjointEnumerations {
            path: Vec::new(),
            left: left.values.into_iter().collect(),
            right: right.values.into_iter().collect(),
        });
    }

    Ok(EnumerationType {
        name: left.name,
        description: left.description.or(right.description),
        values,
    })
}
