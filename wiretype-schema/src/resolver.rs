//! Conversion of raw schema nodes into [`TypeNode`]s.
//!
//! The resolver recognizes a closed set of shapes. Anything else is a
//! [`SchemaError::MalformedSchema`]. Composition branches that point at an
//! entity not yet present in the partial table produce
//! [`Resolution::Deferred`], which the driver retries on its next pass.

use crate::error::SchemaError;
use crate::types::{EnumerationType, Field, PrimitiveKind, RecordType, TypeNode};
use crate::unify::merge_all;
use indexmap::{IndexMap, IndexSet};
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashSet};

/// Prefix every `$ref` must carry.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Type list that stands for "any JSON value", in sorted order.
const ANY_JSON_KINDS: [&str; 7] = [
    "array", "boolean", "integer", "null", "number", "object", "string",
];

/// Outcome of resolving one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The entity resolved to a node.
    Resolved(TypeNode),
    /// A referenced entity is not resolved yet.
    Deferred {
        /// Name of the entity that was looked up.
        missing: String,
    },
}

enum Interrupt {
    Defer(String),
    Fail(SchemaError),
}

impl From<SchemaError> for Interrupt {
    fn from(error: SchemaError) -> Self {
        Self::Fail(error)
    }
}

/// Resolves raw schema nodes against a table of already resolved entities.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    partial: &'a IndexMap<String, TypeNode>,
}

impl<'a> TypeResolver<'a> {
    /// Creates a resolver reading from `partial`.
    #[must_use]
    pub fn new(partial: &'a IndexMap<String, TypeNode>) -> Self {
        Self { partial }
    }

    /// Resolves the entity `name` from its raw node.
    ///
    /// # Errors
    /// Returns `SchemaError` if the node is malformed or an `allOf`
    /// composition cannot be merged.
    pub fn resolve(&self, name: &str, raw: &Value) -> Result<Resolution, SchemaError> {
        let path = format!("{}{}", DEFINITIONS_PREFIX, escape_pointer(name));
        match self.node(name, raw, &path) {
            Ok(node) => Ok(Resolution::Resolved(node)),
            Err(Interrupt::Defer(missing)) => Ok(Resolution::Deferred { missing }),
            Err(Interrupt::Fail(error)) => Err(error),
        }
    }

    fn node(&self, name: &str, raw: &Value, path: &str) -> Result<TypeNode, Interrupt> {
        let schema = raw.as_object().ok_or_else(|| {
            SchemaError::malformed(path, format!("expected a schema object, found {}", raw))
        })?;

        if let Some(branches) = schema.get("allOf") {
            return self.composition(name, schema, branches, path);
        }

        if let (Some(target), false) = (schema.get("$ref"), schema.contains_key("type")) {
            return Ok(TypeNode::Reference(reference_target(target, path)?));
        }

        if let Some(values) = schema.get("enum").or_else(|| schema.get("_enum")) {
            return Ok(TypeNode::Enumeration(enumeration(name, schema, values, path)?));
        }

        match schema.get("type") {
            Some(Value::String(kind)) => self.single_kind(name, schema, kind, path),
            Some(Value::Array(kinds)) => Ok(kind_union(kinds, path)?),
            Some(_) => Err(SchemaError::malformed(
                path,
                "'type' must be a string or a list of strings",
            )
            .into()),
            None => Err(SchemaError::malformed(
                path,
                "expected one of 'type', '$ref', 'enum', '_enum' or 'allOf'",
            )
            .into()),
        }
    }

    fn single_kind(
        &self,
        name: &str,
        schema: &Map<String, Value>,
        kind: &str,
        path: &str,
    ) -> Result<TypeNode, Interrupt> {
        if let Some(primitive) = PrimitiveKind::from_schema_name(kind) {
            return Ok(TypeNode::Primitive(primitive));
        }

        match kind {
            "array" => {
                let items = schema
                    .get("items")
                    .ok_or_else(|| SchemaError::malformed(path, "array without 'items'"))?;
                let element = self.node(name, items, &format!("{}/items", path))?;
                Ok(TypeNode::sequence(element))
            }
            "object" => self.object(name, schema, path),
            other => Err(SchemaError::malformed(path, format!("unsupported type '{}'", other)).into()),
        }
    }

    fn object(
        &self,
        name: &str,
        schema: &Map<String, Value>,
        path: &str,
    ) -> Result<TypeNode, Interrupt> {
        if let Some(properties) = schema.get("properties") {
            return Ok(TypeNode::Record(self.record(name, schema, properties, path)?));
        }

        match schema.get("additionalProperties") {
            Some(Value::Bool(true)) => Ok(TypeNode::map(TypeNode::AnyJson)),
            Some(Value::Bool(false)) => {
                let mut record = RecordType::new(name);
                record.description = description(schema);
                Ok(TypeNode::Record(record))
            }
            Some(element) => {
                let element = self.node(name, element, &format!("{}/additionalProperties", path))?;
                Ok(TypeNode::map(element))
            }
            None => Ok(TypeNode::AnyJson),
        }
    }

    fn record(
        &self,
        name: &str,
        schema: &Map<String, Value>,
        properties: &Value,
        path: &str,
    ) -> Result<RecordType, Interrupt> {
        let properties = properties
            .as_object()
            .ok_or_else(|| SchemaError::malformed(path, "'properties' must be an object"))?;
        let required = required_fields(schema, path)?;

        let mut fields = IndexMap::with_capacity(properties.len());
        for (field_name, raw_field) in properties {
            let field_path = format!("{}/properties/{}", path, escape_pointer(field_name));
            let node = self.node(field_name, raw_field, &field_path)?;
            let node = if required.contains(field_name.as_str()) {
                node
            } else {
                TypeNode::optional(node)
            };

            let description = raw_field.as_object().and_then(description);
            fields.insert(field_name.clone(), Field { node, description });
        }

        Ok(RecordType {
            name: name.to_string(),
            description: description(schema),
            fields,
        })
    }

    fn composition(
        &self,
        name: &str,
        schema: &Map<String, Value>,
        branches: &Value,
        path: &str,
    ) -> Result<TypeNode, Interrupt> {
        let branches = branches
            .as_array()
            .filter(|branches| !branches.is_empty())
            .ok_or_else(|| SchemaError::malformed(path, "'allOf' must be a non-empty list"))?;

        let mut nodes = Vec::with_capacity(branches.len());
        for (index, branch) in branches.iter().enumerate() {
            let branch_path = format!("{}/allOf/{}", path, index);
            let node = self.node(name, branch, &branch_path)?;
            nodes.push(self.dereference(node, &branch_path)?);
        }

        let merged = merge_all(nodes)?;
        let description = description(schema).or_else(|| merged.description().map(str::to_string));
        Ok(merged.with_identity(name, description))
    }

    /// Follows reference chains through the partial table.
    fn dereference(&self, node: TypeNode, path: &str) -> Result<TypeNode, Interrupt> {
        let mut seen = HashSet::new();
        let mut current = node;

        loop {
            let target = match &current {
                TypeNode::Reference(target) => target.clone(),
                _ => return Ok(current),
            };

            if !seen.insert(target.clone()) {
                return Err(SchemaError::malformed(
                    path,
                    format!("reference chain through '{}' never reaches a definition", target),
                )
                .into());
            }

            current = match self.partial.get(&target) {
                Some(resolved) => resolved.clone(),
                None => return Err(Interrupt::Defer(target)),
            };
        }
    }
}

/// Extracts the entity name from a `$ref` value.
fn reference_target(value: &Value, path: &str) -> Result<String, SchemaError> {
    let reference = value
        .as_str()
        .ok_or_else(|| SchemaError::malformed(path, "'$ref' must be a string"))?;

    match reference.strip_prefix(DEFINITIONS_PREFIX) {
        Some(target) if !target.is_empty() => Ok(target.to_string()),
        _ => Err(SchemaError::malformed(
            path,
            format!(
                "unsupported reference '{}', expected '{}<Name>'",
                reference, DEFINITIONS_PREFIX
            ),
        )),
    }
}

fn enumeration(
    name: &str,
    schema: &Map<String, Value>,
    values: &Value,
    path: &str,
) -> Result<EnumerationType, SchemaError> {
    let literals = values
        .as_array()
        .ok_or_else(|| SchemaError::malformed(path, "enumeration values must be a list"))?;
    if literals.is_empty() {
        return Err(SchemaError::malformed(path, "enumeration has no values"));
    }

    let mut values = IndexSet::with_capacity(literals.len());
    for literal in literals {
        let literal = literal
            .as_str()
            .ok_or_else(|| SchemaError::malformed(path, "enumeration values must be strings"))?;
        if !values.insert(literal.to_string()) {
            return Err(SchemaError::malformed(
                path,
                format!("duplicate enumeration value '{}'", literal),
            ));
        }
    }

    Ok(EnumerationType {
        name: name.to_string(),
        description: description(schema),
        values,
    })
}

fn kind_union(kinds: &[Value], path: &str) -> Result<TypeNode, SchemaError> {
    let mut listed = BTreeSet::new();
    for kind in kinds {
        let kind = kind
            .as_str()
            .ok_or_else(|| SchemaError::malformed(path, "'type' list must contain strings"))?;
        listed.insert(kind);
    }
    let listed: Vec<&str> = listed.into_iter().collect();

    match listed.as_slice() {
        ["integer", "string"] => Ok(TypeNode::IntOrString),
        ["null", "string"] => Ok(TypeNode::NullableString),
        _ if listed == ANY_JSON_KINDS => Ok(TypeNode::AnyJson),
        _ => Err(SchemaError::malformed(
            path,
            format!("unsupported type union [{}]", listed.join(", ")),
        )),
    }
}

/// Missing `required` means no field is required: protocol schemas leave it
/// off objects whose members are all optional.
fn required_fields<'s>(
    schema: &'s Map<String, Value>,
    path: &str,
) -> Result<HashSet<&'s str>, SchemaError> {
    let Some(required) = schema.get("required") else {
        return Ok(HashSet::new());
    };

    required
        .as_array()
        .ok_or_else(|| SchemaError::malformed(path, "'required' must be a list"))?
        .iter()
        .map(|name| {
            name.as_str()
                .ok_or_else(|| SchemaError::malformed(path, "'required' must contain strings"))
        })
        .collect()
}

fn description(schema: &Map<String, Value>) -> Option<String> {
    schema
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Escapes a JSON pointer segment.
fn escape_pointer(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resolve(raw: Value) -> Result<Resolution, SchemaError> {
        let partial = IndexMap::new();
        TypeResolver::new(&partial).resolve("Entity", &raw)
    }

    impl Resolution {
        fn into_node(self) -> TypeNode {
            match self {
                Resolution::Resolved(node) => node,
                Resolution::Deferred { missing } => panic!("deferred on {missing}"),
            }
        }
    }

    fn resolved(raw: Value) -> TypeNode {
        resolve(raw)
            .expect("Failed to resolve")
            .into_node()
    }

    fn integer() -> TypeNode {
        TypeNode::Primitive(PrimitiveKind::Integer)
    }

    fn string() -> TypeNode {
        TypeNode::Primitive(PrimitiveKind::String)
    }

    #[test]
    fn test_primitives() {
        assert_eq!(resolved(json!({"type": "integer"})), integer());
        assert_eq!(
            resolved(json!({"type": "number"})),
            TypeNode::Primitive(PrimitiveKind::Real)
        );
        assert_eq!(
            resolved(json!({"type": "boolean"})),
            TypeNode::Primitive(PrimitiveKind::Boolean)
        );
        assert_eq!(resolved(json!({"type": "string"})), string());
    }

    #[test]
    fn test_type_unions() {
        assert_eq!(
            resolved(json!({"type": ["string", "integer"]})),
            TypeNode::IntOrString
        );
        assert_eq!(
            resolved(json!({"type": ["string", "null"]})),
            TypeNode::NullableString
        );
        assert_eq!(
            resolved(json!({"type": ["array", "boolean", "integer", "null", "number", "object", "string"]})),
            TypeNode::AnyJson
        );
    }

    #[test]
    fn test_record_with_unsupported_union_is_malformed() {
        let err = resolve(json!({
            "type": "object",
            "properties": {
                "line": {"type": "integer"},
                "column": {"type": ["integer", "null"]}
            },
            "required": ["line"]
        }))
        .expect_err("closed shape set");

        match err {
            SchemaError::MalformedSchema { path, message } => {
                assert_eq!(path, "#/definitions/Entity/properties/column");
                assert!(message.contains("integer, null"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_record_required_and_optional() {
        let node = resolved(json!({
            "type": "object",
            "description": "A position.",
            "properties": {
                "line": {"type": "integer", "description": "Line number."},
                "column": {"type": "integer"}
            },
            "required": ["line"]
        }));

        let TypeNode::Record(record) = node else {
            panic!("expected a record");
        };
        assert_eq!(record.name, "Entity");
        assert_eq!(record.description.as_deref(), Some("A position."));

        let names: Vec<_> = record.fields.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["line", "column"]);
        assert_eq!(record.fields["line"].node, integer());
        assert_eq!(
            record.fields["line"].description.as_deref(),
            Some("Line number.")
        );
        assert_eq!(record.fields["column"].node, TypeNode::optional(integer()));
    }

    #[test]
    fn test_record_without_required_list() {
        let node = resolved(json!({
            "type": "object",
            "properties": {"a": {"type": "string"}}
        }));
        let TypeNode::Record(record) = node.clone() else {
            panic!("expected a record");
        };
        assert!(!record.fields["a"].is_required());

        let empty = resolved(json!({
            "type": "object",
            "properties": {"a": {"type": "string"}},
            "required": []
        }));
        assert_eq!(node, empty);
    }

    #[test]
    fn test_string_maps() {
        assert_eq!(
            resolved(json!({"type": "object", "additionalProperties": {"type": "string"}})),
            TypeNode::map(string())
        );
        assert_eq!(
            resolved(json!({"type": "object", "additionalProperties": {"type": ["string", "null"]}})),
            TypeNode::map(TypeNode::NullableString)
        );
        assert_eq!(
            resolved(json!({"type": "object", "additionalProperties": true})),
            TypeNode::map(TypeNode::AnyJson)
        );
    }

    #[test]
    fn test_bare_object_is_any_json() {
        assert_eq!(
            resolved(json!({"type": "object", "description": "Free form."})),
            TypeNode::AnyJson
        );
    }

    #[test]
    fn test_array() {
        assert_eq!(
            resolved(json!({"type": "array", "items": {"$ref": "#/definitions/Source"}})),
            TypeNode::sequence(TypeNode::reference("Source"))
        );

        let err = resolve(json!({"type": "array"})).expect_err("no items");
        assert!(err.to_string().contains("items"));
    }

    #[test]
    fn test_enum_and_underscore_enum() {
        let closed = resolved(json!({"type": "string", "enum": ["a", "b"]}));
        let open = resolved(json!({"type": "string", "_enum": ["b", "a"]}));
        assert_eq!(closed, open);
        assert_eq!(closed.name(), Some("Entity"));
    }

    #[test]
    fn test_enum_rejects_bad_values() {
        assert!(resolve(json!({"enum": []})).is_err());
        assert!(resolve(json!({"enum": [1, 2]})).is_err());
        assert!(resolve(json!({"enum": ["a", "a"]})).is_err());
    }

    #[test]
    fn test_reference_is_not_looked_up() {
        assert_eq!(
            resolved(json!({"$ref": "#/definitions/Later"})),
            TypeNode::reference("Later")
        );
    }

    #[test]
    fn test_reference_prefix_required() {
        let err = resolve(json!({"$ref": "other.json#/Thing"})).expect_err("prefix");
        assert!(matches!(err, SchemaError::MalformedSchema { .. }));
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert!(resolve(json!({"description": "nothing else"})).is_err());
        assert!(resolve(json!({"type": "null"})).is_err());
        assert!(resolve(json!("string")).is_err());
        assert!(resolve(json!({"allOf": []})).is_err());
    }

    #[test]
    fn test_all_of_merges_base() {
        let mut partial = IndexMap::new();
        partial.insert(
            "Base".to_string(),
            resolved(json!({
                "type": "object",
                "properties": {"id": {"type": "integer"}},
                "required": ["id"]
            })),
        );

        let raw = json!({
            "allOf": [
                {"$ref": "#/definitions/Base"},
                {
                    "type": "object",
                    "properties": {"extra": {"type": "string"}},
                    "required": ["extra"]
                }
            ]
        });

        let node = TypeResolver::new(&partial)
            .resolve("Derived", &raw)
            .expect("Failed to resolve")
            .into_node();

        let TypeNode::Record(record) = node else {
            panic!("expected a record");
        };
        assert_eq!(record.name, "Derived");
        assert_eq!(record.fields.len(), 2);
        assert_eq!(record.fields["id"].node, integer());
        assert_eq!(record.fields["extra"].node, string());
        assert!(record.fields.values().all(Field::is_required));
    }

    #[test]
    fn test_all_of_defers_on_missing_base() {
        let outcome = resolve(json!({
            "allOf": [{"$ref": "#/definitions/Base"}, {"type": "object", "properties": {}}]
        }))
        .expect("Failed to resolve");

        assert_eq!(
            outcome,
            Resolution::Deferred {
                missing: "Base".to_string()
            }
        );
    }

    #[test]
    fn test_all_of_follows_aliases() {
        let mut partial = IndexMap::new();
        partial.insert("Alias".to_string(), TypeNode::reference("Target"));
        partial.insert(
            "Target".to_string(),
            TypeNode::Record(RecordType::new("Target").with_field("x", integer())),
        );

        let raw = json!({"allOf": [{"$ref": "#/definitions/Alias"}]});
        let node = TypeResolver::new(&partial)
            .resolve("Entity", &raw)
            .expect("Failed to resolve")
            .into_node();
        assert_eq!(node.name(), Some("Entity"));
    }

    #[test]
    fn test_all_of_alias_cycle() {
        let mut partial = IndexMap::new();
        partial.insert("A".to_string(), TypeNode::reference("B"));
        partial.insert("B".to_string(), TypeNode::reference("A"));

        let raw = json!({"allOf": [{"$ref": "#/definitions/A"}]});
        let err = TypeResolver::new(&partial)
            .resolve("Entity", &raw)
            .expect_err("alias cycle");
        assert!(matches!(err, SchemaError::MalformedSchema { .. }));
    }

    #[test]
    fn test_all_of_conflict_is_fatal() {
        let err = resolve(json!({
            "allOf": [
                {"type": "object", "properties": {"a": {"type": "integer"}}, "required": ["a"]},
                {"type": "object", "properties": {"a": {"type": "boolean"}}, "required": ["a"]}
            ]
        }))
        .expect_err("conflict");

        match err {
            SchemaError::Unification { path, .. } => assert_eq!(path, vec!["a".to_string()]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nested_inline_record() {
        let node = resolved(json!({
            "type": "object",
            "properties": {
                "body": {
                    "type": "object",
                    "properties": {"reason": {"type": "string", "enum": ["step", "pause"]}},
                    "required": ["reason"]
                }
            },
            "required": ["body"]
        }));

        let TypeNode::Record(record) = node else {
            panic!("expected a record");
        };
        let TypeNode::Record(body) = &record.fields["body"].node else {
            panic!("expected an inline record");
        };
        assert_eq!(body.name, "body");
        assert_eq!(body.fields["reason"].node.name(), Some("reason"));
    }

    #[test]
    fn test_escape_pointer() {
        assert_eq!(escape_pointer("a/b~c"), "a~1b~0c");
    }
}
