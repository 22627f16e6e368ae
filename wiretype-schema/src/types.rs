//! Resolved type model.
//!
//! A [`TypeNode`] is the compiler's view of one schema node after resolution.
//! Named records and enumerations carry their entity name and description;
//! those labels never take part in structural equality.

use indexmap::{IndexMap, IndexSet};
use std::collections::BTreeSet;
use std::fmt;

/// Scalar JSON kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// `"type": "integer"`.
    Integer,
    /// `"type": "number"`.
    Real,
    /// `"type": "boolean"`.
    Boolean,
    /// `"type": "string"`.
    String,
}

impl PrimitiveKind {
    /// Maps a schema `type` keyword to a primitive kind.
    #[must_use]
    pub fn from_schema_name(name: &str) -> Option<Self> {
        match name {
            "integer" => Some(Self::Integer),
            "number" => Some(Self::Real),
            "boolean" => Some(Self::Boolean),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    /// Returns the schema `type` keyword of this kind.
    #[must_use]
    pub const fn schema_name(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Real => "number",
            Self::Boolean => "boolean",
            Self::String => "string",
        }
    }
}

/// Record field.
#[derive(Debug, Clone)]
pub struct Field {
    /// Field type. Fields that are not required are wrapped in [`TypeNode::Optional`].
    pub node: TypeNode,
    /// Field description.
    pub description: Option<String>,
}

impl Field {
    /// Creates a field without description.
    #[must_use]
    pub fn new(node: TypeNode) -> Self {
        Self {
            node,
            description: None,
        }
    }

    /// Returns true unless the field type is optional.
    #[must_use]
    pub fn is_required(&self) -> bool {
        !self.node.is_optional()
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl Eq for Field {}

/// Object with a fixed set of named fields.
#[derive(Debug, Clone)]
pub struct RecordType {
    /// Entity name (or the owning field for inline records).
    pub name: String,
    /// Record description.
    pub description: Option<String>,
    /// Fields keyed by wire name, in declaration order.
    pub fields: IndexMap<String, Field>,
}

impl RecordType {
    /// Creates an empty record.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: IndexMap::new(),
        }
    }

    /// Appends a field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, node: TypeNode) -> Self {
        self.fields.insert(name.into(), Field::new(node));
        self
    }
}

/// Field sets are compared as maps; declaration order and labels are ignored.
impl PartialEq for RecordType {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl Eq for RecordType {}

/// Closed set of string literals.
#[derive(Debug, Clone)]
pub struct EnumerationType {
    /// Entity name (or the owning field for inline enumerations).
    pub name: String,
    /// Enumeration description.
    pub description: Option<String>,
    /// Literals in declaration order. Never empty.
    pub values: IndexSet<String>,
}

impl EnumerationType {
    /// Creates an enumeration from its literals.
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            description: None,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if this enumeration holds exactly `literal`.
    #[must_use]
    pub fn is_single(&self, literal: &str) -> bool {
        self.values.len() == 1 && self.values.contains(literal)
    }
}

/// Literal sets are compared as sets.
impl PartialEq for EnumerationType {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl Eq for EnumerationType {}

/// Resolved schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeNode {
    /// Scalar value.
    Primitive(PrimitiveKind),
    /// Integer or string.
    IntOrString,
    /// String or null.
    NullableString,
    /// Any JSON value.
    AnyJson,
    /// Object with arbitrary string keys and uniform values.
    StringKeyedMap(Box<TypeNode>),
    /// Ordered list.
    Sequence(Box<TypeNode>),
    /// Value that may be absent or null.
    Optional(Box<TypeNode>),
    /// Closed set of string literals.
    Enumeration(EnumerationType),
    /// Pointer to another named entity, resolved by name.
    Reference(String),
    /// Object with fixed fields.
    Record(RecordType),
}

impl TypeNode {
    /// Wraps a node in [`TypeNode::Optional`].
    #[must_use]
    pub fn optional(inner: TypeNode) -> Self {
        Self::Optional(Box::new(inner))
    }

    /// Wraps a node in [`TypeNode::Sequence`].
    #[must_use]
    pub fn sequence(element: TypeNode) -> Self {
        Self::Sequence(Box::new(element))
    }

    /// Wraps a node in [`TypeNode::StringKeyedMap`].
    #[must_use]
    pub fn map(element: TypeNode) -> Self {
        Self::StringKeyedMap(Box::new(element))
    }

    /// Creates a reference to `name`.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// Returns true for [`TypeNode::Optional`].
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    /// Returns true for [`TypeNode::AnyJson`].
    #[must_use]
    pub const fn is_any_json(&self) -> bool {
        matches!(self, Self::AnyJson)
    }

    /// Returns the entity name of a record or enumeration.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Record(r) => Some(&r.name),
            Self::Enumeration(e) => Some(&e.name),
            _ => None,
        }
    }

    /// Returns the description of a record or enumeration.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Record(r) => r.description.as_deref(),
            Self::Enumeration(e) => e.description.as_deref(),
            _ => None,
        }
    }

    /// Replaces the name and description of a record or enumeration.
    ///
    /// Other variants carry no labels and are returned unchanged.
    #[must_use]
    pub fn with_identity(self, name: &str, description: Option<String>) -> Self {
        match self {
            Self::Record(mut r) => {
                r.name = name.to_string();
                r.description = description;
                Self::Record(r)
            }
            Self::Enumeration(mut e) => {
                e.name = name.to_string();
                e.description = description;
                Self::Enumeration(e)
            }
            other => other,
        }
    }

    /// Returns every entity name this node refers to, including names
    /// reached through nested records.
    #[must_use]
    pub fn references(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::new();
        self.collect_references(&mut names);
        names
    }

    fn collect_references(&self, names: &mut BTreeSet<String>) {
        match self {
            Self::Reference(name) => {
                names.insert(name.clone());
            }
            Self::StringKeyedMap(inner) | Self::Sequence(inner) | Self::Optional(inner) => {
                inner.collect_references(names);
            }
            Self::Record(record) => {
                for field in record.fields.values() {
                    field.node.collect_references(names);
                }
            }
            Self::Primitive(_)
            | Self::IntOrString
            | Self::NullableString
            | Self::AnyJson
            | Self::Enumeration(_) => {}
        }
    }
}

impl fmt::Display for TypeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(kind) => f.write_str(kind.schema_name()),
            Self::IntOrString => f.write_str("integer|string"),
            Self::NullableString => f.write_str("string|null"),
            Self::AnyJson => f.write_str("any"),
            Self::StringKeyedMap(inner) => write!(f, "map<{}>", inner),
            Self::Sequence(inner) => write!(f, "array<{}>", inner),
            Self::Optional(inner) => write!(f, "optional<{}>", inner),
            Self::Enumeration(e) => {
                let values: Vec<&str> = e.values.iter().map(String::as_str).collect();
                write!(f, "enum {} {{{}}}", e.name, values.join(", "))
            }
            Self::Reference(name) => write!(f, "ref {}", name),
            Self::Record(r) => {
                let fields: Vec<&str> = r.fields.keys().map(String::as_str).collect();
                write!(f, "record {} {{{}}}", r.name, fields.join(", "))
            }
        }
    }
}
