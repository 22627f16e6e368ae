//! Type planning: maps resolved schema nodes onto Rust definitions.
//!
//! Records and enumerations become named structs and enums. Inline records
//! and enumerations found inside a field get an auxiliary name built from
//! the owner and the field (`StoppedEvent` + `body` = `StoppedEventBody`)
//! and are planned right before their owner. Every other entity becomes a
//! type alias.

use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use crate::rust::naming::{TypeNamer, field_ident, type_ident, variant_idents};
use std::collections::{HashMap, HashSet};
use tracing::debug;
use wiretype_schema::{EnumerationType, PrimitiveKind, RecordType, SchemaIr, TypeNode};

/// Rust definition to emit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Definition {
    /// `pub struct` with a field per wire field.
    Record(RecordDef),
    /// `pub enum` with a unit variant per literal.
    Enumeration(EnumDef),
    /// `pub type` alias.
    Alias(AliasDef),
}

impl Definition {
    /// Returns the Rust identifier of the definition.
    #[must_use]
    pub fn ident(&self) -> &str {
        match self {
            Self::Record(def) => &def.ident,
            Self::Enumeration(def) => &def.ident,
            Self::Alias(def) => &def.ident,
        }
    }
}

/// Planned struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDef {
    /// Rust identifier.
    pub ident: String,
    /// Doc comment.
    pub description: Option<String>,
    /// Fields in wire order.
    pub fields: Vec<FieldDef>,
}

/// Planned struct field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Rust identifier.
    pub ident: String,
    /// Name on the wire.
    pub wire: String,
    /// Rust type expression.
    pub ty: String,
    /// How an absent field decodes.
    pub presence: Presence,
    /// Doc comment.
    pub description: Option<String>,
}

/// How a field is read when absent from the wire object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Absent is a decode error.
    Required,
    /// Absent and `null` decode as `None`.
    Optional,
    /// The field type has its own `null`; absent decodes like `null`.
    Nullable,
}

impl Presence {
    fn of(node: &TypeNode) -> Self {
        match node {
            TypeNode::Optional(inner) if carries_null(inner) => Self::Nullable,
            TypeNode::Optional(_) => Self::Optional,
            _ => Self::Required,
        }
    }
}

/// Planned enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    /// Rust identifier.
    pub ident: String,
    /// Doc comment.
    pub description: Option<String>,
    /// `(variant identifier, wire literal)` in declaration order.
    pub variants: Vec<(String, String)>,
}

/// Planned type alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasDef {
    /// Rust identifier.
    pub ident: String,
    /// Aliased type expression.
    pub target: String,
}

/// Ordered definitions plus the identifier of every generated entity.
#[derive(Debug, Clone, Default)]
pub struct TypePlan {
    /// Definitions in emission order.
    pub definitions: Vec<Definition>,
    idents: HashMap<String, String>,
}

impl TypePlan {
    /// Returns the Rust identifier of a generated entity.
    #[must_use]
    pub fn ident(&self, entity: &str) -> Option<&str> {
        self.idents.get(entity).map(String::as_str)
    }
}

/// Builds a [`TypePlan`] from a resolved schema.
pub struct TypePlanner<'a> {
    ir: &'a SchemaIr,
    config: &'a GeneratorConfig,
    runtime: String,
    namer: TypeNamer,
    idents: HashMap<String, String>,
}

impl<'a> TypePlanner<'a> {
    /// Creates a new planner.
    #[must_use]
    pub fn new(ir: &'a SchemaIr, config: &'a GeneratorConfig) -> Self {
        Self {
            ir,
            config,
            runtime: config.runtime_path(),
            namer: TypeNamer::new(),
            idents: HashMap::new(),
        }
    }

    /// Takes an identifier for a non-entity item (e.g. a generated trait).
    ///
    /// # Errors
    /// Returns `CodegenError::Generation` if the identifier is taken.
    pub fn reserve(&mut self, ident: &str) -> Result<(), CodegenError> {
        if self.namer.reserve(ident) {
            Ok(())
        } else {
            Err(CodegenError::generation(format!(
                "'{}' is already used as a type name",
                ident
            )))
        }
    }

    /// Plans every entity that is not excluded, in emission order.
    ///
    /// # Errors
    /// Returns `CodegenError` on identifier collisions or references to
    /// excluded entities.
    pub fn plan(mut self) -> Result<TypePlan, CodegenError> {
        let ir = self.ir;
        for (name, _) in ir.ordered() {
            if self.config.is_excluded(name) {
                continue;
            }
            let ident = type_ident(name);
            if !self.namer.reserve(&ident) {
                return Err(CodegenError::generation(format!(
                    "entity '{}' maps to type name '{}', which is reserved or already used",
                    name, ident
                )));
            }
            self.idents.insert(name.to_string(), ident);
        }

        let mut definitions = Vec::with_capacity(self.idents.len());
        for (position, (name, node)) in ir.ordered().enumerate() {
            let Some(ident) = self.idents.get(name).cloned() else {
                debug!(entity = name, "skipping excluded entity");
                continue;
            };

            let mut planned = Vec::new();
            let definition = self.entity(&ident, node, position, &mut planned)?;
            planned.push(definition);
            debug!(entity = name, definitions = planned.len(), "planned entity");
            definitions.extend(planned);
        }

        Ok(TypePlan {
            definitions,
            idents: self.idents,
        })
    }

    fn entity(
        &mut self,
        ident: &str,
        node: &TypeNode,
        position: usize,
        aux: &mut Vec<Definition>,
    ) -> Result<Definition, CodegenError> {
        match node {
            TypeNode::Record(record) => Ok(Definition::Record(self.record(ident, record, position, aux)?)),
            TypeNode::Enumeration(enumeration) => Ok(Definition::Enumeration(enum_def(ident, enumeration))),
            other => {
                let target = self.type_expr(other, ident, ident, position, false, aux)?;
                Ok(Definition::Alias(AliasDef {
                    ident: ident.to_string(),
                    target,
                }))
            }
        }
    }

    fn record(
        &mut self,
        ident: &str,
        record: &RecordType,
        position: usize,
        aux: &mut Vec<Definition>,
    ) -> Result<RecordDef, CodegenError> {
        let mut seen = HashSet::with_capacity(record.fields.len());
        let mut fields = Vec::with_capacity(record.fields.len());

        for (wire, field) in &record.fields {
            let field_name = field_ident(wire);
            if !seen.insert(field_name.clone()) {
                return Err(CodegenError::generation(format!(
                    "two fields of '{}' map to the identifier '{}'",
                    ident, field_name
                )));
            }

            let hint = format!("{}{}", ident, type_ident(wire));
            let context = format!("{}.{}", ident, wire);
            let ty = self.type_expr(&field.node, &hint, &context, position, false, aux)?;

            fields.push(FieldDef {
                ident: field_name,
                wire: wire.clone(),
                ty,
                presence: Presence::of(&field.node),
                description: field.description.clone(),
            });
        }

        Ok(RecordDef {
            ident: ident.to_string(),
            description: record.description.clone(),
            fields,
        })
    }

    /// Returns the Rust type expression of `node`.
    ///
    /// `indirect` is set below a `Vec` or map, where a reference needs no box.
    fn type_expr(
        &mut self,
        node: &TypeNode,
        hint: &str,
        context: &str,
        position: usize,
        indirect: bool,
        aux: &mut Vec<Definition>,
    ) -> Result<String, CodegenError> {
        let expr = match node {
            TypeNode::Primitive(kind) => primitive_type(*kind).to_string(),
            TypeNode::IntOrString => format!("{}::IntOrString", self.runtime),
            TypeNode::NullableString => format!("{}::NullableString", self.runtime),
            TypeNode::AnyJson => format!("{}::Value", self.runtime),
            TypeNode::StringKeyedMap(inner) => {
                let value_hint = format!("{}Value", hint);
                let value = self.type_expr(inner, &value_hint, context, position, true, aux)?;
                format!("{}::IndexMap<String, {}>", self.runtime, value)
            }
            TypeNode::Sequence(inner) => {
                let item_hint = format!("{}Item", hint);
                let item = self.type_expr(inner, &item_hint, context, position, true, aux)?;
                format!("Vec<{}>", item)
            }
            TypeNode::Optional(inner) if carries_null(inner) => {
                self.type_expr(inner, hint, context, position, indirect, aux)?
            }
            TypeNode::Optional(inner) => {
                let ty = self.type_expr(inner, hint, context, position, indirect, aux)?;
                if !indirect && self.holds_unplaced(inner, position) {
                    format!("Option<Box<{}>>", ty)
                } else {
                    format!("Option<{}>", ty)
                }
            }
            TypeNode::Reference(target) => self.reference(target, context)?,
            TypeNode::Enumeration(enumeration) => {
                let ident = self.namer.claim(hint);
                aux.push(Definition::Enumeration(enum_def(&ident, enumeration)));
                ident
            }
            TypeNode::Record(record) => {
                let ident = self.namer.claim(hint);
                let def = self.record(&ident, record, position, aux)?;
                aux.push(Definition::Record(def));
                ident
            }
        };
        Ok(expr)
    }

    fn reference(&self, target: &str, context: &str) -> Result<String, CodegenError> {
        self.idents
            .get(target)
            .cloned()
            .ok_or_else(|| CodegenError::ExcludedReference {
                entity: target.to_string(),
                field: context.to_string(),
            })
    }

    /// True if `node` holds, without indirection, an entity emitted at or
    /// after `position`. Such a value needs a box to have a finite size.
    fn holds_unplaced(&self, node: &TypeNode, position: usize) -> bool {
        match node {
            TypeNode::Reference(target) => self.is_not_before(target, position),
            TypeNode::Record(_) => node
                .dependencies()
                .strong
                .iter()
                .any(|target| self.is_not_before(target, position)),
            _ => false,
        }
    }

    /// True if `target` is emitted at or after `position`.
    fn is_not_before(&self, target: &str, position: usize) -> bool {
        self.ir.position(target).is_some_and(|p| p >= position)
    }
}

fn enum_def(ident: &str, enumeration: &EnumerationType) -> EnumDef {
    EnumDef {
        ident: ident.to_string(),
        description: enumeration.description.clone(),
        variants: variant_idents(enumeration.values.iter().map(String::as_str))
            .into_iter()
            .map(|(variant, literal)| (variant, literal.to_string()))
            .collect(),
    }
}

/// Types whose own value space has `null`, so `Option` around them adds no state.
fn carries_null(node: &TypeNode) -> bool {
    matches!(node, TypeNode::AnyJson | TypeNode::NullableString)
}

const fn primitive_type(kind: PrimitiveKind) -> &'static str {
    match kind {
        PrimitiveKind::Integer => "i64",
        PrimitiveKind::Real => "f64",
        PrimitiveKind::Boolean => "bool",
        PrimitiveKind::String => "String",
    }
}

/// Generator for type aliases.
pub struct AliasGenerator;

impl AliasGenerator {
    /// Generates a `pub type` definition.
    #[must_use]
    pub fn generate(alias: &AliasDef) -> String {
        format!("pub type {} = {};\n\n", alias.ident, alias.target)
    }
}
