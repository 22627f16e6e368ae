//! Identifier rules for generated Rust code.
//!
//! Wire names are never changed; only the Rust identifiers derived from them
//! are adjusted so that the generated module compiles.

use std::collections::HashSet;
use wiretype_schema::{to_pascal_case, to_snake_case};

/// Rust keywords, strict and reserved.
const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl",
    "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// Wire field names with a fixed generated identifier.
const FIELD_REMAP: &[(&str, &str)] = &[("type", "type_"), ("__restart", "restart__")];

/// Type names the generated code uses unqualified.
pub const RESERVED_TYPE_NAMES: &[&str] = &["Box", "Option", "Self", "String", "Vec"];

/// Returns true if `ident` is a Rust keyword.
#[must_use]
pub fn is_keyword(ident: &str) -> bool {
    RUST_KEYWORDS.contains(&ident)
}

/// Returns the struct field identifier for a wire field name.
#[must_use]
pub fn field_ident(wire: &str) -> String {
    if let Some((_, ident)) = FIELD_REMAP.iter().find(|(name, _)| *name == wire) {
        return (*ident).to_string();
    }

    let ident = to_snake_case(wire);
    let ident = ident.trim_start_matches('_');
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("field_{}", ident)
    } else if is_keyword(ident) {
        format!("{}_", ident)
    } else {
        ident.to_string()
    }
}

/// Returns the type identifier for an entity or auxiliary type name.
#[must_use]
pub fn type_ident(name: &str) -> String {
    let ident = to_pascal_case(name);
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("T{}", ident)
    } else if is_keyword(&ident) {
        format!("{}_", ident)
    } else {
        ident
    }
}

/// Returns the variant identifier for an enumeration literal.
#[must_use]
pub fn variant_ident(literal: &str) -> String {
    let ident = to_pascal_case(literal);
    if ident.is_empty() {
        "Empty".to_string()
    } else if ident.starts_with(|c: char| c.is_ascii_digit()) {
        format!("V{}", ident)
    } else if is_keyword(&ident) {
        format!("{}_", ident)
    } else {
        ident
    }
}

/// Assigns one identifier per literal, suffixing duplicates.
#[must_use]
pub fn variant_idents<'a, I>(literals: I) -> Vec<(String, &'a str)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut taken = HashSet::new();
    literals
        .into_iter()
        .map(|literal| {
            let base = variant_ident(literal);
            let mut ident = base.clone();
            let mut suffix = 2;
            while !taken.insert(ident.clone()) {
                ident = format!("{}{}", base, suffix);
                suffix += 1;
            }
            (ident, literal)
        })
        .collect()
}

/// Lowercases the first character: `SetBreakpoints` becomes `setBreakpoints`.
#[must_use]
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Hands out type identifiers that are unique within one generated module.
#[derive(Debug, Default)]
pub struct TypeNamer {
    taken: HashSet<String>,
}

impl TypeNamer {
    /// Creates a namer with the unqualified standard type names taken.
    #[must_use]
    pub fn new() -> Self {
        Self {
            taken: RESERVED_TYPE_NAMES.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Takes `ident` exactly. Returns false if it is already taken.
    pub fn reserve(&mut self, ident: &str) -> bool {
        self.taken.insert(ident.to_string())
    }

    /// Takes `base`, or `base` with the first free numeric suffix.
    pub fn claim(&mut self, base: &str) -> String {
        let base = type_ident(base);
        let mut ident = base.clone();
        let mut suffix = 2;
        while !self.taken.insert(ident.clone()) {
            ident = format!("{}{}", base, suffix);
            suffix += 1;
        }
        ident
    }
}
