//! Error types for schema loading and resolution.

use thiserror::Error;

/// Error type for loading a schema document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON syntax error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document has no `definitions` map.
    #[error("schema document has no 'definitions' object")]
    MissingDefinitions,

    /// Invalid document structure.
    #[error("invalid schema structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for schema resolution and ordering.
///
/// Every variant is fatal: the compiler aborts on the first one.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A schema node matches none of the recognized shapes.
    #[error("malformed schema at '{path}': {message}")]
    MalformedSchema {
        /// JSON pointer of the offending node.
        path: String,
        /// What is wrong with it.
        message: String,
    },

    /// Two types cannot be merged.
    #[error("cannot unify `{left}` with `{right}` at {}", display_path(.path))]
    Unification {
        /// Field path inside the merged record.
        path: Vec<String>,
        /// Left operand.
        left: String,
        /// Right operand.
        right: String,
    },

    /// Two enumerations share no literal.
    #[error(
        "enumerations [{}] and [{}] have no value in common at {}",
        .left.join(", "),
        .right.join(", "),
        display_path(.path)
    )]
    DisjointEnumerations {
        /// Field path inside the merged record.
        path: Vec<String>,
        /// Left literals.
        left: Vec<String>,
        /// Right literals.
        right: Vec<String>,
    },

    /// Resolution stopped making progress.
    #[error(
        "cyclic or unresolvable references: [{}] wait on [{}]",
        .names.join(", "),
        .missing.join(", ")
    )]
    UnresolvableReferences {
        /// Entities that could not be resolved.
        names: Vec<String>,
        /// Entities they are waiting for.
        missing: Vec<String>,
    },

    /// A reference names an entity that does not exist.
    #[error("'{entity}' references undefined entity '{target}'")]
    DanglingReference {
        /// Entity holding the reference.
        entity: String,
        /// Name that could not be found.
        target: String,
    },

    /// Resolved entities depend on each other without indirection.
    #[error("circular type dependency detected: {cycle}")]
    CyclicDependency {
        /// The cycle, e.g. `A -> B -> A`.
        cycle: String,
    },

    /// Validation error.
    #[error("validation error: {message}")]
    Validation {
        /// Error message.
        message: String,
    },
}

impl SchemaError {
    /// Creates a malformed schema error.
    pub fn malformed(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedSchema {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Prefixes the field path of a merge failure with `field`.
    ///
    /// Other variants are returned unchanged.
    #[must_use]
    pub fn within(mut self, field: &str) -> Self {
        match &mut self {
            Self::Unification { path, .. } | Self::DisjointEnumerations { path, .. } => {
                path.insert(0, field.to_string());
            }
            _ => {}
        }
        self
    }
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "the top level".to_string()
    } else {
        format!("field '{}'", path.join("."))
    }
}
