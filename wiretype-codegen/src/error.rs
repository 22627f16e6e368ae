//! Errors raised while turning a resolved schema into Rust source.

use thiserror::Error;

/// Failure of a generator entry point.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// The schema document could not be loaded.
    #[error("schema parse error: {0}")]
    Parse(#[from] wiretype_schema::ParseError),

    /// The document loaded but its entities could not be resolved or ordered.
    #[error("schema error: {0}")]
    Schema(#[from] wiretype_schema::SchemaError),

    /// Reading the schema or writing the module failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The schema maps onto Rust identifiers that clash.
    #[error("generation error: {message}")]
    Generation {
        /// What clashed, with the entity or field involved.
        message: String,
    },

    /// A generated entity refers to an entity excluded from the module.
    #[error("field '{field}' references excluded entity '{entity}'")]
    ExcludedReference {
        /// Excluded entity name.
        entity: String,
        /// Referring field as `Owner.field`.
        field: String,
    },
}

impl CodegenError {
    /// Creates an identifier clash error.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }
}
