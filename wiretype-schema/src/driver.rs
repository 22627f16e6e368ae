//! Fixed-point resolution of every entity in a document.

use crate::document::SchemaDocument;
use crate::error::SchemaError;
use crate::resolver::{Resolution, TypeResolver};
use crate::types::TypeNode;
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, info};

/// Runs the [`TypeResolver`] over a whole document.
///
/// Entities are attempted in document order. Those waiting on an entity that
/// is not resolved yet are retried on the next pass, until every entity is
/// resolved or a pass makes no progress.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionDriver<'a> {
    document: &'a SchemaDocument,
}

impl<'a> ResolutionDriver<'a> {
    /// Creates a driver for `document`.
    #[must_use]
    pub fn new(document: &'a SchemaDocument) -> Self {
        Self { document }
    }

    /// Resolves every entity.
    ///
    /// The returned table is in document order.
    ///
    /// # Errors
    /// Returns the first fatal resolver error, or
    /// `SchemaError::UnresolvableReferences` if a pass resolves nothing while
    /// entities are still waiting.
    pub fn run(&self) -> Result<IndexMap<String, TypeNode>, SchemaError> {
        let mut partial: IndexMap<String, TypeNode> = IndexMap::with_capacity(self.document.len());
        let mut unprocessed: VecDeque<(&str, &Value)> = self.document.iter().collect();
        let mut pass = 0usize;

        loop {
            pass += 1;
            let before = partial.len();
            let mut deferred = Vec::new();

            while let Some((name, raw)) = unprocessed.pop_front() {
                match TypeResolver::new(&partial).resolve(name, raw)? {
                    Resolution::Resolved(node) => {
                        partial.insert(name.to_string(), node);
                    }
                    Resolution::Deferred { missing } => {
                        debug!(entity = name, missing = %missing, pass, "deferring entity");
                        deferred.push((name, raw, missing));
                    }
                }
            }

            let resolved = partial.len() - before;
            info!(
                pass,
                resolved,
                deferred = deferred.len(),
                "resolution pass complete"
            );

            if deferred.is_empty() {
                break;
            }

            if resolved == 0 {
                let missing: BTreeSet<String> =
                    deferred.iter().map(|(_, _, missing)| missing.clone()).collect();
                return Err(SchemaError::UnresolvableReferences {
                    names: deferred.iter().map(|(name, _, _)| name.to_string()).collect(),
                    missing: missing.into_iter().collect(),
                });
            }

            unprocessed = deferred.into_iter().map(|(name, raw, _)| (name, raw)).collect();
        }

        Ok(self
            .document
            .names()
            .filter_map(|name| {
                partial
                    .swap_remove(name)
                    .map(|node| (name.to_string(), node))
            })
            .collect())
    }
}
