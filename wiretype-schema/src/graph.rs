//! Dependency analysis and deterministic topological ordering.
//!
//! Each entity exposes only its direct references. References reached
//! through `Optional`, `Sequence` or `StringKeyedMap` are weak: the generated
//! representation holds them behind an indirection, so a cycle made only of
//! weak edges can be broken. A cycle with a strong edge on every step cannot,
//! and neither can a cycle made only of aliases (entities that are neither
//! records nor enumerations), since an alias is expanded in place.

use crate::error::SchemaError;
use crate::types::TypeNode;
use indexmap::IndexMap;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::debug;

/// Direct dependencies of one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependencies {
    /// Names referenced directly.
    pub strong: BTreeSet<String>,
    /// Names referenced only through an optional, sequence or map.
    pub weak: BTreeSet<String>,
}

impl Dependencies {
    /// Computes the dependencies of a resolved node.
    #[must_use]
    pub fn of(node: &TypeNode) -> Self {
        let mut deps = Self::default();
        deps.walk(node, false);
        deps.weak.retain(|name| !deps.strong.contains(name));
        deps
    }

    fn walk(&mut self, node: &TypeNode, weak: bool) {
        match node {
            TypeNode::Reference(name) => {
                if weak {
                    self.weak.insert(name.clone());
                } else {
                    self.strong.insert(name.clone());
                }
            }
            TypeNode::Optional(inner) | TypeNode::Sequence(inner) | TypeNode::StringKeyedMap(inner) => {
                self.walk(inner, true);
            }
            TypeNode::Record(record) => {
                for field in record.fields.values() {
                    self.walk(&field.node, weak);
                }
            }
            TypeNode::Primitive(_)
            | TypeNode::IntOrString
            | TypeNode::NullableString
            | TypeNode::AnyJson
            | TypeNode::Enumeration(_) => {}
        }
    }

    /// Returns every dependency, strong or weak.
    #[must_use]
    pub fn all(&self) -> BTreeSet<String> {
        self.strong.union(&self.weak).cloned().collect()
    }

    /// Returns true if there is no dependency at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strong.is_empty() && self.weak.is_empty()
    }
}

impl TypeNode {
    /// Returns the direct dependencies of this node.
    #[must_use]
    pub fn dependencies(&self) -> Dependencies {
        Dependencies::of(self)
    }
}

/// Dependency graph over resolved entities.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, Dependencies>,
    aliases: BTreeSet<String>,
}

impl DependencyGraph {
    /// Builds the graph of a resolved table.
    #[must_use]
    pub fn from_types(types: &IndexMap<String, TypeNode>) -> Self {
        let nodes = types
            .iter()
            .map(|(name, node)| (name.clone(), Dependencies::of(node)))
            .collect();
        let aliases = types
            .iter()
            .filter(|(_, node)| !matches!(node, TypeNode::Record(_) | TypeNode::Enumeration(_)))
            .map(|(name, _)| name.clone())
            .collect();
        Self { nodes, aliases }
    }

    /// Returns the dependencies of an entity.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Option<&Dependencies> {
        self.nodes.get(name)
    }

    /// Iterates entities with their dependencies, by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Dependencies)> {
        self.nodes.iter().map(|(name, deps)| (name.as_str(), deps))
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Orders every entity so that dependencies come first.
    ///
    /// Satisfiable entities are peeled layer by layer, each layer in
    /// ascending name order. Names outside the graph count as satisfied.
    ///
    /// # Errors
    /// Returns `SchemaError::CyclicDependency` if entities depend on each
    /// other through strong edges only, or if aliases refer to each other
    /// through any kind of edge.
    pub fn sort(&self) -> Result<Vec<String>, SchemaError> {
        if let Some(cycle) = self.alias_cycle() {
            return Err(SchemaError::CyclicDependency { cycle });
        }

        let mut remaining: BTreeSet<&str> = self.nodes.keys().map(String::as_str).collect();
        let mut placed: HashSet<&str> = HashSet::with_capacity(remaining.len());
        let mut order = Vec::with_capacity(remaining.len());

        while !remaining.is_empty() {
            let mut layer: Vec<&str> = remaining
                .iter()
                .copied()
                .filter(|name| self.waiting_on(name, &placed) == (0, 0))
                .collect();

            if layer.is_empty() {
                let released = remaining
                    .iter()
                    .copied()
                    .find(|name| self.waiting_on(name, &placed).0 == 0);

                match released {
                    Some(name) => {
                        debug!(entity = name, "breaking cycle at optional reference");
                        layer.push(name);
                    }
                    None => return Err(self.cycle(&remaining)),
                }
            }

            for name in layer {
                remaining.remove(name);
                placed.insert(name);
                order.push(name.to_string());
            }
        }

        Ok(order)
    }

    /// Counts the unplaced strong and weak dependencies of `name`.
    ///
    /// Weak self references never block.
    fn waiting_on(&self, name: &str, placed: &HashSet<&str>) -> (usize, usize) {
        let Some(deps) = self.nodes.get(name) else {
            return (0, 0);
        };

        let pending = |dep: &&String| self.nodes.contains_key(dep.as_str()) && !placed.contains(dep.as_str());
        let strong = deps.strong.iter().filter(pending).count();
        let weak = deps
            .weak
            .iter()
            .filter(|dep| dep.as_str() != name)
            .filter(pending)
            .count();
        (strong, weak)
    }

    /// Finds a cycle that only passes through aliases, starting from the
    /// smallest alias name.
    fn alias_cycle(&self) -> Option<String> {
        let mut done = HashSet::with_capacity(self.aliases.len());
        let mut path = Vec::new();
        self.aliases
            .iter()
            .find_map(|alias| self.alias_walk(alias, &mut path, &mut done))
    }

    fn alias_walk<'g>(
        &'g self,
        name: &'g str,
        path: &mut Vec<&'g str>,
        done: &mut HashSet<&'g str>,
    ) -> Option<String> {
        if let Some(start) = path.iter().position(|seen| *seen == name) {
            let mut cycle = path[start..].to_vec();
            cycle.push(name);
            return Some(cycle.join(" -> "));
        }
        if done.contains(name) {
            return None;
        }

        path.push(name);
        if let Some(deps) = self.nodes.get(name) {
            for dep in deps.strong.iter().chain(&deps.weak) {
                if self.aliases.contains(dep) {
                    if let Some(cycle) = self.alias_walk(dep, path, done) {
                        return Some(cycle);
                    }
                }
            }
        }
        path.pop();
        done.insert(name);
        None
    }

    /// Follows the smallest strong dependency from the smallest stuck entity
    /// until a name repeats.
    fn cycle(&self, remaining: &BTreeSet<&str>) -> SchemaError {
        let mut path: Vec<&str> = Vec::new();
        let mut current = remaining.first().copied();

        while let Some(name) = current {
            if let Some(start) = path.iter().position(|seen| *seen == name) {
                let mut cycle = path[start..].to_vec();
                cycle.push(name);
                return SchemaError::CyclicDependency {
                    cycle: cycle.join(" -> "),
                };
            }
            path.push(name);
            current = self.nodes.get(name).and_then(|deps| {
                deps.strong
                    .iter()
                    .map(String::as_str)
                    .find(|dep| remaining.contains(dep))
            });
        }

        SchemaError::CyclicDependency {
            cycle: path.join(" -> "),
        }
    }
}
