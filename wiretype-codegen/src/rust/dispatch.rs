//! Request dispatcher generation.
//!
//! A record named `<Base>Request` whose `type` field is the enumeration
//! `{"request"}` and a record named `<Base>Response` whose `type` field is
//! `{"response"}` form a pair. The wire command of the pair is `<base>` with
//! its first letter lowercased.

use crate::rust::naming::lower_first;
use crate::rust::types::TypePlan;
use std::collections::BTreeMap;
use tracing::{debug, warn};
use wiretype_schema::{SchemaIr, TypeNode, to_snake_case};

const REQUEST_SUFFIX: &str = "Request";
const RESPONSE_SUFFIX: &str = "Response";
const DISCRIMINANT_FIELD: &str = "type";

/// Name of the generated handler trait.
pub const HANDLER_TRAIT: &str = "RequestHandlers";

/// Request and response entities sharing a base name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagePair {
    /// Request entity name.
    pub request: Option<String>,
    /// Response entity name.
    pub response: Option<String>,
}

/// Request/response pairs keyed by base name.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    pairs: BTreeMap<String, MessagePair>,
}

impl DispatchTable {
    /// Collects pairs from every entity that passes `include`.
    #[must_use]
    pub fn from_ir<F>(ir: &SchemaIr, include: F) -> Self
    where
        F: Fn(&str) -> bool,
    {
        let mut table = Self::default();
        for (name, node) in &ir.types {
            if include(name) {
                table.add(name, node);
            }
        }
        table
    }

    /// Classifies one entity.
    pub fn add(&mut self, name: &str, node: &TypeNode) {
        let TypeNode::Record(record) = node else {
            return;
        };
        let Some(TypeNode::Enumeration(discriminant)) =
            record.fields.get(DISCRIMINANT_FIELD).map(|field| &field.node)
        else {
            return;
        };

        if discriminant.is_single("request") {
            match base_name(name, REQUEST_SUFFIX) {
                Some(base) => self.pairs.entry(base.to_string()).or_default().request = Some(name.to_string()),
                None => warn!(entity = name, "request message without a 'Request' suffix"),
            }
        } else if discriminant.is_single("response") {
            match base_name(name, RESPONSE_SUFFIX) {
                Some(base) => self.pairs.entry(base.to_string()).or_default().response = Some(name.to_string()),
                None => warn!(entity = name, "response message without a 'Response' suffix"),
            }
        }
    }

    /// Returns the pair of a base name.
    #[must_use]
    pub fn get(&self, base: &str) -> Option<&MessagePair> {
        self.pairs.get(base)
    }

    /// Iterates complete pairs as `(base, request, response)`, by base name.
    pub fn complete(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.pairs.iter().filter_map(|(base, pair)| {
            match (pair.request.as_deref(), pair.response.as_deref()) {
                (Some(request), Some(response)) => Some((base.as_str(), request, response)),
                _ => {
                    debug!(base = base.as_str(), "incomplete request/response pair");
                    None
                }
            }
        })
    }

    /// Returns true if there is no complete pair.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.complete().next().is_none()
    }
}

fn base_name<'n>(name: &'n str, suffix: &str) -> Option<&'n str> {
    name.strip_suffix(suffix).filter(|base| !base.is_empty())
}

/// Generator for the handler trait and `dispatch_request` function.
pub struct DispatchGenerator<'a> {
    table: &'a DispatchTable,
    plan: &'a TypePlan,
    runtime: &'a str,
}

impl<'a> DispatchGenerator<'a> {
    /// Creates a new dispatch generator.
    #[must_use]
    pub fn new(table: &'a DispatchTable, plan: &'a TypePlan, runtime: &'a str) -> Self {
        Self {
            table,
            plan,
            runtime,
        }
    }

    /// Generates the dispatcher, or nothing if there is no complete pair.
    #[must_use]
    pub fn generate(&self) -> String {
        let routes: Vec<Route> = self
            .table
            .complete()
            .filter_map(|(base, request, response)| {
                Some(Route {
                    command: lower_first(base),
                    handler: format!("handle_{}", to_snake_case(base)),
                    request: self.plan.ident(request)?.to_string(),
                    response: self.plan.ident(response)?.to_string(),
                })
            })
            .collect();

        if routes.is_empty() {
            return String::new();
        }

        let mut output = String::new();
        output.push_str(&self.generate_trait(&routes));
        output.push_str(&self.generate_commands(&routes));
        output.push_str(&self.generate_dispatch(&routes));
        output
    }

    fn generate_trait(&self, routes: &[Route]) -> String {
        let mut output = String::new();
        output.push_str("/// Handlers for every request/response pair of the protocol.\n");
        output.push_str(&format!("pub trait {} {{\n", HANDLER_TRAIT));
        for (index, route) in routes.iter().enumerate() {
            if index > 0 {
                output.push('\n');
            }
            output.push_str(&format!("    /// Handles the `{}` request.\n", route.command));
            output.push_str(&format!(
                "    fn {}(&self, request: {}) -> {};\n",
                route.handler, route.request, route.response
            ));
        }
        output.push_str("}\n\n");
        output
    }

    fn generate_commands(&self, routes: &[Route]) -> String {
        let commands: Vec<String> = routes
            .iter()
            .map(|route| format!("{:?}", route.command))
            .collect();
        format!(
            "/// Commands handled by [`dispatch_request`].\npub const COMMANDS: &[&str] = &[{}];\n\n",
            commands.join(", ")
        )
    }

    fn generate_dispatch(&self, routes: &[Route]) -> String {
        let rt = self.runtime;
        let mut output = String::new();

        output.push_str("/// Decodes a request, routes it by its `command` field and encodes the response.\n");
        output.push_str(&format!(
            "pub fn dispatch_request<H: {} + ?Sized>(\n",
            HANDLER_TRAIT
        ));
        output.push_str("    handlers: &H,\n");
        output.push_str(&format!("    request: &{}::Value,\n", rt));
        output.push_str(&format!(") -> {}::Result<{}::Value> {{\n", rt, rt));
        output.push_str(&format!(
            "    let object = {}::expect_object(request)?;\n",
            rt
        ));
        output.push_str(&format!(
            "    let command: String = {}::decode_field(object, \"command\")?;\n",
            rt
        ));
        output.push_str("    match command.as_str() {\n");
        for route in routes {
            output.push_str(&format!("        {:?} => {{\n", route.command));
            output.push_str(&format!(
                "            let request = <{} as {}::JsonCodec>::decode(request)?;\n",
                route.request, rt
            ));
            output.push_str(&format!(
                "            Ok({}::JsonCodec::encode(&handlers.{}(request)))\n",
                rt, route.handler
            ));
            output.push_str("        }\n");
        }
        output.push_str(&format!(
            "        other => Err({}::DecodeError::unknown_variant(other, COMMANDS).at_field(\"command\")),\n",
            rt
        ));
        output.push_str("    }\n");
        output.push_str("}\n");
        output
    }
}

struct Route {
    command: String,
    handler: String,
    request: String,
    response: String,
}
