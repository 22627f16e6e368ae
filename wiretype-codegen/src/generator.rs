//! Top-level module generator.

use crate::config::GeneratorConfig;
use crate::error::CodegenError;
use crate::rust::dispatch::HANDLER_TRAIT;
use crate::rust::{
    AliasGenerator, Definition, DispatchGenerator, DispatchTable, EnumGenerator, RecordGenerator,
    TypePlanner,
};
use tracing::{debug, info};
use wiretype_schema::SchemaIr;

const DEFAULT_HEADER: &str = "Code generated by wiretype. Do not edit.";

/// Generates one Rust module for a resolved schema.
pub struct Generator<'a> {
    ir: &'a SchemaIr,
    config: GeneratorConfig,
}

impl<'a> Generator<'a> {
    /// Creates a generator with the default configuration.
    #[must_use]
    pub fn new(ir: &'a SchemaIr) -> Self {
        Self::with_config(ir, GeneratorConfig::default())
    }

    /// Creates a generator with the given configuration.
    #[must_use]
    pub fn with_config(ir: &'a SchemaIr, config: GeneratorConfig) -> Self {
        Self { ir, config }
    }

    /// Generates the module source.
    ///
    /// The output depends only on the schema and the configuration.
    ///
    /// # Errors
    /// Returns `CodegenError` if two definitions map to the same identifier or
    /// a kept entity references an excluded one.
    pub fn generate(&self) -> Result<String, CodegenError> {
        let runtime = self.config.runtime_path();

        let mut planner = TypePlanner::new(self.ir, &self.config);
        if self.config.dispatcher_enabled() {
            planner.reserve(HANDLER_TRAIT)?;
        }
        let plan = planner.plan()?;

        let mut output = String::new();
        output.push_str(&self.generate_header());

        let records = RecordGenerator::new(&runtime);
        let enums = EnumGenerator::new(&runtime);
        for definition in &plan.definitions {
            match definition {
                Definition::Record(record) => output.push_str(&records.generate(record)),
                Definition::Enumeration(enumeration) => {
                    output.push_str(&enums.generate(enumeration));
                }
                Definition::Alias(alias) => output.push_str(&AliasGenerator::generate(alias)),
            }
        }

        if self.config.dispatcher_enabled() {
            let table = DispatchTable::from_ir(self.ir, |name| !self.config.is_excluded(name));
            let dispatcher = DispatchGenerator::new(&table, &plan, &runtime).generate();
            if dispatcher.is_empty() {
                debug!("no request/response pairs, dispatcher skipped");
            }
            output.push_str(&dispatcher);
        }

        info!(
            definitions = plan.definitions.len(),
            bytes = output.len(),
            "module generated"
        );
        Ok(output)
    }

    fn generate_header(&self) -> String {
        let text = self.config.header_text().unwrap_or(DEFAULT_HEADER);
        let mut output = String::new();
        for line in text.lines().map(str::trim_end) {
            if line.is_empty() {
                output.push_str("//\n");
            } else {
                output.push_str(&format!("// {}\n", line));
            }
        }
        output.push('\n');
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROTOCOL: &str = r##"{
        "definitions": {
            "ProtocolMessage": {
                "type": "object",
                "properties": {
                    "seq": {"type": "integer"},
                    "type": {"type": "string"}
                },
                "required": ["seq", "type"]
            },
            "Request": {
                "allOf": [
                    {"$ref": "#/definitions/ProtocolMessage"},
                    {
                        "type": "object",
                        "properties": {
                            "type": {"type": "string", "enum": ["request"]},
                            "command": {"type": "string"}
                        },
                        "required": ["type", "command"]
                    }
                ]
            },
            "Response": {
                "allOf": [
                    {"$ref": "#/definitions/ProtocolMessage"},
                    {
                        "type": "object",
                        "properties": {
                            "type": {"type": "string", "enum": ["response"]},
                            "success": {"type": "boolean"}
                        },
                        "required": ["type", "success"]
                    }
                ]
            },
            "ThreadsRequest": {
                "allOf": [
                    {"$ref": "#/definitions/Request"},
                    {
                        "type": "object",
                        "properties": {"command": {"type": "string", "enum": ["threads"]}},
                        "required": ["command"]
                    }
                ]
            },
            "ThreadsResponse": {
                "allOf": [
                    {"$ref": "#/definitions/Response"},
                    {
                        "type": "object",
                        "properties": {
                            "body": {
                                "type": "object",
                                "properties": {
                                    "threads": {"type": "array", "items": {"$ref": "#/definitions/Thread"}}
                                },
                                "required": ["threads"]
                            }
                        },
                        "required": ["body"]
                    }
                ]
            },
            "Thread": {
                "type": "object",
                "description": "A thread.",
                "properties": {
                    "id": {"type": "integer"},
                    "name": {"type": "string"}
                },
                "required": ["id", "name"]
            }
        }
    }"##;

    fn ir() -> SchemaIr {
        SchemaIr::from_json(PROTOCOL).expect("Failed to resolve")
    }

    #[test]
    fn test_generate_module() {
        let ir = ir();
        let code = Generator::new(&ir).generate().expect("Failed to generate");

        assert!(code.starts_with("// Code generated by wiretype. Do not edit.\n\n"));
        assert!(code.contains("pub struct Thread {"));
        assert!(code.contains("pub struct ThreadsRequest {"));
        assert!(code.contains("pub struct ThreadsResponseBody {"));
        assert!(code.contains("pub threads: Vec<Thread>,"));
        assert!(!code.contains("pub struct ProtocolMessage"));
        assert!(!code.contains("pub struct Request {"));
        assert!(code.contains("fn handle_threads(&self, request: ThreadsRequest) -> ThreadsResponse;"));
        syn::parse_file(&code).expect("generated module must parse");
    }

    #[test]
    fn test_dependencies_come_first() {
        let ir = ir();
        let code = Generator::new(&ir).generate().expect("Failed to generate");

        let thread = code.find("pub struct Thread {").expect("Thread emitted");
        let body = code.find("pub struct ThreadsResponseBody {").expect("body emitted");
        let response = code.find("pub struct ThreadsResponse {").expect("response emitted");
        assert!(thread < body);
        assert!(body < response);
    }

    #[test]
    fn test_output_is_deterministic() {
        let first = Generator::new(&ir()).generate().expect("Failed to generate");
        let second = Generator::new(&ir()).generate().expect("Failed to generate");
        assert_eq!(first, second);
    }

    #[test]
    fn test_dispatcher_can_be_disabled() {
        let ir = ir();
        let config = GeneratorConfig::new().dispatcher(false);
        let code = Generator::with_config(&ir, config)
            .generate()
            .expect("Failed to generate");

        assert!(!code.contains("RequestHandlers"));
        assert!(!code.contains("dispatch_request"));
        assert!(code.contains("pub struct ThreadsRequest {"));
    }

    #[test]
    fn test_custom_header_and_runtime() {
        let ir = ir();
        let config = GeneratorConfig::new()
            .header("Generated for tests.\n\nKeep out.")
            .runtime_crate("crate::codec");
        let code = Generator::with_config(&ir, config)
            .generate()
            .expect("Failed to generate");

        assert!(code.starts_with("// Generated for tests.\n//\n// Keep out.\n\n"));
        assert!(code.contains("impl crate::codec::JsonCodec for Thread {"));
        assert!(!code.contains("::wiretype_core"));
    }

    #[test]
    fn test_entity_named_like_handler_trait() {
        let json = r#"{
            "definitions": {
                "RequestHandlers": {"type": "object", "properties": {}}
            }
        }"#;
        let ir = SchemaIr::from_json(json).expect("Failed to resolve");

        let result = Generator::new(&ir).generate();
        assert!(matches!(result, Err(CodegenError::Generation { .. })));

        let config = GeneratorConfig::new().dispatcher(false);
        assert!(Generator::with_config(&ir, config).generate().is_ok());
    }
}
