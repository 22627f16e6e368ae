use std::io::Write;
use wiretype_codegen::{CodegenError, GeneratorConfig, generate_from_file, generate_to_file};

const SCHEMA: &str = r##"{
    "definitions": {
        "Checksum": {
            "type": "object",
            "description": "The checksum of an item.",
            "properties": {
                "algorithm": {"$ref": "#/definitions/ChecksumAlgorithm"},
                "checksum": {"type": "string"}
            },
            "required": ["algorithm", "checksum"]
        },
        "ChecksumAlgorithm": {
            "type": "string",
            "enum": ["MD5", "SHA1", "SHA256", "timestamp"]
        }
    }
}"##;

fn schema_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write schema");
    file
}

#[test]
fn test_generate_to_file_writes_module() {
    let schema = schema_file(SCHEMA);
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let out = dir.path().join("protocol.rs");

    generate_to_file(schema.path(), &out, &GeneratorConfig::default()).expect("Failed to generate");

    let code = std::fs::read_to_string(&out).expect("Failed to read output");
    let algorithm = code.find("pub enum ChecksumAlgorithm {").expect("enum emitted");
    let checksum = code.find("pub struct Checksum {").expect("struct emitted");
    assert!(algorithm < checksum);
    assert!(code.contains("/// The checksum of an item."));
    assert!(!code.contains("dispatch_request"));
    syn::parse_file(&code).expect("generated module must parse");
}

#[test]
fn test_generate_from_file_matches_str() {
    let schema = schema_file(SCHEMA);
    let from_file =
        generate_from_file(schema.path(), &GeneratorConfig::default()).expect("Failed to generate");
    let from_str = wiretype_codegen::generate_from_str(SCHEMA).expect("Failed to generate");
    assert_eq!(from_file, from_str);
}

#[test]
fn test_missing_schema_file() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let result = generate_from_file(&dir.path().join("absent.json"), &GeneratorConfig::default());
    assert!(matches!(result, Err(CodegenError::Io(_))));
}

#[test]
fn test_cycle_is_reported() {
    let schema = schema_file(
        r##"{
            "definitions": {
                "A": {"type": "object", "properties": {"b": {"$ref": "#/definitions/B"}}, "required": ["b"]},
                "B": {"type": "object", "properties": {"a": {"$ref": "#/definitions/A"}}, "required": ["a"]}
            }
        }"##,
    );
    let result = generate_from_file(schema.path(), &GeneratorConfig::default());
    let err = result.expect_err("cycle must fail");
    assert!(err.to_string().contains("A -> B -> A"), "{}", err);
}
