//! Build script for wiretype-protocol - generates the message types.

use std::path::{Path, PathBuf};
use wiretype_codegen::{GeneratorConfig, generate_to_file};

const SCHEMAS: &[(&str, &str)] = &[
    ("schemas/debug_protocol.json", "debug_protocol.rs"),
    ("schemas/structures.json", "structures.rs"),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);
    for (schema, output) in SCHEMAS {
        println!("cargo:rerun-if-changed={}", schema);
        generate_to_file(
            Path::new(schema),
            &out_dir.join(output),
            &GeneratorConfig::default(),
        )?;
    }
    Ok(())
}
