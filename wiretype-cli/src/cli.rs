//! Command line definition and command execution.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use wiretype_codegen::GeneratorConfig;
use wiretype_schema::SchemaIr;

/// Compile JSON protocol schemas into typed Rust modules.
#[derive(Debug, Parser)]
#[command(name = "wiretype", version, about)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a Rust module from a schema document
    Generate {
        /// Schema document (JSON with a top-level "definitions" object)
        schema: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path of the runtime crate used by the generated code
        #[arg(long, default_value = wiretype_codegen::config::DEFAULT_RUNTIME_CRATE)]
        runtime_crate: String,

        /// Additional entity to skip; repeatable
        #[arg(long = "exclude", value_name = "NAME")]
        exclude: Vec<String>,

        /// Generate every entity, including the protocol envelopes
        #[arg(long)]
        no_default_excludes: bool,

        /// Do not generate the request dispatcher
        #[arg(long)]
        no_dispatcher: bool,
    },
    /// Resolve a schema and print its emission order
    Check {
        /// Schema document
        schema: PathBuf,
    },
}

/// Executes a parsed command line, writing reports to `out`.
///
/// # Errors
/// Returns an error if the schema cannot be read, resolved or generated, or
/// if the output cannot be written.
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    match cli.command {
        Command::Generate {
            schema,
            output,
            runtime_crate,
            exclude,
            no_default_excludes,
            no_dispatcher,
        } => {
            let mut config = GeneratorConfig::new()
                .runtime_crate(runtime_crate)
                .dispatcher(!no_dispatcher);
            if no_default_excludes {
                config = config.clear_excluded();
            }
            for name in exclude {
                config = config.exclude(name);
            }
            generate(&schema, output.as_deref(), &config, out)
        }
        Command::Check { schema } => check(&schema, out),
    }
}

fn generate(
    schema: &Path,
    output: Option<&Path>,
    config: &GeneratorConfig,
    out: &mut impl Write,
) -> Result<()> {
    let code = wiretype_codegen::generate_from_file(schema, config)
        .with_context(|| format!("failed to generate code from {}", schema.display()))?;

    match output {
        Some(path) => {
            std::fs::write(path, &code)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(output = %path.display(), "module written");
        }
        None => out.write_all(code.as_bytes())?,
    }
    Ok(())
}

fn check(schema: &Path, out: &mut impl Write) -> Result<()> {
    let document = wiretype_schema::parse_document_file(schema)
        .with_context(|| format!("failed to read {}", schema.display()))?;
    let ir = SchemaIr::from_document(&document)
        .with_context(|| format!("failed to resolve {}", schema.display()))?;

    for (position, name) in ir.order.iter().enumerate() {
        write!(out, "{:>4}  {}", position, name)?;
        if let Some(deps) = ir.dependencies(name).filter(|deps| !deps.is_empty()) {
            let mut listed: Vec<String> = deps.strong.iter().cloned().collect();
            listed.extend(deps.weak.iter().map(|name| format!("{}?", name)));
            write!(out, " <- {}", listed.join(", "))?;
        }
        writeln!(out)?;
    }
    writeln!(out, "{} entities resolved", ir.order.len())?;
    Ok(())
}
