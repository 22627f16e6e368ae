//! Enumeration code generation.

use crate::rust::doc_comment;
use crate::rust::types::EnumDef;

/// Generator for string enumerations.
pub struct EnumGenerator<'a> {
    runtime: &'a str,
}

impl<'a> EnumGenerator<'a> {
    /// Creates a new enum generator for the given runtime path.
    #[must_use]
    pub fn new(runtime: &'a str) -> Self {
        Self { runtime }
    }

    /// Generates an enum definition with its codec.
    #[must_use]
    pub fn generate(&self, enumeration: &EnumDef) -> String {
        let mut output = String::new();
        output.push_str(&self.generate_enum(enumeration));
        output.push_str(&self.generate_literals(enumeration));
        output.push_str(&self.generate_codec(enumeration));
        output.push_str(&self.generate_display(enumeration));
        output
    }

    fn generate_enum(&self, enumeration: &EnumDef) -> String {
        let mut output = String::new();
        let single = enumeration.variants.len() == 1;
        let fallback = format!("{} enum.", enumeration.ident);

        output.push_str(&doc_comment(enumeration.description.as_deref(), &fallback, ""));
        if single {
            output.push_str("#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]\n");
        } else {
            output.push_str("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]\n");
        }
        output.push_str(&format!("pub enum {} {{\n", enumeration.ident));
        for (variant, literal) in &enumeration.variants {
            output.push_str(&format!("    /// `{:?}`\n", literal));
            if single {
                output.push_str("    #[default]\n");
            }
            output.push_str(&format!("    {},\n", variant));
        }
        output.push_str("}\n\n");
        output
    }

    fn generate_literals(&self, enumeration: &EnumDef) -> String {
        let mut output = String::new();
        let literals: Vec<String> = enumeration
            .variants
            .iter()
            .map(|(_, literal)| format!("{:?}", literal))
            .collect();

        output.push_str(&format!("impl {} {{\n", enumeration.ident));
        output.push_str("    /// Wire literals, in declaration order.\n");
        output.push_str(&format!(
            "    pub const LITERALS: &'static [&'static str] = &[{}];\n\n",
            literals.join(", ")
        ));

        output.push_str("    /// Returns the wire literal.\n");
        output.push_str("    #[must_use]\n");
        output.push_str("    pub const fn as_str(&self) -> &'static str {\n");
        output.push_str("        match self {\n");
        for (variant, literal) in &enumeration.variants {
            output.push_str(&format!("            Self::{} => {:?},\n", variant, literal));
        }
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    fn generate_codec(&self, enumeration: &EnumDef) -> String {
        let rt = self.runtime;
        let mut output = String::new();

        output.push_str(&format!("impl {}::JsonCodec for {} {{\n", rt, enumeration.ident));
        output.push_str(&format!("    fn encode(&self) -> {}::Value {{\n", rt));
        output.push_str(&format!(
            "        {}::Value::String(self.as_str().to_string())\n",
            rt
        ));
        output.push_str("    }\n\n");

        output.push_str(&format!(
            "    fn decode(value: &{}::Value) -> {}::Result<Self> {{\n",
            rt, rt
        ));
        output.push_str(&format!(
            "        match <String as {}::JsonCodec>::decode(value)?.as_str() {{\n",
            rt
        ));
        for (variant, literal) in &enumeration.variants {
            output.push_str(&format!(
                "            {:?} => Ok(Self::{}),\n",
                literal, variant
            ));
        }
        output.push_str(&format!(
            "            other => Err({}::DecodeError::unknown_variant(other, Self::LITERALS)),\n",
            rt
        ));
        output.push_str("        }\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }

    fn generate_display(&self, enumeration: &EnumDef) -> String {
        let mut output = String::new();
        output.push_str(&format!(
            "impl ::std::fmt::Display for {} {{\n",
            enumeration.ident
        ));
        output.push_str(
            "    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {\n",
        );
        output.push_str("        f.write_str(self.as_str())\n");
        output.push_str("    }\n");
        output.push_str("}\n\n");
        output
    }
}
