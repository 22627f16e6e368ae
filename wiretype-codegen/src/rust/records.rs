//! Record struct and codec generation.

use crate::rust::doc_comment;
use crate::rust::types::{Presence, RecordDef};

/// Generator for record structs and their `JsonCodec` implementations.
pub struct RecordGenerator<'a> {
    runtime: &'a str,
}

impl<'a> RecordGenerator<'a> {
    /// Creates a new record generator for the given runtime path.
    #[must_use]
    pub fn new(runtime: &'a str) -> Self {
        Self { runtime }
    }

    /// Generates the struct and its codec.
    #[must_use]
    pub fn generate(&self, record: &RecordDef) -> String {
        let mut output = String::new();
        output.push_str(&self.generate_struct(record));
        output.push_str(&self.generate_codec(record));
        output
    }

    fn generate_struct(&self, record: &RecordDef) -> String {
        let mut output = String::new();
        let fallback = format!("{} record.", record.ident);

        output.push_str(&doc_comment(record.description.as_deref(), &fallback, ""));
        output.push_str("#[derive(Debug, Clone, PartialEq)]\n");

        if record.fields.is_empty() {
            output.push_str(&format!("pub struct {} {{}}\n\n", record.ident));
            return output;
        }

        output.push_str(&format!("pub struct {} {{\n", record.ident));
        for field in &record.fields {
            let fallback = format!("`{}` field.", field.wire);
            output.push_str(&doc_comment(field.description.as_deref(), &fallback, "    "));
            output.push_str(&format!("    pub {}: {},\n", field.ident, field.ty));
        }
        output.push_str("}\n\n");
        output
    }

    fn generate_codec(&self, record: &RecordDef) -> String {
        let rt = self.runtime;
        let mut output = String::new();

        output.push_str(&format!("impl {}::JsonCodec for {} {{\n", rt, record.ident));

        // Encoder
        output.push_str(&format!("    fn encode(&self) -> {}::Value {{\n", rt));
        output.push_str(&format!(
            "        {}::ObjectEncoder::with_capacity({})\n",
            rt,
            record.fields.len()
        ));
        for field in &record.fields {
            output.push_str(&format!(
                "            .field({:?}, &self.{})\n",
                field.wire, field.ident
            ));
        }
        output.push_str("            .finish()\n");
        output.push_str("    }\n\n");

        // Decoder
        output.push_str(&format!(
            "    fn decode(value: &{}::Value) -> {}::Result<Self> {{\n",
            rt, rt
        ));
        if record.fields.is_empty() {
            output.push_str(&format!("        {}::expect_object(value)?;\n", rt));
            output.push_str("        Ok(Self {})\n");
        } else {
            output.push_str(&format!(
                "        let object = {}::expect_object(value)?;\n",
                rt
            ));
            output.push_str("        Ok(Self {\n");
            for field in &record.fields {
                let helper = match field.presence {
                    Presence::Required => "decode_field",
                    Presence::Optional => "decode_optional_field",
                    Presence::Nullable => "decode_nullable_field",
                };
                output.push_str(&format!(
                    "            {}: {}::{}(object, {:?})?,\n",
                    field.ident, rt, helper, field.wire
                ));
            }
            output.push_str("        })\n");
        }
        output.push_str("    }\n");
        output.push_str("}\n\n");

        output
    }
}
