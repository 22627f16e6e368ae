//! Rust code generation modules.

pub mod dispatch;
pub mod enums;
pub mod naming;
pub mod records;
pub mod types;

pub use dispatch::{DispatchGenerator, DispatchTable};
pub use enums::EnumGenerator;
pub use records::RecordGenerator;
pub use types::{AliasGenerator, Definition, Presence, TypePlan, TypePlanner};

/// Renders `text` as `///` lines, or `fallback` when there is no text.
pub(crate) fn doc_comment(text: Option<&str>, fallback: &str, indent: &str) -> String {
    let text = text.map(str::trim).filter(|t| !t.is_empty()).unwrap_or(fallback);
    let mut output = String::new();
    for line in text.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            output.push_str(&format!("{}///\n", indent));
        } else {
            output.push_str(&format!("{}/// {}\n", indent, line));
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doc_comment() {
        assert_eq!(doc_comment(None, "Source record.", ""), "/// Source record.\n");
        assert_eq!(
            doc_comment(Some("First.\n\nSecond.  "), "unused", "    "),
            "    /// First.\n    ///\n    /// Second.\n"
        );
        assert_eq!(doc_comment(Some("   "), "Fallback.", ""), "/// Fallback.\n");
    }
}
