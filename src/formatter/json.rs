//! JSON formatting for trees, suggestions and validation results
//!
//! Compact output stays plain for piping; pretty output is colorized when
//! colors are enabled.

use colored_json::prelude::*;
use serde::Serialize;
use serde_json::{Value, json};

use crate::ast::Ast;
use crate::completion::Completion;
use crate::error::Result;
use crate::validate::ValidationEntry;

/// JSON formatter with pretty printing support
pub struct JsonFormatter {
    /// Enable pretty printing
    pretty: bool,

    /// Indentation width
    indent: usize,

    /// Enable colored output
    use_colors: bool,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    ///
    /// # Arguments
    /// * `pretty` - Enable pretty printing
    /// * `use_colors` - Enable colored output
    /// * `indent` - Indentation width for pretty output
    ///
    /// # Returns
    /// * `Self` - New formatter
    pub fn new(pretty: bool, use_colors: bool, indent: usize) -> Self {
        Self {
            pretty,
            indent,
            use_colors,
        }
    }

    /// Tree plus its canonical form when valid
    pub fn format_tree(&self, ast: &Ast, canonical: Option<&str>) -> Result<String> {
        let value = json!({
            "valid": ast.is_valid(),
            "canonical": canonical,
            "tree": ast.to_json(),
        });
        self.format_value(&value)
    }

    pub fn format_completions(&self, completions: &[Completion]) -> Result<String> {
        self.format_value(&serde_json::to_value(completions)?)
    }

    pub fn format_entries(&self, entries: &[ValidationEntry]) -> Result<String> {
        self.format_value(&serde_json::to_value(entries)?)
    }

    /// Serialize any value with this formatter's settings
    pub fn format_value(&self, value: &Value) -> Result<String> {
        let json_str = if self.pretty {
            self.to_pretty_string(value)?
        } else {
            serde_json::to_string(value)?
        };

        if self.use_colors && self.pretty {
            Ok(json_str.to_colored_json_auto().unwrap_or(json_str))
        } else {
            Ok(json_str)
        }
    }

    /// Convert a value to pretty-printed JSON with custom indentation
    ///
    /// # Arguments
    /// * `value` - The value to serialize
    ///
    /// # Returns
    /// * `Result<String>` - Pretty JSON string with custom indent
    fn to_pretty_string<T: Serialize>(&self, value: &T) -> Result<String> {
        let mut buf = Vec::new();
        let indent = " ".repeat(self.indent);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(true, false, 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserOptions;
    use crate::parser::Parser;

    #[test]
    fn test_format_tree_compact() {
        let parser = Parser::new(ParserOptions::default()).unwrap();
        let ast = parser.parse("ctrl+k").unwrap();
        let formatter = JsonFormatter::new(false, false, 2);

        let result = formatter.format_tree(&ast, Some("ctrl+k")).unwrap();
        assert!(!result.contains('\n'));
        assert!(result.contains("\"canonical\":\"ctrl+k\""));
        assert!(result.contains("\"type\":\"CHAIN\""));
    }

    #[test]
    fn test_compact_vs_pretty() {
        let parser = Parser::new(ParserOptions::default()).unwrap();
        let ast = parser.parse("a+").unwrap();

        let compact = JsonFormatter::new(false, false, 2)
            .format_tree(&ast, None)
            .unwrap();
        let pretty = JsonFormatter::new(true, false, 4)
            .format_tree(&ast, None)
            .unwrap();

        assert!(compact.len() < pretty.len());
        assert!(pretty.contains("\n    \""));
        assert!(compact.contains("\"canonical\":null"));
    }

    #[test]
    fn test_format_entries() {
        let entries = vec![ValidationEntry::new(
            crate::ast::Position::new(0, 3),
            "Unknown key: foo",
        )];
        let result = JsonFormatter::new(false, false, 2)
            .format_entries(&entries)
            .unwrap();
        assert_eq!(
            result,
            r#"[{"position":{"start":0,"end":3},"message":"Unknown key: foo"}]"#
        );
    }
}
