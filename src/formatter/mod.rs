//! Output formatting for the `shortcuts` command line
//!
//! This module renders parse results, completions and validation entries:
//! - Text: highlighted input with error markers and a short summary
//! - JSON formatting (compact and pretty-printed)
//! - Table formatting for token and completion listings
//! - Color highlighting for improved readability

pub mod highlight;
pub mod json;
pub mod table;

use nu_ansi_term::Color;

use crate::ast::Ast;
use crate::completion::{Completion, Replacement};
use crate::config::{DisplayConfig, OutputFormat, TableStyleConfig};
use crate::error::Result;
use crate::validate::ValidationEntry;

pub use highlight::Highlighter;
pub use json::JsonFormatter;
pub use table::TableFormatter;

/// Main formatter for command output
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,

    /// Enable colored output
    use_colors: bool,

    /// Border style for table output
    table_style: TableStyleConfig,
}

impl Formatter {
    /// Create a new formatter
    ///
    /// # Arguments
    /// * `format_type` - Output format type
    /// * `use_colors` - Enable colored output
    ///
    /// # Returns
    /// * `Self` - New formatter instance
    pub fn new(format_type: OutputFormat, use_colors: bool) -> Self {
        Self {
            format_type,
            use_colors,
            table_style: TableStyleConfig::Modern,
        }
    }

    /// Create a formatter from display configuration
    pub fn from_config(display: &DisplayConfig) -> Self {
        Self {
            format_type: display.format,
            use_colors: display.color_output,
            table_style: display.table_style,
        }
    }

    /// Format a parse result
    ///
    /// # Arguments
    /// * `input` - Parsed text
    /// * `ast` - Parsed tree
    /// * `canonical` - Canonical form, present only for valid trees
    ///
    /// # Returns
    /// * `Result<String>` - Formatted output or error
    pub fn format_parse(&self, input: &str, ast: &Ast, canonical: Option<&str>) -> Result<String> {
        match self.format_type {
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.json().format_tree(ast, canonical)
            }
            OutputFormat::Table => Ok(self.table().format_tokens(ast)),
            OutputFormat::Text => {
                let highlighter = Highlighter::new(self.use_colors);
                let mut lines = vec![highlighter.highlight(input, ast)];
                if let Some(markers) = highlighter.error_markers(input, ast) {
                    lines.push(markers);
                }
                lines.push(match canonical {
                    Some(canonical) => self.success(&format!("valid: {canonical}")),
                    None => {
                        let count = ast
                            .extract_tokens()
                            .into_iter()
                            .filter(|id| ast.token(*id).is_error())
                            .count();
                        self.error(&format!("invalid: {count} missing token(s)"))
                    }
                });
                Ok(lines.join("\n"))
            }
        }
    }

    /// Format completions for a cursor position
    pub fn format_completions(&self, completions: &[Completion]) -> Result<String> {
        match self.format_type {
            OutputFormat::Json | OutputFormat::JsonPretty => {
                self.json().format_completions(completions)
            }
            OutputFormat::Table => Ok(self.table().format_completions(completions)),
            OutputFormat::Text => {
                if completions.is_empty() {
                    return Ok("(no completions)".to_string());
                }
                Ok(completions
                    .iter()
                    .map(|completion| {
                        let suggestion = &completion.suggestion;
                        let marker = if suggestion.is_error_fix { " (fix)" } else { "" };
                        format!(
                            "{:<14} {:<8} {}{}",
                            format!("{:?}", suggestion.kind),
                            suggestion.range.to_string(),
                            completion.value,
                            marker
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }

    /// Format validation entries
    pub fn format_entries(&self, entries: &[ValidationEntry]) -> Result<String> {
        match self.format_type {
            OutputFormat::Json | OutputFormat::JsonPretty => self.json().format_entries(entries),
            OutputFormat::Table => Ok(self.table().format_entries(entries)),
            OutputFormat::Text => {
                if entries.is_empty() {
                    return Ok(self.success("no problems found"));
                }
                Ok(entries
                    .iter()
                    .map(|entry| self.warning(&format!("{}: {}", entry.position, entry.message)))
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
        }
    }

    /// Format the input after applying a completion
    pub fn format_replacement(&self, replacement: &Replacement) -> Result<String> {
        if self.format_type.is_json() {
            return self.json().format_value(&serde_json::to_value(replacement)?);
        }
        Ok(format!(
            "{}\n{}",
            replacement.replacement,
            self.success(&format!("cursor: {}", replacement.cursor))
        ))
    }

    /// Format the result of an equivalence check
    pub fn format_equal(&self, equal: bool) -> Result<String> {
        if self.format_type.is_json() {
            return self.json().format_value(&serde_json::json!({ "equivalent": equal }));
        }
        Ok(if equal {
            self.success("equivalent")
        } else {
            self.error("not equivalent")
        })
    }

    /// Colorize text as error (red)
    pub fn error(&self, text: &str) -> String {
        self.paint(Color::Red, text)
    }

    /// Colorize text as success (green)
    pub fn success(&self, text: &str) -> String {
        self.paint(Color::Green, text)
    }

    /// Colorize text as warning (yellow)
    pub fn warning(&self, text: &str) -> String {
        self.paint(Color::Yellow, text)
    }

    fn paint(&self, color: Color, text: &str) -> String {
        if self.use_colors {
            color.paint(text).to_string()
        } else {
            text.to_string()
        }
    }

    fn json(&self) -> JsonFormatter {
        JsonFormatter::new(
            self.format_type == OutputFormat::JsonPretty,
            self.use_colors,
            2,
        )
    }

    fn table(&self) -> TableFormatter {
        TableFormatter::new(self.table_style, self.use_colors)
    }

    /// Set output format
    pub fn set_format(&mut self, format_type: OutputFormat) {
        self.format_type = format_type;
    }

    /// Enable or disable colors
    pub fn set_colors(&mut self, enabled: bool) {
        self.use_colors = enabled;
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputFormat::Text, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserOptions;
    use crate::parser::Parser;

    fn parser() -> Parser {
        Parser::new(ParserOptions::default()).unwrap()
    }

    #[test]
    fn test_text_parse_output() {
        let parser = parser();
        let formatter = Formatter::new(OutputFormat::Text, false);

        let ast = parser.parse("ctrl-k").unwrap();
        let canonical = parser.stringify(&ast).unwrap();
        let output = formatter.format_parse("ctrl-k", &ast, Some(&canonical)).unwrap();
        assert_eq!(output, "ctrl-k\nvalid: ctrl+k");

        let ast = parser.parse("ctrl+").unwrap();
        let output = formatter.format_parse("ctrl+", &ast, None).unwrap();
        assert_eq!(output, "ctrl+\n     ^\ninvalid: 1 missing token(s)");
    }

    #[test]
    fn test_json_parse_output() {
        let parser = parser();
        let formatter = Formatter::new(OutputFormat::Json, false);
        let ast = parser.parse("a").unwrap();
        let output = formatter.format_parse("a", &ast, Some("a")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["valid"], true);
        assert_eq!(value["canonical"], "a");
    }

    #[test]
    fn test_format_equal() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        assert_eq!(formatter.format_equal(true).unwrap(), "equivalent");
        assert_eq!(formatter.format_equal(false).unwrap(), "not equivalent");

        let formatter = Formatter::new(OutputFormat::Json, false);
        assert_eq!(formatter.format_equal(true).unwrap(), r#"{"equivalent":true}"#);
    }

    #[test]
    fn test_format_entries_text() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        let entries = vec![ValidationEntry::new(
            crate::ast::Position::new(5, 8),
            "Unknown key: foo",
        )];
        assert_eq!(
            formatter.format_entries(&entries).unwrap(),
            "5..8: Unknown key: foo"
        );
        assert_eq!(formatter.format_entries(&[]).unwrap(), "no problems found");
    }

    #[test]
    fn test_colors_disabled() {
        let formatter = Formatter::new(OutputFormat::Text, false);
        assert_eq!(formatter.error("boom"), "boom");
        let formatter = Formatter::new(OutputFormat::Text, true);
        assert!(formatter.error("boom").contains("\x1b["));
    }
}
