//! Table formatting using tabled
//!
//! Renders token listings, completions and validation entries as tables with
//! a configurable border style.

use tabled::{
    Table,
    builder::Builder,
    settings::{Alignment, Color, Modify, Style, object::Columns, object::Rows, width::Width},
};

use crate::ast::{Ast, Token};
use crate::completion::Completion;
use crate::config::TableStyleConfig;
use crate::validate::ValidationEntry;

/// Maximum width for a single column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 40;

/// Table formatter
pub struct TableFormatter {
    /// Maximum column width
    max_column_width: usize,

    /// Table style
    style: TableStyleConfig,

    /// Enable colored output
    use_colors: bool,
}

impl TableFormatter {
    /// Create a new table formatter
    ///
    /// # Arguments
    /// * `style` - Border style
    /// * `use_colors` - Enable colored headers
    ///
    /// # Returns
    /// * `Self` - New table formatter
    pub fn new(style: TableStyleConfig, use_colors: bool) -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            style,
            use_colors,
        }
    }

    /// Set maximum column width
    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    /// One row per token in cursor order
    pub fn format_tokens(&self, ast: &Ast) -> String {
        let mut builder = Builder::default();
        builder.push_record(["#", "Kind", "Value", "Span", "Parent"]);

        for id in ast.extract_tokens() {
            let token = ast.token(id);
            let (kind, value) = match token {
                Token::Valid(token) => (token.kind.to_string(), token.value.clone()),
                Token::Error(error) => {
                    let expected: Vec<&str> = error.expected().iter().map(|k| k.as_str()).collect();
                    ("ERROR".to_string(), format!("expected {}", expected.join(" | ")))
                }
            };
            let parent = ast
                .parent_of_token(id)
                .map(|parent| ast.node(parent).kind().to_string())
                .unwrap_or_default();
            builder.push_record([
                id.index().to_string(),
                kind,
                value,
                token.position().to_string(),
                parent,
            ]);
        }

        self.finish(builder, 5)
    }

    pub fn format_completions(&self, completions: &[Completion]) -> String {
        if completions.is_empty() {
            return "(no completions)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(["Kind", "Range", "Value", "Candidate", "Fix"]);
        for completion in completions {
            let suggestion = &completion.suggestion;
            builder.push_record([
                format!("{:?}", suggestion.kind),
                suggestion.range.to_string(),
                completion.value.clone(),
                completion.raw_value.clone(),
                if suggestion.is_error_fix { "yes" } else { "" }.to_string(),
            ]);
        }

        self.finish(builder, 5)
    }

    pub fn format_entries(&self, entries: &[ValidationEntry]) -> String {
        if entries.is_empty() {
            return "(no problems)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(["Span", "Message"]);
        for entry in entries {
            builder.push_record([entry.position.to_string(), entry.message.clone()]);
        }

        self.finish(builder, 2)
    }

    /// Build, style and render a table
    fn finish(&self, builder: Builder, columns: usize) -> String {
        let mut table = builder.build();
        self.apply_style(&mut table);

        for i in 0..columns {
            table.with(Modify::new(Columns::new(i..=i)).with(Width::wrap(self.max_column_width)));
        }
        table.with(Modify::new(Rows::first()).with(Alignment::center()));

        if self.use_colors {
            table.modify(Rows::first(), Color::FG_CYAN | Color::BOLD);
        }

        table.to_string()
    }

    fn apply_style(&self, table: &mut Table) {
        match self.style {
            TableStyleConfig::Modern => table.with(Style::modern()),
            TableStyleConfig::Ascii => table.with(Style::ascii()),
            TableStyleConfig::Rounded => table.with(Style::rounded()),
            TableStyleConfig::Markdown => table.with(Style::markdown()),
            TableStyleConfig::Psql => table.with(Style::psql()),
        };
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new(TableStyleConfig::Modern, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CandidatePools;
    use crate::config::ParserOptions;
    use crate::parser::Parser;

    #[test]
    fn test_format_tokens() {
        let parser = Parser::new(ParserOptions::default()).unwrap();
        let ast = parser.parse("ctrl+").unwrap();
        let output = TableFormatter::new(TableStyleConfig::Ascii, false).format_tokens(&ast);

        assert!(output.contains("ctrl"));
        assert!(output.contains("SEPARATOR"));
        assert!(output.contains("expected KEY"));
        assert!(output.contains("COMBO"));
    }

    #[test]
    fn test_format_completions() {
        let parser = Parser::new(ParserOptions::default()).unwrap();
        let ast = parser.parse("ctrl").unwrap();
        let suggestions = parser.autosuggest("ctrl", &ast, 4).unwrap();
        let completions = parser.autocomplete(&suggestions, &CandidatePools::new(["alt"], Vec::<String>::new()));

        let output = TableFormatter::new(TableStyleConfig::Markdown, false).format_completions(&completions);
        assert!(output.contains("alt"));
        assert!(output.contains("0..4"));
        assert!(output.contains('|'));
    }

    #[test]
    fn test_empty_listings() {
        let formatter = TableFormatter::default();
        assert_eq!(formatter.format_completions(&[]), "(no completions)");
        assert_eq!(formatter.format_entries(&[]), "(no problems)");
    }
}
