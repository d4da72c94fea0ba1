//! Keyboard shortcut expression parser
//!
//! This library parses shortcut expressions such as `ctrl+shift+k`,
//! `ctrl+k ctrl+c` or `key(note)` into an arena tree. Parsing never fails on
//! malformed input: missing keys, separators and delimiters are recovered as
//! error tokens, which drive cursor-aware suggestions and completions.
//!
//! # Modules
//!
//! - `ast`: Tree arena, tokens and canonical stringification
//! - `cli`: Command-line interface and argument parsing
//! - `completion`: Cursor info, autosuggest, autocomplete and autoreplace
//! - `config`: Parser options and the `shortcuts` configuration file
//! - `error`: Error types and handling
//! - `formatter`: Output formatting and display
//! - `parser`: Lexer, grammar and the [`Parser`] façade
//! - `validate`: Token validation walk
//!
//! # Example
//!
//! ```
//! use shortcuts_parser::{CandidatePools, Parser, ParserOptions};
//!
//! let parser = Parser::new(ParserOptions::default()).unwrap();
//!
//! let ast = parser.parse("ctrl-shift+k").unwrap();
//! assert_eq!(parser.stringify(&ast).unwrap(), "ctrl+shift+k");
//!
//! let ast = parser.parse("ctrl+").unwrap();
//! assert!(!ast.is_valid());
//! let suggestions = parser.autosuggest("ctrl+", &ast, 5).unwrap();
//! let completions = parser.autocomplete(&suggestions, &CandidatePools::new(["k"], Vec::<String>::new()));
//! let replaced = parser.autoreplace("ctrl+", &completions[0]).unwrap();
//! assert_eq!(replaced.replacement, "ctrl+k");
//! ```

pub mod ast;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod validate;

// Re-export commonly used types
pub use ast::Ast;
pub use completion::{CandidatePools, Completion, Replacement, Suggestion};
pub use config::{Config, NoteOptions, ParserOptions};
pub use error::{Result, ShortcutError};
pub use formatter::Formatter;
pub use parser::Parser;
pub use validate::ValidationEntry;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
///
/// # Returns
/// * `&str` - Version string
pub fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
