//! Error handling for the shortcut parser.
//!
//! Malformed shortcut text is never reported through these types: the grammar
//! records it in-band as zero-width error tokens inside the tree. The errors in
//! this module cover everything else:
//! - Configuration conflicts detected when a parser is constructed
//! - Internal grammar failures, carrying a diagnostic bundle for bug reports
//! - Contract violations on trees (stringifying invalid nodes, relinking parents)
//! - Cursor offsets outside of the input
//!
//! # Example
//!
//! ```rust
//! use shortcuts_parser::error::{ConfigError, Result, ShortcutError};
//! use shortcuts_parser::{NoteOptions, Parser, ParserOptions};
//!
//! fn build() -> Result<Parser> {
//!     let notes = NoteOptions::new("(", "(");
//!     Parser::new(ParserOptions::default().with_notes(notes))
//! }
//!
//! assert!(matches!(
//!     build(),
//!     Err(ShortcutError::Config(ConfigError::DelimitersEqual(_)))
//! ));
//! ```

pub mod kinds;

// Re-export commonly used types
pub use kinds::{ConfigError, CursorError, InternalError, Result, ShortcutError, TreeError};
