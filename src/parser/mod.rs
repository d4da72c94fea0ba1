//! Shortcut parser
//!
//! This module ties the lexer, the error-recovering grammar and the tree
//! operations together behind [`Parser`].
//!
//! # Architecture
//!
//! The parser is split into focused modules:
//! - `lexer`: Splits text into keys, separators, whitespace and note parts
//! - `grammar`: Recursive descent with in-band recovery, builds the [`Ast`]
//!
//! Suggestions, completions and validation live in their own modules and are
//! plain functions over an [`Ast`]; the methods here only supply the parser's
//! resolved [`Syntax`] and options.
//!
//! # Examples
//!
//! ```
//! use shortcuts_parser::{Parser, ParserOptions};
//!
//! let parser = Parser::new(ParserOptions::default()).unwrap();
//!
//! let ast = parser.parse("ctrl+shift+k").unwrap();
//! assert!(ast.is_valid());
//!
//! // Malformed input still produces a complete tree
//! let ast = parser.parse("ctrl+").unwrap();
//! assert!(!ast.is_valid());
//!
//! // Formatting differences disappear in the canonical form
//! assert!(parser.equivalent("ctrl-k  a", "ctrl+k a").unwrap());
//! ```

pub mod grammar;
pub mod lexer;


use tracing::debug;

use crate::ast::Ast;
use crate::completion::{
    self, CandidatePools, Completion, CursorInfo, Replacement, Suggestion,
};
use crate::config::{ParserOptions, Syntax};
use crate::error::{InternalError, Result, ShortcutError};
use crate::validate::{self, ValidationEntry};

use grammar::Grammar;
use lexer::ShortcutLexer;

/// Configured shortcut parser
///
/// A parser is immutable once built. Every call to [`Parser::parse`] uses its
/// own lexer and arena, so one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct Parser {
    options: ParserOptions,
    syntax: Syntax,
}

impl Parser {
    /// Create a new parser
    ///
    /// # Arguments
    /// * `options` - Separators, note support and callbacks
    ///
    /// # Returns
    /// * `Result<Self>` - New parser, or a configuration error if the
    ///   delimiters and separators conflict
    pub fn new(options: ParserOptions) -> Result<Self> {
        let syntax = Syntax::resolve(&options)?;
        debug!(?options, "created shortcut parser");
        Ok(Self { options, syntax })
    }

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn syntax(&self) -> &Syntax {
        &self.syntax
    }

    /// Parse shortcut text into a tree
    ///
    /// Malformed input is not an error: it yields a tree containing error
    /// tokens. Whitespace-only input yields a bare error token root.
    ///
    /// # Arguments
    /// * `input` - Shortcut text
    ///
    /// # Returns
    /// * `Result<Ast>` - Parsed tree, or `Internal` with a diagnostic bundle if
    ///   the grammar itself failed
    pub fn parse(&self, input: &str) -> Result<Ast> {
        let tokens = ShortcutLexer::tokenize(input, &self.syntax);
        debug!(input, tokens = tokens.len(), "lexed shortcut");

        let transform = self
            .options
            .notes
            .as_ref()
            .and_then(|notes| notes.transform.as_ref());

        match Grammar::new(&tokens, &self.syntax, transform).parse() {
            Ok(ast) => {
                debug!(valid = ast.is_valid(), "parsed shortcut");
                Ok(ast)
            }
            Err(cause) => Err(InternalError {
                input: input.to_string(),
                syntax: self.syntax.clone(),
                tokens,
                cause,
            }
            .into()),
        }
    }

    /// Canonical rendering of a valid tree
    pub fn stringify(&self, ast: &Ast) -> Result<String> {
        Ok(ast.stringify(&self.syntax)?)
    }

    /// Whether two inputs denote the same shortcut.
    ///
    /// Inputs that do not parse to valid trees are never equivalent.
    pub fn equivalent(&self, a: &str, b: &str) -> Result<bool> {
        let (a, b) = (self.parse(a)?, self.parse(b)?);
        if !a.is_valid() || !b.is_valid() {
            return Ok(false);
        }
        Ok(self.stringify(&a)? == self.stringify(&b)?)
    }

    /// Tokens around a cursor index, see [`completion::cursor_info`]
    pub fn cursor_info(&self, input: &str, ast: &Ast, index: usize) -> Result<CursorInfo> {
        Ok(completion::cursor_info(input, ast, index)?)
    }

    /// Suggestions for a cursor index, see [`completion::autosuggest`]
    pub fn autosuggest(&self, input: &str, ast: &Ast, index: usize) -> Result<Vec<Suggestion>> {
        let suggestions = completion::autosuggest(input, ast, index, &self.syntax)?;
        debug!(index, count = suggestions.len(), "computed suggestions");
        Ok(suggestions)
    }

    /// Concrete completions for suggestions, see [`completion::autocomplete`]
    pub fn autocomplete(&self, suggestions: &[Suggestion], pools: &CandidatePools) -> Vec<Completion> {
        completion::autocomplete(suggestions, pools, &self.syntax)
    }

    /// Apply a completion, see [`completion::autoreplace`]
    pub fn autoreplace(&self, input: &str, completion: &Completion) -> Result<Replacement> {
        Ok(completion::autoreplace(input, completion)?)
    }

    /// Run the configured token validator over every token of a valid tree
    ///
    /// # Arguments
    /// * `ast` - Tree to validate; expected to be valid
    ///
    /// # Returns
    /// * `Result<Vec<ValidationEntry>>` - Concatenated validator output, or
    ///   `MissingValidator` when the parser has no validator
    pub fn validate(&self, ast: &Ast) -> Result<Vec<ValidationEntry>> {
        let validator = self
            .options
            .token_validator
            .as_ref()
            .ok_or(ShortcutError::MissingValidator)?;
        Ok(validate::validate(ast, |token| validator(token)))
    }
}
