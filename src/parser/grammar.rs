//! Error-recovering grammar
//!
//! ```text
//! main  := WHITESPACE? chain WHITESPACE?
//! chain := (combo WHITESPACE?)*
//! combo := (key | SEPARATOR)*
//! key   := KEY LEFT? CONTENT? RIGHT?
//!        | LEFT CONTENT? RIGHT?          (notes enabled)
//!        | RIGHT                         (notes enabled)
//! ```
//!
//! Recovery never consumes or skips input. It only inserts zero-width error
//! tokens where something is missing:
//! - two keys in a row get an error separator at the second key's start
//! - a separator with no key before it gets an error key at its start
//! - a trailing separator gets an error key at its end
//! - missing note parts are filled by [`AstBuilder::key`]

use tracing::trace;

use super::lexer::{LexKind, LexToken};
use crate::ast::{Ast, AstBuilder, NodeId, NoteParts, Position, Root, TokenId, TokenKind, ValidToken};
use crate::config::{ContentTransform, Syntax};
use crate::error::TreeError;

/// What the combo loop consumed last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Last {
    Key,
    Separator,
}

/// Recursive-descent parser over one token stream.
///
/// A grammar is single-use: it owns the scratch arena for one input.
pub struct Grammar<'a> {
    tokens: &'a [LexToken],
    pos: usize,
    syntax: &'a Syntax,
    transform: Option<&'a ContentTransform>,
    builder: AstBuilder,
}

impl<'a> Grammar<'a> {
    pub fn new(
        tokens: &'a [LexToken],
        syntax: &'a Syntax,
        transform: Option<&'a ContentTransform>,
    ) -> Self {
        Self {
            tokens,
            pos: 0,
            syntax,
            transform,
            builder: AstBuilder::new(),
        }
    }

    /// Parse the whole token stream into a sealed tree
    ///
    /// # Returns
    /// * `Result<Ast, TreeError>` - Tree; errors only on internal failures
    pub fn parse(mut self) -> Result<Ast, TreeError> {
        if self.tokens.iter().all(|t| t.kind == LexKind::Whitespace) {
            let error = self.builder.error(&[TokenKind::Key], 0);
            return self.builder.seal(Root::Empty(error));
        }

        self.skip_whitespace();
        let chain = self.chain()?;
        self.skip_whitespace();
        self.builder.seal(Root::Chain(chain))
    }

    fn chain(&mut self) -> Result<NodeId, TreeError> {
        let mut combos = Vec::new();
        while !self.is_at_end() {
            let before = self.pos;
            if let Some(combo) = self.combo()? {
                combos.push(combo);
            }
            self.skip_whitespace();
            if self.pos == before {
                break;
            }
        }
        self.builder.chain(combos)
    }

    fn combo(&mut self) -> Result<Option<NodeId>, TreeError> {
        let mut keys: Vec<NodeId> = Vec::new();
        let mut seps: Vec<TokenId> = Vec::new();
        let mut last: Option<Last> = None;

        loop {
            if self.check(LexKind::Separator) {
                let sep = self.consume(TokenKind::Separator);
                if last != Some(Last::Key) {
                    let start = self.builder.token(sep).start();
                    keys.push(self.missing_key(start)?);
                }
                seps.push(sep);
                last = Some(Last::Separator);
            } else if let Some(key) = self.key()? {
                if last == Some(Last::Key) {
                    let start = self.builder.node(key).position().start;
                    trace!(start, "missing separator between keys");
                    seps.push(self.builder.error(&[TokenKind::Separator], start));
                }
                keys.push(key);
                last = Some(Last::Key);
            } else {
                break;
            }
        }

        if last == Some(Last::Separator)
            && let Some(sep) = seps.last()
        {
            let end = self.builder.token(*sep).end();
            keys.push(self.missing_key(end)?);
        }

        if keys.is_empty() && seps.is_empty() {
            return Ok(None);
        }
        self.builder.combo(keys, seps).map(Some)
    }

    fn key(&mut self) -> Result<Option<NodeId>, TreeError> {
        let value = if self.check(LexKind::Key) {
            Some(self.consume(TokenKind::Key))
        } else {
            None
        };

        if value.is_none() {
            if self.syntax.notes().is_none() {
                return Ok(None);
            }
            if self.check(LexKind::NoteDelimRight) {
                let right = self.consume(TokenKind::NoteDelimRight);
                let note = NoteParts {
                    right: Some(right),
                    ..NoteParts::default()
                };
                return self.builder.key(None, note).map(Some);
            }
            if !self.check(LexKind::NoteDelimLeft) {
                return Ok(None);
            }
        }

        let left = self
            .check(LexKind::NoteDelimLeft)
            .then(|| self.consume(TokenKind::NoteDelimLeft));
        let content = self
            .check(LexKind::NoteContent)
            .then(|| self.consume(TokenKind::NoteContent));
        let right = self
            .check(LexKind::NoteDelimRight)
            .then(|| self.consume(TokenKind::NoteDelimRight));

        self.builder
            .key(value, NoteParts { left, content, right })
            .map(Some)
    }

    /// Error key wrapped in a key node
    fn missing_key(&mut self, index: usize) -> Result<NodeId, TreeError> {
        trace!(index, "missing key");
        let error = self.builder.error(&[TokenKind::Key], index);
        self.builder.key(Some(error), NoteParts::default())
    }

    /// Consume the current lexical token as a valid token of `kind`
    fn consume(&mut self, kind: TokenKind) -> TokenId {
        let lexed = &self.tokens[self.pos];
        self.pos += 1;

        let mut token = ValidToken::new(kind, lexed.text.clone(), Position::from(lexed.span.clone()));
        if kind == TokenKind::NoteContent
            && let Some(transform) = self.transform
        {
            token.annotation = transform(&token);
        }
        self.builder.valid(token)
    }

    fn check(&self, kind: LexKind) -> bool {
        self.tokens.get(self.pos).is_some_and(|t| t.kind == kind)
    }

    fn skip_whitespace(&mut self) {
        while self.check(LexKind::Whitespace) {
            self.pos += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}
