//! Canonical stringification
//!
//! Two shortcuts are the same iff their canonical renderings are identical.
//! Keys are re-escaped against the active syntax, separators collapse to the
//! first configured separator, and combos in a chain are joined by one space.

use super::{Ast, Item, Node, NodeId, Token, TokenId, TokenKind};
use crate::config::Syntax;
use crate::error::TreeError;

/// Remove one level of backslash escaping.
///
/// A trailing lone backslash is kept as is.
pub fn unescape(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(escaped) => result.push(escaped),
                None => result.push('\\'),
            }
        } else {
            result.push(ch);
        }
    }
    result
}

/// Canonical form of a key name: unescaped, then every character that is
/// significant in `syntax` prefixed with a backslash.
pub fn escape_key(value: &str, syntax: &Syntax) -> String {
    let raw = unescape(value);
    let mut result = String::with_capacity(raw.len() + 2);
    for ch in raw.chars() {
        if syntax.is_significant(ch) {
            result.push('\\');
        }
        result.push(ch);
    }
    result
}

impl Ast {
    /// Canonical rendering of one node
    pub fn stringify_node(&self, id: NodeId, syntax: &Syntax) -> Result<String, TreeError> {
        let node = self.node(id);
        if !node.is_valid() {
            return Err(TreeError::invalid_node(node.kind(), node.position()));
        }

        match node {
            Node::Key(key) => key
                .tokens()
                .into_iter()
                .map(|token| self.stringify_token(token, syntax))
                .collect(),
            Node::Combo(combo) => self
                .combo_parts(combo)
                .into_iter()
                .map(|part| match part {
                    Item::Node(key) => self.stringify_node(key, syntax),
                    Item::Token(sep) => self.stringify_token(sep, syntax),
                })
                .collect(),
            Node::Chain(chain) => {
                let combos = chain
                    .combos()
                    .iter()
                    .map(|combo| self.stringify_node(*combo, syntax))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(combos.join(" "))
            }
        }
    }

    /// Canonical rendering of one token
    pub fn stringify_token(&self, id: TokenId, syntax: &Syntax) -> Result<String, TreeError> {
        let token = match self.token(id) {
            Token::Valid(token) => token,
            Token::Error(token) => {
                return Err(TreeError::invalid_token(None, token.position()));
            }
        };

        Ok(match token.kind {
            TokenKind::Key => escape_key(&token.value, syntax),
            TokenKind::Separator => syntax.canonical_separator().to_string(),
            TokenKind::NoteContent => token
                .annotation
                .as_ref()
                .and_then(|annotation| annotation.canonical.clone())
                .unwrap_or_else(|| token.value.clone()),
            TokenKind::NoteDelimLeft | TokenKind::NoteDelimRight => token.value.clone(),
        })
    }
}
