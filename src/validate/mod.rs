//! Token validation
//!
//! Walks a tree in source order and hands every token to a caller callback,
//! together with the node that owns it. The callback decides what is wrong
//! (unknown key names, reserved combinations, ...) and returns entries for it.

use serde::Serialize;

use crate::ast::{Ast, Item, Node, NodeId, Position, Root, Token, TokenId, TokenKind};

/// A token handed to a validator callback
#[derive(Debug, Clone, Copy)]
pub struct TokenRef<'a> {
    pub id: TokenId,
    pub token: &'a Token,
    /// Node owning the token, `None` for the bare error of an empty input
    pub parent: Option<NodeId>,
}

impl TokenRef<'_> {
    pub fn position(&self) -> Position {
        self.token.position()
    }

    pub fn kind(&self) -> Option<TokenKind> {
        self.token.kind()
    }

    pub fn value(&self) -> Option<&str> {
        self.token.value()
    }
}

/// One problem reported by a validator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationEntry {
    pub position: Position,
    pub message: String,
}

impl ValidationEntry {
    pub fn new(position: Position, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Run `callback` over every token of `ast` and concatenate the results.
///
/// Combos are visited left to right with their keys and separators in
/// position order; a key yields its name, then its note's left delimiter,
/// content and right delimiter.
///
/// # Arguments
/// * `ast` - Tree to walk, expected to be valid
/// * `callback` - Called once per token
///
/// # Returns
/// * `Vec<T>` - Callback results in visiting order
pub fn validate<T, F>(ast: &Ast, mut callback: F) -> Vec<T>
where
    F: FnMut(TokenRef<'_>) -> Vec<T>,
{
    let mut entries = Vec::new();
    match ast.root() {
        Root::Empty(id) => entries.extend(visit_token(ast, id, &mut callback)),
        Root::Chain(id) => visit_node(ast, id, &mut callback, &mut entries),
    }
    entries
}

fn visit_node<T, F>(ast: &Ast, id: NodeId, callback: &mut F, entries: &mut Vec<T>)
where
    F: FnMut(TokenRef<'_>) -> Vec<T>,
{
    match ast.node(id) {
        Node::Chain(chain) => {
            for combo in chain.combos() {
                visit_node(ast, *combo, callback, entries);
            }
        }
        Node::Combo(combo) => {
            for part in ast.combo_parts(combo) {
                match part {
                    Item::Node(key) => visit_node(ast, key, callback, entries),
                    Item::Token(sep) => entries.extend(visit_token(ast, sep, callback)),
                }
            }
        }
        Node::Key(key) => {
            for token in key.tokens() {
                entries.extend(visit_token(ast, token, callback));
            }
        }
    }
}

fn visit_token<T, F>(ast: &Ast, id: TokenId, callback: &mut F) -> Vec<T>
where
    F: FnMut(TokenRef<'_>) -> Vec<T>,
{
    callback(TokenRef {
        id,
        token: ast.token(id),
        parent: ast.parent_of_token(id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NoteOptions, ParserOptions};
    use crate::error::ShortcutError;
    use crate::parser::Parser;

    fn notes_parser() -> ParserOptions {
        ParserOptions::default().with_notes(NoteOptions::default())
    }

    #[test]
    fn test_visits_tokens_in_source_order() {
        let parser = Parser::new(notes_parser()).unwrap();
        let ast = parser.parse("ctrl+key(note)").unwrap();

        let spans = validate(&ast, |token| vec![token.position()]);
        assert_eq!(
            spans,
            vec![
                Position::new(0, 4),
                Position::new(4, 5),
                Position::new(5, 8),
                Position::new(8, 9),
                Position::new(9, 13),
                Position::new(13, 14),
            ]
        );
    }

    #[test]
    fn test_tokens_carry_parents() {
        let parser = Parser::new(notes_parser()).unwrap();
        let ast = parser.parse("ctrl+key(note)").unwrap();

        let parents = validate(&ast, |token| {
            vec![(token.kind(), token.parent.map(|id| ast.node(id).kind()))]
        });
        assert_eq!(
            parents[1],
            (Some(TokenKind::Separator), Some(crate::ast::NodeKind::Combo))
        );
        assert_eq!(
            parents[3],
            (Some(TokenKind::NoteContent), Some(crate::ast::NodeKind::Key))
        );
    }

    #[test]
    fn test_parser_validator() {
        let options = ParserOptions::default().with_token_validator(|token| {
            match (token.kind(), token.value()) {
                (Some(TokenKind::Key), Some(value)) if value != "ctrl" && value != "k" => {
                    vec![ValidationEntry::new(
                        token.position(),
                        format!("Unknown key: {value}"),
                    )]
                }
                _ => Vec::new(),
            }
        });
        let parser = Parser::new(options).unwrap();
        let ast = parser.parse("ctrl+k ctrl+foo").unwrap();

        let entries = parser.validate(&ast).unwrap();
        assert_eq!(
            entries,
            vec![ValidationEntry::new(Position::new(12, 15), "Unknown key: foo")]
        );
    }

    #[test]
    fn test_missing_validator() {
        let parser = Parser::new(ParserOptions::default()).unwrap();
        let ast = parser.parse("ctrl+k").unwrap();
        assert!(matches!(
            parser.validate(&ast),
            Err(ShortcutError::MissingValidator)
        ));
    }

    #[test]
    fn test_empty_root_goes_to_callback() {
        let parser = Parser::new(ParserOptions::default()).unwrap();
        let ast = parser.parse("  ").unwrap();
        let visited = validate(&ast, |token| vec![(token.token.is_error(), token.parent)]);
        assert_eq!(visited, vec![(true, None)]);
    }
}
