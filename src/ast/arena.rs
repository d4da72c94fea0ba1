//! Arena construction of syntax trees
//!
//! The grammar builds trees bottom-up through [`AstBuilder`]: tokens first,
//! then keys, combos and finally the chain. Each handler derives the node's
//! position and validity from children that already exist, filling any missing
//! note part with an error token. [`AstBuilder::seal`] links parents and hands
//! out the finished [`Ast`].

use tracing::trace;

use super::{
    Ast, ChainNode, ComboNode, ErrorToken, KeyNode, Node, NodeId, NodeKind, Note, ParentTable,
    Position, Root, Token, TokenId, TokenKind, ValidToken,
};
use crate::error::TreeError;

/// Parts of a note as matched by the grammar, any of which may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoteParts {
    pub left: Option<TokenId>,
    pub content: Option<TokenId>,
    pub right: Option<TokenId>,
}

/// Scratch arena used while parsing one input
#[derive(Debug, Default)]
pub struct AstBuilder {
    tokens: Vec<Token>,
    nodes: Vec<Node>,
}

impl AstBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Add a token matched from the input
    pub fn valid(&mut self, token: ValidToken) -> TokenId {
        self.push_token(Token::Valid(token))
    }

    /// Add a zero-width error token at `index`
    pub fn error(&mut self, expected: &[TokenKind], index: usize) -> TokenId {
        trace!(?expected, index, "inserting error token");
        self.push_token(Token::Error(ErrorToken::new(expected.to_vec(), index)))
    }

    /// Build a key node.
    ///
    /// Missing pieces are filled with error tokens: the key name at the
    /// node's start, the left delimiter at the content's start and the right
    /// delimiter at the content's end. A note is only attached when at least
    /// one of its parts was matched.
    ///
    /// # Arguments
    /// * `value` - Matched key name
    /// * `note` - Matched note parts
    ///
    /// # Returns
    /// * `Result<NodeId, TreeError>` - New key, or `MissingPosition` when
    ///   nothing at all was matched
    pub fn key(&mut self, value: Option<TokenId>, note: NoteParts) -> Result<NodeId, TreeError> {
        let has_note = note.left.is_some() || note.content.is_some() || note.right.is_some();
        let start = self
            .start_of(value)
            .or_else(|| self.start_of(note.left))
            .or_else(|| self.start_of(note.right))
            .or_else(|| self.start_of(note.content))
            .ok_or(TreeError::MissingPosition(NodeKind::Key))?;
        let end = if has_note {
            self.end_of(note.right)
                .or_else(|| self.end_of(note.content))
                .or_else(|| self.end_of(note.left))
        } else {
            self.end_of(value)
        }
        .ok_or(TreeError::MissingPosition(NodeKind::Key))?;

        let note = if has_note {
            let content = match note.content {
                Some(content) => content,
                None => {
                    let at = self
                        .end_of(note.left)
                        .or_else(|| self.end_of(value))
                        .or_else(|| self.start_of(note.right))
                        .unwrap_or(start);
                    self.error(&[TokenKind::NoteContent], at)
                }
            };
            let left = match note.left {
                Some(left) => left,
                None => {
                    let at = self.token(content).start();
                    self.error(&[TokenKind::NoteDelimLeft], at)
                }
            };
            let right = match note.right {
                Some(right) => right,
                None => {
                    let at = self.token(content).end();
                    self.error(&[TokenKind::NoteDelimRight], at)
                }
            };
            Some(Note {
                left,
                content,
                right,
            })
        } else {
            None
        };

        let value = match value {
            Some(value) => value,
            None => self.error(&[TokenKind::Key], start),
        };

        let valid = self.token(value).is_valid()
            && note.is_none_or(|note| {
                self.token(note.left).is_valid()
                    && self.token(note.right).is_valid()
                    && self.token(note.content).is_valid()
            });

        Ok(self.push_node(Node::Key(KeyNode {
            value,
            note,
            position: Position::new(start, end),
            valid,
        })))
    }

    /// Build a combo node from its keys and separators
    pub fn combo(&mut self, keys: Vec<NodeId>, seps: Vec<TokenId>) -> Result<NodeId, TreeError> {
        let first_key = keys.first().map(|id| self.node(*id).position());
        let last_key = keys.last().map(|id| self.node(*id).position());
        let first_sep = seps.first().map(|id| self.token(*id).position());
        let last_sep = seps.last().map(|id| self.token(*id).position());

        let start = match (first_key, first_sep) {
            (Some(key), Some(sep)) => key.start.min(sep.start),
            (Some(key), None) => key.start,
            (None, Some(sep)) => sep.start,
            (None, None) => return Err(TreeError::MissingPosition(NodeKind::Combo)),
        };
        let end = match (last_key, last_sep) {
            (Some(key), Some(sep)) => key.end.max(sep.end),
            (Some(key), None) => key.end,
            (None, Some(sep)) => sep.end,
            (None, None) => return Err(TreeError::MissingPosition(NodeKind::Combo)),
        };

        let valid = keys.iter().all(|id| self.node(*id).is_valid())
            && seps.iter().all(|id| self.token(*id).is_valid());

        Ok(self.push_node(Node::Combo(ComboNode {
            keys,
            seps,
            position: Position::new(start, end),
            valid,
        })))
    }

    /// Build the chain node from its combos
    pub fn chain(&mut self, combos: Vec<NodeId>) -> Result<NodeId, TreeError> {
        let (first, last) = match (combos.first(), combos.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(TreeError::MissingPosition(NodeKind::Chain)),
        };
        let position = Position::new(
            self.node(first).position().start,
            self.node(last).position().end,
        );
        let valid = combos.iter().all(|id| self.node(*id).is_valid());

        Ok(self.push_node(Node::Chain(ChainNode {
            combos,
            position,
            valid,
        })))
    }

    /// Link every parent and freeze the tree
    ///
    /// # Arguments
    /// * `root` - Top of the tree
    ///
    /// # Returns
    /// * `Result<Ast, TreeError>` - Sealed tree, or `ReadOnlyParent` if any
    ///   item is reachable twice
    pub fn seal(self, root: Root) -> Result<Ast, TreeError> {
        let parents = ParentTable::link(&self.nodes, self.tokens.len(), root)?;
        Ok(Ast {
            tokens: self.tokens,
            nodes: self.nodes,
            root,
            parents,
        })
    }

    fn start_of(&self, id: Option<TokenId>) -> Option<usize> {
        id.map(|id| self.token(id).start())
    }

    fn end_of(&self, id: Option<TokenId>) -> Option<usize> {
        id.map(|id| self.token(id).end())
    }

    fn push_token(&mut self, token: Token) -> TokenId {
        self.tokens.push(token);
        TokenId((self.tokens.len() - 1) as u32)
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId((self.nodes.len() - 1) as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key_token(builder: &mut AstBuilder, value: &str, start: usize) -> TokenId {
        builder.valid(ValidToken::new(
            TokenKind::Key,
            value,
            Position::new(start, start + value.len()),
        ))
    }

    #[test]
    fn test_key_without_note() {
        let mut builder = AstBuilder::new();
        let value = key_token(&mut builder, "ctrl", 0);
        let key = builder.key(Some(value), NoteParts::default()).unwrap();

        assert!(builder.node(key).is_valid());
        assert_eq!(builder.node(key).position(), Position::new(0, 4));
    }

    #[test]
    fn test_key_with_only_right_delimiter() {
        let mut builder = AstBuilder::new();
        let right = builder.valid(ValidToken::new(
            TokenKind::NoteDelimRight,
            ")",
            Position::new(0, 1),
        ));
        let id = builder
            .key(
                None,
                NoteParts {
                    right: Some(right),
                    ..NoteParts::default()
                },
            )
            .unwrap();

        let Node::Key(key) = builder.node(id).clone() else {
            panic!("expected key node");
        };
        let note = key.note().unwrap();
        assert!(!key.is_valid());
        assert!(builder.token(key.value()).expects(TokenKind::Key));
        assert!(builder.token(note.left).expects(TokenKind::NoteDelimLeft));
        assert!(builder.token(note.content).expects(TokenKind::NoteContent));
        assert_eq!(builder.token(note.left).position(), Position::at(0));
        assert_eq!(key.position(), Position::new(0, 1));
    }

    #[test]
    fn test_empty_nodes_have_no_position() {
        let mut builder = AstBuilder::new();
        assert_eq!(
            builder.key(None, NoteParts::default()),
            Err(TreeError::MissingPosition(NodeKind::Key))
        );
        assert_eq!(
            builder.combo(Vec::new(), Vec::new()),
            Err(TreeError::MissingPosition(NodeKind::Combo))
        );
        assert_eq!(
            builder.chain(Vec::new()),
            Err(TreeError::MissingPosition(NodeKind::Chain))
        );
    }

    #[test]
    fn test_combo_position_spans_leading_separator() {
        let mut builder = AstBuilder::new();
        let sep = builder.valid(ValidToken::new(
            TokenKind::Separator,
            "+",
            Position::new(0, 1),
        ));
        let missing = builder.error(&[TokenKind::Key], 0);
        let missing = builder.key(Some(missing), NoteParts::default()).unwrap();
        let value = key_token(&mut builder, "key", 1);
        let key = builder.key(Some(value), NoteParts::default()).unwrap();
        let combo = builder.combo(vec![missing, key], vec![sep]).unwrap();

        assert_eq!(builder.node(combo).position(), Position::new(0, 4));
        assert!(!builder.node(combo).is_valid());
    }
}
