//! Syntax tree for shortcut expressions
//!
//! A parsed shortcut is a [`ChainNode`] of [`ComboNode`]s, each holding
//! [`KeyNode`]s joined by separator tokens. Malformed input never produces a
//! partial tree: missing pieces are filled with zero-width [`ErrorToken`]s
//! recording which token kinds would have fixed that spot.
//!
//! All tokens and nodes of one tree live in the arena owned by [`Ast`] and are
//! addressed with [`TokenId`] / [`NodeId`]. An `Ast` only exists once every
//! parent link has been assigned, so parents can be queried freely.

pub mod arena;
pub mod seal;
pub mod stringify;

use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use std::ops::Range;

use crate::config::Syntax;
use crate::error::TreeError;

pub use arena::{AstBuilder, NoteParts};
pub use seal::ParentTable;
pub use stringify::unescape;

/// Half-open byte range into the parsed input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub start: usize,
    pub end: usize,
}

impl Position {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width position at `index`
    pub fn at(index: usize) -> Self {
        Self {
            start: index,
            end: index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<Range<usize>> for Position {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Token kinds produced by the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    Key,
    Separator,
    NoteDelimLeft,
    NoteDelimRight,
    NoteContent,
}

impl TokenKind {
    /// Look up the kind of a literal operator symbol.
    ///
    /// Only the default separators and delimiters are recognized; every other
    /// string names a key.
    ///
    /// # Arguments
    /// * `symbol` - Literal symbol such as `"+"` or `"("`
    ///
    /// # Returns
    /// * `TokenKind` - Kind of token the symbol denotes
    pub fn from_symbol(symbol: &str) -> TokenKind {
        const SYMBOLS: [(&str, TokenKind); 4] = [
            ("+", TokenKind::Separator),
            ("-", TokenKind::Separator),
            ("(", TokenKind::NoteDelimLeft),
            (")", TokenKind::NoteDelimRight),
        ];

        SYMBOLS
            .iter()
            .find(|(sym, _)| *sym == symbol)
            .map(|(_, kind)| *kind)
            .unwrap_or(TokenKind::Key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Key => "KEY",
            TokenKind::Separator => "SEPARATOR",
            TokenKind::NoteDelimLeft => "NOTE_DELIM_LEFT",
            TokenKind::NoteDelimRight => "NOTE_DELIM_RIGHT",
            TokenKind::NoteContent => "NOTE_CONTENT",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node kinds of the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Chain,
    Combo,
    Key,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Chain => f.write_str("CHAIN"),
            NodeKind::Combo => f.write_str("COMBO"),
            NodeKind::Key => f.write_str("KEY"),
        }
    }
}

/// Domain data attached to a note's content by a content transform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteAnnotation {
    /// Free-form data produced by the transform
    pub data: Value,

    /// Replaces the raw content when stringifying
    pub canonical: Option<String>,
}

impl NoteAnnotation {
    pub fn new(data: Value) -> Self {
        Self {
            data,
            canonical: None,
        }
    }

    pub fn with_canonical(mut self, canonical: impl Into<String>) -> Self {
        self.canonical = Some(canonical.into());
        self
    }
}

/// Token matched from the input
#[derive(Debug, Clone, PartialEq)]
pub struct ValidToken {
    pub kind: TokenKind,
    pub value: String,
    pub position: Position,
    pub annotation: Option<NoteAnnotation>,
}

impl ValidToken {
    pub fn new(kind: TokenKind, value: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
            annotation: None,
        }
    }
}

/// Zero-width marker for a missing token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorToken {
    expected: Vec<TokenKind>,
    position: Position,
}

impl ErrorToken {
    pub fn new(expected: Vec<TokenKind>, index: usize) -> Self {
        Self {
            expected,
            position: Position::at(index),
        }
    }

    pub fn expected(&self) -> &[TokenKind] {
        &self.expected
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Valid(ValidToken),
    Error(ErrorToken),
}

impl Token {
    pub fn position(&self) -> Position {
        match self {
            Token::Valid(token) => token.position,
            Token::Error(token) => token.position,
        }
    }

    pub fn start(&self) -> usize {
        self.position().start
    }

    pub fn end(&self) -> usize {
        self.position().end
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Token::Valid(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Token::Error(_))
    }

    /// Kind of a valid token, `None` for error tokens
    pub fn kind(&self) -> Option<TokenKind> {
        match self {
            Token::Valid(token) => Some(token.kind),
            Token::Error(_) => None,
        }
    }

    pub fn value(&self) -> Option<&str> {
        match self {
            Token::Valid(token) => Some(&token.value),
            Token::Error(_) => None,
        }
    }

    pub fn as_valid(&self) -> Option<&ValidToken> {
        match self {
            Token::Valid(token) => Some(token),
            Token::Error(_) => None,
        }
    }

    /// Whether this is an error token expecting `kind`
    pub fn expects(&self, kind: TokenKind) -> bool {
        match self {
            Token::Valid(_) => false,
            Token::Error(token) => token.expected.contains(&kind),
        }
    }
}

/// Index of a token in an [`Ast`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TokenId(pub(crate) u32);

/// Index of a node in an [`Ast`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) u32);

impl TokenId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token #{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node #{}", self.0)
    }
}

/// Note attached to a key. All three parts are always present, missing ones
/// are error tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub left: TokenId,
    pub content: TokenId,
    pub right: TokenId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyNode {
    value: TokenId,
    note: Option<Note>,
    position: Position,
    valid: bool,
}

impl KeyNode {
    pub fn value(&self) -> TokenId {
        self.value
    }

    pub fn note(&self) -> Option<Note> {
        self.note
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Tokens of the key in source order: value, then the note parts
    pub fn tokens(&self) -> Vec<TokenId> {
        let mut tokens = vec![self.value];
        if let Some(note) = self.note {
            tokens.extend([note.left, note.content, note.right]);
        }
        tokens
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComboNode {
    keys: Vec<NodeId>,
    seps: Vec<TokenId>,
    position: Position,
    valid: bool,
}

impl ComboNode {
    pub fn keys(&self) -> &[NodeId] {
        &self.keys
    }

    pub fn seps(&self) -> &[TokenId] {
        &self.seps
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn first_key(&self) -> Option<NodeId> {
        self.keys.first().copied()
    }

    pub fn last_key(&self) -> Option<NodeId> {
        self.keys.last().copied()
    }

    pub fn first_valid_key(&self, ast: &Ast) -> Option<NodeId> {
        self.keys
            .iter()
            .copied()
            .find(|id| ast.key(*id).is_some_and(KeyNode::is_valid))
    }

    /// Closest valid key to the end of the combo, starting from the last key
    pub fn last_valid_key(&self, ast: &Ast) -> Option<NodeId> {
        self.keys
            .iter()
            .rev()
            .copied()
            .find(|id| ast.key(*id).is_some_and(KeyNode::is_valid))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainNode {
    combos: Vec<NodeId>,
    position: Position,
    valid: bool,
}

impl ChainNode {
    pub fn combos(&self) -> &[NodeId] {
        &self.combos
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Chain(ChainNode),
    Combo(ComboNode),
    Key(KeyNode),
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Chain(_) => NodeKind::Chain,
            Node::Combo(_) => NodeKind::Combo,
            Node::Key(_) => NodeKind::Key,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Node::Chain(node) => node.position,
            Node::Combo(node) => node.position,
            Node::Key(node) => node.position,
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Node::Chain(node) => node.valid,
            Node::Combo(node) => node.valid,
            Node::Key(node) => node.valid,
        }
    }
}

/// Top of a parse result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Root {
    /// A chain of combos
    Chain(NodeId),
    /// Input was empty or whitespace only: a bare error expecting a key
    Empty(TokenId),
}

/// Either a node or a token of an [`Ast`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Item {
    Node(NodeId),
    Token(TokenId),
}

/// A sealed syntax tree
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    tokens: Vec<Token>,
    nodes: Vec<Node>,
    root: Root,
    parents: ParentTable,
}

impl Ast {
    pub fn root(&self) -> Root {
        self.root
    }

    pub fn token(&self, id: TokenId) -> &Token {
        &self.tokens[id.index()]
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn key(&self, id: NodeId) -> Option<&KeyNode> {
        match self.node(id) {
            Node::Key(key) => Some(key),
            _ => None,
        }
    }

    pub fn combo(&self, id: NodeId) -> Option<&ComboNode> {
        match self.node(id) {
            Node::Combo(combo) => Some(combo),
            _ => None,
        }
    }

    /// Root chain, `None` for whitespace-only input
    pub fn chain(&self) -> Option<&ChainNode> {
        match self.root {
            Root::Chain(id) => match self.node(id) {
                Node::Chain(chain) => Some(chain),
                _ => None,
            },
            Root::Empty(_) => None,
        }
    }

    /// Combos of the root chain, in order
    pub fn combos(&self) -> impl Iterator<Item = &ComboNode> {
        self.chain()
            .into_iter()
            .flat_map(|chain| chain.combos.iter())
            .filter_map(|id| self.combo(*id))
    }

    pub fn is_valid(&self) -> bool {
        match self.root {
            Root::Chain(id) => self.node(id).is_valid(),
            Root::Empty(_) => false,
        }
    }

    pub fn position(&self) -> Position {
        match self.root {
            Root::Chain(id) => self.node(id).position(),
            Root::Empty(id) => self.token(id).position(),
        }
    }

    pub fn parent_of_token(&self, id: TokenId) -> Option<NodeId> {
        self.parents.token_parent(id)
    }

    pub fn parent_of_node(&self, id: NodeId) -> Option<NodeId> {
        self.parents.node_parent(id)
    }

    /// Tokens of the whole tree in cursor order.
    ///
    /// Keys yield `[value, left, content, right]`, combos yield their key
    /// tokens then separators stable-sorted by start (so key tokens win ties).
    pub fn extract_tokens(&self) -> Vec<TokenId> {
        match self.root {
            Root::Chain(id) => self.node_tokens(id),
            Root::Empty(id) => vec![id],
        }
    }

    /// Tokens of one node, ordered as in [`Ast::extract_tokens`]
    pub fn node_tokens(&self, id: NodeId) -> Vec<TokenId> {
        match self.node(id) {
            Node::Key(key) => key.tokens(),
            Node::Combo(combo) => {
                let mut tokens: Vec<TokenId> = combo
                    .keys
                    .iter()
                    .flat_map(|key| self.node_tokens(*key))
                    .collect();
                tokens.extend(combo.seps.iter().copied());
                tokens.sort_by_key(|id| self.token(*id).start());
                tokens
            }
            Node::Chain(chain) => chain
                .combos
                .iter()
                .flat_map(|combo| self.node_tokens(*combo))
                .collect(),
        }
    }

    /// Keys and separators of a combo sorted by start
    pub fn combo_parts(&self, combo: &ComboNode) -> Vec<Item> {
        let mut parts: Vec<(usize, Item)> = combo
            .keys
            .iter()
            .filter_map(|id| self.key(*id).map(|key| (key.position.start, Item::Node(*id))))
            .chain(
                combo
                    .seps
                    .iter()
                    .map(|id| (self.token(*id).start(), Item::Token(*id))),
            )
            .collect();
        parts.sort_by_key(|(start, _)| *start);
        parts.into_iter().map(|(_, item)| item).collect()
    }

    /// Canonical rendering of the whole tree
    ///
    /// # Arguments
    /// * `syntax` - Syntax the tree was parsed with
    ///
    /// # Returns
    /// * `Result<String, TreeError>` - Canonical text, or `InvalidInstance` if
    ///   the tree contains any error token
    pub fn stringify(&self, syntax: &Syntax) -> Result<String, TreeError> {
        match self.root {
            Root::Chain(id) => self.stringify_node(id, syntax),
            Root::Empty(id) => self.stringify_token(id, syntax),
        }
    }

    /// JSON view of the tree for tooling and debugging
    pub fn to_json(&self) -> Value {
        match self.root {
            Root::Chain(id) => self.node_to_json(id),
            Root::Empty(id) => self.token_to_json(id),
        }
    }

    fn node_to_json(&self, id: NodeId) -> Value {
        match self.node(id) {
            Node::Chain(chain) => json!({
                "type": NodeKind::Chain,
                "valid": chain.valid,
                "start": chain.position.start,
                "end": chain.position.end,
                "combos": chain.combos.iter().map(|c| self.node_to_json(*c)).collect::<Vec<_>>(),
            }),
            Node::Combo(combo) => json!({
                "type": NodeKind::Combo,
                "valid": combo.valid,
                "start": combo.position.start,
                "end": combo.position.end,
                "keys": combo.keys.iter().map(|k| self.node_to_json(*k)).collect::<Vec<_>>(),
                "seps": combo.seps.iter().map(|s| self.token_to_json(*s)).collect::<Vec<_>>(),
            }),
            Node::Key(key) => {
                let note = key.note.map(|note| {
                    json!({
                        "left": self.token_to_json(note.left),
                        "content": self.token_to_json(note.content),
                        "right": self.token_to_json(note.right),
                    })
                });
                json!({
                    "type": NodeKind::Key,
                    "valid": key.valid,
                    "start": key.position.start,
                    "end": key.position.end,
                    "value": self.token_to_json(key.value),
                    "note": note,
                })
            }
        }
    }

    fn token_to_json(&self, id: TokenId) -> Value {
        match self.token(id) {
            Token::Valid(token) => {
                let mut value = json!({
                    "type": token.kind,
                    "valid": true,
                    "value": token.value,
                    "start": token.position.start,
                    "end": token.position.end,
                });
                if let Some(annotation) = &token.annotation {
                    value["annotation"] = json!(annotation);
                }
                value
            }
            Token::Error(token) => json!({
                "type": "ERROR",
                "valid": false,
                "expected": token.expected,
                "start": token.position.start,
                "end": token.position.end,
            }),
        }
    }
}
