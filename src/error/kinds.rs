use std::{fmt, io};

use crate::ast::{NodeKind, Position, TokenKind};
use crate::config::Syntax;
use crate::parser::lexer::LexToken;

/// Crate-wide `Result` type using [`ShortcutError`] as the error.
///
/// This alias is re-exported by the parent `error` module and is intended
/// to be used throughout the crate for fallible operations.
pub type Result<T> = std::result::Result<T, ShortcutError>;

/// Top-level error type for shortcut parsing operations.
#[derive(Debug)]
pub enum ShortcutError {
    /// Parser configuration errors.
    Config(ConfigError),

    /// Unexpected failure inside the grammar.
    Internal(Box<InternalError>),

    /// Tree contract violations.
    Tree(TreeError),

    /// Cursor offset errors.
    Cursor(CursorError),

    /// `validate` was called on a parser built without a token validator.
    MissingValidator,

    /// I/O errors.
    Io(io::Error),

    /// Output serialization errors.
    Serialization(String),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
///
/// The delimiter and separator variants are raised by
/// [`Syntax::resolve`](crate::config::Syntax::resolve) before any parsing occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Left and right note delimiters are the same string.
    DelimitersEqual(String),

    /// Left note delimiter is longer than one character.
    LeftDelimiterTooLong(String),

    /// Right note delimiter is longer than one character.
    RightDelimiterTooLong(String),

    /// Left note delimiter is empty.
    EmptyLeftDelimiter,

    /// Right note delimiter is empty.
    EmptyRightDelimiter,

    /// Left note delimiter is also a separator.
    LeftDelimiterIsSeparator(String),

    /// Right note delimiter is also a separator.
    RightDelimiterIsSeparator(String),

    /// No separators were configured.
    NoSeparators,

    /// A separator is not exactly one character.
    InvalidSeparator(String),

    /// Config file not found.
    FileNotFound(String),

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Diagnostic bundle for a grammar failure that should never happen.
#[derive(Debug, Clone)]
pub struct InternalError {
    /// Raw input passed to `parse`.
    pub input: String,

    /// Resolved syntax the parser was running with.
    pub syntax: Syntax,

    /// Token stream produced by the lexer.
    pub tokens: Vec<LexToken>,

    /// Underlying failure.
    pub cause: TreeError,
}

/// Tree contract violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Only valid nodes and tokens can be stringified.
    InvalidInstance { kind: String, position: Position },

    /// A parent link was assigned twice.
    ReadOnlyParent(String),

    /// A node was built without enough children to derive its position.
    MissingPosition(NodeKind),
}

/// Cursor offset errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorError {
    /// Index is past the end of the input.
    OutOfBounds { index: usize, len: usize },

    /// Index splits a multi-byte character.
    NotCharBoundary { index: usize },
}

impl TreeError {
    /// Build an `InvalidInstance` error for a token of the given kind.
    pub(crate) fn invalid_token(kind: Option<TokenKind>, position: Position) -> Self {
        let kind = match kind {
            Some(kind) => kind.to_string(),
            None => "ERROR".to_string(),
        };
        TreeError::InvalidInstance { kind, position }
    }

    /// Build an `InvalidInstance` error for a node.
    pub(crate) fn invalid_node(kind: NodeKind, position: Position) -> Self {
        TreeError::InvalidInstance {
            kind: kind.to_string(),
            position,
        }
    }
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for ShortcutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShortcutError::Config(e) => write!(f, "Configuration error: {e}"),
            ShortcutError::Internal(e) => write!(f, "{e}"),
            ShortcutError::Tree(e) => write!(f, "{e}"),
            ShortcutError::Cursor(e) => write!(f, "Cursor error: {e}"),
            ShortcutError::MissingValidator => write!(
                f,
                "A token validator must be configured to use validate"
            ),
            ShortcutError::Io(e) => write!(f, "I/O error: {e}"),
            ShortcutError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            ShortcutError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::DelimitersEqual(delim) => {
                write!(f, "Note delimiters cannot be the same ('{delim}')")
            }
            ConfigError::LeftDelimiterTooLong(delim) => {
                write!(f, "Left note delimiter must be one character, got '{delim}'")
            }
            ConfigError::RightDelimiterTooLong(delim) => {
                write!(f, "Right note delimiter must be one character, got '{delim}'")
            }
            ConfigError::EmptyLeftDelimiter => write!(f, "Left note delimiter cannot be empty"),
            ConfigError::EmptyRightDelimiter => write!(f, "Right note delimiter cannot be empty"),
            ConfigError::LeftDelimiterIsSeparator(delim) => {
                write!(f, "Left note delimiter '{delim}' is also a separator")
            }
            ConfigError::RightDelimiterIsSeparator(delim) => {
                write!(f, "Right note delimiter '{delim}' is also a separator")
            }
            ConfigError::NoSeparators => write!(f, "At least one separator is required"),
            ConfigError::InvalidSeparator(sep) => {
                write!(f, "Separators must be one character, got '{sep}'")
            }
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {path}"),
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Internal parser error: {}", self.cause)?;
        writeln!(f, "  input: {:?}", self.input)?;
        writeln!(f, "  syntax: {:?}", self.syntax)?;
        write!(f, "  tokens: {:?}", self.tokens)
    }
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeError::InvalidInstance { kind, position } => write!(
                f,
                "Only valid nodes can be stringified ({kind} at {position})"
            ),
            TreeError::ReadOnlyParent(what) => {
                write!(f, "Parent of {what} is already assigned and read-only")
            }
            TreeError::MissingPosition(kind) => {
                write!(f, "Cannot derive a position for an empty {kind} node")
            }
        }
    }
}

impl fmt::Display for CursorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CursorError::OutOfBounds { index, len } => {
                write!(f, "Index {index} out of bounds. Input length is {len}.")
            }
            CursorError::NotCharBoundary { index } => {
                write!(f, "Index {index} is not on a character boundary")
            }
        }
    }
}

impl std::error::Error for ShortcutError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for InternalError {}
impl std::error::Error for TreeError {}
impl std::error::Error for CursorError {}

/* ========================= Conversions to ShortcutError ========================= */

impl From<io::Error> for ShortcutError {
    fn from(err: io::Error) -> Self {
        ShortcutError::Io(err)
    }
}

impl From<serde_json::Error> for ShortcutError {
    fn from(err: serde_json::Error) -> Self {
        ShortcutError::Serialization(err.to_string())
    }
}

impl From<ConfigError> for ShortcutError {
    fn from(err: ConfigError) -> Self {
        ShortcutError::Config(err)
    }
}

impl From<InternalError> for ShortcutError {
    fn from(err: InternalError) -> Self {
        ShortcutError::Internal(Box::new(err))
    }
}

impl From<TreeError> for ShortcutError {
    fn from(err: TreeError) -> Self {
        ShortcutError::Tree(err)
    }
}

impl From<CursorError> for ShortcutError {
    fn from(err: CursorError) -> Self {
        ShortcutError::Cursor(err)
    }
}

impl From<String> for ShortcutError {
    fn from(msg: String) -> Self {
        ShortcutError::Generic(msg)
    }
}

impl From<&str> for ShortcutError {
    fn from(msg: &str) -> Self {
        ShortcutError::Generic(msg.to_owned())
    }
}
