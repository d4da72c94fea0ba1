//! Parser options and the syntax resolved from them

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::ast::{NoteAnnotation, ValidToken};
use crate::error::ConfigError;
use crate::validate::{TokenRef, ValidationEntry};

/// Annotates valid note content. Error content is never passed in.
pub type ContentTransform = Arc<dyn Fn(&ValidToken) -> Option<NoteAnnotation> + Send + Sync>;

/// Per-token callback used by [`Parser::validate`](crate::Parser::validate)
pub type TokenValidator = Arc<dyn Fn(TokenRef<'_>) -> Vec<ValidationEntry> + Send + Sync>;

pub const DEFAULT_SEPARATORS: [&str; 2] = ["+", "-"];
pub const DEFAULT_NOTE_LEFT: &str = "(";
pub const DEFAULT_NOTE_RIGHT: &str = ")";

/// Options a [`Parser`](crate::Parser) is constructed from
#[derive(Clone)]
pub struct ParserOptions {
    /// Single-character separators, the first one is canonical
    pub separators: Vec<String>,

    /// Note support, disabled when `None`
    pub notes: Option<NoteOptions>,

    /// Callback used by the validator
    pub token_validator: Option<TokenValidator>,
}

/// Note delimiters and the optional content transform
#[derive(Clone)]
pub struct NoteOptions {
    pub left: String,
    pub right: String,
    pub transform: Option<ContentTransform>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
            notes: None,
            token_validator: None,
        }
    }
}

impl Default for NoteOptions {
    fn default() -> Self {
        Self::new(DEFAULT_NOTE_LEFT, DEFAULT_NOTE_RIGHT)
    }
}

impl ParserOptions {
    pub fn with_separators<I, S>(mut self, separators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.separators = separators.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_notes(mut self, notes: NoteOptions) -> Self {
        self.notes = Some(notes);
        self
    }

    pub fn with_token_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(TokenRef<'_>) -> Vec<ValidationEntry> + Send + Sync + 'static,
    {
        self.token_validator = Some(Arc::new(validator));
        self
    }
}

impl NoteOptions {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            transform: None,
        }
    }

    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&ValidToken) -> Option<NoteAnnotation> + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(transform));
        self
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("separators", &self.separators)
            .field("notes", &self.notes)
            .field("token_validator", &self.token_validator.is_some())
            .finish()
    }
}

impl fmt::Debug for NoteOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteOptions")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("transform", &self.transform.is_some())
            .finish()
    }
}

/// Resolved note delimiters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delimiters {
    pub left: char,
    pub right: char,
}

/// Character classes the lexer, grammar and stringifier work with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    separators: Vec<char>,
    notes: Option<Delimiters>,
}

impl Syntax {
    /// Check options and resolve them into single characters.
    ///
    /// Separators are checked first, then the delimiters in this order: equal
    /// delimiters, overlong left, overlong right, empty left, empty right,
    /// left is a separator, right is a separator.
    ///
    /// # Arguments
    /// * `options` - Options to resolve
    ///
    /// # Returns
    /// * `Result<Syntax, ConfigError>` - Resolved syntax or the first conflict
    pub fn resolve(options: &ParserOptions) -> Result<Self, ConfigError> {
        if options.separators.is_empty() {
            return Err(ConfigError::NoSeparators);
        }

        let separators = options
            .separators
            .iter()
            .map(|sep| single_char(sep).ok_or_else(|| ConfigError::InvalidSeparator(sep.clone())))
            .collect::<Result<Vec<char>, _>>()?;

        let notes = match &options.notes {
            Some(notes) => Some(resolve_delimiters(notes, &separators)?),
            None => None,
        };

        debug!(?separators, ?notes, "resolved parser syntax");
        Ok(Self { separators, notes })
    }

    pub fn separators(&self) -> &[char] {
        &self.separators
    }

    /// Separator used when stringifying and completing
    pub fn canonical_separator(&self) -> char {
        self.separators[0]
    }

    pub fn notes(&self) -> Option<Delimiters> {
        self.notes
    }

    pub fn is_separator(&self, ch: char) -> bool {
        self.separators.contains(&ch)
    }

    /// Whether `ch` is an active note delimiter
    pub fn is_delimiter(&self, ch: char) -> bool {
        self.notes
            .is_some_and(|notes| ch == notes.left || ch == notes.right)
    }

    /// Characters that must be escaped inside a key name
    pub fn is_significant(&self, ch: char) -> bool {
        ch == '\\' || ch.is_whitespace() || self.is_separator(ch) || self.is_delimiter(ch)
    }
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            separators: vec!['+', '-'],
            notes: None,
        }
    }
}

fn resolve_delimiters(notes: &NoteOptions, separators: &[char]) -> Result<Delimiters, ConfigError> {
    let (left, right) = (&notes.left, &notes.right);

    if left == right {
        return Err(ConfigError::DelimitersEqual(left.clone()));
    }
    if left.chars().count() > 1 {
        return Err(ConfigError::LeftDelimiterTooLong(left.clone()));
    }
    if right.chars().count() > 1 {
        return Err(ConfigError::RightDelimiterTooLong(right.clone()));
    }

    let left_char = single_char(left).ok_or(ConfigError::EmptyLeftDelimiter)?;
    let right_char = single_char(right).ok_or(ConfigError::EmptyRightDelimiter)?;

    if separators.contains(&left_char) {
        return Err(ConfigError::LeftDelimiterIsSeparator(left.clone()));
    }
    if separators.contains(&right_char) {
        return Err(ConfigError::RightDelimiterIsSeparator(right.clone()));
    }

    Ok(Delimiters {
        left: left_char,
        right: right_char,
    })
}

fn single_char(value: &str) -> Option<char> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_notes(left: &str, right: &str) -> Result<Syntax, ConfigError> {
        Syntax::resolve(&ParserOptions::default().with_notes(NoteOptions::new(left, right)))
    }

    #[test]
    fn test_default_syntax() {
        let syntax = Syntax::resolve(&ParserOptions::default()).unwrap();
        assert_eq!(syntax.separators(), &['+', '-']);
        assert_eq!(syntax.canonical_separator(), '+');
        assert!(syntax.notes().is_none());
        assert!(!syntax.is_delimiter('('));
    }

    #[test]
    fn test_delimiter_errors() {
        assert_eq!(
            resolve_notes("(", "("),
            Err(ConfigError::DelimitersEqual("(".to_string()))
        );
        assert_eq!(
            resolve_notes("((", ")"),
            Err(ConfigError::LeftDelimiterTooLong("((".to_string()))
        );
        assert_eq!(
            resolve_notes("(", "))"),
            Err(ConfigError::RightDelimiterTooLong("))".to_string()))
        );
        assert_eq!(resolve_notes("", ")"), Err(ConfigError::EmptyLeftDelimiter));
        assert_eq!(resolve_notes("(", ""), Err(ConfigError::EmptyRightDelimiter));
        assert_eq!(
            resolve_notes("+", ")"),
            Err(ConfigError::LeftDelimiterIsSeparator("+".to_string()))
        );
        assert_eq!(
            resolve_notes("(", "-"),
            Err(ConfigError::RightDelimiterIsSeparator("-".to_string()))
        );
    }

    #[test]
    fn test_equal_check_comes_first() {
        assert_eq!(
            resolve_notes("", ""),
            Err(ConfigError::DelimitersEqual(String::new()))
        );
        assert_eq!(
            resolve_notes("++", "++"),
            Err(ConfigError::DelimitersEqual("++".to_string()))
        );
    }

    #[test]
    fn test_separator_errors() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(
            Syntax::resolve(&ParserOptions::default().with_separators(empty)),
            Err(ConfigError::NoSeparators)
        );
        assert_eq!(
            Syntax::resolve(&ParserOptions::default().with_separators(["+", "->"])),
            Err(ConfigError::InvalidSeparator("->".to_string()))
        );
    }

    #[test]
    fn test_custom_delimiters_and_separators() {
        let options = ParserOptions::default()
            .with_separators(["=", "+"])
            .with_notes(NoteOptions::new("[", "]"));
        let syntax = Syntax::resolve(&options).unwrap();
        assert_eq!(syntax.canonical_separator(), '=');
        assert_eq!(syntax.notes(), Some(Delimiters { left: '[', right: ']' }));
        assert!(syntax.is_significant('['));
        assert!(syntax.is_significant(' '));
        assert!(syntax.is_significant('\\'));
        assert!(!syntax.is_significant('('));
    }
}
