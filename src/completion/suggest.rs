//! Suggestion derivation
//!
//! Turns the cursor context of a tree into abstract [`Suggestion`]s: which
//! range could be replaced and what kind of token belongs there. Fixes for
//! error tokens at the cursor always come first, followed by at most one
//! group of suggestions derived from the tokens around the cursor.

use serde::Serialize;

use super::cursor::{CursorInfo, cursor_info_in, surrounding_errors};
use crate::ast::{Ast, Position, Root, Token, TokenId, TokenKind};
use crate::config::Syntax;
use crate::error::CursorError;

/// What a suggestion inserts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SuggestionKind {
    Key,
    Separator,
    NoteContent,
    NoteDelimLeft,
    NoteDelimRight,
}

impl From<TokenKind> for SuggestionKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Key => SuggestionKind::Key,
            TokenKind::Separator => SuggestionKind::Separator,
            TokenKind::NoteContent => SuggestionKind::NoteContent,
            TokenKind::NoteDelimLeft => SuggestionKind::NoteDelimLeft,
            TokenKind::NoteDelimRight => SuggestionKind::NoteDelimRight,
        }
    }
}

/// Note delimiters a completion has to add around its value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiredDelimiters {
    #[default]
    None,
    Both,
    Left,
    Right,
}

impl RequiredDelimiters {
    pub fn needs_left(&self) -> bool {
        matches!(self, RequiredDelimiters::Both | RequiredDelimiters::Left)
    }

    pub fn needs_right(&self) -> bool {
        matches!(self, RequiredDelimiters::Both | RequiredDelimiters::Right)
    }
}

/// An insertable or replaceable range and what belongs there
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub range: Position,
    pub cursor: CursorInfo,
    pub is_error_fix: bool,
    pub requires_separator: bool,
    pub requires_delimiters: RequiredDelimiters,
}

impl Suggestion {
    fn new(kind: SuggestionKind, range: Position, cursor: CursorInfo) -> Self {
        Self {
            kind,
            range,
            cursor,
            is_error_fix: false,
            requires_separator: false,
            requires_delimiters: RequiredDelimiters::None,
        }
    }

    fn error_fix(mut self) -> Self {
        self.is_error_fix = true;
        self
    }

    fn with_separator(mut self) -> Self {
        self.requires_separator = true;
        self
    }

    fn with_delimiters(mut self, delimiters: RequiredDelimiters) -> Self {
        self.requires_delimiters = delimiters;
        self
    }
}

/// Read-only view over the cursor context with token lookups
struct Context<'a> {
    ast: &'a Ast,
    info: CursorInfo,
}

impl Context<'_> {
    fn kind(&self, id: Option<TokenId>) -> Option<TokenKind> {
        id.and_then(|id| self.ast.token(id).kind())
    }

    fn expects(&self, id: Option<TokenId>, kind: TokenKind) -> bool {
        id.is_some_and(|id| self.ast.token(id).expects(kind))
    }

    fn is_error(&self, id: Option<TokenId>) -> bool {
        id.is_some_and(|id| self.ast.token(id).is_error())
    }

    fn position(&self, id: TokenId) -> Position {
        self.ast.token(id).position()
    }

    /// `next` exists and is the closest valid token after the cursor
    fn next_is_valid_next(&self) -> bool {
        self.info.next.is_some() && self.info.next == self.info.valid.next
    }

    fn prev_is_valid_prev(&self) -> bool {
        self.info.prev.is_some() && self.info.prev == self.info.valid.prev
    }
}

/// Missing-delimiter flags derived from the tokens around the cursor
#[derive(Debug, Clone, Copy)]
struct MissingDelimiters {
    left: bool,
    right: bool,
    both: bool,
}

/// Suggestions for the cursor at `index`
///
/// # Arguments
/// * `input` - Text the tree was parsed from
/// * `ast` - Parsed tree
/// * `index` - Cursor byte offset
/// * `syntax` - Syntax the tree was parsed with
///
/// # Returns
/// * `Result<Vec<Suggestion>, CursorError>` - Error fixes first, then
///   positional suggestions
pub fn autosuggest(
    input: &str,
    ast: &Ast,
    index: usize,
    syntax: &Syntax,
) -> Result<Vec<Suggestion>, CursorError> {
    let tokens = ast.extract_tokens();
    let info = cursor_info_in(input, ast, &tokens, index)?;
    let here = Position::at(index);

    if let Root::Empty(_) = ast.root() {
        return Ok(vec![
            Suggestion::new(SuggestionKind::Key, here, info).error_fix(),
        ]);
    }

    let cx = Context { ast, info };
    let missing_left = cx.expects(info.next, TokenKind::NoteDelimLeft);
    let missing_right = cx.expects(info.next, TokenKind::NoteDelimRight);
    let missing = MissingDelimiters {
        left: missing_left,
        right: missing_right,
        both: !missing_left
            && !missing_right
            && cx.kind(info.next) != Some(TokenKind::NoteDelimRight)
            && cx.kind(info.prev) != Some(TokenKind::NoteDelimLeft),
    };

    let mut suggestions = error_fixes(&cx, &tokens, missing);

    match cx.kind(info.at) {
        Some(TokenKind::Key) => {
            if let Some(at) = info.at {
                suggestions.push(Suggestion::new(SuggestionKind::Key, cx.position(at), info));
            }
        }
        Some(TokenKind::NoteContent) => {
            if let Some(at) = info.at {
                let delimiters = if missing.both {
                    RequiredDelimiters::Both
                } else if missing.right {
                    RequiredDelimiters::Right
                } else {
                    RequiredDelimiters::None
                };
                suggestions.push(
                    Suggestion::new(SuggestionKind::NoteContent, cx.position(at), info)
                        .with_delimiters(delimiters),
                );
            }
        }
        _ => {}
    }

    if info.at.is_none() {
        suggestions.extend(positional(&cx, syntax, missing));
    }

    Ok(suggestions)
}

/// One fix per distinct expected kind of the error tokens at the cursor
fn error_fixes(cx: &Context<'_>, tokens: &[TokenId], missing: MissingDelimiters) -> Vec<Suggestion> {
    let info = cx.info;
    let here = Position::at(info.index);
    let mut handled: Vec<TokenKind> = Vec::new();
    let mut suggestions = Vec::new();

    let errors = surrounding_errors(cx.ast, tokens, &info)
        .into_iter()
        .filter(|id| cx.ast.token(*id).start() == info.index);

    for id in errors {
        let Token::Error(error) = cx.ast.token(id) else {
            continue;
        };
        for &kind in error.expected() {
            if handled.contains(&kind) {
                continue;
            }
            handled.push(kind);

            match kind {
                TokenKind::Key | TokenKind::Separator | TokenKind::NoteDelimLeft => {
                    suggestions.push(Suggestion::new(kind.into(), here, info).error_fix());
                }
                TokenKind::NoteDelimRight => {
                    suggestions.push(Suggestion::new(kind.into(), here, info).error_fix());
                    let range = match info.prev {
                        Some(prev) if cx.kind(Some(prev)) == Some(TokenKind::NoteContent) => {
                            cx.position(prev)
                        }
                        _ => here,
                    };
                    suggestions.push(
                        Suggestion::new(SuggestionKind::NoteContent, range, info)
                            .with_delimiters(RequiredDelimiters::Right),
                    );
                }
                TokenKind::NoteContent => {
                    let delimiters = if missing.both {
                        RequiredDelimiters::Both
                    } else if missing.right {
                        RequiredDelimiters::Right
                    } else if missing.left {
                        RequiredDelimiters::Left
                    } else {
                        RequiredDelimiters::None
                    };
                    suggestions.push(
                        Suggestion::new(kind.into(), error.position(), info)
                            .error_fix()
                            .with_delimiters(delimiters),
                    );
                }
            }
        }
    }

    suggestions
}

/// Suggestions derived from the tokens on either side of a cursor that is
/// between tokens. Only the first matching case applies.
fn positional(cx: &Context<'_>, syntax: &Syntax, missing: MissingDelimiters) -> Vec<Suggestion> {
    let info = cx.info;
    let here = Position::at(info.index);
    let ws = info.whitespace;
    let notes_enabled = syntax.notes().is_some();
    let prev_kind = cx.kind(info.prev);
    let next_kind = cx.kind(info.next);
    let mut suggestions = Vec::new();

    if prev_kind == Some(TokenKind::NoteDelimRight) && !ws.prev {
        // key(note)|
        suggestions.push(Suggestion::new(SuggestionKind::Key, here, info).with_separator());
    } else if let (Some(prev), Some(TokenKind::Key), false) = (info.prev, prev_kind, ws.prev) {
        // key|
        suggestions.push(Suggestion::new(SuggestionKind::Key, cx.position(prev), info));
        if ws.next {
            suggestions.push(Suggestion::new(SuggestionKind::Key, here, info).with_separator());
        }
        if notes_enabled
            && (!cx.is_error(info.next) || ws.next)
            && next_kind != Some(TokenKind::NoteDelimLeft)
            && next_kind != Some(TokenKind::NoteDelimRight)
            && (missing.both || missing.left)
        {
            let delimiters = if missing.left {
                RequiredDelimiters::Left
            } else {
                RequiredDelimiters::Both
            };
            suggestions.push(
                Suggestion::new(SuggestionKind::NoteContent, here, info).with_delimiters(delimiters),
            );
        }
    } else if (info.valid.prev.is_none()
        || ws.prev
        || matches!(
            cx.kind(info.valid.prev),
            Some(TokenKind::Separator | TokenKind::NoteDelimRight)
        ))
        && !ws.next
        && cx.next_is_valid_next()
        && next_kind == Some(TokenKind::Key)
    {
        // +|key
        if let Some(next) = info.next {
            suggestions.push(Suggestion::new(SuggestionKind::Key, cx.position(next), info));
        }
    } else if (ws.prev && ws.next)
        || (info.prev.is_none() && ws.next)
        || (info.next.is_none() && ws.prev)
        || (info.next.is_none() && info.prev.is_none())
    {
        // key | key
        suggestions.push(Suggestion::new(SuggestionKind::Key, here, info));
    } else if notes_enabled
        && ((cx.next_is_valid_next()
            && next_kind == Some(TokenKind::NoteContent)
            && !missing.left)
            || (cx.prev_is_valid_prev()
                && prev_kind == Some(TokenKind::NoteContent)
                && !missing.right)
            || (cx.prev_is_valid_prev()
                && prev_kind == Some(TokenKind::NoteDelimLeft)
                && cx.next_is_valid_next()
                && next_kind == Some(TokenKind::NoteDelimRight)))
    {
        let range = match (info.next, info.prev) {
            (Some(next), _) if next_kind == Some(TokenKind::NoteContent) => cx.position(next),
            (_, Some(prev)) if prev_kind == Some(TokenKind::NoteContent) => cx.position(prev),
            _ => here,
        };
        suggestions.push(Suggestion::new(SuggestionKind::NoteContent, range, info));
    }

    suggestions
}
