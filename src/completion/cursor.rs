//! Cursor context
//!
//! Locates a cursor index among the flattened tokens of a tree: the token it
//! sits inside, the tokens on either side, the closest valid tokens on either
//! side, and whether whitespace separates the cursor from them.

use serde::Serialize;

use crate::ast::{Ast, TokenId};
use crate::error::CursorError;

/// Closest valid tokens on either side of the cursor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValidNeighbors {
    pub prev: Option<TokenId>,
    pub next: Option<TokenId>,
}

/// Whether whitespace lies between the cursor and its valid neighbours
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WhitespaceGaps {
    pub prev: bool,
    pub next: bool,
}

/// Tokens around a cursor index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CursorInfo {
    pub index: usize,
    /// Valid token strictly containing the cursor
    pub at: Option<TokenId>,
    /// Token ending at or before the cursor. An error token only counts when
    /// it ends strictly before the cursor.
    pub prev: Option<TokenId>,
    /// First token starting at or after the cursor
    pub next: Option<TokenId>,
    pub valid: ValidNeighbors,
    pub whitespace: WhitespaceGaps,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Prev,
    Next,
}

/// Cursor context for `index` in `input`
///
/// # Arguments
/// * `input` - Text the tree was parsed from
/// * `ast` - Parsed tree
/// * `index` - Byte offset, `0..=input.len()`
///
/// # Returns
/// * `Result<CursorInfo, CursorError>` - Context, or an error for indexes
///   past the end or inside a multi-byte character
pub fn cursor_info(input: &str, ast: &Ast, index: usize) -> Result<CursorInfo, CursorError> {
    let tokens = ast.extract_tokens();
    cursor_info_in(input, ast, &tokens, index)
}

/// [`cursor_info`] over an already flattened token list
pub fn cursor_info_in(
    input: &str,
    ast: &Ast,
    tokens: &[TokenId],
    index: usize,
) -> Result<CursorInfo, CursorError> {
    if index > input.len() {
        return Err(CursorError::OutOfBounds {
            index,
            len: input.len(),
        });
    }
    if !input.is_char_boundary(index) {
        return Err(CursorError::NotCharBoundary { index });
    }

    let mut info = CursorInfo {
        index,
        at: None,
        prev: None,
        next: None,
        valid: ValidNeighbors::default(),
        whitespace: WhitespaceGaps::default(),
    };

    for &id in tokens {
        let token = ast.token(id);
        let (start, end) = (token.start(), token.end());

        if end <= index {
            if token.is_valid() {
                info.prev = Some(id);
                info.valid.prev = Some(id);
            } else if end != index {
                info.prev = Some(id);
            }
        }
        if start < index && end > index && token.is_valid() {
            info.at = Some(id);
        }
        if start >= index {
            if info.next.is_none() {
                info.next = Some(id);
            }
            if token.is_valid() && info.valid.next.is_none() {
                info.valid.next = Some(id);
                break;
            }
        }
    }

    info.whitespace.prev = has_whitespace(input, ast, &info, Side::Prev);
    info.whitespace.next = has_whitespace(input, ast, &info, Side::Next);
    Ok(info)
}

/// Compare the cursor boundary (the edge of `at`, or the index itself) with the
/// facing edge of the valid neighbour, or with the end of input.
fn has_whitespace(input: &str, ast: &Ast, info: &CursorInfo, side: Side) -> bool {
    let at = info.at.map(|id| ast.token(id).position());
    let (boundary, neighbor, limit) = match side {
        Side::Prev => (
            at.map_or(info.index, |pos| pos.start),
            info.valid.prev.map(|id| ast.token(id).end()),
            0,
        ),
        Side::Next => (
            at.map_or(info.index, |pos| pos.end),
            info.valid.next.map(|id| ast.token(id).start()),
            input.len(),
        ),
    };
    boundary != neighbor.unwrap_or(limit)
}

/// Error tokens directly around the cursor, closest first.
///
/// Consecutive error tokens can all be fixed from the same spot even when
/// whitespace puts them at different offsets, so the walk continues over
/// every adjacent error in both directions. Empty when the cursor is inside a
/// token.
pub fn surrounding_errors(ast: &Ast, tokens: &[TokenId], info: &CursorInfo) -> Vec<TokenId> {
    if info.at.is_some() {
        return Vec::new();
    }
    let Some(anchor) = info.next.or(info.prev) else {
        return Vec::new();
    };
    let Some(i) = tokens.iter().position(|id| *id == anchor) else {
        return Vec::new();
    };

    let anchored_on_next = info.next == Some(anchor);
    let mut forward = if anchored_on_next { i } else { i + 1 };
    let mut backward = if anchored_on_next { i.checked_sub(1) } else { Some(i) };

    let mut errors: Vec<(usize, TokenId)> = Vec::new();
    while let Some(&id) = tokens.get(forward) {
        if !ast.token(id).is_error() {
            break;
        }
        errors.push((forward, id));
        forward += 1;
    }
    while let Some(b) = backward {
        let id = tokens[b];
        if !ast.token(id).is_error() {
            break;
        }
        errors.push((b, id));
        backward = b.checked_sub(1);
    }

    errors.sort_by_key(|(index, _)| index.abs_diff(i));
    errors.into_iter().map(|(_, id)| id).collect()
}
