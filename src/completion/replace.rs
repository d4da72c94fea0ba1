//! Applying a completion to the input text

use serde::Serialize;

use super::complete::Completion;
use crate::error::CursorError;

/// Input after accepting a completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replacement {
    pub replacement: String,
    /// New cursor byte offset
    pub cursor: usize,
}

/// Splice a completion into `input`.
///
/// The cursor lands after the inserted value, or just before its closing
/// delimiter when the completion had to add one.
///
/// # Arguments
/// * `input` - Text the suggestion was computed for
/// * `completion` - Chosen completion
///
/// # Returns
/// * `Result<Replacement, CursorError>` - New text and cursor, or an error if
///   the suggestion's range does not fit `input`
pub fn autoreplace(input: &str, completion: &Completion) -> Result<Replacement, CursorError> {
    let range = completion.suggestion.range;
    for index in [range.start, range.end] {
        if index > input.len() {
            return Err(CursorError::OutOfBounds {
                index,
                len: input.len(),
            });
        }
        if !input.is_char_boundary(index) {
            return Err(CursorError::NotCharBoundary { index });
        }
    }

    let value = &completion.value;
    let mut replacement = String::with_capacity(input.len() + value.len());
    replacement.push_str(&input[..range.start]);
    replacement.push_str(value);
    replacement.push_str(&input[range.end..]);

    let mut cursor = range.start + value.len();
    if completion.suggestion.requires_delimiters.needs_right()
        && let Some(last) = value.chars().last()
    {
        cursor -= last.len_utf8();
    }

    Ok(Replacement {
        replacement,
        cursor,
    })
}
