//! Cursor-driven editing support
//!
//! Editing a shortcut goes through four steps, each a plain function over a
//! parsed [`Ast`](crate::ast::Ast):
//! - `cursor`: locate the cursor among the tree's tokens
//! - `suggest`: derive abstract suggestions (what kind of token, which range)
//! - `complete`: expand suggestions into concrete text from candidate pools
//! - `replace`: splice a chosen completion into the input
//!
//! All indexes are byte offsets into the input.

pub mod complete;
pub mod cursor;
pub mod replace;
pub mod suggest;

#[cfg(test)]
mod tests;

pub use complete::{CandidatePools, Completion, autocomplete, escape_separators};
pub use cursor::{CursorInfo, ValidNeighbors, WhitespaceGaps, cursor_info, cursor_info_in, surrounding_errors};
pub use replace::{Replacement, autoreplace};
pub use suggest::{RequiredDelimiters, Suggestion, SuggestionKind, autosuggest};
