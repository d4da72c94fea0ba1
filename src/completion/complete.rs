//! Completion generation
//!
//! Expands abstract suggestions into concrete replacement strings using
//! caller-supplied candidate pools.

use serde::Serialize;

use super::suggest::{Suggestion, SuggestionKind};
use crate::config::Syntax;

/// Candidate values to complete with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePools {
    /// Raw key names, escaped as needed when completed
    pub keys: Vec<String>,

    /// Raw note contents
    pub notes: Vec<String>,

    /// Separator to insert, defaults to the canonical separator
    pub separator: Option<String>,
}

impl CandidatePools {
    pub fn new<K, N>(keys: K, notes: N) -> Self
    where
        K: IntoIterator,
        K::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            notes: notes.into_iter().map(Into::into).collect(),
            separator: None,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }
}

/// Concrete text for one suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub suggestion: Suggestion,
    /// Text to splice into the suggestion's range
    pub value: String,
    /// Candidate before escaping and delimiter wrapping
    pub raw_value: String,
}

/// Completions for every suggestion, in suggestion order
///
/// # Arguments
/// * `suggestions` - Output of [`autosuggest`](super::autosuggest)
/// * `pools` - Candidate keys and notes
/// * `syntax` - Syntax the suggestions were computed with
///
/// # Returns
/// * `Vec<Completion>` - One completion per suggestion and matching candidate
pub fn autocomplete(
    suggestions: &[Suggestion],
    pools: &CandidatePools,
    syntax: &Syntax,
) -> Vec<Completion> {
    let separator = pools
        .separator
        .clone()
        .unwrap_or_else(|| syntax.canonical_separator().to_string());
    let delimiters = syntax.notes();

    suggestions
        .iter()
        .flat_map(|suggestion| {
            let completion = |value: String, raw_value: String| Completion {
                suggestion: suggestion.clone(),
                value,
                raw_value,
            };

            match suggestion.kind {
                SuggestionKind::Key => pools
                    .keys
                    .iter()
                    .map(|key| {
                        let prefix = if suggestion.requires_separator {
                            separator.as_str()
                        } else {
                            ""
                        };
                        completion(format!("{prefix}{}", escape_separators(key, syntax)), key.clone())
                    })
                    .collect::<Vec<_>>(),
                SuggestionKind::Separator => {
                    vec![completion(separator.clone(), separator.clone())]
                }
                SuggestionKind::NoteContent => {
                    let required = suggestion.requires_delimiters;
                    let left = delimiters
                        .filter(|_| required.needs_left())
                        .map(|d| d.left.to_string())
                        .unwrap_or_default();
                    let right = delimiters
                        .filter(|_| required.needs_right())
                        .map(|d| d.right.to_string())
                        .unwrap_or_default();
                    pools
                        .notes
                        .iter()
                        .map(|note| completion(format!("{left}{note}{right}"), note.clone()))
                        .collect()
                }
                SuggestionKind::NoteDelimLeft => delimiters
                    .map(|d| completion(d.left.to_string(), d.left.to_string()))
                    .into_iter()
                    .collect(),
                SuggestionKind::NoteDelimRight => delimiters
                    .map(|d| completion(d.right.to_string(), d.right.to_string()))
                    .into_iter()
                    .collect(),
            }
        })
        .collect()
}

/// Escape every separator in `key` that is not already escaped.
///
/// Backslash parity decides whether a separator is escaped: `a\+` keeps its
/// escaped `+`, `a\\+` gets a new backslash before `+`.
pub fn escape_separators(key: &str, syntax: &Syntax) -> String {
    let mut result = String::with_capacity(key.len() + 2);
    let mut escaped = false;
    for ch in key.chars() {
        if ch == '\\' {
            escaped = !escaped;
        } else {
            if syntax.is_separator(ch) && !escaped {
                result.push('\\');
            }
            escaped = false;
        }
        result.push(ch);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_separators() {
        let syntax = Syntax::default();
        assert_eq!(escape_separators("key", &syntax), "key");
        assert_eq!(escape_separators("keyRequiresEscape+", &syntax), r"keyRequiresEscape\+");
        assert_eq!(escape_separators(r"a\+", &syntax), r"a\+");
        assert_eq!(escape_separators(r"a\\+", &syntax), r"a\\\+");
        assert_eq!(escape_separators(r"\a+", &syntax), r"\a\+");
        assert_eq!(escape_separators("+-", &syntax), r"\+\-");
    }
}
