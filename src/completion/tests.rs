use super::*;
use crate::ast::{Position, TokenKind};
use crate::config::{NoteOptions, ParserOptions};
use crate::error::CursorError;
use crate::parser::Parser;

/// (kind, range, is_error_fix, requires_separator, requires_delimiters)
type Expected = (SuggestionKind, Position, bool, bool, RequiredDelimiters);

fn plain_parser() -> Parser {
    Parser::new(ParserOptions::default()).unwrap()
}

fn notes_parser() -> Parser {
    Parser::new(ParserOptions::default().with_notes(NoteOptions::default())).unwrap()
}

fn suggest(parser: &Parser, input: &str, index: usize) -> Vec<Expected> {
    let ast = parser.parse(input).unwrap();
    parser
        .autosuggest(input, &ast, index)
        .unwrap()
        .into_iter()
        .map(|s| {
            (
                s.kind,
                s.range,
                s.is_error_fix,
                s.requires_separator,
                s.requires_delimiters,
            )
        })
        .collect()
}

fn key(start: usize, end: usize) -> Expected {
    (SuggestionKind::Key, Position::new(start, end), false, false, RequiredDelimiters::None)
}

fn key_after_separator(index: usize) -> Expected {
    (SuggestionKind::Key, Position::at(index), false, true, RequiredDelimiters::None)
}

fn error_fix(kind: SuggestionKind, index: usize) -> Expected {
    (kind, Position::at(index), true, false, RequiredDelimiters::None)
}

fn note(start: usize, end: usize, delimiters: RequiredDelimiters) -> Expected {
    (SuggestionKind::NoteContent, Position::new(start, end), false, false, delimiters)
}

const CHAIN: &str = " ctrl1+key1 ctrl2+ +key2 ctrl3 + ";
const NOTES: &str = "key(note) key) key() key key(";

#[test]
fn test_suggest_between_keys_and_separators() {
    let parser = plain_parser();
    let cases: Vec<(usize, Vec<Expected>)> = vec![
        (0, vec![key(0, 0)]),
        (1, vec![key(1, 6)]),
        (3, vec![key(1, 6)]),
        (6, vec![key(1, 6)]),
        (7, vec![key(7, 11)]),
        (11, vec![key(7, 11), key_after_separator(11)]),
        (18, vec![error_fix(SuggestionKind::Key, 18)]),
        (19, vec![error_fix(SuggestionKind::Key, 19)]),
        (25, vec![key(25, 30)]),
        (30, vec![key(25, 30), key_after_separator(30)]),
        (31, vec![error_fix(SuggestionKind::Key, 31)]),
        (32, vec![error_fix(SuggestionKind::Key, 32)]),
        (33, vec![key(33, 33)]),
    ];

    for (index, expected) in cases {
        assert_eq!(suggest(&parser, CHAIN, index), expected, "cursor at {index}");
    }
}

#[test]
fn test_suggest_around_notes() {
    let parser = notes_parser();
    let cases: Vec<(usize, Vec<Expected>)> = vec![
        (3, vec![key(0, 3)]),
        (4, vec![note(4, 8, RequiredDelimiters::None)]),
        (6, vec![note(4, 8, RequiredDelimiters::None)]),
        (8, vec![note(4, 8, RequiredDelimiters::None)]),
        (9, vec![key_after_separator(9)]),
        (
            13,
            vec![
                error_fix(SuggestionKind::NoteDelimLeft, 13),
                (
                    SuggestionKind::NoteContent,
                    Position::at(13),
                    true,
                    false,
                    RequiredDelimiters::Left,
                ),
                key(10, 13),
            ],
        ),
        (19, vec![error_fix(SuggestionKind::NoteContent, 19)]),
        (
            24,
            vec![
                key(21, 24),
                key_after_separator(24),
                note(24, 24, RequiredDelimiters::Both),
            ],
        ),
        (
            29,
            vec![
                error_fix(SuggestionKind::NoteContent, 29),
                error_fix(SuggestionKind::NoteDelimRight, 29),
                note(29, 29, RequiredDelimiters::Right),
            ],
        ),
    ];

    for (index, expected) in cases {
        assert_eq!(suggest(&parser, NOTES, index), expected, "cursor at {index}");
    }
}

#[test]
fn test_suggest_empty_input() {
    let parser = plain_parser();
    assert_eq!(suggest(&parser, "", 0), vec![error_fix(SuggestionKind::Key, 0)]);
    assert_eq!(suggest(&parser, "   ", 2), vec![error_fix(SuggestionKind::Key, 2)]);
}

#[test]
fn test_cursor_out_of_bounds() {
    let parser = plain_parser();
    let ast = parser.parse("ctrl").unwrap();
    let err = cursor_info("ctrl", &ast, 5).unwrap_err();
    assert_eq!(err, CursorError::OutOfBounds { index: 5, len: 4 });
    assert!(parser.autosuggest("ctrl", &ast, 5).is_err());
}

#[test]
fn test_cursor_inside_multibyte_char() {
    let parser = plain_parser();
    let input = "ctrl+é";
    let ast = parser.parse(input).unwrap();
    assert_eq!(
        cursor_info(input, &ast, 6).unwrap_err(),
        CursorError::NotCharBoundary { index: 6 }
    );
    assert!(cursor_info(input, &ast, 7).is_ok());
}

#[test]
fn test_cursor_info_neighbors() {
    let parser = plain_parser();
    let ast = parser.parse(CHAIN).unwrap();

    let info = cursor_info(CHAIN, &ast, 19).unwrap();
    assert_eq!(info.at, None);
    assert!(ast.token(info.prev.unwrap()).is_error());
    assert!(ast.token(info.next.unwrap()).is_error());
    assert_eq!(ast.token(info.valid.prev.unwrap()).position(), Position::new(17, 18));
    assert_eq!(ast.token(info.valid.next.unwrap()).position(), Position::new(19, 20));
    assert!(info.whitespace.prev);
    assert!(!info.whitespace.next);

    let info = cursor_info(CHAIN, &ast, 3).unwrap();
    assert_eq!(ast.token(info.at.unwrap()).value(), Some("ctrl1"));
}

#[test]
fn test_surrounding_errors_closest_first() {
    let parser = plain_parser();
    let ast = parser.parse(CHAIN).unwrap();
    let tokens = ast.extract_tokens();

    let info = cursor_info(CHAIN, &ast, 19).unwrap();
    let errors = surrounding_errors(&ast, &tokens, &info);
    let starts: Vec<usize> = errors.iter().map(|id| ast.token(*id).start()).collect();
    assert_eq!(starts, vec![19, 18]);

    let info = cursor_info(CHAIN, &ast, 3).unwrap();
    assert!(surrounding_errors(&ast, &tokens, &info).is_empty());
}

#[test]
fn test_autocomplete_escapes_keys() {
    let parser = plain_parser();
    let ast = parser.parse(CHAIN).unwrap();
    let suggestions = parser.autosuggest(CHAIN, &ast, 11).unwrap();
    let pools = CandidatePools::new(["key", "keyRequiresEscape+"], ["content"]);

    let completions = parser.autocomplete(&suggestions, &pools);
    let values: Vec<&str> = completions.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(
        values,
        vec!["key", r"keyRequiresEscape\+", "+key", r"+keyRequiresEscape\+"]
    );
    assert_eq!(completions[1].raw_value, "keyRequiresEscape+");
}

#[test]
fn test_autocomplete_custom_separator() {
    let parser = plain_parser();
    let ast = parser.parse(CHAIN).unwrap();
    let suggestions = parser.autosuggest(CHAIN, &ast, 30).unwrap();
    let pools = CandidatePools::new(["x"], Vec::<String>::new()).with_separator("-");

    let completions = parser.autocomplete(&suggestions, &pools);
    let values: Vec<&str> = completions.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, vec!["x", "-x"]);
}

#[test]
fn test_autocomplete_wraps_notes() {
    let parser = notes_parser();
    let ast = parser.parse(NOTES).unwrap();
    let pools = CandidatePools::new(Vec::<String>::new(), ["content"]);

    let suggestions = parser.autosuggest(NOTES, &ast, 24).unwrap();
    let completions = parser.autocomplete(&suggestions, &pools);
    let values: Vec<&str> = completions.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, vec!["(content)"]);

    let suggestions = parser.autosuggest(NOTES, &ast, 29).unwrap();
    let completions = parser.autocomplete(&suggestions, &pools);
    let values: Vec<&str> = completions.iter().map(|c| c.value.as_str()).collect();
    assert_eq!(values, vec!["content", ")", "content)"]);
}

#[test]
fn test_autocomplete_delimiters_need_notes() {
    let parser = plain_parser();
    let ast = parser.parse("a").unwrap();
    let mut suggestions = parser.autosuggest("a", &ast, 1).unwrap();
    for suggestion in &mut suggestions {
        suggestion.kind = SuggestionKind::NoteDelimLeft;
    }
    assert!(parser.autocomplete(&suggestions, &CandidatePools::default()).is_empty());
}

#[test]
fn test_autoreplace_key() {
    let parser = notes_parser();
    let input = "key key";
    let ast = parser.parse(input).unwrap();
    let suggestions = parser.autosuggest(input, &ast, 3).unwrap();
    let pools = CandidatePools::new(["a"], ["note"]);
    let completions = parser.autocomplete(&suggestions, &pools);

    let replaced = parser.autoreplace(input, &completions[0]).unwrap();
    assert_eq!(replaced.replacement, "a key");
    assert_eq!(replaced.cursor, 1);

    let replaced = parser.autoreplace(input, &completions[1]).unwrap();
    assert_eq!(replaced.replacement, "key+a key");
    assert_eq!(replaced.cursor, 5);
}

#[test]
fn test_autoreplace_cursor_before_closing_delimiter() {
    let parser = notes_parser();
    let input = "key key";
    let ast = parser.parse(input).unwrap();
    let suggestions = parser.autosuggest(input, &ast, 3).unwrap();
    let pools = CandidatePools::new(Vec::<String>::new(), ["note"]);
    let completions = parser.autocomplete(&suggestions, &pools);
    assert_eq!(completions.len(), 1);

    let replaced = parser.autoreplace(input, &completions[0]).unwrap();
    assert_eq!(replaced.replacement, "key(note) key");
    assert_eq!(replaced.cursor, 8);
    assert_eq!(&replaced.replacement[replaced.cursor..], ") key");
}

#[test]
fn test_autoreplace_range_outside_input() {
    let parser = plain_parser();
    let input = "ctrl+shift";
    let ast = parser.parse(input).unwrap();
    let suggestions = parser.autosuggest(input, &ast, 10).unwrap();
    let completions = parser.autocomplete(&suggestions, &CandidatePools::new(["k"], Vec::<String>::new()));

    let err = autoreplace("ctrl", &completions[0]).unwrap_err();
    assert_eq!(err, CursorError::OutOfBounds { index: 5, len: 4 });
}

#[test]
fn test_suggestion_kinds_follow_tokens() {
    assert_eq!(SuggestionKind::from(TokenKind::NoteContent), SuggestionKind::NoteContent);
    assert!(RequiredDelimiters::Both.needs_left());
    assert!(RequiredDelimiters::Both.needs_right());
    assert!(!RequiredDelimiters::Left.needs_right());
    assert!(!RequiredDelimiters::None.needs_left());
}
