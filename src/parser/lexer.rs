//! Shortcut lexer
//!
//! Splits shortcut text into whitespace, keys, separators and note parts under
//! a resolved [`Syntax`]. Like the grammar built on top of it, the lexer never
//! rejects input: every string produces a token stream covering all of it.
//!
//! # Modes
//!
//! - **Main mode** - separators, whitespace runs, key runs (with `\` escaping
//!   the next character) and note delimiters
//! - **Note mode** - entered after a left delimiter; everything up to the next
//!   right delimiter is note content, whitespace and separators included
//!
//! Spans are byte offsets into the input.

use std::ops::Range;

use crate::config::Syntax;

/// Lexical token kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexKind {
    Whitespace,
    Key,
    Separator,
    NoteDelimLeft,
    NoteDelimRight,
    NoteContent,
}

/// Token with position information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexToken {
    pub kind: LexKind,
    pub text: String,
    pub span: Range<usize>,
}

impl LexToken {
    /// Create a new token
    pub fn new(kind: LexKind, text: &str, span: Range<usize>) -> Self {
        Self {
            kind,
            text: text.to_string(),
            span,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Main,
    Note,
}

/// Shortcut lexer over one input
pub struct ShortcutLexer<'a> {
    input: &'a str,
    chars: Vec<(usize, char)>,
    pos: usize,
    mode: Mode,
    syntax: &'a Syntax,
}

impl<'a> ShortcutLexer<'a> {
    /// Create a new lexer from input string
    pub fn new(input: &'a str, syntax: &'a Syntax) -> Self {
        Self {
            input,
            chars: input.char_indices().collect(),
            pos: 0,
            mode: Mode::Main,
            syntax,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(input: &str, syntax: &Syntax) -> Vec<LexToken> {
        let mut lexer = ShortcutLexer::new(input, syntax);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token() {
            tokens.push(token);
        }
        tokens
    }

    /// Get the next token, `None` at the end of input
    fn next_token(&mut self) -> Option<LexToken> {
        if self.is_at_end() {
            return None;
        }

        match self.mode {
            Mode::Main => Some(self.scan_main()),
            Mode::Note => Some(self.scan_note()),
        }
    }

    fn scan_main(&mut self) -> LexToken {
        let start = self.offset();
        let ch = self.current_char();

        if self.syntax.is_separator(ch) {
            self.advance();
            return self.token(LexKind::Separator, start);
        }

        if ch.is_whitespace() {
            while !self.is_at_end() && self.current_char().is_whitespace() {
                self.advance();
            }
            return self.token(LexKind::Whitespace, start);
        }

        if let Some(notes) = self.syntax.notes() {
            if ch == notes.left {
                self.advance();
                self.mode = Mode::Note;
                return self.token(LexKind::NoteDelimLeft, start);
            }
            if ch == notes.right {
                self.advance();
                return self.token(LexKind::NoteDelimRight, start);
            }
        }

        self.scan_key(start)
    }

    /// Scan a key run, `\` consumes the following character
    fn scan_key(&mut self, start: usize) -> LexToken {
        while !self.is_at_end() {
            let ch = self.current_char();
            if ch == '\\' {
                self.advance();
                self.advance();
            } else if ch.is_whitespace() || self.syntax.is_separator(ch) || self.syntax.is_delimiter(ch)
            {
                break;
            } else {
                self.advance();
            }
        }
        self.token(LexKind::Key, start)
    }

    fn scan_note(&mut self) -> LexToken {
        let start = self.offset();
        let right = self.syntax.notes().map(|notes| notes.right);

        if Some(self.current_char()) == right {
            self.advance();
            self.mode = Mode::Main;
            return self.token(LexKind::NoteDelimRight, start);
        }

        while !self.is_at_end() && Some(self.current_char()) != right {
            self.advance();
        }
        self.token(LexKind::NoteContent, start)
    }

    fn token(&self, kind: LexKind, start: usize) -> LexToken {
        let end = self.offset();
        LexToken::new(kind, &self.input[start..end], start..end)
    }

    /// Byte offset of the current character
    fn offset(&self) -> usize {
        self.chars
            .get(self.pos)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.input.len())
    }

    /// Get current character
    fn current_char(&self) -> char {
        self.chars.get(self.pos).map(|(_, ch)| *ch).unwrap_or('\0')
    }

    /// Advance position
    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    /// Check if at end of input
    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NoteOptions, ParserOptions};

    fn notes_syntax() -> Syntax {
        Syntax::resolve(&ParserOptions::default().with_notes(NoteOptions::default())).unwrap()
    }

    fn kinds(tokens: &[LexToken]) -> Vec<LexKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_tokenize_combo() {
        let tokens = ShortcutLexer::tokenize("ctrl+k", &Syntax::default());
        assert_eq!(
            kinds(&tokens),
            vec![LexKind::Key, LexKind::Separator, LexKind::Key]
        );
        assert_eq!(tokens[0].span, 0..4);
        assert_eq!(tokens[2].text, "k");
    }

    #[test]
    fn test_tokenize_whitespace_runs() {
        let tokens = ShortcutLexer::tokenize("  a \t b ", &Syntax::default());
        assert_eq!(
            kinds(&tokens),
            vec![
                LexKind::Whitespace,
                LexKind::Key,
                LexKind::Whitespace,
                LexKind::Key,
                LexKind::Whitespace
            ]
        );
        assert_eq!(tokens[2].span, 3..6);
    }

    #[test]
    fn test_escaped_separator_is_part_of_key() {
        let tokens = ShortcutLexer::tokenize(r"key\+ a\ b", &Syntax::default());
        assert_eq!(tokens[0].text, r"key\+");
        assert_eq!(tokens[2].text, r"a\ b");
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_trailing_backslash_is_kept() {
        let tokens = ShortcutLexer::tokenize("a\\", &Syntax::default());
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "a\\");
    }

    #[test]
    fn test_delimiters_are_keys_without_notes() {
        let tokens = ShortcutLexer::tokenize("key(note)", &Syntax::default());
        assert_eq!(kinds(&tokens), vec![LexKind::Key]);
    }

    #[test]
    fn test_note_mode() {
        let tokens = ShortcutLexer::tokenize("key(a+b c)+x", &notes_syntax());
        assert_eq!(
            kinds(&tokens),
            vec![
                LexKind::Key,
                LexKind::NoteDelimLeft,
                LexKind::NoteContent,
                LexKind::NoteDelimRight,
                LexKind::Separator,
                LexKind::Key
            ]
        );
        assert_eq!(tokens[2].text, "a+b c");
    }

    #[test]
    fn test_unterminated_note_runs_to_end() {
        let tokens = ShortcutLexer::tokenize("key(note note (", &notes_syntax());
        assert_eq!(
            kinds(&tokens),
            vec![LexKind::Key, LexKind::NoteDelimLeft, LexKind::NoteContent]
        );
        assert_eq!(tokens[2].text, "note note (");
    }

    #[test]
    fn test_multibyte_spans_are_bytes() {
        let tokens = ShortcutLexer::tokenize("é+ß", &Syntax::default());
        assert_eq!(tokens[0].span, 0..2);
        assert_eq!(tokens[1].span, 2..3);
        assert_eq!(tokens[2].span, 3..5);
    }
}
