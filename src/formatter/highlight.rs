//! Terminal highlighting of shortcut input
//!
//! Colors each valid token by kind and marks every error token with a caret on
//! the line below the input.

use nu_ansi_term::{Color, Style};

use crate::ast::{Ast, Token, TokenKind};

/// Token highlighter for parsed input
pub struct Highlighter {
    enabled: bool,
}

impl Highlighter {
    /// Create a new highlighter
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn style(kind: TokenKind) -> Style {
        match kind {
            TokenKind::Key => Color::Cyan.bold(),
            TokenKind::Separator => Style::new().fg(Color::Yellow),
            TokenKind::NoteDelimLeft | TokenKind::NoteDelimRight => Style::new().fg(Color::Purple),
            TokenKind::NoteContent => Style::new().fg(Color::Green).italic(),
        }
    }

    /// Input with every valid token colored by kind
    ///
    /// # Arguments
    /// * `input` - Text the tree was parsed from
    /// * `ast` - Parsed tree
    ///
    /// # Returns
    /// * `String` - Highlighted input, unchanged when disabled
    pub fn highlight(&self, input: &str, ast: &Ast) -> String {
        if !self.enabled {
            return input.to_string();
        }

        let mut spans: Vec<(usize, usize, TokenKind)> = ast
            .extract_tokens()
            .into_iter()
            .filter_map(|id| match ast.token(id) {
                Token::Valid(token) => Some((token.position.start, token.position.end, token.kind)),
                Token::Error(_) => None,
            })
            .collect();
        spans.sort_by_key(|(start, _, _)| *start);

        let mut output = String::with_capacity(input.len() * 2);
        let mut cursor = 0;
        for (start, end, kind) in spans {
            if start < cursor || end > input.len() {
                continue;
            }
            output.push_str(&input[cursor..start]);
            output.push_str(&Self::style(kind).paint(&input[start..end]).to_string());
            cursor = end;
        }
        output.push_str(&input[cursor..]);
        output
    }

    /// Caret line pointing at every error token, `None` for valid trees
    pub fn error_markers(&self, input: &str, ast: &Ast) -> Option<String> {
        let mut columns: Vec<usize> = ast
            .extract_tokens()
            .into_iter()
            .filter(|id| ast.token(*id).is_error())
            .map(|id| {
                let start = ast.token(id).start().min(input.len());
                input.get(..start).map_or(start, |prefix| prefix.chars().count())
            })
            .collect();
        if columns.is_empty() {
            return None;
        }
        columns.sort_unstable();
        columns.dedup();

        let width = columns.last().map_or(0, |last| last + 1);
        let line: String = (0..width)
            .map(|col| if columns.contains(&col) { '^' } else { ' ' })
            .collect();

        if self.enabled {
            Some(Color::Red.bold().paint(line).to_string())
        } else {
            Some(line)
        }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserOptions;
    use crate::parser::Parser;

    fn parse(input: &str) -> Ast {
        Parser::new(ParserOptions::default())
            .unwrap()
            .parse(input)
            .unwrap()
    }

    #[test]
    fn test_disabled_highlight_is_identity() {
        let input = " ctrl+k  x ";
        let ast = parse(input);
        assert_eq!(Highlighter::new(false).highlight(input, &ast), input);
    }

    #[test]
    fn test_highlight_keeps_text() {
        let input = "ctrl+k x";
        let ast = parse(input);
        let output = Highlighter::new(true).highlight(input, &ast);
        assert!(output.contains("\x1b["));
        assert!(output.contains("ctrl"));
        assert!(output.contains(' '));
    }

    #[test]
    fn test_error_markers() {
        let highlighter = Highlighter::new(false);

        let ast = parse("ctrl+k");
        assert_eq!(highlighter.error_markers("ctrl+k", &ast), None);

        let ast = parse("+a+");
        assert_eq!(
            highlighter.error_markers("+a+", &ast),
            Some("^  ^".to_string())
        );
    }
}
