use crate::highlight::token::{Token, TokenKind};
use crate::highlight::tokenizer::{LineState, Tokenizer};

/// Fallback tokenizer: every non-blank line is a single [`TokenKind::Text`]
/// token. Blank lines produce no tokens and read as whitespace.
#[derive(Clone, Copy, Debug, Default)]
pub struct PlainTextTokenizer;

impl PlainTextTokenizer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Tokenizer for PlainTextTokenizer {
    fn name(&self) -> &'static str {
        "Text"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["txt", "text", "log"]
    }

    fn tokenize_line(&self, line: &str, _state: LineState) -> (Vec<Token>, LineState) {
        if line.trim().is_empty() {
            return (Vec::new(), LineState::Normal);
        }
        (
            vec![Token::new(TokenKind::Text, 0, line.len())],
            LineState::Normal,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_line_is_text() {
        let (tokens, state) = PlainTextTokenizer.tokenize_line("/* not a comment", LineState::Normal);
        assert_eq!(tokens, vec![Token::new(TokenKind::Text, 0, 16)]);
        assert_eq!(state, LineState::Normal);
    }

    #[test]
    fn blank_lines_have_no_tokens() {
        let (tokens, _) = PlainTextTokenizer.tokenize_line("", LineState::Normal);
        assert!(tokens.is_empty());
        let (tokens, _) = PlainTextTokenizer.tokenize_line(" \t ", LineState::Normal);
        assert!(tokens.is_empty());
    }

    #[test]
    fn never_sniffs() {
        assert_eq!(PlainTextTokenizer.sniff("fn main() {}"), 0);
    }
}
