//! Tokenizer trait, line state, and the span stream fed to the classifier.
//!
//! A [`Tokenizer`] is the pluggable lexical-analysis collaborator: it turns
//! one line plus the state left by the previous line into byte-range tokens.
//! [`TokenStream`] lifts that into a lazy sequence of `(kind, text)` spans over
//! a multi-line chunk, with line breaks emitted as their own `"\n"` spans and
//! gaps between tokens filled, so concatenating the span texts reproduces the
//! chunk exactly.

use std::collections::VecDeque;

use super::token::{Token, TokenKind, TokenSpan};

/// Lexical state carried across lines for incremental tokenization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LineState {
    #[default]
    Normal,
    InString(StringKind),
    InComment(CommentKind),
    InRawString(u8),
}

impl LineState {
    /// True while inside a construct that spans line breaks.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StringKind {
    Double,
    Single,
    Backtick,
    TripleDouble,
    TripleSingle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommentKind {
    Block,
    Doc,
    Nested(u8),
}

/// Core tokenizer abstraction for syntax highlighting.
///
/// Implementations must be deterministic for a fixed input and must not need
/// text beyond the line they are given.
pub trait Tokenizer: Send + Sync {
    /// Human-readable name of this tokenizer.
    fn name(&self) -> &'static str;

    /// File extensions this tokenizer handles (e.g., `rs`, `rust`).
    fn extensions(&self) -> &'static [&'static str];

    /// Exact file names this tokenizer handles (e.g., `SConstruct`).
    fn filenames(&self) -> &'static [&'static str] {
        &[]
    }

    /// Confidence in `0..=100` that `sample` is written in this language.
    ///
    /// Used when the file name is not conclusive; zero opts out.
    fn sniff(&self, _sample: &str) -> u8 {
        0
    }

    /// Tokenize a single line given the state from the previous line.
    /// Returns: (tokens, state_at_end_of_line).
    fn tokenize_line(&self, line: &str, state: LineState) -> (Vec<Token>, LineState);
}

/// Lazy `(kind, text)` span sequence over a `\n`-separated chunk.
///
/// Lines are tokenized one at a time as the consumer pulls spans. The last
/// span of a line that ends inside an open construct, and the line break
/// after it, are marked [`TokenSpan::continues`].
pub struct TokenStream<'a> {
    tokenizer: &'a dyn Tokenizer,
    lines: std::str::Split<'a, char>,
    state: LineState,
    open_kind: Option<TokenKind>,
    pending: VecDeque<TokenSpan<'a>>,
    started: bool,
}

impl<'a> TokenStream<'a> {
    #[must_use]
    pub fn new(tokenizer: &'a dyn Tokenizer, text: &'a str) -> Self {
        Self {
            tokenizer,
            lines: text.split('\n'),
            state: LineState::Normal,
            open_kind: None,
            pending: VecDeque::new(),
            started: false,
        }
    }

    fn queue_line(&mut self, line: &'a str) {
        if self.started {
            let newline = match self.open_kind {
                Some(kind) => TokenSpan::new(kind, "\n").continuing(),
                None => TokenSpan::new(TokenKind::Whitespace, "\n"),
            };
            self.pending.push_back(newline);
        }
        self.started = true;

        let (tokens, state) = self.tokenizer.tokenize_line(line, self.state);
        let first = self.pending.len();
        let mut pos = 0usize;
        for token in tokens {
            let Some(text) = line.get(token.range()) else {
                continue;
            };
            if token.start < pos || text.is_empty() {
                continue;
            }
            if token.start > pos {
                self.pending.push_back(gap(&line[pos..token.start]));
            }
            self.pending.push_back(TokenSpan::new(token.kind, text));
            pos = token.end;
        }
        if pos < line.len() {
            self.pending.push_back(gap(&line[pos..]));
        }

        self.state = state;
        if state.is_open() {
            if self.pending.len() > first {
                if let Some(last) = self.pending.back_mut() {
                    last.continues = true;
                    self.open_kind = Some(last.kind);
                }
            } else if self.open_kind.is_none() {
                self.open_kind = Some(TokenKind::Text);
            }
        } else {
            self.open_kind = None;
        }
    }
}

fn gap(text: &str) -> TokenSpan<'_> {
    let kind = if text.chars().all(char::is_whitespace) {
        TokenKind::Whitespace
    } else {
        TokenKind::Text
    };
    TokenSpan::new(kind, text)
}

impl<'a> Iterator for TokenStream<'a> {
    type Item = TokenSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(span) = self.pending.pop_front() {
                return Some(span);
            }
            let line = self.lines.next()?;
            self.queue_line(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubTokenizer;

    impl Tokenizer for StubTokenizer {
        fn name(&self) -> &'static str {
            "Stub"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &["stub"]
        }

        fn tokenize_line(&self, line: &str, state: LineState) -> (Vec<Token>, LineState) {
            let span = Token::new(TokenKind::Text, 0, line.len());
            (vec![span], state)
        }
    }

    /// `{` opens a block that `}` closes, possibly lines later.
    struct BraceTokenizer;

    impl Tokenizer for BraceTokenizer {
        fn name(&self) -> &'static str {
            "Brace"
        }

        fn extensions(&self) -> &'static [&'static str] {
            &[]
        }

        fn tokenize_line(&self, line: &str, state: LineState) -> (Vec<Token>, LineState) {
            let mut tokens = Vec::new();
            let mut open = state.is_open();
            let mut start = 0;
            for (idx, ch) in line.char_indices() {
                match ch {
                    '{' if !open => {
                        open = true;
                        start = idx;
                    }
                    '}' if open => {
                        tokens.push(Token::new(TokenKind::CommentBlock, start, idx + 1));
                        open = false;
                    }
                    'a'..='z' if !open => tokens.push(Token::new(TokenKind::Keyword, idx, idx + 1)),
                    _ => {}
                }
            }
            if open {
                tokens.push(Token::new(TokenKind::CommentBlock, start, line.len()));
                return (tokens, LineState::InComment(CommentKind::Block));
            }
            (tokens, LineState::Normal)
        }
    }

    fn collect<'a>(tokenizer: &'a dyn Tokenizer, text: &'a str) -> Vec<TokenSpan<'a>> {
        TokenStream::new(tokenizer, text).collect()
    }

    #[test]
    fn line_state_default_is_normal() {
        assert_eq!(LineState::default(), LineState::Normal);
        assert!(!LineState::Normal.is_open());
        assert!(LineState::InString(StringKind::TripleDouble).is_open());
        assert!(LineState::InComment(CommentKind::Nested(2)).is_open());
        assert!(LineState::InRawString(1).is_open());
    }

    #[test]
    fn stream_reproduces_text_exactly() {
        let text = "a {b\n\n c} d\nx";
        let joined: String = collect(&BraceTokenizer, text)
            .iter()
            .map(|span| span.text)
            .collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn stream_emits_line_breaks_as_spans() {
        let spans = collect(&StubTokenizer, "ab\n\ncd");
        let texts: Vec<_> = spans.iter().map(|span| span.text).collect();
        assert_eq!(texts, vec!["ab", "\n", "\n", "cd"]);
        assert!(spans.iter().all(|span| !span.continues));
        assert_eq!(spans[1].kind, TokenKind::Whitespace);
    }

    #[test]
    fn stream_fills_gaps_between_tokens() {
        let spans = collect(&BraceTokenizer, "a  b");
        let kinds: Vec<_> = spans.iter().map(|span| (span.kind, span.text)).collect();
        assert_eq!(
            kinds,
            vec![
                (TokenKind::Keyword, "a"),
                (TokenKind::Whitespace, "  "),
                (TokenKind::Keyword, "b"),
            ]
        );
    }

    #[test]
    fn stream_marks_open_constructs_as_continuing() {
        let spans = collect(&BraceTokenizer, "a {x\n\ny} b");
        let flags: Vec<_> = spans
            .iter()
            .map(|span| (span.text, span.kind, span.continues))
            .collect();
        assert_eq!(
            flags,
            vec![
                ("a", TokenKind::Keyword, false),
                (" ", TokenKind::Whitespace, false),
                ("{x", TokenKind::CommentBlock, true),
                ("\n", TokenKind::CommentBlock, true),
                ("\n", TokenKind::CommentBlock, true),
                ("y}", TokenKind::CommentBlock, false),
                (" ", TokenKind::Whitespace, false),
                ("b", TokenKind::Keyword, false),
            ]
        );
    }

    #[test]
    fn stream_skips_malformed_tokens() {
        struct Sloppy;
        impl Tokenizer for Sloppy {
            fn name(&self) -> &'static str {
                "Sloppy"
            }
            fn extensions(&self) -> &'static [&'static str] {
                &[]
            }
            fn tokenize_line(&self, line: &str, state: LineState) -> (Vec<Token>, LineState) {
                let tokens = vec![
                    Token::new(TokenKind::Keyword, 0, 2),
                    Token::new(TokenKind::Number, 1, 3),
                    Token::new(TokenKind::String, 2, line.len() + 5),
                ];
                (tokens, state)
            }
        }
        let joined: String = collect(&Sloppy, "héllo").iter().map(|s| s.text).collect();
        assert_eq!(joined, "héllo");
    }

    #[test]
    fn tokenizer_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StubTokenizer>();
    }
}
