//! Bundled tokenizers.
//!
//! These are ordinary [`Tokenizer`](super::tokenizer::Tokenizer)
//! implementations; the highlighter treats them exactly like a tokenizer
//! supplied by the embedding editor.

mod c_family;
mod plain;
mod python;

pub use c_family::{CFamilyTokenizer, CSyntax};
pub use plain::PlainTextTokenizer;
pub use python::PythonTokenizer;

use super::token::TokenKind;

/// Char cursor over one line, tracking the byte offset of the next char.
#[derive(Clone, Debug)]
pub(crate) struct Scanner<'a> {
    line: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub(crate) const fn new(line: &'a str) -> Self {
        Self { line, pos: 0 }
    }

    pub(crate) const fn pos(&self) -> usize {
        self.pos
    }

    pub(crate) fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    pub(crate) const fn is_done(&self) -> bool {
        self.pos >= self.line.len()
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume `prefix` if the rest of the line starts with it.
    pub(crate) fn eat(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_while(&mut self, mut pred: impl FnMut(char) -> bool) -> usize {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
        self.pos - start
    }

    /// Advance past the first occurrence of `needle`; false (at end) if absent.
    pub(crate) fn skip_past(&mut self, needle: &str) -> bool {
        if let Some(idx) = self.rest().find(needle) {
            self.pos += idx + needle.len();
            true
        } else {
            self.finish();
            false
        }
    }

    pub(crate) const fn finish(&mut self) {
        self.pos = self.line.len();
    }

    /// Scan a quoted body up to and including `quote`, honoring backslash
    /// escapes. Returns false when the line ends first.
    pub(crate) fn quoted(&mut self, quote: char) -> bool {
        while let Some(ch) = self.bump() {
            if ch == '\\' {
                self.bump();
            } else if ch == quote {
                return true;
            }
        }
        false
    }

    /// Scan a numeric literal: digits, radix prefixes, separators, suffixes
    /// and a single fractional part.
    pub(crate) fn number(&mut self) {
        self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        if self.peek() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.eat_while(|c| c.is_ascii_alphanumeric() || c == '_');
        }
    }

    pub(crate) fn identifier(&mut self, extra: &[char]) -> &'a str {
        let start = self.pos;
        self.eat_while(|c| c.is_alphanumeric() || c == '_' || extra.contains(&c));
        &self.line[start..self.pos]
    }
}

pub(crate) fn is_ident_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_'
}

/// Kind for an operator or punctuation char; `None` for chars no bundled
/// grammar accepts.
pub(crate) const fn symbol_kind(ch: char) -> Option<TokenKind> {
    match ch {
        '+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' | '!' | '&' | '|' | '^' | '~' | '?' => {
            Some(TokenKind::Operator)
        }
        ':' | ',' | ';' | '.' => Some(TokenKind::Punctuation),
        '(' | ')' | '[' | ']' | '{' | '}' => Some(TokenKind::Delimiter),
        _ => None,
    }
}

/// Identifier heuristics shared by the bundled grammars.
pub(crate) fn identifier_kind(word: &str, next: Option<char>) -> TokenKind {
    if next == Some('(') {
        return TokenKind::Function;
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) if first.is_uppercase() => {
            if word.len() > 1 && !word.chars().any(char::is_lowercase) {
                TokenKind::Constant
            } else {
                TokenKind::Type
            }
        }
        _ => TokenKind::Identifier,
    }
}
