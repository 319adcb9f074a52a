//! Table-driven tokenizer for brace languages (Rust, C, JavaScript).

use super::{Scanner, identifier_kind, is_ident_start, symbol_kind};
use crate::highlight::token::{Token, TokenKind};
use crate::highlight::tokenizer::{CommentKind, LineState, StringKind, Tokenizer};

/// Lexical rules for one C-family language.
#[derive(Debug)]
pub struct CSyntax {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub filenames: &'static [&'static str],
    pub keywords: &'static [&'static str],
    pub control: &'static [&'static str],
    pub types: &'static [&'static str],
    pub modifiers: &'static [&'static str],
    pub constants: &'static [&'static str],
    /// `/* /* */ */` nests.
    pub nested_comments: bool,
    /// `///`, `//!` and `/** */` are doc comments.
    pub doc_comments: bool,
    /// Plain double-quoted strings may span lines.
    pub multiline_strings: bool,
    /// `` `template` `` strings, which always may span lines.
    pub backtick_strings: bool,
    /// `r"..."` / `r#"..."#`.
    pub raw_strings: bool,
    /// `'a` lifetimes and `name!` macros.
    pub lifetimes: bool,
    /// `#[...]` attributes.
    pub attributes: bool,
    /// `#include` style directives.
    pub preprocessor: bool,
    /// `$` is an identifier char.
    pub dollar_idents: bool,
    /// Substrings that suggest this language when sniffing content.
    pub markers: &'static [&'static str],
}

pub static RUST: CSyntax = CSyntax {
    name: "Rust",
    extensions: &["rs"],
    filenames: &[],
    keywords: &[
        "fn", "let", "const", "static", "struct", "enum", "trait", "impl", "type", "mod", "use",
        "crate", "self", "Self", "super", "where", "as", "in",
    ],
    control: &[
        "if", "else", "match", "loop", "while", "for", "break", "continue", "return",
    ],
    types: &[
        "bool", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64", "i128",
        "isize", "f32", "f64", "char", "str", "String", "Vec", "Option", "Result",
    ],
    modifiers: &[
        "pub", "mut", "ref", "move", "async", "await", "unsafe", "extern", "dyn",
    ],
    constants: &["true", "false"],
    nested_comments: true,
    doc_comments: true,
    multiline_strings: true,
    backtick_strings: false,
    raw_strings: true,
    lifetimes: true,
    attributes: true,
    preprocessor: false,
    dollar_idents: false,
    markers: &["fn ", "let mut ", "impl ", "pub fn", "use std::", "-> "],
};

pub static C: CSyntax = CSyntax {
    name: "C",
    extensions: &["c", "h", "cc", "cpp", "hpp", "cxx"],
    filenames: &[],
    keywords: &[
        "struct", "union", "enum", "typedef", "sizeof", "namespace", "class", "template",
        "using", "new", "delete",
    ],
    control: &[
        "if", "else", "switch", "case", "default", "while", "do", "for", "break", "continue",
        "return", "goto",
    ],
    types: &[
        "void", "char", "short", "int", "long", "float", "double", "signed", "unsigned",
        "bool", "size_t",
    ],
    modifiers: &[
        "static", "const", "extern", "volatile", "register", "inline", "auto",
    ],
    constants: &["true", "false", "NULL", "nullptr"],
    nested_comments: false,
    doc_comments: false,
    multiline_strings: false,
    backtick_strings: false,
    raw_strings: false,
    lifetimes: false,
    attributes: false,
    preprocessor: true,
    dollar_idents: false,
    markers: &["#include", "int main", "printf(", "->", "NULL"],
};

pub static JAVASCRIPT: CSyntax = CSyntax {
    name: "JavaScript",
    extensions: &["js", "mjs", "cjs", "jsx", "ts", "tsx"],
    filenames: &[],
    keywords: &[
        "function", "var", "let", "const", "class", "extends", "new", "delete", "typeof",
        "instanceof", "in", "of", "import", "export", "from", "this", "super", "void",
    ],
    control: &[
        "if", "else", "switch", "case", "default", "while", "do", "for", "break", "continue",
        "return", "throw", "try", "catch", "finally", "yield",
    ],
    types: &["number", "string", "boolean", "object", "any", "unknown"],
    modifiers: &["async", "await", "static", "get", "set"],
    constants: &["true", "false", "null", "undefined", "NaN"],
    nested_comments: false,
    doc_comments: true,
    multiline_strings: false,
    backtick_strings: true,
    raw_strings: false,
    lifetimes: false,
    attributes: false,
    preprocessor: false,
    dollar_idents: true,
    markers: &["function ", "const ", "=> ", "console.", "require("],
};

/// Tokenizer for a C-family grammar described by a [`CSyntax`] table.
#[derive(Clone, Copy, Debug)]
pub struct CFamilyTokenizer {
    syntax: &'static CSyntax,
}

impl CFamilyTokenizer {
    #[must_use]
    pub const fn new(syntax: &'static CSyntax) -> Self {
        Self { syntax }
    }

    #[must_use]
    pub const fn rust() -> Self {
        Self::new(&RUST)
    }

    #[must_use]
    pub const fn c() -> Self {
        Self::new(&C)
    }

    #[must_use]
    pub const fn javascript() -> Self {
        Self::new(&JAVASCRIPT)
    }

    #[must_use]
    pub const fn syntax(&self) -> &'static CSyntax {
        self.syntax
    }

    fn word_kind(&self, word: &str, next: Option<char>) -> TokenKind {
        let s = self.syntax;
        if s.control.contains(&word) {
            TokenKind::KeywordControl
        } else if s.keywords.contains(&word) {
            TokenKind::Keyword
        } else if s.modifiers.contains(&word) {
            TokenKind::KeywordModifier
        } else if s.types.contains(&word) {
            TokenKind::KeywordType
        } else if s.constants.contains(&word) {
            if word == "true" || word == "false" {
                TokenKind::Boolean
            } else {
                TokenKind::Constant
            }
        } else if s.lifetimes && next == Some('!') {
            TokenKind::Macro
        } else {
            identifier_kind(word, next)
        }
    }

    const fn string_kind(quote: char) -> StringKind {
        match quote {
            '\'' => StringKind::Single,
            '`' => StringKind::Backtick,
            _ => StringKind::Double,
        }
    }

    const fn quote_char(kind: StringKind) -> char {
        match kind {
            StringKind::Single | StringKind::TripleSingle => '\'',
            StringKind::Backtick => '`',
            StringKind::Double | StringKind::TripleDouble => '"',
        }
    }

    /// Whether an unterminated string of `kind` carries over to the next line.
    fn string_carries(&self, kind: StringKind, line: &str) -> bool {
        match kind {
            StringKind::Backtick => true,
            StringKind::Double if self.syntax.multiline_strings => true,
            _ => line.ends_with('\\'),
        }
    }

    /// Consume a block comment body; returns the depth still open at line end.
    fn block_comment(&self, sc: &mut Scanner<'_>, mut depth: u8) -> Option<u8> {
        while !sc.is_done() {
            if sc.eat("*/") {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return None;
                }
            } else if self.syntax.nested_comments && sc.eat("/*") {
                depth = depth.saturating_add(1);
            } else {
                sc.bump();
            }
        }
        Some(depth)
    }

    fn comment_state(&self, depth: u8, doc: bool) -> LineState {
        if self.syntax.nested_comments {
            LineState::InComment(CommentKind::Nested(depth))
        } else if doc {
            LineState::InComment(CommentKind::Doc)
        } else {
            LineState::InComment(CommentKind::Block)
        }
    }

    fn raw_terminator(hashes: u8) -> String {
        let mut end = String::from("\"");
        end.extend(std::iter::repeat_n('#', usize::from(hashes)));
        end
    }

    /// Continue a construct left open by the previous line. Returns the state
    /// to end this line with when the construct is still open.
    fn resume(
        &self,
        sc: &mut Scanner<'_>,
        line: &str,
        state: LineState,
        tokens: &mut Vec<Token>,
    ) -> Option<LineState> {
        match state {
            LineState::Normal => None,
            LineState::InComment(kind) => {
                let depth = match kind {
                    CommentKind::Nested(depth) => depth.max(1),
                    CommentKind::Block | CommentKind::Doc => 1,
                };
                let token_kind = if kind == CommentKind::Doc {
                    TokenKind::CommentDoc
                } else {
                    TokenKind::CommentBlock
                };
                let open = self.block_comment(sc, depth);
                tokens.push(Token::new(token_kind, 0, sc.pos()));
                open.map(|depth| self.comment_state(depth, kind == CommentKind::Doc))
            }
            LineState::InString(kind) => {
                if sc.quoted(Self::quote_char(kind)) {
                    tokens.push(Token::new(TokenKind::String, 0, sc.pos()));
                    None
                } else if self.string_carries(kind, line) {
                    tokens.push(Token::new(TokenKind::String, 0, line.len()));
                    Some(state)
                } else {
                    tokens.push(Token::new(TokenKind::Error, 0, line.len()));
                    None
                }
            }
            LineState::InRawString(hashes) => {
                let closed = sc.skip_past(&Self::raw_terminator(hashes));
                tokens.push(Token::new(TokenKind::String, 0, sc.pos()));
                (!closed).then_some(state)
            }
        }
    }

    /// `'a'`, `'\n'` char literals versus `'a` lifetimes.
    fn quote_or_lifetime(&self, sc: &mut Scanner<'_>, start: usize) -> Token {
        let is_char = matches!(
            (sc.peek_nth(1), sc.peek_nth(2)),
            (Some('\\'), _) | (Some(_), Some('\''))
        );
        if self.syntax.lifetimes && !is_char {
            sc.bump();
            if sc.peek().is_some_and(is_ident_start) {
                sc.identifier(&[]);
                return Token::new(TokenKind::Lifetime, start, sc.pos());
            }
            return Token::new(TokenKind::Error, start, sc.pos());
        }
        sc.bump();
        if sc.quoted('\'') {
            Token::new(TokenKind::String, start, sc.pos())
        } else {
            Token::new(TokenKind::Error, start, sc.pos())
        }
    }

    /// `#[...]` or `#![...]`, bracket-balanced within the line.
    fn attribute(sc: &mut Scanner<'_>) {
        let mut depth = 0usize;
        while let Some(ch) = sc.bump() {
            match ch {
                '[' => depth += 1,
                ']' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return;
                    }
                }
                '"' => {
                    sc.quoted('"');
                }
                _ => {}
            }
        }
    }

    /// Raw string opener `r"`, `r#"`, ... at the scanner; returns its hash count.
    fn raw_string_hashes(sc: &Scanner<'_>) -> Option<u8> {
        let after = sc.rest().strip_prefix('r')?;
        let hashes = after.bytes().take_while(|b| *b == b'#').count();
        after[hashes..]
            .starts_with('"')
            .then(|| u8::try_from(hashes).unwrap_or(u8::MAX))
    }
}

impl Tokenizer for CFamilyTokenizer {
    fn name(&self) -> &'static str {
        self.syntax.name
    }

    fn extensions(&self) -> &'static [&'static str] {
        self.syntax.extensions
    }

    fn filenames(&self) -> &'static [&'static str] {
        self.syntax.filenames
    }

    fn sniff(&self, sample: &str) -> u8 {
        let hits = self
            .syntax
            .markers
            .iter()
            .filter(|marker| sample.contains(*marker))
            .count();
        u8::try_from(hits.saturating_mul(20).min(90)).unwrap_or(90)
    }

    #[allow(clippy::too_many_lines)]
    fn tokenize_line(&self, line: &str, state: LineState) -> (Vec<Token>, LineState) {
        let mut tokens = Vec::new();
        let mut sc = Scanner::new(line);
        let s = self.syntax;

        if let Some(open) = self.resume(&mut sc, line, state, &mut tokens) {
            return (tokens, open);
        }

        if s.preprocessor && line.trim_start().starts_with('#') {
            let start = line.len() - line.trim_start().len();
            tokens.push(Token::new(TokenKind::Attribute, start, line.len()));
            return (tokens, LineState::Normal);
        }

        while let Some(ch) = sc.peek() {
            let start = sc.pos();

            if ch.is_whitespace() {
                sc.eat_while(char::is_whitespace);
                continue;
            }

            if sc.rest().starts_with("//") {
                let rest = sc.rest();
                let kind = if s.doc_comments
                    && (rest.starts_with("///") || rest.starts_with("//!"))
                    && !rest.starts_with("////")
                {
                    TokenKind::CommentDoc
                } else {
                    TokenKind::Comment
                };
                tokens.push(Token::new(kind, start, line.len()));
                break;
            }

            if sc.eat("/*") {
                let rest = sc.rest();
                let doc = s.doc_comments
                    && ((rest.starts_with('*') && !rest.starts_with("*/")) || rest.starts_with('!'));
                let kind = if doc {
                    TokenKind::CommentDoc
                } else {
                    TokenKind::CommentBlock
                };
                let open = self.block_comment(&mut sc, 1);
                tokens.push(Token::new(kind, start, sc.pos()));
                if let Some(depth) = open {
                    return (tokens, self.comment_state(depth, doc));
                }
                continue;
            }

            if s.raw_strings {
                if let Some(hashes) = Self::raw_string_hashes(&sc) {
                    sc.eat("r");
                    sc.eat_while(|c| c == '#');
                    sc.bump();
                    let closed = sc.skip_past(&Self::raw_terminator(hashes));
                    tokens.push(Token::new(TokenKind::String, start, sc.pos()));
                    if !closed {
                        return (tokens, LineState::InRawString(hashes));
                    }
                    continue;
                }
            }

            if ch == '"' || (ch == '`' && s.backtick_strings) {
                sc.bump();
                if sc.quoted(ch) {
                    tokens.push(Token::new(TokenKind::String, start, sc.pos()));
                    continue;
                }
                let kind = Self::string_kind(ch);
                if self.string_carries(kind, line) {
                    tokens.push(Token::new(TokenKind::String, start, line.len()));
                    return (tokens, LineState::InString(kind));
                }
                tokens.push(Token::new(TokenKind::Error, start, line.len()));
                break;
            }

            if ch == '\'' {
                if s.lifetimes {
                    let token = self.quote_or_lifetime(&mut sc, start);
                    tokens.push(token);
                    continue;
                }
                sc.bump();
                let kind = if sc.quoted('\'') {
                    TokenKind::String
                } else if self.string_carries(StringKind::Single, line) {
                    tokens.push(Token::new(TokenKind::String, start, line.len()));
                    return (tokens, LineState::InString(StringKind::Single));
                } else {
                    TokenKind::Error
                };
                tokens.push(Token::new(kind, start, sc.pos()));
                continue;
            }

            if s.attributes && (sc.rest().starts_with("#[") || sc.rest().starts_with("#![")) {
                Self::attribute(&mut sc);
                tokens.push(Token::new(TokenKind::Attribute, start, sc.pos()));
                continue;
            }

            if ch.is_ascii_digit() {
                sc.number();
                tokens.push(Token::new(TokenKind::Number, start, sc.pos()));
                continue;
            }

            if is_ident_start(ch) || (s.dollar_idents && ch == '$') {
                let extra: &[char] = if s.dollar_idents { &['$'] } else { &[] };
                let word = sc.identifier(extra);
                let kind = self.word_kind(word, sc.peek());
                tokens.push(Token::new(kind, start, sc.pos()));
                continue;
            }

            sc.bump();
            let kind = match ch {
                '#' | '@' if !s.preprocessor => TokenKind::Punctuation,
                _ => symbol_kind(ch).unwrap_or(TokenKind::Error),
            };
            tokens.push(Token::new(kind, start, sc.pos()));
        }

        (tokens, LineState::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokenizer: &CFamilyTokenizer, line: &str) -> Vec<(TokenKind, String)> {
        let (tokens, _) = tokenizer.tokenize_line(line, LineState::Normal);
        tokens
            .into_iter()
            .map(|t| (t.kind, line[t.range()].to_string()))
            .collect()
    }

    #[test]
    fn rust_keywords_and_functions() {
        let toks = kinds(&CFamilyTokenizer::rust(), "pub fn main() -> u32 {");
        assert_eq!(toks[0], (TokenKind::KeywordModifier, "pub".into()));
        assert_eq!(toks[1], (TokenKind::Keyword, "fn".into()));
        assert_eq!(toks[2], (TokenKind::Function, "main".into()));
        assert!(toks.contains(&(TokenKind::KeywordType, "u32".into())));
        assert_eq!(toks.last(), Some(&(TokenKind::Delimiter, "{".into())));
    }

    #[test]
    fn rust_macro_lifetime_and_char() {
        let toks = kinds(&CFamilyTokenizer::rust(), "println!(\"{}\", 'x'); fn f<'a>()");
        assert_eq!(toks[0], (TokenKind::Macro, "println".into()));
        assert!(toks.contains(&(TokenKind::String, "\"{}\"".into())));
        assert!(toks.contains(&(TokenKind::String, "'x'".into())));
        assert!(toks.contains(&(TokenKind::Lifetime, "'a".into())));
    }

    #[test]
    fn rust_attribute_and_doc_comment() {
        let toks = kinds(&CFamilyTokenizer::rust(), "#[derive(Debug)] /// docs");
        assert_eq!(toks[0], (TokenKind::Attribute, "#[derive(Debug)]".into()));
        assert_eq!(toks[1], (TokenKind::CommentDoc, "/// docs".into()));
    }

    #[test]
    fn block_comment_spans_lines() {
        let t = CFamilyTokenizer::c();
        let (tokens, state) = t.tokenize_line("int x; /* start", LineState::Normal);
        assert_eq!(state, LineState::InComment(CommentKind::Block));
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::CommentBlock));

        let (tokens, state) = t.tokenize_line("still inside", state);
        assert_eq!(tokens, vec![Token::new(TokenKind::CommentBlock, 0, 12)]);
        assert!(state.is_open());

        let (tokens, state) = t.tokenize_line("end */ int y;", state);
        assert_eq!(tokens[0], Token::new(TokenKind::CommentBlock, 0, 6));
        assert_eq!(state, LineState::Normal);
        assert_eq!(tokens[1].kind, TokenKind::KeywordType);
    }

    #[test]
    fn rust_block_comments_nest() {
        let t = CFamilyTokenizer::rust();
        let (_, state) = t.tokenize_line("/* outer /* inner */", LineState::Normal);
        assert_eq!(state, LineState::InComment(CommentKind::Nested(1)));
        let (_, state) = t.tokenize_line("/* again", state);
        assert_eq!(state, LineState::InComment(CommentKind::Nested(2)));
        let (_, state) = t.tokenize_line("*/ */ let", state);
        assert_eq!(state, LineState::Normal);
    }

    #[test]
    fn rust_raw_string_spans_lines() {
        let t = CFamilyTokenizer::rust();
        let (tokens, state) = t.tokenize_line("let s = r#\"abc", LineState::Normal);
        assert_eq!(state, LineState::InRawString(1));
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::String));
        let (tokens, state) = t.tokenize_line("x\"y\"# ;", state);
        assert_eq!(tokens[0], Token::new(TokenKind::String, 0, 5));
        assert_eq!(state, LineState::Normal);
    }

    #[test]
    fn rust_strings_continue_but_c_strings_error() {
        let (_, state) = CFamilyTokenizer::rust().tokenize_line("let s = \"open", LineState::Normal);
        assert_eq!(state, LineState::InString(StringKind::Double));

        let (tokens, state) = CFamilyTokenizer::c().tokenize_line("s = \"open", LineState::Normal);
        assert_eq!(state, LineState::Normal);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Error));

        let (_, state) = CFamilyTokenizer::c().tokenize_line("s = \"open \\", LineState::Normal);
        assert_eq!(state, LineState::InString(StringKind::Double));
    }

    #[test]
    fn c_preprocessor_line() {
        let toks = kinds(&CFamilyTokenizer::c(), "  #include <stdio.h>");
        assert_eq!(toks, vec![(TokenKind::Attribute, "#include <stdio.h>".into())]);
    }

    #[test]
    fn javascript_template_literal_spans_lines() {
        let t = CFamilyTokenizer::javascript();
        let (_, state) = t.tokenize_line("const s = `a", LineState::Normal);
        assert_eq!(state, LineState::InString(StringKind::Backtick));
        let (tokens, state) = t.tokenize_line("b` + $x", state);
        assert_eq!(tokens[0], Token::new(TokenKind::String, 0, 2));
        assert_eq!(state, LineState::Normal);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Identifier));
    }

    #[test]
    fn javascript_doc_block_comment() {
        let t = CFamilyTokenizer::javascript();
        let (tokens, state) = t.tokenize_line("/** docs", LineState::Normal);
        assert_eq!(tokens[0].kind, TokenKind::CommentDoc);
        assert_eq!(state, LineState::InComment(CommentKind::Doc));
        let (tokens, _) = t.tokenize_line(" */", state);
        assert_eq!(tokens[0].kind, TokenKind::CommentDoc);
    }

    #[test]
    fn unknown_chars_are_errors() {
        let toks = kinds(&CFamilyTokenizer::c(), "a ` b");
        assert!(toks.contains(&(TokenKind::Error, "`".into())));
    }

    #[test]
    fn sniff_scores_markers() {
        let rust = CFamilyTokenizer::rust();
        assert!(rust.sniff("use std::io;\npub fn main() -> u8 {}") >= 40);
        assert_eq!(rust.sniff("hello world"), 0);
    }
}
