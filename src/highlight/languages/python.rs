use super::{Scanner, identifier_kind, is_ident_start, symbol_kind};
use crate::highlight::token::{Token, TokenKind};
use crate::highlight::tokenizer::{LineState, StringKind, Tokenizer};

/// Python tokenizer with triple-quoted strings that span lines.
#[derive(Clone, Copy, Debug, Default)]
pub struct PythonTokenizer;

impl PythonTokenizer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn keyword(word: &str) -> Option<TokenKind> {
        match word {
            "if" | "elif" | "else" | "for" | "while" | "break" | "continue" | "return"
            | "yield" | "pass" | "raise" | "try" | "except" | "finally" | "with" | "match"
            | "case" => Some(TokenKind::KeywordControl),

            "def" | "class" | "lambda" | "global" | "nonlocal" | "import" | "from" | "as"
            | "assert" | "del" | "and" | "or" | "not" | "in" | "is" => Some(TokenKind::Keyword),

            "async" | "await" => Some(TokenKind::KeywordModifier),

            "int" | "str" | "float" | "bool" | "bytes" | "list" | "dict" | "set" | "tuple"
            | "object" => Some(TokenKind::KeywordType),

            "True" | "False" => Some(TokenKind::Boolean),
            "None" | "self" | "cls" => Some(TokenKind::Constant),
            _ => None,
        }
    }

    /// Length of a string prefix (`r`, `b`, `f`, `rb`, ...) at the scanner,
    /// if it is followed by a quote.
    fn string_prefix(rest: &str) -> Option<usize> {
        let prefix = rest
            .bytes()
            .take(2)
            .take_while(|b| matches!(b.to_ascii_lowercase(), b'r' | b'b' | b'u' | b'f'))
            .count();
        rest[prefix..].starts_with(['"', '\'']).then_some(prefix)
    }

    const fn triple(quote: char) -> &'static str {
        if quote == '"' { "\"\"\"" } else { "'''" }
    }

    /// Consume up to and including the closing triple quote.
    fn close_triple(sc: &mut Scanner<'_>, quote: char) -> bool {
        let close = Self::triple(quote);
        while !sc.is_done() {
            if sc.eat(close) {
                return true;
            }
            if sc.bump() == Some('\\') {
                sc.bump();
            }
        }
        false
    }

    fn resume(
        sc: &mut Scanner<'_>,
        line: &str,
        state: LineState,
        tokens: &mut Vec<Token>,
    ) -> Option<LineState> {
        let LineState::InString(kind) = state else {
            return None;
        };
        let closed = match kind {
            StringKind::TripleDouble => Self::close_triple(sc, '"'),
            StringKind::TripleSingle => Self::close_triple(sc, '\''),
            StringKind::Double | StringKind::Backtick => sc.quoted('"'),
            StringKind::Single => sc.quoted('\''),
        };
        if closed {
            tokens.push(Token::new(TokenKind::String, 0, sc.pos()));
            return None;
        }
        let triple = matches!(kind, StringKind::TripleDouble | StringKind::TripleSingle);
        if triple || line.ends_with('\\') {
            tokens.push(Token::new(TokenKind::String, 0, line.len()));
            Some(state)
        } else {
            tokens.push(Token::new(TokenKind::Error, 0, line.len()));
            None
        }
    }
}

impl Tokenizer for PythonTokenizer {
    fn name(&self) -> &'static str {
        "Python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py", "pyi", "pyw"]
    }

    fn filenames(&self) -> &'static [&'static str] {
        &["SConstruct", "SConscript", "wscript"]
    }

    fn sniff(&self, sample: &str) -> u8 {
        let first = sample.lines().next().unwrap_or_default();
        if first.starts_with("#!") && first.contains("python") {
            return 100;
        }
        let markers = ["def ", "import ", "self.", "elif ", "__init__", "print("];
        let hits = markers.iter().filter(|m| sample.contains(*m)).count();
        u8::try_from(hits.saturating_mul(20).min(90)).unwrap_or(90)
    }

    fn tokenize_line(&self, line: &str, state: LineState) -> (Vec<Token>, LineState) {
        let mut tokens = Vec::new();
        let mut sc = Scanner::new(line);

        if let Some(open) = Self::resume(&mut sc, line, state, &mut tokens) {
            return (tokens, open);
        }

        let mut after_def = None;
        while let Some(ch) = sc.peek() {
            let start = sc.pos();

            if ch.is_whitespace() {
                sc.eat_while(char::is_whitespace);
                continue;
            }

            if ch == '#' {
                tokens.push(Token::new(TokenKind::Comment, start, line.len()));
                break;
            }

            if let Some(prefix) = Self::string_prefix(sc.rest()) {
                for _ in 0..prefix {
                    sc.bump();
                }
                let quote = sc.peek().unwrap_or('"');
                if sc.eat(Self::triple(quote)) {
                    if Self::close_triple(&mut sc, quote) {
                        tokens.push(Token::new(TokenKind::String, start, sc.pos()));
                        continue;
                    }
                    tokens.push(Token::new(TokenKind::String, start, line.len()));
                    let kind = if quote == '"' {
                        StringKind::TripleDouble
                    } else {
                        StringKind::TripleSingle
                    };
                    return (tokens, LineState::InString(kind));
                }
                sc.bump();
                if sc.quoted(quote) {
                    tokens.push(Token::new(TokenKind::String, start, sc.pos()));
                    continue;
                }
                if line.ends_with('\\') {
                    tokens.push(Token::new(TokenKind::String, start, line.len()));
                    let kind = if quote == '"' {
                        StringKind::Double
                    } else {
                        StringKind::Single
                    };
                    return (tokens, LineState::InString(kind));
                }
                tokens.push(Token::new(TokenKind::Error, start, line.len()));
                break;
            }

            if ch == '@' && line[..start].trim().is_empty() {
                sc.bump();
                sc.eat_while(|c| c.is_alphanumeric() || c == '_' || c == '.');
                tokens.push(Token::new(TokenKind::Decorator, start, sc.pos()));
                continue;
            }

            if ch.is_ascii_digit() {
                sc.number();
                tokens.push(Token::new(TokenKind::Number, start, sc.pos()));
                continue;
            }

            if is_ident_start(ch) {
                let word = sc.identifier(&[]);
                let kind = match after_def.take() {
                    Some(kind) => kind,
                    None => Self::keyword(word).unwrap_or_else(|| identifier_kind(word, sc.peek())),
                };
                match word {
                    "def" => after_def = Some(TokenKind::Function),
                    "class" => after_def = Some(TokenKind::Type),
                    _ => {}
                }
                tokens.push(Token::new(kind, start, sc.pos()));
                continue;
            }

            sc.bump();
            let kind = match ch {
                '@' => TokenKind::Operator,
                '\\' if sc.is_done() => TokenKind::Punctuation,
                _ => symbol_kind(ch).unwrap_or(TokenKind::Error),
            };
            tokens.push(Token::new(kind, start, sc.pos()));
        }

        (tokens, LineState::Normal)
    }
}
