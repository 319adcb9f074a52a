//! Token types for syntax highlighting.
//!
//! Token kinds form a fixed hierarchy rooted at [`TokenKind::Text`]. A theme
//! that has no style for `CommentDoc` falls back to `Comment`, then to the
//! theme default, so tokenizers may emit kinds a theme never heard of.

use std::ops::Range;

/// Semantic token categories used by tokenizers and themes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Keyword,
    KeywordControl,
    KeywordType,
    KeywordModifier,

    // Literals
    String,
    StringEscape,
    Number,
    Boolean,

    // Identifiers
    Identifier,
    Type,
    Constant,
    Function,
    Macro,

    // Comments
    Comment,
    CommentBlock,
    CommentDoc,

    // Operators and punctuation
    Operator,
    Punctuation,
    Delimiter,

    // Special
    Attribute,
    Decorator,
    Lifetime,
    Label,

    // Errors
    Error,

    // Whitespace between tokens
    Whitespace,

    // Root
    Text,
}

impl TokenKind {
    /// Number of token kinds.
    pub const COUNT: usize = Self::ALL.len();

    /// Every token kind, in declaration order.
    pub const ALL: [Self; 26] = [
        Self::Keyword,
        Self::KeywordControl,
        Self::KeywordType,
        Self::KeywordModifier,
        Self::String,
        Self::StringEscape,
        Self::Number,
        Self::Boolean,
        Self::Identifier,
        Self::Type,
        Self::Constant,
        Self::Function,
        Self::Macro,
        Self::Comment,
        Self::CommentBlock,
        Self::CommentDoc,
        Self::Operator,
        Self::Punctuation,
        Self::Delimiter,
        Self::Attribute,
        Self::Decorator,
        Self::Lifetime,
        Self::Label,
        Self::Error,
        Self::Whitespace,
        Self::Text,
    ];

    /// Dense index for table lookups.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self as usize
    }

    /// The more generic kind this one specializes, `None` for the root.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::Text => None,
            Self::KeywordControl | Self::KeywordType | Self::KeywordModifier => {
                Some(Self::Keyword)
            }
            Self::StringEscape => Some(Self::String),
            Self::Boolean => Some(Self::Constant),
            Self::Type | Self::Constant | Self::Function | Self::Label => Some(Self::Identifier),
            Self::Macro => Some(Self::Function),
            Self::Lifetime => Some(Self::Label),
            Self::Decorator => Some(Self::Attribute),
            Self::CommentBlock | Self::CommentDoc => Some(Self::Comment),
            Self::Delimiter => Some(Self::Punctuation),
            Self::Keyword
            | Self::String
            | Self::Number
            | Self::Identifier
            | Self::Comment
            | Self::Operator
            | Self::Punctuation
            | Self::Attribute
            | Self::Error
            | Self::Whitespace => Some(Self::Text),
        }
    }

    /// This kind followed by each ancestor up to [`TokenKind::Text`].
    pub fn lineage(self) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }

    /// Error tokens make the highlighter re-synchronize from their line.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::Error)
    }
}

/// A token produced by a tokenizer: a byte range within one line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "token range must be start <= end");
        Self { kind, start, end }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// A token paired with its source text, as streamed to the block classifier.
///
/// `continues` is set when the tokenizer is still inside a multi-line
/// construct (block comment, multi-line string) once this span ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenSpan<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub continues: bool,
}

impl<'a> TokenSpan<'a> {
    #[must_use]
    pub const fn new(kind: TokenKind, text: &'a str) -> Self {
        Self {
            kind,
            text,
            continues: false,
        }
    }

    /// Mark the span as part of an open multi-line construct.
    #[must_use]
    pub const fn continuing(self) -> Self {
        Self {
            continues: true,
            ..self
        }
    }
}
