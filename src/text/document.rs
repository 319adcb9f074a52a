//! Line-addressed document backed by the ropey crate.
//!
//! Every mutation reports the line span it touched as a [`LineEdit`]
//! `(start, removed, inserted)`, which is what the change tracker consumes.
//! Line counts follow ropey: an empty document has one empty line and a
//! trailing line break opens a new, empty, last line.

use std::ops::Range;

use ropey::Rope;

use crate::error::{Error, Result};

/// A `(line, column)` position; columns count chars, not bytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Line span touched by one edit.
///
/// `removed` lines starting at `start` in the old document were replaced by
/// `inserted` lines in the new one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LineEdit {
    pub start: usize,
    pub removed: usize,
    pub inserted: usize,
}

impl LineEdit {
    #[must_use]
    pub const fn new(start: usize, removed: usize, inserted: usize) -> Self {
        Self {
            start,
            removed,
            inserted,
        }
    }
}

/// Ordered sequence of text lines.
#[derive(Clone, Debug, Default)]
pub struct Document {
    rope: Rope,
}

impl Document {
    /// Create an empty document (one empty line).
    #[must_use]
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a document from a string.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Number of lines (always at least one).
    #[must_use]
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Number of characters.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Check if the document holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Line text without its terminator.
    #[must_use]
    pub fn line(&self, idx: usize) -> Option<String> {
        let slice = self.rope.get_line(idx)?;
        let mut text = slice.to_string();
        let keep = text.len() - terminator_len(&text);
        text.truncate(keep);
        Some(text)
    }

    /// Texts of the lines in `range`, clamped to the document.
    #[must_use]
    pub fn lines(&self, range: Range<usize>) -> Vec<String> {
        let end = range.end.min(self.len_lines());
        (range.start.min(end)..end)
            .filter_map(|idx| self.line(idx))
            .collect()
    }

    /// Length of a line in chars, terminator excluded.
    pub fn line_len_chars(&self, idx: usize) -> Result<usize> {
        let slice = self.rope.get_line(idx).ok_or(Error::LineOutOfBounds {
            line: idx,
            len: self.len_lines(),
        })?;
        let text = slice.to_string();
        let body = &text[..text.len() - terminator_len(&text)];
        Ok(body.chars().count())
    }

    /// Whole document as a string.
    #[must_use]
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Insert text at a position.
    pub fn insert(&mut self, at: Position, text: &str) -> Result<LineEdit> {
        let char_idx = self.char_index(at)?;
        let before = self.len_lines();
        self.rope.insert(char_idx, text);
        Ok(self.edit_from_delta(at.line, 1, before))
    }

    /// Remove the text between two positions.
    ///
    /// `end` may be `(line + 1, 0)` to remove a line terminator.
    pub fn remove(&mut self, start: Position, end: Position) -> Result<LineEdit> {
        self.replace(start, end, "")
    }

    /// Replace the text between two positions.
    pub fn replace(&mut self, start: Position, end: Position, text: &str) -> Result<LineEdit> {
        if start > end {
            return Err(Error::InvalidRange {
                start: (start.line, start.column),
                end: (end.line, end.column),
            });
        }
        let from = self.char_index(start)?;
        let to = self.char_index(end)?;
        let before = self.len_lines();
        self.rope.remove(from..to);
        self.rope.insert(from, text);
        Ok(self.edit_from_delta(start.line, end.line - start.line + 1, before))
    }

    /// Replace `removed` whole lines starting at `start` with `lines`.
    pub fn splice_lines(&mut self, start: usize, removed: usize, lines: &[&str]) -> Result<LineEdit> {
        let len = self.len_lines();
        if start > len || start + removed > len {
            return Err(Error::LineOutOfBounds {
                line: start + removed,
                len,
            });
        }
        if removed == 0 && lines.is_empty() {
            return Ok(LineEdit::new(start, 0, 0));
        }

        let joined = lines.join("\n");
        if start + removed < len {
            // Every replaced line owns its terminator.
            let from = self.rope.line_to_char(start);
            let to = self.rope.line_to_char(start + removed);
            self.rope.remove(from..to);
            if !lines.is_empty() {
                self.rope.insert(from, &format!("{joined}\n"));
            }
        } else if start == len {
            let end = self.rope.len_chars();
            self.rope.insert(end, &format!("\n{joined}"));
        } else {
            // The tail of the document goes, including the unterminated last line.
            let mut from = self.rope.line_to_char(start);
            if lines.is_empty() && start > 0 {
                from -= self.terminator_chars(start - 1);
            }
            let end = self.rope.len_chars();
            self.rope.remove(from..end);
            self.rope.insert(from, &joined);
        }
        Ok(self.edit_from_delta(start, removed, len))
    }

    /// Replace the entire contents.
    pub fn set_text(&mut self, text: &str) -> LineEdit {
        let removed = self.len_lines();
        self.rope = Rope::from_str(text);
        LineEdit::new(0, removed, self.len_lines())
    }

    fn char_index(&self, at: Position) -> Result<usize> {
        let len = self.line_len_chars(at.line)?;
        if at.column > len {
            return Err(Error::ColumnOutOfBounds {
                line: at.line,
                column: at.column,
                len,
            });
        }
        Ok(self.rope.line_to_char(at.line) + at.column)
    }

    fn terminator_chars(&self, idx: usize) -> usize {
        self.rope.get_line(idx).map_or(0, |slice| {
            let text = slice.to_string();
            text[text.len() - terminator_len(&text)..].chars().count()
        })
    }

    // Derive the inserted count from the line-count delta so that CRLF merges
    // and embedded breaks are always accounted for.
    fn edit_from_delta(&self, start: usize, removed: usize, before: usize) -> LineEdit {
        let inserted = (removed + self.len_lines()).saturating_sub(before);
        LineEdit::new(start, removed, inserted)
    }
}

impl From<&str> for Document {
    fn from(s: &str) -> Self {
        Self::from_text(s)
    }
}

/// Byte length of the line terminator ending `line`, as ropey recognizes them.
fn terminator_len(line: &str) -> usize {
    if line.ends_with("\r\n") {
        return 2;
    }
    match line.chars().next_back() {
        Some(c @ ('\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}')) => {
            c.len_utf8()
        }
        _ => 0,
    }
}
