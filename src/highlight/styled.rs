//! Styled shadow of the document: one [`StyledLine`] and one [`BlockId`]
//! per document line.

use std::ops::Range;

use unicode_width::UnicodeWidthStr;

use crate::style::Style;

/// A run of text sharing one style.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub style: Style,
}

impl StyledRun {
    #[must_use]
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Colorized representation of one document line.
///
/// The concatenated run texts always equal the line's text.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledLine {
    runs: Vec<StyledRun>,
}

impl StyledLine {
    #[must_use]
    pub const fn new() -> Self {
        Self { runs: Vec::new() }
    }

    /// A line rendered entirely in one style.
    #[must_use]
    pub fn plain(text: &str, style: Style) -> Self {
        let mut line = Self::new();
        line.push(text, style);
        line
    }

    /// Append text; merges into the last run when the style matches.
    pub fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.runs.push(StyledRun::new(text, style)),
        }
    }

    #[must_use]
    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Number of chars on the line.
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.runs.iter().map(|run| run.text.chars().count()).sum()
    }

    /// Terminal columns needed to show the line.
    #[must_use]
    pub fn display_width(&self) -> usize {
        self.runs.iter().map(|run| run.text.width()).sum()
    }

    /// Style of the char at `column` (in chars).
    #[must_use]
    pub fn style_at(&self, column: usize) -> Option<Style> {
        let mut remaining = column;
        for run in &self.runs {
            let len = run.text.chars().count();
            if remaining < len {
                return Some(run.style);
            }
            remaining -= len;
        }
        None
    }
}

/// Which tokenizer pass produced a line.
///
/// Lines in one block came out of one token sequence; consecutive lines of a
/// multi-line construct share a block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BlockId {
    /// Produced by the given pass.
    Block(u64),
    /// Edited since it was last tokenized.
    Edited,
    /// Never tokenized, or left over past the end of a pass's output.
    #[default]
    Unresolved,
}

impl BlockId {
    #[must_use]
    pub const fn is_block(self) -> bool {
        matches!(self, Self::Block(_))
    }

    #[must_use]
    pub const fn as_block(self) -> Option<u64> {
        match self {
            Self::Block(id) => Some(id),
            Self::Edited | Self::Unresolved => None,
        }
    }
}

/// Parallel line and block-id vectors, always the same length.
#[derive(Clone, Debug, Default)]
pub struct StyledLineCache {
    lines: Vec<StyledLine>,
    blocks: Vec<BlockId>,
}

impl StyledLineCache {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Unstyled copies of `lines`, all [`BlockId::Unresolved`].
    pub fn unresolved<I, S>(lines: I, style: Style) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines: Vec<_> = lines
            .into_iter()
            .map(|line| StyledLine::plain(line.as_ref(), style))
            .collect();
        let blocks = vec![BlockId::Unresolved; lines.len()];
        Self { lines, blocks }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line(&self, index: usize) -> Option<&StyledLine> {
        self.lines.get(index)
    }

    #[must_use]
    pub fn block(&self, index: usize) -> Option<BlockId> {
        self.blocks.get(index).copied()
    }

    #[must_use]
    pub fn lines(&self) -> &[StyledLine] {
        &self.lines
    }

    #[must_use]
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let end = range.end.min(self.len());
        range.start.min(end)..end
    }

    /// Owned copy of a line range, clamped to the cache.
    #[must_use]
    pub fn snapshot(&self, range: Range<usize>) -> Vec<StyledLine> {
        self.lines[self.clamp(range)].to_vec()
    }

    /// Replace `count` lines at `start` with `lines`/`blocks`.
    ///
    /// The replacement may have a different length, which is how document
    /// edits that add or remove lines reach the cache.
    pub fn splice(
        &mut self,
        start: usize,
        count: usize,
        lines: Vec<StyledLine>,
        blocks: Vec<BlockId>,
    ) {
        debug_assert_eq!(lines.len(), blocks.len(), "lines and blocks differ");
        let range = self.clamp(start..start.saturating_add(count));
        self.lines.splice(range.clone(), lines);
        self.blocks.splice(range, blocks);
    }

    /// Shift the block ids from line `from` on so the first one is at least
    /// `floor`. Ids keep their order and equal ids stay equal; edited and
    /// unresolved lines are left alone. Returns the shift applied.
    pub fn raise_blocks(&mut self, from: usize, floor: u64) -> u64 {
        let from = from.min(self.len());
        let Some(first) = self.blocks[from..].iter().find_map(|b| b.as_block()) else {
            return 0;
        };
        let shift = floor.saturating_sub(first);
        if shift > 0 {
            for block in &mut self.blocks[from..] {
                if let BlockId::Block(id) = block {
                    *id += shift;
                }
            }
        }
        shift
    }
}
