//! The incremental refresh step.
//!
//! A [`Highlighter`] owns the document text, its styled shadow, the pending
//! change, and the refresh cursor. Each [`Highlighter::step`] re-tokenizes
//! one window of lines and decides where the next window starts:
//!
//! 1. Fold the pending change into the cursor (`start = min(start, change)`).
//! 2. Walk `start` back to the beginning of the block it sits in, so a
//!    construct that began above the window is tokenized from its opener.
//! 3. Clamp the window to the document; reaching the end marks the pass done.
//! 4. Hold back blank leading lines from the tokenizer and restore them as
//!    placeholders.
//! 5. Tokenize, classify, and splice the styled lines into the cache. Block
//!    ids below the window are raised past the window's last id, so ids never
//!    decrease down the document.
//! 6. Re-arm: at an error token or an unclosed construct with a doubled
//!    window, otherwise right after this window with the default width.
//!
//! The window end grows on every step of a pass, so a pass over finite text
//! always reaches the end.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use super::change::{ChangeRange, ChangeTracker};
use super::classifier::{Classified, classify};
use super::registry::TokenizerRegistry;
use super::styled::{BlockId, StyledLine, StyledLineCache};
use super::theme::Theme;
use super::tokenizer::{TokenStream, Tokenizer};
use crate::error::Result;
use crate::options::HighlightOptions;
use crate::text::{Document, LineEdit, Position};

/// Next window to re-tokenize: `width` lines from `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RefreshCursor {
    pub start: usize,
    pub width: usize,
}

impl RefreshCursor {
    #[must_use]
    pub const fn new(start: usize, width: usize) -> Self {
        Self { start, width }
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.width
    }
}

/// Where a highlighted document is in its refresh cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Nothing left to re-tokenize.
    Idle,
    /// A step is due.
    Scheduled,
    /// A step is executing.
    Running,
}

/// What one refresh step did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepReport {
    /// First line of the window, after backward extension.
    pub start: usize,
    /// Lines re-tokenized.
    pub width: usize,
    /// The window reached the last line.
    pub eof: bool,
    /// Window-relative line of the first error token.
    pub error: Option<usize>,
    /// Window-relative line where an unclosed construct began.
    pub open: Option<usize>,
    /// Cursor for the following step, `None` once idle.
    pub next: Option<RefreshCursor>,
    pub tokenizer: &'static str,
}

impl StepReport {
    /// Lines `[start, start + width)` of the document.
    #[must_use]
    pub const fn window(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.width
    }
}

/// Cumulative counters for one highlighter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HighlightStats {
    pub steps: u64,
    pub lines_tokenized: u64,
    /// Steps that re-armed with a doubled window.
    pub widenings: u64,
    /// Passes that reached the end of the document.
    pub passes: u64,
}

/// Single-threaded incremental highlighter.
pub struct Highlighter {
    document: Document,
    cache: StyledLineCache,
    changes: ChangeTracker,
    cursor: Option<RefreshCursor>,
    tokenizer: Option<Arc<dyn Tokenizer>>,
    registry: Arc<TokenizerRegistry>,
    theme: Theme,
    path: Option<PathBuf>,
    options: HighlightOptions,
    stats: HighlightStats,
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("lines", &self.document.len_lines())
            .field("cursor", &self.cursor)
            .field("pending", &self.changes.pending())
            .field("tokenizer", &self.tokenizer_name())
            .field("theme", &self.theme.name())
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Highlighter {
    /// Highlighter over `document` with built-in tokenizers and the default
    /// theme. A full pass is armed immediately.
    #[must_use]
    pub fn new(document: Document, path: Option<PathBuf>, options: HighlightOptions) -> Self {
        let theme = Theme::default();
        let len = document.len_lines();
        let cache = StyledLineCache::unresolved(document.lines(0..len), theme.default_style());
        let mut changes = ChangeTracker::new();
        changes.record(ChangeRange::new(0, 0, len));
        Self {
            document,
            cache,
            changes,
            cursor: Some(RefreshCursor::new(0, options.chunk_lines)),
            tokenizer: None,
            registry: Arc::new(TokenizerRegistry::with_builtins()),
            theme,
            path,
            options,
            stats: HighlightStats::default(),
        }
    }

    /// Replace the tokenizer registry; the tokenizer is resolved again.
    #[must_use]
    pub fn with_registry(mut self, registry: Arc<TokenizerRegistry>) -> Self {
        self.registry = registry;
        self.tokenizer = None;
        self
    }

    /// Replace the theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.set_theme(theme);
        self
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub const fn cache(&self) -> &StyledLineCache {
        &self.cache
    }

    #[must_use]
    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub const fn options(&self) -> &HighlightOptions {
        &self.options
    }

    #[must_use]
    pub const fn stats(&self) -> HighlightStats {
        self.stats
    }

    #[must_use]
    pub const fn cursor(&self) -> Option<RefreshCursor> {
        self.cursor
    }

    #[must_use]
    pub const fn pending_change(&self) -> Option<ChangeRange> {
        self.changes.pending()
    }

    /// Name of the resolved tokenizer, once the first step has run.
    #[must_use]
    pub fn tokenizer_name(&self) -> Option<&'static str> {
        self.tokenizer.as_ref().map(|t| t.name())
    }

    /// [`Phase::Idle`] or [`Phase::Scheduled`]; running is tracked by the
    /// owner of the highlighter.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        if self.cursor.is_some() || !self.changes.is_empty() {
            Phase::Scheduled
        } else {
            Phase::Idle
        }
    }

    /// Insert text at a position.
    pub fn insert(&mut self, at: Position, text: &str) -> Result<LineEdit> {
        let edit = self.document.insert(at, text)?;
        self.apply_edit(edit);
        Ok(edit)
    }

    /// Remove the text between two positions.
    pub fn remove(&mut self, start: Position, end: Position) -> Result<LineEdit> {
        let edit = self.document.remove(start, end)?;
        self.apply_edit(edit);
        Ok(edit)
    }

    /// Replace the text between two positions.
    pub fn replace(&mut self, start: Position, end: Position, text: &str) -> Result<LineEdit> {
        let edit = self.document.replace(start, end, text)?;
        self.apply_edit(edit);
        Ok(edit)
    }

    /// Replace `removed` whole lines at `start` with `lines`.
    pub fn splice_lines(&mut self, start: usize, removed: usize, lines: &[&str]) -> Result<LineEdit> {
        let edit = self.document.splice_lines(start, removed, lines)?;
        self.apply_edit(edit);
        Ok(edit)
    }

    /// Replace the whole text.
    pub fn set_text(&mut self, text: &str) -> LineEdit {
        let edit = self.document.set_text(text);
        self.apply_edit(edit);
        edit
    }

    /// Mirror a document edit into the cache and record it.
    ///
    /// The touched lines become unstyled copies marked [`BlockId::Edited`],
    /// so the cache stays line-aligned with the document between steps.
    fn apply_edit(&mut self, edit: LineEdit) {
        let texts = self.document.lines(edit.start..edit.start + edit.inserted);
        let style = self.theme.default_style();
        let lines: Vec<_> = texts.iter().map(|t| StyledLine::plain(t, style)).collect();
        let blocks = vec![BlockId::Edited; lines.len()];
        self.cache.splice(edit.start, edit.removed, lines, blocks);
        debug_assert_eq!(self.cache.len(), self.document.len_lines());

        let merged = self.changes.record(edit);
        if self.cursor.is_none() {
            self.cursor = Some(RefreshCursor::new(merged.start, self.options.chunk_lines));
        }
        trace!(?edit, ?merged, "recorded change");
    }

    fn rearm_from(&mut self, start: usize) {
        self.cursor = Some(match self.cursor {
            Some(cursor) => RefreshCursor::new(cursor.start.min(start), cursor.width),
            None => RefreshCursor::new(start, self.options.chunk_lines),
        });
    }

    /// Switch themes; every line is restyled by the next pass.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.rearm_from(0);
    }

    /// Force a tokenizer, or `None` to resolve one from the path again.
    pub fn set_tokenizer(&mut self, tokenizer: Option<Arc<dyn Tokenizer>>) {
        self.tokenizer = tokenizer;
        self.rearm_from(0);
    }

    /// Change the file path; the tokenizer is resolved again.
    pub fn set_file_path(&mut self, path: Option<PathBuf>) {
        self.path = path;
        self.tokenizer = None;
        self.rearm_from(0);
    }

    fn resolve_tokenizer(&mut self, sample: &str) -> Arc<dyn Tokenizer> {
        if let Some(tokenizer) = &self.tokenizer {
            return Arc::clone(tokenizer);
        }
        let (tokenizer, _) = self.registry.resolve(self.path.as_deref(), sample);
        self.tokenizer = Some(Arc::clone(&tokenizer));
        tokenizer
    }

    /// Move `start` back to the first line of the block it belongs to.
    ///
    /// An edited line joins the block above it; lines never tokenized are
    /// absorbed; the walk stops at the first line of a different block.
    fn extend_backward(&self, mut start: usize, mut width: usize) -> (usize, usize) {
        let block = |line: usize| self.cache.block(line).unwrap_or_default();
        let mut current = block(start);
        while start > 0 {
            let prev = block(start - 1);
            if prev == current || !prev.is_block() || current == BlockId::Edited {
                current = prev;
                start -= 1;
                width += 1;
            } else {
                break;
            }
        }
        (start, width)
    }

    /// Cursor for a doubled window at `offset`, capped at `max_width`. Falls
    /// back to the window after this one when the cap leaves no progress.
    fn widened(&self, start: usize, width: usize, offset: usize) -> RefreshCursor {
        let next = RefreshCursor::new(
            start + offset,
            width.saturating_mul(2).min(self.options.max_width),
        );
        if next.end() > start + width {
            next
        } else {
            RefreshCursor::new(start + width, self.options.chunk_lines)
        }
    }

    /// Run one refresh step. `None` when idle.
    pub fn step(&mut self) -> Option<StepReport> {
        let mut cursor = self.cursor?;
        if let Some(change) = self.changes.take() {
            cursor.start = cursor.start.min(change.start);
        }

        let len = self.document.len_lines();
        let start = cursor.start.min(len - 1);
        let (start, mut width) = self.extend_backward(start, cursor.width.max(1));

        let eof = start + width >= len;
        if eof {
            width = len - start;
        }

        let raw = self.document.lines(start..start + width);
        let offset = raw
            .iter()
            .take_while(|line| line.trim().is_empty())
            .count()
            .min(raw.len().saturating_sub(1));
        let leading: Vec<&str> = raw[..offset].iter().map(String::as_str).collect();
        let text = raw[offset..].join("\n");

        let tokenizer = self.resolve_tokenizer(&text);
        let seed = start
            .checked_sub(1)
            .and_then(|prev| self.cache.block(prev))
            .and_then(BlockId::as_block)
            .map_or(0, |id| id + 1);

        let Classified {
            mut lines,
            mut blocks,
            error,
            open,
            ..
        } = classify(
            TokenStream::new(tokenizer.as_ref(), &text),
            &self.theme,
            seed,
            &leading,
        );

        lines.truncate(width);
        blocks.truncate(width);
        let style = self.theme.default_style();
        for line in raw.iter().skip(lines.len()) {
            lines.push(StyledLine::plain(line, style));
            blocks.push(BlockId::Unresolved);
        }
        let last_block = blocks.iter().rev().find_map(|b| b.as_block());
        self.cache.splice(start, width, lines, blocks);
        if let Some(last) = last_block {
            let shift = self.cache.raise_blocks(start + width, last + 1);
            if shift > 0 {
                trace!(from = start + width, shift, "renumbered trailing blocks");
            }
        }

        let error = error.filter(|&line| line < width);
        let open = open.filter(|&line| line < width);
        let next = if eof {
            None
        } else if let Some(line) = error.or(open) {
            self.stats.widenings += 1;
            Some(self.widened(start, width, line))
        } else {
            Some(RefreshCursor::new(start + width, self.options.chunk_lines))
        };
        self.cursor = next;

        self.stats.steps += 1;
        self.stats.lines_tokenized += width as u64;
        debug!(start, width, eof, ?error, ?open, ?next, "refresh step");
        if eof {
            self.stats.passes += 1;
            debug!(tokenizer = tokenizer.name(), lines = len, "refresh done");
        }

        Some(StepReport {
            start,
            width,
            eof,
            error,
            open,
            next,
            tokenizer: tokenizer.name(),
        })
    }

    /// Step until idle or until `max_steps` steps ran; returns steps taken.
    pub fn run_until_idle(&mut self, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps && self.step().is_some() {
            steps += 1;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::languages::CFamilyTokenizer;

    fn numbered(count: usize) -> String {
        (0..count)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn plain(count: usize) -> Highlighter {
        Highlighter::new(
            Document::from_text(&numbered(count)),
            None,
            HighlightOptions::default(),
        )
    }

    #[test]
    fn new_highlighter_is_scheduled_with_full_change() {
        let hl = plain(10);
        assert_eq!(hl.phase(), Phase::Scheduled);
        assert_eq!(hl.pending_change(), Some(ChangeRange::new(0, 0, 10)));
        assert_eq!(hl.cursor(), Some(RefreshCursor::new(0, 30)));
        assert_eq!(hl.cache().blocks(), &[BlockId::Unresolved; 10]);
    }

    #[test]
    fn plain_text_pass_steps_in_chunks() {
        let mut hl = plain(100);
        let widths: Vec<_> = std::iter::from_fn(|| hl.step().map(|r| r.width)).collect();
        assert_eq!(widths, vec![30, 30, 30, 10]);
        assert_eq!(hl.phase(), Phase::Idle);
        assert_eq!(hl.stats().passes, 1);
        assert_eq!(hl.stats().lines_tokenized, 100);
        assert!(hl.cache().blocks().iter().all(|b| b.is_block()));
    }

    #[test]
    fn idle_step_is_none() {
        let mut hl = plain(3);
        assert!(hl.step().is_some_and(|r| r.eof));
        assert!(hl.step().is_none());
    }

    #[test]
    fn edit_rearms_and_walks_back_into_previous_block() {
        let mut hl = plain(50);
        hl.run_until_idle(100);
        let edit = hl.insert(Position::new(10, 0), "x").unwrap();
        assert_eq!(edit, LineEdit::new(10, 1, 1));
        assert_eq!(hl.cache().block(10), Some(BlockId::Edited));
        assert_eq!(hl.cursor(), Some(RefreshCursor::new(10, 30)));

        let report = hl.step().unwrap();
        assert_eq!(report.start, 9);
        assert_eq!(hl.cache().line(10).map(StyledLine::text).as_deref(), Some("xline 10"));
        assert!(hl.cache().block(10).is_some_and(BlockId::is_block));
    }

    #[test]
    fn cache_tracks_line_count_through_edits() {
        let mut hl = plain(5);
        hl.splice_lines(1, 2, &["a", "b", "c", "d"]).unwrap();
        assert_eq!(hl.cache().len(), 7);
        hl.remove(Position::new(0, 0), Position::new(3, 0)).unwrap();
        assert_eq!(hl.cache().len(), hl.document().len_lines());
        hl.set_text("");
        assert_eq!(hl.cache().len(), 1);
        hl.run_until_idle(10);
        assert_eq!(hl.cache().blocks(), &[BlockId::Block(0)]);
    }

    #[test]
    fn open_comment_widens_from_its_start() {
        let mut lines: Vec<String> = (0..100).map(|i| format!("int v{i};")).collect();
        lines[5] = "/* open".to_string();
        lines[50] = "close */".to_string();
        let mut hl = Highlighter::new(
            Document::from_text(&lines.join("\n")),
            Some(PathBuf::from("main.c")),
            HighlightOptions::default(),
        );

        let first = hl.step().unwrap();
        assert_eq!(first.open, Some(5));
        assert_eq!(first.next, Some(RefreshCursor::new(5, 60)));

        let second = hl.step().unwrap();
        assert_eq!(second.window(), 5..65);
        assert_eq!(second.open, None);
        assert_eq!(hl.stats().widenings, 1);
        assert_eq!(hl.cache().block(5), hl.cache().block(49));
        assert_ne!(hl.cache().block(5), hl.cache().block(51));
    }

    fn assert_ordered(hl: &Highlighter) {
        let ids: Vec<u64> = hl.cache().blocks().iter().filter_map(|b| b.as_block()).collect();
        let drops: Vec<_> = ids.windows(2).filter(|w| w[0] > w[1]).collect();
        assert!(drops.is_empty(), "block ids decrease: {drops:?}");
    }

    #[test]
    fn block_ids_stay_ordered_after_inserting_lines() {
        let text: Vec<String> = (0..100).map(|i| format!("int v{i} = {i};")).collect();
        let mut hl = Highlighter::new(
            Document::from_text(&text.join("\n")),
            Some(PathBuf::from("main.c")),
            HighlightOptions::default(),
        );
        hl.run_until_idle(100);
        assert_ordered(&hl);

        let added = "int extra = 0;\n".repeat(10);
        hl.insert(Position::new(10, 0), &added).unwrap();
        let report = hl.step().unwrap();
        assert!(!report.eof);
        assert_ordered(&hl);
        assert_ne!(
            hl.cache().block(report.window().end - 1),
            hl.cache().block(report.window().end)
        );

        hl.run_until_idle(100);
        assert_ordered(&hl);
    }

    #[test]
    fn persistent_errors_still_terminate() {
        let text = vec!["` broken"; 500].join("\n");
        let mut hl = Highlighter::new(
            Document::from_text(&text),
            Some(PathBuf::from("bad.c")),
            HighlightOptions::default().with_max_width(64),
        );
        let steps = hl.run_until_idle(1_000);
        assert!(steps < 1_000);
        assert_eq!(hl.phase(), Phase::Idle);
    }

    #[test]
    fn widened_respects_cap_and_progress() {
        let hl = plain(1).with_theme(Theme::terminal());
        let capped = Highlighter {
            options: HighlightOptions::default().with_max_width(40),
            ..hl
        };
        assert_eq!(capped.widened(10, 30, 0), RefreshCursor::new(10, 40));
        assert_eq!(capped.widened(10, 30, 5), RefreshCursor::new(15, 40));
        assert_eq!(capped.widened(10, 30, 29), RefreshCursor::new(39, 40));
        let tight = Highlighter {
            options: HighlightOptions::default().with_max_width(4),
            ..capped
        };
        assert_eq!(tight.widened(10, 30, 2), RefreshCursor::new(40, 30));
    }

    #[test]
    fn leading_blank_lines_keep_alignment() {
        let mut hl = Highlighter::new(
            Document::from_text("\n   \nint x;\n"),
            Some(PathBuf::from("a.c")),
            HighlightOptions::default(),
        );
        hl.run_until_idle(10);
        let texts: Vec<_> = hl.cache().lines().iter().map(StyledLine::text).collect();
        assert_eq!(texts, vec!["", "   ", "int x;", ""]);
    }

    #[test]
    fn tokenizer_is_resolved_once_and_overridable() {
        let mut hl = Highlighter::new(
            Document::from_text("fn main() {}"),
            Some(PathBuf::from("main.rs")),
            HighlightOptions::default(),
        );
        assert_eq!(hl.tokenizer_name(), None);
        hl.run_until_idle(10);
        assert_eq!(hl.tokenizer_name(), Some("Rust"));

        hl.set_tokenizer(Some(Arc::new(CFamilyTokenizer::c())));
        assert_eq!(hl.phase(), Phase::Scheduled);
        assert_eq!(hl.step().map(|r| r.tokenizer), Some("C"));

        hl.set_file_path(Some(PathBuf::from("main.py")));
        assert_eq!(hl.step().map(|r| r.tokenizer), Some("Python"));
        assert_eq!(hl.file_path(), Some(Path::new("main.py")));
    }
}
