//! Pending invalidation ranges.
//!
//! Edits arrive as `(start, removed, inserted)` line triples. Between two
//! refresh steps any number of edits may land; they fold into one
//! [`ChangeRange`] that covers every line any of them touched.

use std::ops::Range;

use crate::text::LineEdit;

/// A line span invalidated by one or more edits.
///
/// `removed` lines at `start` in the document as it was before the first
/// folded edit became `inserted` lines in the document after the last one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChangeRange {
    pub start: usize,
    pub removed: usize,
    pub inserted: usize,
}

impl ChangeRange {
    #[must_use]
    pub const fn new(start: usize, removed: usize, inserted: usize) -> Self {
        Self {
            start,
            removed,
            inserted,
        }
    }

    /// Lines covered in the document before the change.
    #[must_use]
    pub const fn original_span(&self) -> Range<usize> {
        self.start..self.start + self.removed
    }

    /// Lines covered in the document after the change.
    #[must_use]
    pub const fn resulting_span(&self) -> Range<usize> {
        self.start..self.start + self.inserted
    }

    /// Fold `next`, expressed against the document this change produced,
    /// into a single range against the document before `self`.
    #[must_use]
    pub fn merge(self, next: Self) -> Self {
        let start = self.start.min(next.start);
        // End of the combined span in the intermediate document.
        let end = (self.start + self.inserted).max(next.start + next.removed);
        Self {
            start,
            removed: end - self.inserted + self.removed - start,
            inserted: end + next.inserted - next.removed - start,
        }
    }
}

impl From<LineEdit> for ChangeRange {
    fn from(edit: LineEdit) -> Self {
        Self::new(edit.start, edit.removed, edit.inserted)
    }
}

/// Holds at most one pending [`ChangeRange`].
#[derive(Clone, Debug, Default)]
pub struct ChangeTracker {
    pending: Option<ChangeRange>,
}

impl ChangeTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Merge a new change into the pending one.
    pub fn record(&mut self, change: impl Into<ChangeRange>) -> ChangeRange {
        let change = change.into();
        let merged = match self.pending {
            Some(pending) => pending.merge(change),
            None => change,
        };
        self.pending = Some(merged);
        merged
    }

    /// Consume the pending change.
    pub const fn take(&mut self) -> Option<ChangeRange> {
        self.pending.take()
    }

    #[must_use]
    pub const fn pending(&self) -> Option<ChangeRange> {
        self.pending
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}
