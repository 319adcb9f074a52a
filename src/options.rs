//! Tuning knobs for the incremental highlighter.

use std::time::Duration;

/// Highlighter configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightOptions {
    /// Lines re-tokenized per step when nothing forces a wider window.
    pub chunk_lines: usize,
    /// Delay before the first pass over a freshly opened document.
    pub initial_delay: Duration,
    /// Delay between an edit and the step that re-highlights it.
    pub edit_debounce: Duration,
    /// Delay between consecutive steps of one pass.
    pub step_delay: Duration,
    /// Upper bound on a widened window, in lines.
    pub max_width: usize,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            chunk_lines: 30,
            initial_delay: Duration::from_millis(300),
            edit_debounce: Duration::from_millis(100),
            step_delay: Duration::from_millis(30),
            max_width: 8192,
        }
    }
}

impl HighlightOptions {
    #[must_use]
    pub fn with_chunk_lines(mut self, lines: usize) -> Self {
        self.chunk_lines = lines.max(1);
        self
    }

    #[must_use]
    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    #[must_use]
    pub const fn with_edit_debounce(mut self, delay: Duration) -> Self {
        self.edit_debounce = delay;
        self
    }

    #[must_use]
    pub const fn with_step_delay(mut self, delay: Duration) -> Self {
        self.step_delay = delay;
        self
    }

    #[must_use]
    pub fn with_max_width(mut self, lines: usize) -> Self {
        self.max_width = lines.max(1);
        self
    }

    /// All delays zero; for callers that drive steps themselves.
    #[must_use]
    pub const fn immediate(self) -> Self {
        self.with_initial_delay(Duration::ZERO)
            .with_edit_debounce(Duration::ZERO)
            .with_step_delay(Duration::ZERO)
    }
}
