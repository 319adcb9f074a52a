//! A document shared between an editing thread and the highlight worker.
//!
//! [`HighlightedDocument`] puts a [`Highlighter`] behind a mutex. Edits lock,
//! mutate the text and the styled cache together, and ask the scheduler for a
//! refresh step after the edit debounce. The worker holds the lock for a
//! whole step and notifies observers after releasing it, so readers always
//! see the cache line-aligned with the text.
//!
//! ```
//! use incremental_highlight::{HighlightOptions, HighlightedDocument, Position};
//!
//! let doc = HighlightedDocument::manual("fn main() {}\n", Some("main.rs".into()), HighlightOptions::default());
//! doc.insert(Position::new(1, 0), "// done\n").unwrap();
//! doc.run_until_idle(100);
//! assert_eq!(doc.tokenizer_name(), Some("Rust"));
//! assert_eq!(doc.styled_line(1).map(|l| l.text()).as_deref(), Some("// done"));
//! ```

use std::ops::{Deref, Range};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use super::highlighter::{HighlightStats, Highlighter, Phase, StepReport};
use super::observer::{ObserverId, Observers};
use super::scheduler::{ManualScheduler, Scheduler, ThreadScheduler};
use super::styled::{BlockId, StyledLine};
use super::theme::Theme;
use super::tokenizer::Tokenizer;
use crate::error::{Error, Result};
use crate::options::HighlightOptions;
use crate::text::{Document, LineEdit, Position};

struct Shared {
    highlighter: Mutex<Highlighter>,
    running: AtomicBool,
    observers: Observers,
    step_delay: Duration,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Highlighter> {
        self.highlighter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// One step; returns the report and the delay before the next one.
    fn run_step(&self) -> (Option<StepReport>, Option<Duration>) {
        let (report, more) = {
            let mut highlighter = self.lock();
            self.running.store(true, Ordering::SeqCst);
            let report = highlighter.step();
            self.running.store(false, Ordering::SeqCst);
            (report, highlighter.phase() == Phase::Scheduled)
        };

        if report.is_some() {
            self.observers.notify();
        }
        (report, more.then_some(self.step_delay))
    }
}

enum Driver {
    Worker(ThreadScheduler),
    Manual(ManualScheduler),
    Closed,
}

impl Driver {
    fn schedule(&self, delay: Duration) {
        match self {
            Self::Worker(worker) => worker.schedule(delay),
            Self::Manual(manual) => manual.schedule(delay),
            Self::Closed => {}
        }
    }
}

/// Read guard over the highlighter state.
///
/// Holding it blocks edits and refresh steps, so several reads made through
/// it are mutually consistent.
pub struct DocumentLock<'a> {
    guard: MutexGuard<'a, Highlighter>,
}

impl Deref for DocumentLock<'_> {
    type Target = Highlighter;

    fn deref(&self) -> &Highlighter {
        &self.guard
    }
}

/// Editable, incrementally highlighted document.
pub struct HighlightedDocument {
    shared: Arc<Shared>,
    driver: Driver,
    options: HighlightOptions,
}

impl std::fmt::Debug for HighlightedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HighlightedDocument")
            .field("highlighter", &*self.shared.lock())
            .field("observers", &self.shared.observers)
            .finish_non_exhaustive()
    }
}

impl HighlightedDocument {
    /// Open `text` with a background worker; the first pass starts after
    /// `initial_delay`.
    pub fn spawn(text: &str, path: Option<PathBuf>, options: HighlightOptions) -> Result<Self> {
        let highlighter = Highlighter::new(Document::from_text(text), path, options);
        Self::spawn_with(highlighter)
    }

    /// Run an already configured highlighter on a background worker.
    pub fn spawn_with(highlighter: Highlighter) -> Result<Self> {
        let options = highlighter.options().clone();
        let shared = Self::share(highlighter, &options);
        let weak: Weak<Shared> = Arc::downgrade(&shared);
        let worker = ThreadScheduler::spawn("highlight-worker", move || {
            weak.upgrade().and_then(|shared| shared.run_step().1)
        })?;
        worker.schedule(options.initial_delay);
        Ok(Self {
            shared,
            driver: Driver::Worker(worker),
            options,
        })
    }

    /// Open `text` without a worker; the caller runs steps with
    /// [`Self::run_step`] or [`Self::run_until_idle`].
    #[must_use]
    pub fn manual(text: &str, path: Option<PathBuf>, options: HighlightOptions) -> Self {
        Self::manual_with(Highlighter::new(Document::from_text(text), path, options))
    }

    #[must_use]
    pub fn manual_with(highlighter: Highlighter) -> Self {
        let options = highlighter.options().clone();
        let shared = Self::share(highlighter, &options);
        let manual = ManualScheduler::new();
        manual.schedule(options.initial_delay);
        Self {
            shared,
            driver: Driver::Manual(manual),
            options,
        }
    }

    fn share(highlighter: Highlighter, options: &HighlightOptions) -> Arc<Shared> {
        Arc::new(Shared {
            highlighter: Mutex::new(highlighter),
            running: AtomicBool::new(false),
            observers: Observers::new(),
            step_delay: options.step_delay,
        })
    }

    fn edit<T>(&self, f: impl FnOnce(&mut Highlighter) -> Result<T>) -> Result<T> {
        if matches!(self.driver, Driver::Closed) {
            return Err(Error::WorkerDisconnected);
        }
        let out = f(&mut self.shared.lock())?;
        self.driver.schedule(self.options.edit_debounce);
        Ok(out)
    }

    /// Insert text at a position.
    pub fn insert(&self, at: Position, text: &str) -> Result<LineEdit> {
        self.edit(|h| h.insert(at, text))
    }

    /// Remove the text between two positions.
    pub fn remove(&self, start: Position, end: Position) -> Result<LineEdit> {
        self.edit(|h| h.remove(start, end))
    }

    /// Replace the text between two positions.
    pub fn replace(&self, start: Position, end: Position, text: &str) -> Result<LineEdit> {
        self.edit(|h| h.replace(start, end, text))
    }

    /// Replace `removed` whole lines at `start` with `lines`.
    pub fn splice_lines(&self, start: usize, removed: usize, lines: &[&str]) -> Result<LineEdit> {
        self.edit(|h| h.splice_lines(start, removed, lines))
    }

    /// Replace the whole text.
    pub fn set_text(&self, text: &str) -> Result<LineEdit> {
        self.edit(|h| Ok(h.set_text(text)))
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.edit(|h| {
            h.set_theme(theme);
            Ok(())
        })
    }

    pub fn set_tokenizer(&self, tokenizer: Option<Arc<dyn Tokenizer>>) -> Result<()> {
        self.edit(|h| {
            h.set_tokenizer(tokenizer);
            Ok(())
        })
    }

    pub fn set_file_path(&self, path: Option<PathBuf>) -> Result<()> {
        self.edit(|h| {
            h.set_file_path(path);
            Ok(())
        })
    }

    /// Lock the state for several consistent reads.
    pub fn lock(&self) -> DocumentLock<'_> {
        DocumentLock {
            guard: self.shared.lock(),
        }
    }

    /// Styled copies of a line range, clamped to the document.
    #[must_use]
    pub fn styled_lines(&self, range: Range<usize>) -> Vec<StyledLine> {
        self.shared.lock().cache().snapshot(range)
    }

    #[must_use]
    pub fn styled_line(&self, index: usize) -> Option<StyledLine> {
        self.shared.lock().cache().line(index).cloned()
    }

    #[must_use]
    pub fn block_ids(&self) -> Vec<BlockId> {
        self.shared.lock().cache().blocks().to_vec()
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.shared.lock().document().text()
    }

    #[must_use]
    pub fn len_lines(&self) -> usize {
        self.shared.lock().document().len_lines()
    }

    #[must_use]
    pub fn file_path(&self) -> Option<PathBuf> {
        self.shared.lock().file_path().map(PathBuf::from)
    }

    #[must_use]
    pub fn tokenizer_name(&self) -> Option<&'static str> {
        self.shared.lock().tokenizer_name()
    }

    #[must_use]
    pub fn stats(&self) -> HighlightStats {
        self.shared.lock().stats()
    }

    #[must_use]
    pub const fn options(&self) -> &HighlightOptions {
        &self.options
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        if self.shared.running.load(Ordering::SeqCst) {
            Phase::Running
        } else {
            self.shared.lock().phase()
        }
    }

    /// Delay most recently requested of a manual document's scheduler.
    #[must_use]
    pub fn pending_delay(&self) -> Option<Duration> {
        match &self.driver {
            Driver::Manual(manual) => manual.pending(),
            Driver::Worker(_) | Driver::Closed => None,
        }
    }

    /// Run one refresh step on the calling thread.
    pub fn run_step(&self) -> Option<StepReport> {
        if let Driver::Manual(manual) = &self.driver {
            manual.take();
        }
        self.shared.run_step().0
    }

    /// Step until idle or until `max_steps` steps ran; returns steps taken.
    pub fn run_until_idle(&self, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps && self.run_step().is_some() {
            steps += 1;
        }
        steps
    }

    /// Run `callback` after every refresh step.
    pub fn subscribe<F>(&self, callback: F) -> ObserverId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.shared.observers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.shared.observers.unsubscribe(id)
    }

    /// Single-slot channel signalled after refresh steps.
    pub fn watch(&self) -> Receiver<()> {
        self.shared.observers.watch()
    }

    /// Stop the worker, waiting for a step in progress. Later edits fail with
    /// [`Error::WorkerDisconnected`]; reads keep working.
    pub fn close(&mut self) {
        if let Driver::Worker(worker) = std::mem::replace(&mut self.driver, Driver::Closed) {
            worker.shutdown();
        }
    }
}
