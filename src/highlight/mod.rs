//! Incremental syntax highlighting.
//!
//! A [`Highlighter`] keeps a [`StyledLineCache`] aligned with a
//! [`Document`](crate::text::Document) and re-tokenizes it one window at a
//! time. [`HighlightedDocument`] shares one between an editing thread and a
//! background worker.

pub mod change;
pub mod classifier;
pub mod document;
pub mod highlighter;
pub mod languages;
pub mod observer;
pub mod registry;
pub mod scheduler;
pub mod styled;
pub mod theme;
pub mod token;
pub mod tokenizer;

pub use change::{ChangeRange, ChangeTracker};
pub use classifier::{Classified, classify};
pub use document::{DocumentLock, HighlightedDocument};
pub use highlighter::{HighlightStats, Highlighter, Phase, RefreshCursor, StepReport};
pub use observer::{ObserverId, Observers};
pub use registry::{Resolution, TokenizerRegistry};
pub use scheduler::{ManualScheduler, Scheduler, ThreadScheduler};
pub use styled::{BlockId, StyledLine, StyledLineCache, StyledRun};
pub use theme::{Theme, ThemeRegistry};
pub use token::{Token, TokenKind, TokenSpan};
pub use tokenizer::{CommentKind, LineState, StringKind, TokenStream, Tokenizer};
