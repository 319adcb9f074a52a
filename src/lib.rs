//! Incremental syntax highlighting for live, editable text.
//!
//! Edits mark line ranges dirty; a refresh step re-tokenizes one window of
//! lines, widening it when a multi-line construct or an error token crosses
//! the window end, until the styled shadow of the document is current again.
//! Steps run on a background worker or wherever the caller drives them.

// Crate-level lint configuration
#![allow(clippy::cast_possible_truncation)] // Intentional color channel casts
#![allow(clippy::cast_precision_loss)] // Intentional for color math
#![allow(clippy::module_name_repetitions)] // Allow highlight::HighlightStats etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::needless_pass_by_value)] // Allow pass by value for small Copy types
#![allow(clippy::suboptimal_flops)] // Standard math notation is clearer than mul_add
#![allow(clippy::collapsible_if)] // Sometimes nested ifs are clearer
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests
#![allow(clippy::redundant_clone)] // Clones in tests for clarity are fine
#![allow(clippy::semicolon_if_nothing_returned)] // Style preference
#![allow(clippy::needless_collect)] // Collect for assertions is clear

pub mod color;
pub mod error;
pub mod highlight;
pub mod options;
pub mod style;
pub mod text;

// Re-export core types at crate root
pub use color::Rgba;
pub use error::{Error, Result};
pub use options::HighlightOptions;
pub use style::{Style, TextAttributes};
pub use text::{Document, LineEdit, Position};

// Re-export commonly used highlighting types
pub use highlight::{
    BlockId, ChangeRange, HighlightStats, HighlightedDocument, Highlighter, Phase, RefreshCursor,
    StepReport, StyledLine, Theme, TokenKind, Tokenizer, TokenizerRegistry,
};
