//! Text storage for highlighted documents.
//!
//! The [`Document`] is the ground truth content: an ordered, index-addressed
//! sequence of lines backed by a rope. Edits report the line span they touched
//! as a [`LineEdit`] so the highlighter can invalidate exactly those lines.
//!
//! ```
//! use incremental_highlight::text::{Document, LineEdit, Position};
//!
//! let mut doc = Document::from_text("fn main() {\n}\n");
//! let edit = doc.insert(Position::new(1, 0), "    body();\n").unwrap();
//! assert_eq!(edit, LineEdit::new(1, 1, 2));
//! assert_eq!(doc.line(1).as_deref(), Some("    body();"));
//! ```

mod document;

pub use document::{Document, LineEdit, Position};
