//! Error types for document editing and the highlight worker.

use std::fmt;
use std::io;

/// Result type alias for incremental-highlight operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for incremental-highlight operations.
///
/// Highlighting itself never fails: lexer lookup falls back to plain text and
/// tokenizer error tokens only widen the next refresh window. These variants
/// cover the editing surface and the background worker.
#[derive(Debug)]
pub enum Error {
    /// I/O error while spawning the highlight worker thread.
    Io(io::Error),
    /// Line index past the end of the document.
    LineOutOfBounds { line: usize, len: usize },
    /// Column past the end of a line (columns count chars, not bytes).
    ColumnOutOfBounds {
        line: usize,
        column: usize,
        len: usize,
    },
    /// Edit range whose start lies after its end.
    InvalidRange {
        start: (usize, usize),
        end: (usize, usize),
    },
    /// Invalid color format (e.g., malformed hex string).
    InvalidColor(String),
    /// No theme registered under this name.
    UnknownTheme(String),
    /// The highlight worker thread is gone.
    WorkerDisconnected,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::LineOutOfBounds { line, len } => {
                write!(f, "line {line} out of bounds for document of {len} lines")
            }
            Self::ColumnOutOfBounds { line, column, len } => {
                write!(
                    f,
                    "column {column} out of bounds for line {line} of {len} chars"
                )
            }
            Self::InvalidRange { start, end } => write!(
                f,
                "invalid range: start {}:{} is after end {}:{}",
                start.0, start.1, end.0, end.1
            ),
            Self::InvalidColor(s) => write!(f, "invalid color format: {s}"),
            Self::UnknownTheme(name) => write!(f, "unknown theme: {name}"),
            Self::WorkerDisconnected => write!(f, "highlight worker disconnected"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::LineOutOfBounds { line: 12, len: 3 };
        assert!(err.to_string().contains("line 12"));

        let err = Error::ColumnOutOfBounds {
            line: 1,
            column: 40,
            len: 5,
        };
        assert!(err.to_string().contains("column 40"));

        let err = Error::InvalidRange {
            start: (4, 2),
            end: (1, 0),
        };
        assert!(err.to_string().contains("4:2"));

        let err = Error::InvalidColor("nope".to_string());
        assert!(err.to_string().contains("invalid color format"));

        let err = Error::UnknownTheme("neon".to_string());
        assert_eq!(err.to_string(), "unknown theme: neon");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::WouldBlock, "spawn");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
