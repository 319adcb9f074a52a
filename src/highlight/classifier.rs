//! Turns a token span stream into styled lines tagged with block ids.
//!
//! Every span is styled through the theme, split on line breaks, and appended
//! to the output lines. The counter advances after every span that does not
//! continue a multi-line construct.
//!
//! A line that starts outside any construct is stamped with the counter, and
//! restamped whenever a span puts text on it, so it ends up in the block of
//! its last token. A line that starts inside a construct takes the block of
//! the line above and keeps it, whatever follows the construct's end on that
//! line. The lines a construct spans therefore share one id, and the first
//! line of a block always starts outside any construct.

use super::styled::{BlockId, StyledLine};
use super::theme::Theme;
use super::token::{TokenKind, TokenSpan};

/// Output of one classification pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classified {
    pub lines: Vec<StyledLine>,
    pub blocks: Vec<BlockId>,
    /// First line of the block holding the first error token.
    pub error: Option<usize>,
    /// First line of the block of a construct still open at the end.
    pub open: Option<usize>,
    /// Counter value after the last span.
    pub next_block: u64,
}

/// Classify `spans` into styled lines.
///
/// `leading` lines are emitted first in the whitespace style, stamped with
/// `first_block`; they stand in for blank lines the caller kept away from the
/// tokenizer.
pub fn classify<'a, I>(spans: I, theme: &Theme, first_block: u64, leading: &[&str]) -> Classified
where
    I: IntoIterator<Item = TokenSpan<'a>>,
{
    let blank_style = theme.style_for(TokenKind::Whitespace);
    let mut lines: Vec<StyledLine> = leading
        .iter()
        .map(|text| StyledLine::plain(text, blank_style))
        .collect();
    let mut blocks = vec![BlockId::Block(first_block); lines.len()];
    lines.push(StyledLine::new());
    blocks.push(BlockId::Block(first_block));

    let mut counter = first_block;
    let mut run_start = None;
    let mut error = None;
    let mut last_continues = false;
    // The last line began inside a construct; its block is fixed.
    let mut line_inherited = false;

    for span in spans {
        let style = theme.style_for(span.kind);
        let first_line = lines.len() - 1;
        if span.kind.is_error() && error.is_none() {
            error = Some(first_line);
        }

        let mut pieces = span.text.split('\n').peekable();
        if let Some(piece) = pieces.next().filter(|p| !p.is_empty()) {
            lines[first_line].push(piece, style);
            if !line_inherited {
                blocks[first_line] = BlockId::Block(counter);
            }
        }
        while let Some(piece) = pieces.next() {
            let inside = span.continues || !piece.is_empty() || pieces.peek().is_some();
            let block = if inside {
                blocks[lines.len() - 1]
            } else {
                BlockId::Block(counter)
            };
            lines.push(StyledLine::plain(piece, style));
            blocks.push(block);
            line_inherited = inside;
        }

        if span.continues {
            run_start.get_or_insert(first_line);
        } else {
            counter += 1;
            run_start = None;
        }
        last_continues = span.continues;
    }

    let block_start = |line: usize| {
        let block = blocks[line];
        blocks[..line]
            .iter()
            .rposition(|&b| b != block)
            .map_or(0, |prev| prev + 1)
    };
    let error = error.map(block_start);
    let open = if last_continues {
        run_start.map(block_start)
    } else {
        None
    };

    Classified {
        lines,
        blocks,
        error,
        open,
        next_block: counter,
    }
}
