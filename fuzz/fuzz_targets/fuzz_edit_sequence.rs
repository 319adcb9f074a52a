//! Fuzz target for edits interleaved with refresh steps.
//!
//! The styled cache must stay aligned with the document after every edit and
//! every step, and a pass must end with every line resolved.

#![no_main]

use arbitrary::Arbitrary;
use incremental_highlight::{Document, HighlightOptions, Highlighter, Phase, Position};
use libfuzzer_sys::fuzz_target;
use std::path::PathBuf;

#[derive(Arbitrary, Debug)]
enum Op {
    Insert { line: u16, column: u8, text: String },
    RemoveLines { line: u16, count: u8 },
    Step,
}

#[derive(Arbitrary, Debug)]
struct Input {
    text: String,
    chunk: u8,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let options = HighlightOptions::default()
        .with_chunk_lines(usize::from(input.chunk))
        .with_max_width(256);
    let mut hl = Highlighter::new(
        Document::from_text(&input.text),
        Some(PathBuf::from("fuzz.rs")),
        options,
    );

    for op in input.ops.iter().take(64) {
        let len = hl.document().len_lines();
        match op {
            Op::Insert { line, column, text } => {
                let line = usize::from(*line) % len;
                let _ = hl.insert(Position::new(line, usize::from(*column)), text);
            }
            Op::RemoveLines { line, count } => {
                let start = usize::from(*line) % len;
                let removed = usize::from(*count).min(len - start);
                let _ = hl.splice_lines(start, removed, &[]);
            }
            Op::Step => {
                let _ = hl.step();
            }
        }
        assert_eq!(hl.cache().len(), hl.document().len_lines());
    }

    let mut steps = 0;
    while hl.step().is_some() {
        steps += 1;
        assert!(steps < 1_000_000, "refresh pass did not terminate");
    }
    assert_eq!(hl.phase(), Phase::Idle);
    assert!(hl.cache().blocks().iter().all(|b| b.is_block()));
});
