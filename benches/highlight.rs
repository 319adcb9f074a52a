//! Incremental highlighting performance benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use incremental_highlight::highlight::languages::CFamilyTokenizer;
use incremental_highlight::highlight::tokenizer::{LineState, TokenStream, Tokenizer};
use incremental_highlight::highlight::{ChangeRange, classify};
use incremental_highlight::{Document, HighlightOptions, Highlighter, Position, Theme};
use std::hint::black_box;
use std::path::PathBuf;

const SAMPLE_LINES: [&str; 4] = [
    "fn main() { println!(\"hello\"); }",
    "let x: HashMap<String, Vec<u32>> = HashMap::new();",
    "/// This is a doc comment with `code`",
    "#[derive(Debug, Clone)]",
];

fn build_source(lines: usize) -> String {
    let line = "fn example() { let x = 42; println!(\"{x}\"); }\n";
    let mut text = String::with_capacity(lines * line.len());
    for _ in 0..lines {
        text.push_str(line);
    }
    text
}

fn highlighter(source: &str) -> Highlighter {
    Highlighter::new(
        Document::from_text(source),
        Some(PathBuf::from("bench.rs")),
        HighlightOptions::default(),
    )
}

fn bench_tokenize_line(c: &mut Criterion) {
    let tokenizer = CFamilyTokenizer::rust();
    let mut group = c.benchmark_group("highlight_tokenize_line");
    for (idx, line) in SAMPLE_LINES.iter().enumerate() {
        group.bench_with_input(BenchmarkId::new("line", idx), line, |b, input| {
            b.iter(|| tokenizer.tokenize_line(black_box(input), LineState::Normal));
        });
    }
    group.finish();
}

fn bench_classify_window(c: &mut Criterion) {
    let tokenizer = CFamilyTokenizer::rust();
    let theme = Theme::default();
    let source = build_source(30);
    c.bench_function("highlight_classify_window_30", |b| {
        b.iter(|| classify(TokenStream::new(&tokenizer, black_box(&source)), &theme, 0, &[]));
    });
}

fn bench_full_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("highlight_full_pass");
    for lines in [1_000usize, 10_000] {
        let source = build_source(lines);
        group.bench_with_input(BenchmarkId::new("lines", lines), &source, |b, source| {
            b.iter_batched(
                || highlighter(source),
                |mut hl| {
                    hl.run_until_idle(usize::MAX);
                    black_box(hl);
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_single_step(c: &mut Criterion) {
    let source = build_source(2_000);
    let mut hl = highlighter(&source);
    hl.run_until_idle(usize::MAX);

    c.bench_function("highlight_step_after_edit", |b| {
        b.iter(|| {
            hl.insert(Position::new(100, 4), " ").ok();
            hl.remove(Position::new(100, 4), Position::new(100, 5)).ok();
            black_box(hl.step());
        });
    });
}

fn bench_change_merge(c: &mut Criterion) {
    c.bench_function("highlight_change_merge", |b| {
        b.iter(|| {
            let mut change = ChangeRange::new(500, 1, 1);
            for line in (0..1_000).step_by(7) {
                change = change.merge(ChangeRange::new(black_box(line), 1, 2));
            }
            black_box(change)
        });
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let source = build_source(1_000);
    let mut hl = highlighter(&source);
    hl.run_until_idle(usize::MAX);

    c.bench_function("highlight_snapshot_60_lines", |b| {
        b.iter(|| black_box(hl.cache().snapshot(black_box(400..460))));
    });
}

criterion_group!(
    benches,
    bench_tokenize_line,
    bench_classify_window,
    bench_full_pass,
    bench_single_step,
    bench_change_merge,
    bench_snapshot
);
criterion_main!(benches);
