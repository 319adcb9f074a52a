//! Fuzz target for the bundled tokenizers.
//!
//! Every tokenizer must cover arbitrary text with spans that reassemble into
//! the input, one output line per input line.

#![no_main]

use incremental_highlight::Theme;
use incremental_highlight::highlight::{TokenStream, TokenizerRegistry, classify};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let registry = TokenizerRegistry::with_builtins();
    let theme = Theme::default();
    let expected: Vec<&str> = data.split('\n').collect();

    for name in registry.names() {
        let Some(tokenizer) = registry.by_name(name) else {
            continue;
        };
        let rebuilt: String = TokenStream::new(tokenizer.as_ref(), data)
            .map(|span| span.text)
            .collect();
        assert_eq!(rebuilt, data, "{name} lost text");

        let out = classify(TokenStream::new(tokenizer.as_ref(), data), &theme, 0, &[]);
        assert_eq!(out.lines.len(), expected.len(), "{name} line count");
        assert_eq!(out.blocks.len(), out.lines.len());
    }
});
