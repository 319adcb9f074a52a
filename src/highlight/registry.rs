//! Tokenizer lookup: by name, extension, file name, and content sniffing.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use super::languages::{CFamilyTokenizer, PlainTextTokenizer, PythonTokenizer};
use super::tokenizer::Tokenizer;

/// Minimum [`Tokenizer::sniff`] score that counts as a match.
const SNIFF_THRESHOLD: u8 = 20;

/// How [`TokenizerRegistry::resolve`] picked its tokenizer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    FileName,
    Extension,
    Content,
    Fallback,
}

pub struct TokenizerRegistry {
    tokenizers: Vec<Arc<dyn Tokenizer>>,
    by_extension: HashMap<String, usize>,
    by_filename: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    fallback: Arc<dyn Tokenizer>,
}

impl Default for TokenizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TokenizerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenizerRegistry")
            .field(
                "tokenizers",
                &self.tokenizers.iter().map(|t| t.name()).collect::<Vec<_>>(),
            )
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

impl TokenizerRegistry {
    /// Empty registry that resolves everything to plain text.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokenizers: Vec::new(),
            by_extension: HashMap::new(),
            by_filename: HashMap::new(),
            by_name: HashMap::new(),
            fallback: Arc::new(PlainTextTokenizer),
        }
    }

    /// Register a tokenizer. Later registrations override existing lookups.
    pub fn register(&mut self, tokenizer: Arc<dyn Tokenizer>) {
        let index = self.tokenizers.len();
        let name_key = tokenizer.name().to_ascii_lowercase();
        self.by_name.insert(name_key, index);

        for ext in tokenizer.extensions() {
            let key = ext.trim_start_matches('.').to_ascii_lowercase();
            if !key.is_empty() {
                self.by_extension.insert(key, index);
            }
        }
        for name in tokenizer.filenames() {
            self.by_filename.insert((*name).to_string(), index);
        }

        self.tokenizers.push(tokenizer);
    }

    /// Replace the tokenizer used when nothing else matches.
    pub fn set_fallback(&mut self, tokenizer: Arc<dyn Tokenizer>) {
        self.fallback = tokenizer;
    }

    #[must_use]
    pub fn fallback(&self) -> Arc<dyn Tokenizer> {
        Arc::clone(&self.fallback)
    }

    /// Get tokenizer by file extension (case-insensitive, with or without dot).
    #[must_use]
    pub fn for_extension(&self, ext: &str) -> Option<Arc<dyn Tokenizer>> {
        let key = ext.trim_start_matches('.').to_ascii_lowercase();
        let index = self.by_extension.get(&key)?;
        self.tokenizers.get(*index).cloned()
    }

    /// Get tokenizer by exact file name (`SConstruct`, ...).
    #[must_use]
    pub fn for_filename(&self, name: &str) -> Option<Arc<dyn Tokenizer>> {
        let index = self.by_filename.get(name)?;
        self.tokenizers.get(*index).cloned()
    }

    /// Get tokenizer by name (case-insensitive).
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn Tokenizer>> {
        let key = name.to_ascii_lowercase();
        let index = self.by_name.get(&key)?;
        self.tokenizers.get(*index).cloned()
    }

    /// Best content match, if any tokenizer is confident enough.
    #[must_use]
    pub fn sniff(&self, sample: &str) -> Option<Arc<dyn Tokenizer>> {
        self.tokenizers
            .iter()
            .map(|t| (t.sniff(sample), t))
            .filter(|(score, _)| *score >= SNIFF_THRESHOLD)
            .max_by_key(|(score, _)| *score)
            .map(|(_, t)| Arc::clone(t))
    }

    /// Pick a tokenizer for a document. Never fails: file name, then
    /// extension, then content, then the plain-text fallback.
    #[must_use]
    pub fn resolve(&self, path: Option<&Path>, sample: &str) -> (Arc<dyn Tokenizer>, Resolution) {
        let by_path = path.and_then(|path| {
            let name = path.file_name().and_then(|n| n.to_str());
            if let Some(t) = name.and_then(|n| self.for_filename(n)) {
                return Some((t, Resolution::FileName));
            }
            let ext = path.extension().and_then(|e| e.to_str())?;
            self.for_extension(ext).map(|t| (t, Resolution::Extension))
        });

        let (tokenizer, how) = by_path
            .or_else(|| self.sniff(sample).map(|t| (t, Resolution::Content)))
            .unwrap_or_else(|| (self.fallback(), Resolution::Fallback));

        debug!(
            tokenizer = tokenizer.name(),
            path = ?path,
            resolution = ?how,
            "resolved tokenizer"
        );
        (tokenizer, how)
    }

    /// Registered tokenizer names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tokenizers.iter().map(|t| t.name())
    }

    /// Create registry with all built-in tokenizers.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PlainTextTokenizer));
        registry.register(Arc::new(CFamilyTokenizer::c()));
        registry.register(Arc::new(CFamilyTokenizer::javascript()));
        registry.register(Arc::new(PythonTokenizer));
        registry.register(Arc::new(CFamilyTokenizer::rust()));
        registry
    }
}
