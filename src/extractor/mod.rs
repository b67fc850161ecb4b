pub mod docx;
pub mod format;
pub mod pdf;
pub mod rtf;
pub mod text;
pub mod r#trait;

pub use docx::DocxExtractor;
pub use format::DocumentFormat;
pub use pdf::{ChainSuccess, LopdfEngine, PdfExtractEngine, PdfStrategyChain};
pub use r#trait::TextExtractor;
pub use rtf::RtfExtractor;
pub use text::PlainTextExtractor;

use crate::error::ExtractionError;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Why one strategy (extractor, engine, OCR, cache) did not produce text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    pub strategy: String,
    pub reason: String,
}

impl StrategyFailure {
    pub fn new(strategy: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for StrategyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.strategy, self.reason)
    }
}

/// Run a third-party parser, turning a panic into `ExtractionError::Panicked`
pub(crate) fn isolate<F>(engine: &'static str, f: F) -> Result<String, ExtractionError>
where
    F: FnOnce() -> Result<String, ExtractionError>,
{
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or(Err(ExtractionError::Panicked(engine)))
}

/// Registry of standard (non-PDF) format extractors
pub struct ExtractorRegistry {
    extractors: Vec<Arc<dyn TextExtractor>>,
}

impl ExtractorRegistry {
    /// Create a new registry with the plain text, RTF and DOCX extractors
    pub fn new() -> Self {
        let mut registry = Self {
            extractors: Vec::new(),
        };

        registry.register(Arc::new(PlainTextExtractor::new()));
        registry.register(Arc::new(RtfExtractor::new()));
        registry.register(Arc::new(DocxExtractor::new()));

        registry
    }

    /// Register a new extractor; earlier registrations win
    pub fn register(&mut self, extractor: Arc<dyn TextExtractor>) {
        self.extractors.push(extractor);
    }

    /// Find the extractor for a format
    pub fn get(&self, format: DocumentFormat) -> Option<Arc<dyn TextExtractor>> {
        self.extractors
            .iter()
            .find(|e| e.supports(format))
            .cloned()
    }
}

impl Default for ExtractorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
