use crate::error::ExtractionError;
use crate::extractor::{isolate, DocumentFormat, StrategyFailure, TextExtractor};
use crate::models::ExtractionMethod;
use crate::text::{clean, TextValidator};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// PDF engine A: pdf-extract's content-stream interpreter
pub struct PdfExtractEngine;

impl PdfExtractEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfExtractEngine {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PdfEngineA
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        format == DocumentFormat::Pdf
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        isolate("pdf-extract", || {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Malformed {
                format: "pdf",
                message: e.to_string(),
            })
        })
    }
}

/// PDF engine B: lopdf, page by page
pub struct LopdfEngine;

impl LopdfEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LopdfEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for LopdfEngine {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PdfEngineB
    }

    fn supports(&self, format: DocumentFormat) -> bool {
        format == DocumentFormat::Pdf
    }

    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        isolate("lopdf", || {
            let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractionError::Malformed {
                format: "pdf",
                message: e.to_string(),
            })?;

            let mut text_content = String::new();
            let mut failed_pages = 0usize;
            let pages = doc.get_pages();

            for page_num in pages.keys() {
                match doc.extract_text(&[*page_num]) {
                    Ok(page_text) => {
                        text_content.push_str(&page_text);
                        text_content.push('\n');
                    }
                    Err(e) => {
                        debug!("lopdf could not read page {}: {}", page_num, e);
                        failed_pages += 1;
                    }
                }
            }

            if !pages.is_empty() && failed_pages == pages.len() {
                return Err(ExtractionError::Malformed {
                    format: "pdf",
                    message: format!("no readable pages out of {}", pages.len()),
                });
            }

            Ok(text_content)
        })
    }
}

/// Text accepted from one engine of the chain, already cleaned
#[derive(Debug, Clone, PartialEq)]
pub struct ChainSuccess {
    pub text: String,
    pub method: ExtractionMethod,
}

/// Ordered list of independent PDF engines. The first engine whose output is
/// non-empty, passes the validity heuristic and survives cleaning with at
/// least `min_chars` characters wins.
pub struct PdfStrategyChain {
    engines: Vec<Arc<dyn TextExtractor>>,
    validator: Arc<TextValidator>,
    min_chars: usize,
}

impl PdfStrategyChain {
    pub fn new(
        engines: Vec<Arc<dyn TextExtractor>>,
        validator: Arc<TextValidator>,
        min_chars: usize,
    ) -> Self {
        Self {
            engines,
            validator,
            min_chars,
        }
    }

    /// pdf-extract first, then lopdf
    pub fn with_default_engines(validator: Arc<TextValidator>, min_chars: usize) -> Self {
        let engines: Vec<Arc<dyn TextExtractor>> =
            vec![Arc::new(PdfExtractEngine::new()), Arc::new(LopdfEngine::new())];
        Self::new(engines, validator, min_chars)
    }

    pub fn engines(&self) -> impl Iterator<Item = ExtractionMethod> + '_ {
        self.engines.iter().map(|e| e.method())
    }

    /// Run engines in order; on total failure return one diagnostic per engine
    pub fn run(&self, bytes: &[u8]) -> Result<ChainSuccess, Vec<StrategyFailure>> {
        let mut failures = Vec::new();

        for engine in &self.engines {
            let method = engine.method();
            match self.try_engine(engine.as_ref(), bytes) {
                Ok(text) => {
                    info!("PDF text accepted from {} ({} chars)", method, text.len());
                    return Ok(ChainSuccess { text, method });
                }
                Err(e) => {
                    warn!("PDF engine {} rejected: {}", method, e);
                    failures.push(StrategyFailure::new(method.as_str(), e.to_string()));
                }
            }
        }

        Err(failures)
    }

    fn try_engine(&self, engine: &dyn TextExtractor, bytes: &[u8]) -> Result<String, ExtractionError> {
        let raw = engine.extract(bytes)?;
        if raw.trim().is_empty() {
            return Err(ExtractionError::Empty(engine.method().as_str()));
        }

        let verdict = self.validator.evaluate(&raw);
        if !verdict.is_valid() {
            debug!("{} output failed validity check: {}", engine.method(), verdict);
            return Err(ExtractionError::Invalid);
        }

        let cleaned = clean(&raw);
        let len = cleaned.chars().count();
        if len < self.min_chars {
            return Err(ExtractionError::TooShort {
                len,
                min: self.min_chars,
            });
        }

        Ok(cleaned)
    }
}
