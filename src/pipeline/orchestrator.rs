use crate::config::{Config, ExtractionConfig, RetryConfig};
use crate::error::{CollaboratorError, ExtractionError};
use crate::extractor::{DocumentFormat, ExtractorRegistry, PdfStrategyChain, StrategyFailure};
use crate::models::{DocumentRef, DocumentVersionRef, ExtractionMethod, ExtractionOutcome};
use crate::ocr::{OcrProvider, OcrResponse};
use crate::storage::DocumentStore;
use crate::text::{clean, TextValidator};
use crate::utils;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Per-request extraction switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionOptions {
    /// Ignore cached text and, for PDFs, try OCR before the engine chain
    pub force_ocr: bool,
}

/// Runs the extraction stages for one document version:
/// cache, download, format extractor or PDF chain, OCR, then total failure.
pub struct ExtractionOrchestrator {
    store: Arc<dyn DocumentStore>,
    ocr: Option<Arc<dyn OcrProvider>>,
    registry: Arc<ExtractorRegistry>,
    pdf_chain: Arc<PdfStrategyChain>,
    validator: Arc<TextValidator>,
    limits: ExtractionConfig,
    retry: RetryConfig,
    download_timeout: Duration,
    ocr_timeout: Duration,
}

impl ExtractionOrchestrator {
    /// Orchestrator with the built-in extractors and PDF engines
    pub fn new(
        store: Arc<dyn DocumentStore>,
        ocr: Option<Arc<dyn OcrProvider>>,
        config: &Config,
    ) -> Self {
        let validator = Arc::new(TextValidator::new(config.validity.clone()));
        let pdf_chain = Arc::new(PdfStrategyChain::with_default_engines(
            validator.clone(),
            config.extraction.min_text_chars,
        ));
        Self::with_pdf_chain(store, ocr, pdf_chain, validator, config)
    }

    /// Orchestrator with an explicit PDF engine chain
    pub fn with_pdf_chain(
        store: Arc<dyn DocumentStore>,
        ocr: Option<Arc<dyn OcrProvider>>,
        pdf_chain: Arc<PdfStrategyChain>,
        validator: Arc<TextValidator>,
        config: &Config,
    ) -> Self {
        Self {
            store,
            ocr,
            registry: Arc::new(ExtractorRegistry::new()),
            pdf_chain,
            validator,
            limits: config.extraction.clone(),
            retry: config.retry.clone(),
            download_timeout: config.storage.download_timeout(),
            ocr_timeout: config.ocr.timeout(),
        }
    }

    /// Extract text for `version` of `document`. Never fails outright; the
    /// outcome carries either the accepted text or every stage's diagnostic.
    pub async fn extract(
        &self,
        document: &DocumentRef,
        version: &DocumentVersionRef,
        options: ExtractionOptions,
    ) -> ExtractionOutcome {
        let mut failures = Vec::new();

        if options.force_ocr {
            debug!("Skipping cached text for {}: forced re-extraction", version.id);
        } else if let Some(cached) = &version.cached_text {
            match self.accept_cached(cached) {
                Ok(text) => {
                    let len = text.chars().count();
                    info!("Using cached text for {} ({} chars)", version.id, len);
                    return ExtractionOutcome::success(text, ExtractionMethod::Cached);
                }
                Err(e) => {
                    debug!("Cached text for {} rejected: {}", version.id, e);
                    failures.push(StrategyFailure::new(
                        ExtractionMethod::Cached.as_str(),
                        e.to_string(),
                    ));
                }
            }
        }

        let storage_path = version.storage_path.as_str();
        let bytes = match utils::call_with_retry(
            "download",
            self.download_timeout,
            &self.retry,
            || self.store.download(storage_path),
        )
        .await
        {
            Ok(bytes) => Arc::new(bytes),
            Err(e) => {
                warn!("Download of {} failed: {}", storage_path, e);
                return ExtractionOutcome::failure(format!("download failed: {}", e));
            }
        };
        debug!("Downloaded {} ({} bytes)", storage_path, bytes.len());

        let Some(format) = DocumentFormat::detect(&document.declared_type, &document.name, &bytes)
        else {
            let declared = if document.declared_type.is_empty() {
                document.name.as_str()
            } else {
                document.declared_type.as_str()
            };
            failures.push(StrategyFailure::new(
                "format detection",
                ExtractionError::UnsupportedFormat(declared.to_string()).to_string(),
            ));
            return total_failure(&failures);
        };

        let outcome = match format {
            DocumentFormat::Pdf => {
                self.extract_pdf(document, bytes.clone(), options, &mut failures)
                    .await
            }
            _ => self.extract_standard(format, bytes.clone(), &mut failures).await,
        };

        // The payload is the largest allocation of the request
        drop(bytes);

        outcome.unwrap_or_else(|| total_failure(&failures))
    }

    async fn extract_standard(
        &self,
        format: DocumentFormat,
        bytes: Arc<Vec<u8>>,
        failures: &mut Vec<StrategyFailure>,
    ) -> Option<ExtractionOutcome> {
        let Some(extractor) = self.registry.get(format) else {
            failures.push(StrategyFailure::new(
                format.as_str(),
                ExtractionError::UnsupportedFormat(format.to_string()).to_string(),
            ));
            return None;
        };
        let method = extractor.method();

        let raw = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await
            .unwrap_or(Err(ExtractionError::Panicked("extraction worker")));

        let raw = match raw {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{} extraction failed: {}", method, e);
                failures.push(StrategyFailure::new(method.as_str(), e.to_string()));
                return None;
            }
        };

        let cleaned = clean(&raw);
        let len = cleaned.chars().count();
        if len >= self.limits.min_extracted_chars {
            info!("Extracted {} chars with {}", len, method);
            return Some(ExtractionOutcome::success(cleaned, method));
        }

        // No later stage exists for non-PDF formats, so short text is the
        // final answer as long as it clears the absolute floor
        if len >= self.limits.min_text_chars {
            info!("Accepting short {} text ({} chars)", method, len);
            return Some(ExtractionOutcome::success(cleaned, method));
        }

        warn!("{} text below floor ({} chars)", method, len);
        failures.push(StrategyFailure::new(
            method.as_str(),
            ExtractionError::TooShort {
                len,
                min: self.limits.min_text_chars,
            }
            .to_string(),
        ));
        None
    }

    async fn extract_pdf(
        &self,
        document: &DocumentRef,
        bytes: Arc<Vec<u8>>,
        options: ExtractionOptions,
        failures: &mut Vec<StrategyFailure>,
    ) -> Option<ExtractionOutcome> {
        if options.force_ocr {
            if let Some(text) = self.try_ocr(document, &bytes, failures).await {
                return Some(ExtractionOutcome::success(text, ExtractionMethod::Ocr));
            }
        }

        let chain = self.pdf_chain.clone();
        let chain_bytes = bytes.clone();
        let result = tokio::task::spawn_blocking(move || chain.run(&chain_bytes))
            .await
            .unwrap_or_else(|_| {
                Err(vec![StrategyFailure::new(
                    "pdf chain",
                    ExtractionError::Panicked("pdf chain").to_string(),
                )])
            });

        match result {
            Ok(success) => return Some(ExtractionOutcome::success(success.text, success.method)),
            Err(chain_failures) => failures.extend(chain_failures),
        }

        if !options.force_ocr {
            if let Some(text) = self.try_ocr(document, &bytes, failures).await {
                return Some(ExtractionOutcome::success(text, ExtractionMethod::Ocr));
            }
        }

        None
    }

    /// Single OCR attempt, held to the same checks as the PDF engines
    async fn try_ocr(
        &self,
        document: &DocumentRef,
        bytes: &[u8],
        failures: &mut Vec<StrategyFailure>,
    ) -> Option<String> {
        let strategy = ExtractionMethod::Ocr.as_str();
        let Some(ocr) = &self.ocr else {
            debug!("No OCR provider configured");
            failures.push(StrategyFailure::new(strategy, "OCR provider not configured"));
            return None;
        };

        let mime_type = match DocumentFormat::from_mime(&document.declared_type) {
            Some(DocumentFormat::Pdf) => document.declared_type.as_str(),
            _ => DocumentFormat::Pdf.mime_type(),
        };

        info!("Submitting {} to OCR", document.id);
        let response = utils::call_with_retry("ocr", self.ocr_timeout, &self.retry, || {
            ocr.extract(bytes, mime_type, &document.name)
        })
        .await;

        match self.accept_ocr_text(response) {
            Ok(text) => {
                info!("OCR produced {} chars for {}", text.chars().count(), document.id);
                Some(text)
            }
            Err(e) => {
                warn!("OCR rejected for {}: {}", document.id, e);
                failures.push(StrategyFailure::new(strategy, e.to_string()));
                None
            }
        }
    }

    fn accept_ocr_text(
        &self,
        response: Result<OcrResponse, CollaboratorError>,
    ) -> Result<String, ExtractionError> {
        let response = response?;
        if !response.success {
            return Err(ExtractionError::Ocr(
                response
                    .error
                    .unwrap_or_else(|| "service reported failure".to_string()),
            ));
        }

        let raw = response.text.unwrap_or_default();
        if raw.trim().is_empty() {
            return Err(ExtractionError::Empty("ocr"));
        }
        if !self.validator.is_valid(&raw) {
            return Err(ExtractionError::Invalid);
        }

        let cleaned = clean(&raw);
        let len = cleaned.chars().count();
        if len < self.limits.min_text_chars {
            return Err(ExtractionError::TooShort {
                len,
                min: self.limits.min_text_chars,
            });
        }
        Ok(cleaned)
    }

    /// Cached text must be long enough to trust and still clear the floor
    /// once page furniture is stripped
    fn accept_cached(&self, cached: &str) -> Result<String, ExtractionError> {
        let raw_len = cached.chars().count();
        if raw_len < self.limits.cached_min_chars {
            return Err(ExtractionError::TooShort {
                len: raw_len,
                min: self.limits.cached_min_chars,
            });
        }

        let cleaned = clean(cached);
        let len = cleaned.chars().count();
        if len < self.limits.min_text_chars {
            return Err(ExtractionError::TooShort {
                len,
                min: self.limits.min_text_chars,
            });
        }
        Ok(cleaned)
    }
}

fn total_failure(failures: &[StrategyFailure]) -> ExtractionOutcome {
    let diagnostics = failures
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    warn!("All extraction stages failed: {}", diagnostics);
    ExtractionOutcome::failure(format!("extraction failed: {}", diagnostics))
}
