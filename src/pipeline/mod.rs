pub mod analysis;
pub mod orchestrator;
pub mod parse;

pub use analysis::{infer_document_type, AnalysisDispatcher};
pub use orchestrator::{ExtractionOptions, ExtractionOrchestrator};

use crate::config::{Config, RetryConfig};
use crate::error::CollaboratorError;
use crate::llm::InferenceProvider;
use crate::models::{
    AnalysisOutcome, AnalysisRequest, AnalysisType, DocumentRef, DocumentVersionRef,
    ExtractionOutcome,
};
use crate::ocr::OcrProvider;
use crate::storage::DocumentStore;
use crate::utils;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Entry point used by the surrounding application: document and version
/// ids in, extraction or analysis outcome out. Never returns an error.
pub struct DocumentPipeline {
    store: Arc<dyn DocumentStore>,
    orchestrator: ExtractionOrchestrator,
    dispatcher: AnalysisDispatcher,
    retry: RetryConfig,
    lookup_timeout: Duration,
}

impl DocumentPipeline {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        ocr: Option<Arc<dyn OcrProvider>>,
        inference: Arc<dyn InferenceProvider>,
        config: &Config,
    ) -> Self {
        let orchestrator = ExtractionOrchestrator::new(store.clone(), ocr, config);
        let dispatcher = AnalysisDispatcher::new(inference, config);
        Self::from_parts(store, orchestrator, dispatcher, config)
    }

    /// Assemble from prebuilt stages, e.g. an orchestrator with custom PDF engines
    pub fn from_parts(
        store: Arc<dyn DocumentStore>,
        orchestrator: ExtractionOrchestrator,
        dispatcher: AnalysisDispatcher,
        config: &Config,
    ) -> Self {
        Self {
            store,
            orchestrator,
            dispatcher,
            retry: config.retry.clone(),
            lookup_timeout: config.storage.download_timeout(),
        }
    }

    async fn lookup(
        &self,
        document_id: &str,
        version_id: &str,
    ) -> Result<(DocumentRef, DocumentVersionRef), CollaboratorError> {
        let document = utils::call_with_retry("get_document", self.lookup_timeout, &self.retry, || {
            self.store.get_document(document_id)
        })
        .await?;
        let version = utils::call_with_retry("get_version", self.lookup_timeout, &self.retry, || {
            self.store.get_version(version_id)
        })
        .await?;
        Ok((document, version))
    }

    /// Extract the text of one document version
    pub async fn extract(
        &self,
        document_id: &str,
        version_id: &str,
        options: ExtractionOptions,
    ) -> ExtractionOutcome {
        match self.lookup(document_id, version_id).await {
            Ok((document, version)) => self.orchestrator.extract(&document, &version, options).await,
            Err(e) => {
                warn!("Lookup of {}/{} failed: {}", document_id, version_id, e);
                ExtractionOutcome::failure(format!("document lookup failed: {}", e))
            }
        }
    }

    /// Extract then analyze one document version
    pub async fn analyze(
        &self,
        document_id: &str,
        version_id: &str,
        analysis_type: AnalysisType,
        options: ExtractionOptions,
    ) -> AnalysisOutcome {
        let (document, version) = match self.lookup(document_id, version_id).await {
            Ok(found) => found,
            Err(e) => {
                warn!("Lookup of {}/{} failed: {}", document_id, version_id, e);
                return AnalysisOutcome::failure(
                    analysis_type,
                    format!("document lookup failed: {}", e),
                );
            }
        };

        let extraction = self.orchestrator.extract(&document, &version, options).await;
        let (Some(text), Some(method)) = (extraction.text, extraction.method) else {
            let error = extraction
                .error
                .unwrap_or_else(|| "extraction produced no text".to_string());
            return AnalysisOutcome::failure(analysis_type, error);
        };

        let request = AnalysisRequest {
            document_type: infer_document_type(&document.name, &text),
            text,
            analysis_type,
            extraction_method: method,
        };

        match self.dispatcher.analyze(&request).await {
            Ok(outcome) => {
                info!(
                    "{} analysis of {} finished ({} words)",
                    analysis_type, document.id, outcome.word_count
                );
                outcome
            }
            Err(e) => {
                warn!("{} analysis of {} failed: {}", analysis_type, document.id, e);
                AnalysisOutcome::failure(analysis_type, e.to_string())
            }
        }
    }
}
