use crate::config::{AnalysisConfig, Config, RetryConfig};
use crate::constants::{
    ANALYSIS_DISCLAIMER, DEFAULT_DOCUMENT_TYPE, DOCUMENT_TYPE_RULES, DOCUMENT_TYPE_SCAN_CHARS,
    TRUNCATION_MARKER,
};
use crate::error::AnalysisError;
use crate::llm::{InferenceProvider, InferenceRequest};
use crate::models::{AnalysisOutcome, AnalysisRequest, AnalysisType};
use crate::pipeline::parse::{self, ItemLimits};
use crate::text::clean;
use crate::utils;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Lowercase letters and digits separated by single spaces, padded so
/// keywords can be matched as " word ".
fn normalize_for_matching(text: &str) -> String {
    let mapped: String = text
        .chars()
        .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect();
    format!(" {} ", mapped.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn match_rules(normalized: &str) -> Option<&'static str> {
    DOCUMENT_TYPE_RULES.iter().find_map(|(keywords, label)| {
        keywords
            .iter()
            .any(|keyword| normalized.contains(normalize_for_matching(keyword).as_str()))
            .then_some(*label)
    })
}

/// Guess the kind of legal document from its filename, then from the
/// opening of its text. Falls back to "Legal Document".
pub fn infer_document_type(filename: &str, text: &str) -> String {
    let stem = std::path::Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename);

    if let Some(label) = match_rules(&normalize_for_matching(stem)) {
        return label.to_string();
    }

    let (head, _) = utils::truncate_chars(text, DOCUMENT_TYPE_SCAN_CHARS);
    match_rules(&normalize_for_matching(head))
        .unwrap_or(DEFAULT_DOCUMENT_TYPE)
        .to_string()
}

/// System instruction for one analysis type
pub fn system_prompt(analysis_type: AnalysisType, document_type: &str) -> String {
    let task = match analysis_type {
        AnalysisType::KeyTerms => {
            "Identify the 5 to 8 most important key terms of the document. Each term is a short \
             noun phrase (for example \"Payment Terms\" or \"Termination for Convenience\"). \
             Respond with a JSON array of strings only, no commentary."
        }
        AnalysisType::Risks => {
            "Identify the 3 to 6 highest-impact risks for the party receiving this document. \
             Each risk is a single statement of 5 to 15 words. \
             Respond with a JSON array of strings only, no commentary."
        }
        AnalysisType::Summary => {
            "Summarize the document in 3 to 5 plain sentences covering the parties, the purpose, \
             the key obligations and any amounts or dates. Respond with prose only, no lists \
             or headings."
        }
    };
    format!(
        "You are an experienced legal analyst reviewing a document classified as {}. {}",
        document_type, task
    )
}

/// Runs one analysis request against the inference collaborator
pub struct AnalysisDispatcher {
    inference: Arc<dyn InferenceProvider>,
    config: AnalysisConfig,
    model: String,
    min_text_chars: usize,
    retry: RetryConfig,
    timeout: Duration,
}

impl AnalysisDispatcher {
    pub fn new(inference: Arc<dyn InferenceProvider>, config: &Config) -> Self {
        Self {
            inference,
            config: config.analysis.clone(),
            model: config.analysis_model().to_string(),
            min_text_chars: config.extraction.min_text_chars,
            retry: config.retry.clone(),
            timeout: config.inference.timeout(),
        }
    }

    /// Build the inference request: bounded text, type-specific instruction
    pub fn build_request(&self, request: &AnalysisRequest) -> InferenceRequest {
        let (text, truncated) = utils::truncate_chars(&request.text, self.config.max_input_chars);
        if truncated {
            debug!(
                "Truncated document text to {} chars for analysis",
                self.config.max_input_chars
            );
        }

        let user_prompt = format!(
            "Document type: {}\n\nDocument text:\n{}{}",
            request.document_type,
            text,
            if truncated { TRUNCATION_MARKER } else { "" }
        );

        InferenceRequest {
            system_prompt: system_prompt(request.analysis_type, &request.document_type),
            user_prompt,
            model: self.model.clone(),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    fn limits(&self, analysis_type: AnalysisType) -> ItemLimits {
        let max_items = match analysis_type {
            AnalysisType::Risks => self.config.max_risks,
            _ => self.config.max_key_terms,
        };
        ItemLimits {
            max_items,
            min_chars: self.config.min_item_chars,
            max_chars: self.config.max_item_chars,
        }
    }

    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        let len = clean(&request.text).chars().count();
        if len < self.min_text_chars {
            return Err(AnalysisError::TextTooShort {
                len,
                min: self.min_text_chars,
            });
        }

        let inference_request = self.build_request(request);
        info!(
            "Running {} analysis on {} ({} chars) with {}",
            request.analysis_type, request.document_type, len, inference_request.model
        );

        let response = utils::call_with_retry("inference", self.timeout, &self.retry, || {
            self.inference.infer(&inference_request)
        })
        .await?;

        if response.trim().is_empty() {
            return Err(AnalysisError::EmptyResponse);
        }

        let mut outcome = AnalysisOutcome {
            success: true,
            analysis_type: request.analysis_type,
            key_terms: None,
            risks: None,
            summary: None,
            document_type: request.document_type.clone(),
            word_count: utils::word_count(&request.text),
            extraction_method: request.extraction_method.as_str().to_string(),
            disclaimer: ANALYSIS_DISCLAIMER.to_string(),
            error: None,
        };

        let unparseable = AnalysisError::Unparseable {
            analysis_type: request.analysis_type.as_str(),
        };

        match request.analysis_type {
            AnalysisType::Summary => {
                outcome.summary = Some(parse::parse_summary(&response).ok_or(unparseable)?);
            }
            analysis_type => {
                let items = parse::parse_list(&response, self.limits(analysis_type));
                if items.is_empty() {
                    return Err(unparseable);
                }
                debug!("Parsed {} {} items", items.len(), analysis_type);
                if analysis_type == AnalysisType::Risks {
                    outcome.risks = Some(items);
                } else {
                    outcome.key_terms = Some(items);
                }
            }
        }

        Ok(outcome)
    }
}
