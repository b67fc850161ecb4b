use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A document owned by the surrounding application
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRef {
    pub id: String,
    /// Display name, usually the original filename
    pub name: String,
    /// Declared mime type (may be empty or wrong)
    pub declared_type: String,
    /// Logical category assigned by the application (e.g. "contract")
    pub category: Option<String>,
}

impl DocumentRef {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        declared_type: impl Into<String>,
        category: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            declared_type: declared_type.into(),
            category,
        }
    }
}

/// One stored binary payload of a document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentVersionRef {
    pub id: String,
    /// Location understood by the storage collaborator
    pub storage_path: String,
    /// Text extracted by an earlier run, trusted as already validated
    pub cached_text: Option<String>,
    pub byte_size: u64,
}

impl DocumentVersionRef {
    pub fn new(id: impl Into<String>, storage_path: impl Into<String>, byte_size: u64) -> Self {
        Self {
            id: id.into(),
            storage_path: storage_path.into(),
            cached_text: None,
            byte_size,
        }
    }

    pub fn with_cached_text(mut self, text: impl Into<String>) -> Self {
        self.cached_text = Some(text.into());
        self
    }
}

/// Which stage produced the accepted text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractionMethod {
    #[serde(rename = "cached")]
    Cached,
    #[serde(rename = "plain_text")]
    PlainText,
    #[serde(rename = "rtf")]
    Rtf,
    #[serde(rename = "docx")]
    Docx,
    #[serde(rename = "pdf_engine_A")]
    PdfEngineA,
    #[serde(rename = "pdf_engine_B")]
    PdfEngineB,
    #[serde(rename = "ocr")]
    Ocr,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Cached => "cached",
            ExtractionMethod::PlainText => "plain_text",
            ExtractionMethod::Rtf => "rtf",
            ExtractionMethod::Docx => "docx",
            ExtractionMethod::PdfEngineA => "pdf_engine_A",
            ExtractionMethod::PdfEngineB => "pdf_engine_B",
            ExtractionMethod::Ocr => "ocr",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of running the extraction stages for one document version.
///
/// Never persisted here; callers decide whether to cache `text`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<ExtractionMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionOutcome {
    pub fn success(text: String, method: ExtractionMethod) -> Self {
        Self {
            success: true,
            text: Some(text),
            method: Some(method),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            text: None,
            method: None,
            error: Some(error.into()),
        }
    }
}

/// Requested shape of the model output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    KeyTerms,
    Risks,
    Summary,
}

impl AnalysisType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::KeyTerms => "key_terms",
            AnalysisType::Risks => "risks",
            AnalysisType::Summary => "summary",
        }
    }

}

impl FromStr for AnalysisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "key_terms" | "keyterms" | "terms" => Ok(AnalysisType::KeyTerms),
            "risks" | "risk" => Ok(AnalysisType::Risks),
            "summary" => Ok(AnalysisType::Summary),
            _ => Err(format!(
                "unknown analysis type '{}' (expected key_terms, risks or summary)",
                s
            )),
        }
    }
}

impl fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input to the analysis dispatcher, built only after extraction succeeded
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    pub text: String,
    pub analysis_type: AnalysisType,
    pub document_type: String,
    pub extraction_method: ExtractionMethod,
}

/// Terminal artifact handed back to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub success: bool,
    pub analysis_type: AnalysisType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_terms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risks: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub document_type: String,
    pub word_count: usize,
    pub extraction_method: String,
    pub disclaimer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisOutcome {
    /// Failed outcome; nothing from a partial extraction is carried over
    pub fn failure(analysis_type: AnalysisType, error: impl Into<String>) -> Self {
        Self {
            success: false,
            analysis_type,
            key_terms: None,
            risks: None,
            summary: None,
            document_type: String::new(),
            word_count: 0,
            extraction_method: String::new(),
            disclaimer: crate::constants::ANALYSIS_DISCLAIMER.to_string(),
            error: Some(error.into()),
        }
    }
}
