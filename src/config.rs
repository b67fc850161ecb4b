use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pipeline configuration loaded from docintel.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub validity: ValidityConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Length thresholds used by the extraction orchestrator
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Absolute floor for any accepted text, after cleaning
    pub min_text_chars: usize,
    /// Cleaned length a standard (non-PDF) extraction must reach to be accepted outright
    pub min_extracted_chars: usize,
    /// Cached text at least this long is trusted without re-extraction
    pub cached_min_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_chars: 20,
            min_extracted_chars: 50,
            cached_min_chars: 50,
        }
    }
}

/// Thresholds for the text validity heuristic.
///
/// The defaults were picked empirically and should be recalibrated
/// against a labeled corpus before being tightened.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ValidityConfig {
    /// Reject when more than this many distinct structure markers appear
    pub max_structure_markers: usize,
    /// Minimum share of candidate tokens that must look like words
    pub min_meaningful_ratio: f64,
    /// Tokens shorter than this are not candidates
    pub min_token_chars: usize,
}

impl Default for ValidityConfig {
    fn default() -> Self {
        Self {
            max_structure_markers: 2,
            min_meaningful_ratio: 0.3,
            min_token_chars: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Characters of document text sent to the model
    pub max_input_chars: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    pub max_key_terms: usize,
    pub max_risks: usize,
    /// Parsed list items outside this range are dropped
    pub min_item_chars: usize,
    pub max_item_chars: usize,
    /// Overrides `inference.model` for analysis calls
    pub model: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_input_chars: 12_000,
            temperature: 0.2,
            max_tokens: 1024,
            max_key_terms: 8,
            max_risks: 6,
            min_item_chars: 3,
            max_item_chars: 200,
            model: None,
        }
    }
}

/// Inference backend flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InferenceProviderKind {
    /// OpenAI-compatible chat completions (OpenAI, Groq, Together, vLLM...)
    #[default]
    OpenAI,
    /// Ollama chat API
    Ollama,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InferenceConfig {
    pub provider: InferenceProviderKind,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            provider: InferenceProviderKind::OpenAI,
            endpoint: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout_secs: 60,
        }
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key from config or DOCINTEL_INFERENCE_API_KEY
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("DOCINTEL_INFERENCE_API_KEY").ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OcrConfig {
    /// OCR service URL; OCR fallback is disabled when unset
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl OcrConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key from config or DOCINTEL_OCR_API_KEY
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("DOCINTEL_OCR_API_KEY").ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub root: String,
    pub download_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: ".".to_string(),
            download_timeout_secs: 30,
        }
    }
}

impl StorageConfig {
    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// Storage root with `~` and env vars expanded
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(expand_path(&self.root))
    }
}

/// Bounded retry around external I/O calls
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay_ms: 500,
        }
    }
}

fn expand_path(raw: &str) -> String {
    shellexpand::full(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| shellexpand::tilde(raw).into_owned())
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Load configuration from default location or return defaults
    pub fn load() -> Result<Self> {
        let default_paths = [
            "config/docintel.toml",
            "./docintel.toml",
            "~/.config/docintel/docintel.toml",
        ];

        for raw in default_paths {
            let path = PathBuf::from(expand_path(raw));
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Model used for analysis calls
    pub fn analysis_model(&self) -> &str {
        self.analysis
            .model
            .as_deref()
            .unwrap_or(&self.inference.model)
    }
}
