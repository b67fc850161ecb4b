pub mod ollama;
pub mod openai;
pub mod r#trait;

pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;
pub use r#trait::{InferenceProvider, InferenceRequest};

use crate::config::{InferenceConfig, InferenceProviderKind};
use std::sync::Arc;

/// Build the inference backend selected in the configuration
pub fn from_config(config: &InferenceConfig) -> Arc<dyn InferenceProvider> {
    match config.provider {
        InferenceProviderKind::OpenAI => Arc::new(OpenAiProvider::new(
            Some(&config.endpoint),
            config.resolved_api_key(),
            config.timeout(),
        )),
        InferenceProviderKind::Ollama => {
            Arc::new(OllamaProvider::new(Some(&config.endpoint), config.timeout()))
        }
    }
}
