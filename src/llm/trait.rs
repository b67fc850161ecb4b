use crate::error::CollaboratorError;

/// One prompt pair sent to an inference backend
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceRequest {
    pub system_prompt: String,
    pub user_prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Trait for language model backends that complete a prompt into text
#[async_trait::async_trait]
pub trait InferenceProvider: Send + Sync {
    /// Return the raw assistant text for the request
    async fn infer(&self, request: &InferenceRequest) -> Result<String, CollaboratorError>;
}
