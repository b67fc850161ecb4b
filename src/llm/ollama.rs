use crate::error::CollaboratorError;
use crate::llm::{InferenceProvider, InferenceRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama chat API client
pub struct OllamaProvider {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct OllamaMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: Option<OllamaReply>,
}

#[derive(Debug, Deserialize)]
struct OllamaReply {
    #[serde(default)]
    content: String,
}

impl OllamaProvider {
    /// Default URL: http://localhost:11434
    pub fn new(base_url: Option<&str>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url
                .unwrap_or("http://localhost:11434")
                .trim_end_matches('/')
                .to_string(),
            client,
        }
    }
}

fn build_request(request: &InferenceRequest) -> OllamaChatRequest<'_> {
    OllamaChatRequest {
        model: &request.model,
        messages: vec![
            OllamaMessage {
                role: "system",
                content: &request.system_prompt,
            },
            OllamaMessage {
                role: "user",
                content: &request.user_prompt,
            },
        ],
        stream: false,
        options: OllamaOptions {
            temperature: request.temperature,
            num_predict: request.max_tokens,
        },
    }
}

fn parse_response(body: &str) -> Result<String, CollaboratorError> {
    let response: OllamaChatResponse = serde_json::from_str(body)
        .map_err(|e| CollaboratorError::InvalidResponse(format!("ollama chat: {}", e)))?;
    Ok(response.message.map(|m| m.content).unwrap_or_default())
}

#[async_trait::async_trait]
impl InferenceProvider for OllamaProvider {
    async fn infer(&self, request: &InferenceRequest) -> Result<String, CollaboratorError> {
        let url = format!("{}/api/chat", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&build_request(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Api { status, message });
        }

        parse_response(&response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_disables_streaming() {
        let req = InferenceRequest {
            system_prompt: "system".to_string(),
            user_prompt: "user".to_string(),
            model: "llama3.2".to_string(),
            temperature: 0.2,
            max_tokens: 512,
        };
        let json = serde_json::to_value(build_request(&req)).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["num_predict"], 512);
        assert_eq!(json["messages"][0]["content"], "system");
    }

    #[test]
    fn test_parse_message_content() {
        let body = r#"{"model":"llama3.2","message":{"role":"assistant","content":"[\"Rent\"]"},"done":true}"#;
        assert_eq!(parse_response(body).unwrap(), "[\"Rent\"]");
    }
}
