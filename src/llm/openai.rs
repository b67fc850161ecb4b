use crate::error::CollaboratorError;
use crate::llm::{InferenceProvider, InferenceRequest};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// OpenAI-compatible chat completions client
pub struct OpenAiProvider {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiProvider {
    /// Default URL: https://api.openai.com/v1
    pub fn new(base_url: Option<&str>, api_key: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            base_url: base_url
                .unwrap_or("https://api.openai.com/v1")
                .trim_end_matches('/')
                .to_string(),
            api_key,
            client,
        }
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn build_request(request: &InferenceRequest) -> ChatRequest<'_> {
    ChatRequest {
        model: &request.model,
        messages: vec![
            ChatMessage {
                role: "system",
                content: &request.system_prompt,
            },
            ChatMessage {
                role: "user",
                content: &request.user_prompt,
            },
        ],
        temperature: request.temperature,
        max_tokens: request.max_tokens,
    }
}

fn parse_response(body: &str) -> Result<String, CollaboratorError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| CollaboratorError::InvalidResponse(format!("chat completion: {}", e)))?;

    // A missing choice is reported as empty text and handled by the caller
    Ok(response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default())
}

#[async_trait::async_trait]
impl InferenceProvider for OpenAiProvider {
    async fn infer(&self, request: &InferenceRequest) -> Result<String, CollaboratorError> {
        let mut builder = self.client.post(self.url()).json(&build_request(request));
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;

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

    fn request() -> InferenceRequest {
        InferenceRequest {
            system_prompt: "You are a contracts analyst.".to_string(),
            user_prompt: "Summarize this lease.".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            max_tokens: 256,
        }
    }

    #[test]
    fn test_request_carries_both_prompts() {
        let req = request();
        let json = serde_json::to_value(build_request(&req)).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Summarize this lease.");
        assert_eq!(json["max_tokens"], 256);
    }

    #[test]
    fn test_parse_first_choice() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":"A short lease."}}]}"#;
        assert_eq!(parse_response(body).unwrap(), "A short lease.");
    }

    #[test]
    fn test_no_choices_is_empty_text() {
        assert_eq!(parse_response(r#"{"choices":[]}"#).unwrap(), "");
    }

    #[test]
    fn test_garbage_body_is_invalid() {
        assert!(matches!(
            parse_response("<html>bad gateway</html>"),
            Err(CollaboratorError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_default_base_url() {
        let provider = OpenAiProvider::new(None, None, Duration::from_secs(5));
        assert_eq!(provider.url(), "https://api.openai.com/v1/chat/completions");
    }
}
