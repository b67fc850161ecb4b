use crate::error::CollaboratorError;
use crate::ocr::{OcrProvider, OcrResponse};
use base64::Engine as _;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// OCR over HTTP: posts the base64 document as JSON and reads back
/// `{success, text, error}`
pub struct HttpOcrProvider {
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OcrRequest<'a> {
    file: String,
    mime_type: &'a str,
    file_name: &'a str,
}

impl HttpOcrProvider {
    pub fn new(endpoint: &str, api_key: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl OcrProvider for HttpOcrProvider {
    async fn extract(
        &self,
        bytes: &[u8],
        declared_type: &str,
        filename: &str,
    ) -> Result<OcrResponse, CollaboratorError> {
        let request = OcrRequest {
            file: base64::engine::general_purpose::STANDARD.encode(bytes),
            mime_type: declared_type,
            file_name: filename,
        };

        debug!("Posting {} ({} bytes) to OCR service", filename, bytes.len());

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(CollaboratorError::Api { status, message });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| CollaboratorError::InvalidResponse(format!("OCR reply: {}", e)))
    }
}
